//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.

use axum::Router;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{LoginRequest, LoginResponse};
use crate::error::ErrorResponse;
use crate::routes::{ComponentHealth, ComponentStatus, HealthResponse, ProductRequest};
use crate::services::ProductResponse;

/// Flogin API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Flogin API",
        version = "0.1.0",
        description = "JWT 로그인과 역할 기반 상품 관리 REST API"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::login,
        crate::routes::products::list_products,
        crate::routes::products::get_product,
        crate::routes::products::create_product,
        crate::routes::products::update_product,
        crate::routes::products::delete_product,
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        ProductRequest,
        ProductResponse,
        ErrorResponse,
        HealthResponse,
        ComponentHealth,
        ComponentStatus,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "로그인 및 토큰 발급"),
        (name = "products", description = "상품 관리"),
        (name = "health", description = "헬스 체크")
    )
)]
pub struct ApiDoc;

/// `bearer_auth` 보안 스킴 등록.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    Http::builder()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Swagger UI 라우터 생성.
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Flogin API"));
        assert!(json.contains("/api/auth/login"));
        assert!(json.contains("/api/products/{id}"));
        assert!(json.contains("/health/ready"));
    }

    #[test]
    fn test_openapi_contains_schemas_and_security() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("ProductRequest"));
        assert!(json.contains("ErrorResponse"));
        assert!(json.contains("LoginResponse"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
