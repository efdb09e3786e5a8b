//! 상품 관리 endpoint.
//!
//! 조회는 USER 이상, 생성/수정/삭제는 ADMIN 역할이 필요합니다.
//! 역할 검사는 `authorize` 미들웨어가 접근 규칙 테이블로 처리합니다.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use flogin_core::{FloginError, Page, ProductDraft};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult, ErrorResponse};
use crate::services::ProductResponse;
use crate::state::AppState;

pub const MAX_PRICE: i64 = 999_999_999;
pub const MAX_QUANTITY: i64 = 99_999;

fn not_blank_name(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Product name must not be blank")
}

fn not_blank_category(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Category must not be blank")
}

fn not_blank(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank").with_message(message.into()));
    }
    Ok(())
}

/// 상품 생성/수정 요청.
///
/// 수정은 전체 교체이므로 생성과 같은 필드를 모두 요구합니다.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    /// 상품명 (3-100자, 대소문자 무시 고유)
    #[serde(default)]
    #[validate(
        custom(function = "not_blank_name"),
        length(min = 3, max = 100, message = "Product name must be 3-100 characters")
    )]
    pub name: String,

    /// 가격 (1 ~ 999,999,999)
    #[serde(default)]
    #[validate(required(message = "Price is required"))]
    pub price: Option<i64>,

    /// 재고 수량 (0 ~ 99,999)
    ///
    /// i32 범위를 넘는 값도 역직렬화한 뒤 범위 메시지로 거부합니다.
    #[serde(default)]
    #[validate(required(message = "Quantity is required"))]
    pub quantity: Option<i64>,

    /// 설명 (최대 500자)
    #[serde(default)]
    #[validate(length(max = 500, message = "Description can be up to 500 characters"))]
    pub description: Option<String>,

    /// 카테고리
    #[serde(default)]
    #[validate(custom(function = "not_blank_category"))]
    pub category: String,
}

impl ProductRequest {
    /// 필드 순서대로 모든 검증 메시지를 모읍니다.
    pub fn validation_messages(&self) -> Vec<String> {
        let errors = self.validate().err();
        let messages_for = |field: &str| -> Vec<String> {
            errors
                .as_ref()
                .and_then(|e| e.field_errors().get(field).cloned())
                .map(|list| {
                    list.iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("{field}: invalid value"))
                        })
                        .collect()
                })
                .unwrap_or_default()
        };

        let mut messages = messages_for("name");

        messages.extend(messages_for("price"));
        match self.price {
            Some(p) if p < 1 => messages.push("Price must be greater than 0".to_string()),
            Some(p) if p > MAX_PRICE => {
                messages.push("Price must be less than 999,999,999".to_string())
            }
            _ => {}
        }

        messages.extend(messages_for("quantity"));
        match self.quantity {
            Some(q) if q < 0 => messages.push("Quantity must be >= 0".to_string()),
            Some(q) if q > MAX_QUANTITY => messages.push("Quantity must be <= 99,999".to_string()),
            _ => {}
        }

        messages.extend(messages_for("description"));
        messages.extend(messages_for("category"));
        messages
    }

    /// 검증 후 도메인 draft로 변환합니다.
    ///
    /// # Errors
    ///
    /// 검증 실패 시 모든 메시지를 `"; "`로 연결한 `FloginError::Validation`
    pub fn into_draft(self) -> Result<ProductDraft, FloginError> {
        let messages = self.validation_messages();
        if !messages.is_empty() {
            return Err(FloginError::Validation(messages.join("; ")));
        }

        let quantity = self.quantity.and_then(|q| i32::try_from(q).ok());
        match (self.price, quantity) {
            (Some(price), Some(quantity)) => Ok(ProductDraft {
                name: self.name,
                price,
                quantity,
                description: self.description,
                category: self.category,
            }),
            _ => Err(FloginError::Validation("Price and quantity are required".to_string())),
        }
    }
}

/// 요청 본문 추출 결과를 변환합니다.
///
/// 문법 오류와 타입 불일치(`"price": "abc"`, i64 범위 초과 등)는 400,
/// Content-Type 누락 같은 나머지 rejection은 원래 상태 코드를 유지합니다.
fn request_body(
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<ProductRequest> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection @ (JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_))) => {
            Err(ApiError::bad_request(rejection.body_text()))
        }
        Err(rejection) => Err(ApiError::new(rejection.status(), rejection.body_text())),
    }
}

/// 상품 목록 쿼리 파라미터.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 이름 키워드 (대소문자 무시 부분 일치)
    pub name: Option<String>,
    /// 카테고리 키워드 (대소문자 무시 부분 일치)
    pub category: Option<String>,
    /// 페이지 번호 (0부터, 기본 0)
    #[serde(default)]
    pub page: i64,
    /// 페이지 크기 (기본 10)
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

/// 상품 생성.
///
/// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = ProductRequest,
    responses(
        (status = 200, description = "생성된 상품", body = ProductResponse),
        (status = 400, description = "검증 실패", body = ErrorResponse),
        (status = 403, description = "ADMIN 권한 필요", body = ErrorResponse),
        (status = 409, description = "이름 중복", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<Json<ProductResponse>> {
    let draft = request_body(payload)?.into_draft()?;
    debug!(by = %user.username, name = %draft.name, "Create product requested");

    let product = state.product_service.create(draft).await?;
    Ok(Json(product))
}

/// 상품 전체 수정.
///
/// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "상품 ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "수정된 상품", body = ProductResponse),
        (status = 400, description = "검증 실패", body = ErrorResponse),
        (status = 404, description = "상품 없음", body = ErrorResponse),
        (status = 409, description = "이름 중복", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<Json<ProductResponse>> {
    let draft = request_body(payload)?.into_draft()?;
    debug!(by = %user.username, id, "Update product requested");

    let product = state.product_service.update(id, draft).await?;
    Ok(Json(product))
}

/// 상품 단건 조회 (비활성 상품 포함).
///
/// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "상품 ID")),
    responses(
        (status = 200, description = "상품", body = ProductResponse),
        (status = 404, description = "상품 없음", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProductResponse>> {
    let product = state.product_service.get_by_id(id).await?;
    Ok(Json(product))
}

/// 활성 상품 목록 (이름 오름차순, 페이지네이션).
///
/// GET /api/products?name=&category=&page=&size=
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "상품 페이지", body = Page<ProductResponse>),
        (status = 400, description = "잘못된 페이지 파라미터", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<ProductResponse>>> {
    let page = state
        .product_service
        .list(
            query.name.as_deref(),
            query.category.as_deref(),
            query.page,
            query.size,
        )
        .await?;
    Ok(Json(page))
}

/// 상품 소프트 삭제.
///
/// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "상품 ID")),
    responses(
        (status = 204, description = "삭제됨 (active = false)"),
        (status = 404, description = "상품 없음", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    debug!(by = %user.username, id, "Delete product requested");
    state.product_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 상품 라우터 생성.
pub fn products_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ProductRequest {
        ProductRequest {
            name: "Laptop".to_string(),
            price: Some(15_000_000),
            quantity: Some(10),
            description: Some("High-performance laptop".to_string()),
            category: "Electronics".to_string(),
        }
    }

    #[test]
    fn test_valid_request_into_draft() {
        let draft = valid_request().into_draft().unwrap();
        assert_eq!(draft.name, "Laptop");
        assert_eq!(draft.price, 15_000_000);
        assert_eq!(draft.quantity, 10);
    }

    #[test]
    fn test_boundaries_accepted() {
        let mut request = valid_request();
        request.name = "abc".to_string();
        request.price = Some(MAX_PRICE);
        request.quantity = Some(0);
        request.description = Some("d".repeat(500));
        assert!(request.validation_messages().is_empty());

        request.price = Some(1);
        request.quantity = Some(MAX_QUANTITY);
        assert!(request.validation_messages().is_empty());
    }

    #[test]
    fn test_name_rules() {
        let mut request = valid_request();
        request.name = "ab".to_string();
        assert_eq!(
            request.validation_messages(),
            vec!["Product name must be 3-100 characters"]
        );

        request.name = "   ".to_string();
        assert_eq!(
            request.validation_messages(),
            vec!["Product name must not be blank"]
        );

        request.name = "a".repeat(101);
        assert_eq!(
            request.validation_messages(),
            vec!["Product name must be 3-100 characters"]
        );
    }

    #[test]
    fn test_price_rules() {
        let mut request = valid_request();
        request.price = None;
        assert_eq!(request.validation_messages(), vec!["Price is required"]);

        request.price = Some(0);
        assert_eq!(
            request.validation_messages(),
            vec!["Price must be greater than 0"]
        );

        request.price = Some(MAX_PRICE + 1);
        assert_eq!(
            request.validation_messages(),
            vec!["Price must be less than 999,999,999"]
        );
    }

    #[test]
    fn test_quantity_rules() {
        let mut request = valid_request();
        request.quantity = None;
        assert_eq!(request.validation_messages(), vec!["Quantity is required"]);

        request.quantity = Some(-1);
        assert_eq!(request.validation_messages(), vec!["Quantity must be >= 0"]);

        request.quantity = Some(100_000);
        assert_eq!(
            request.validation_messages(),
            vec!["Quantity must be <= 99,999"]
        );
    }

    #[test]
    fn test_description_and_category_rules() {
        let mut request = valid_request();
        request.description = Some("d".repeat(501));
        request.category = String::new();

        assert_eq!(
            request.validation_messages(),
            vec![
                "Description can be up to 500 characters",
                "Category must not be blank"
            ]
        );
    }

    #[test]
    fn test_quantity_beyond_i32_gets_range_message() {
        let request: ProductRequest = serde_json::from_value(serde_json::json!({
            "name": "Laptop",
            "price": 1000,
            "quantity": 5_000_000_000_i64,
            "category": "Electronics"
        }))
        .unwrap();

        assert_eq!(
            request.validation_messages(),
            vec!["Quantity must be <= 99,999"]
        );
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_bad_request() {
        use axum::{
            body::Body,
            extract::FromRequest,
            http::{header, Request},
        };

        let cases = [
            r#"{"name":"Laptop","price":"abc","quantity":1,"category":"E"}"#,
            r#"{"name":"Laptop","price":99999999999999999999,"quantity":1,"category":"E"}"#,
            "{not json",
        ];

        for body in cases {
            let request = Request::builder()
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();
            let payload = Json::<ProductRequest>::from_request(request, &()).await;

            let err = request_body(payload).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST, "body: {body}");
        }

        // Content-Type 누락은 415 유지
        let request = Request::builder().body(Body::from("{}")).unwrap();
        let payload = Json::<ProductRequest>::from_request(request, &()).await;
        assert_eq!(
            request_body(payload).unwrap_err().status,
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_long_category_accepted() {
        let mut request = valid_request();
        request.category = "c".repeat(300);

        assert!(request.validation_messages().is_empty());
        assert_eq!(request.into_draft().unwrap().category.len(), 300);
    }

    #[test]
    fn test_into_draft_joins_messages() {
        let request = ProductRequest::default();
        let err = request.into_draft().unwrap_err();

        let FloginError::Validation(message) = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("Product name must not be blank"));
        assert!(message.contains("Price is required"));
        assert!(message.contains("Quantity is required"));
        assert!(message.contains("Category must not be blank"));
    }
}
