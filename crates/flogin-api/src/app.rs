//! 전체 HTTP 애플리케이션 조립.
//!
//! API 라우터, 메트릭, Swagger UI를 하나로 합치고 공통 미들웨어를 적용합니다.
//!
//! 미들웨어 순서 (바깥 → 안쪽):
//! CORS → Trace → 메트릭 → 에러 경로 → 인가 → 타임아웃 → 라우트

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::authorize;
use crate::middleware::{error_path_layer, metrics_layer};
use crate::openapi::swagger_ui_router;
use crate::routes::create_api_router;
use crate::state::AppState;

/// 요청 처리 제한 시간.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 종료 시그널 이후 진행 중인 요청을 기다리는 최대 시간.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// 종료 토큰이 취소된 뒤 [`DRAIN_TIMEOUT`]이 지나면 완료됩니다.
///
/// graceful shutdown과 경쟁시켜 오래 걸리는 요청이 종료를 막지 못하게 합니다.
pub async fn drain_deadline(shutdown_token: CancellationToken) {
    shutdown_token.cancelled().await;
    tokio::time::sleep(DRAIN_TIMEOUT).await;
}

/// CORS 레이어 생성.
///
/// `CORS_ORIGINS` 환경변수(콤마 구분)가 있으면 해당 origin만 허용하고,
/// 없으면 모든 origin을 허용합니다 (개발 모드).
pub fn cors_layer() -> CorsLayer {
    let (allow_origin, allow_credentials) = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                (AllowOrigin::any(), false)
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                (AllowOrigin::list(origins), true)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            (AllowOrigin::any(), false)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        // 와일드카드 origin과 자격 증명은 함께 쓸 수 없음
        .allow_credentials(allow_credentials)
        .max_age(Duration::from_secs(3600))
}

/// Prometheus 메트릭 엔드포인트.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// 전체 라우터 생성.
///
/// `metrics_handle`이 없으면 `/metrics` 라우트를 등록하지 않습니다.
pub fn create_router(state: Arc<AppState>, metrics_handle: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .merge(create_api_router().with_state(state.clone()))
        .merge(swagger_ui_router());

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics_handler))
                .with_state(handle),
        );
    }

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(middleware::from_fn_with_state(state, authorize))
        .layer(middleware::from_fn(error_path_layer))
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
