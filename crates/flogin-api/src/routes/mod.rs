//! API 라우트 모듈.
//!
//! 모든 REST API 엔드포인트를 정의합니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/auth/login` - 로그인 (공개)
//! - `GET /api/products` - 상품 목록 (USER 이상)
//! - `GET /api/products/{id}` - 상품 조회 (USER 이상)
//! - `POST /api/products` - 상품 생성 (ADMIN)
//! - `PUT /api/products/{id}` - 상품 수정 (ADMIN)
//! - `DELETE /api/products/{id}` - 상품 소프트 삭제 (ADMIN)
//! - `GET /health`, `GET /health/ready` - 헬스 체크 (공개)

pub mod auth;
pub mod health;
pub mod products;

use std::sync::Arc;

use axum::Router;

pub use auth::auth_router;
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use products::{products_router, ListQuery, ProductRequest};

use crate::state::AppState;

/// API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/auth", auth_router())
        .nest("/api/products", products_router())
}
