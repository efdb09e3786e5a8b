//! 로그인 및 상품 관리 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 로그인과 역할 기반 접근 제어
//! - 소프트 삭제와 페이지 검색을 지원하는 상품 CRUD
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`app`]: 전체 라우터와 미들웨어 조립
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 로그인, JWT, 요청 인가
//! - [`services`]: 상품 비즈니스 로직
//! - [`repository`]: PostgreSQL / 인메모리 저장소
//! - [`bootstrap`]: 기본 관리자 계정 초기화
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use app::{cors_layer, create_router};
pub use auth::{hash_password, verify_password, AuthService, Claims, CurrentUser, TokenIssuer};
pub use bootstrap::{ensure_default_admin, BootstrapOutcome};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
