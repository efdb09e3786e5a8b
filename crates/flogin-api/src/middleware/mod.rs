//! API 서버용 HTTP middleware.
//!
//! 요청 처리 파이프라인에 적용되는 middleware 모듈.

mod metrics;
mod request_path;

pub use metrics::metrics_layer;
pub use request_path::error_path_layer;
