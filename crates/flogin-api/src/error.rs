//! 통합 API 에러 응답 타입.
//!
//! 로그인 엔드포인트를 제외한 모든 엔드포인트의 실패는 같은 JSON 형식으로 응답합니다.
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "Product not found with id: 42",
//!   "timestamp": "2026-01-01T09:00:00+00:00",
//!   "status": 404,
//!   "error": "Not Found",
//!   "path": "/api/products/42"
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use flogin_core::FloginError;

/// 5xx 응답에 노출되는 메시지 (상세 내용은 로그에만 남김).
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 통합 에러 응답 본문.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// 항상 false
    pub success: bool,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 시각 (RFC 3339)
    pub timestamp: String,
    /// HTTP 상태 코드
    pub status: u16,
    /// HTTP 상태 설명 (예: "Bad Request")
    pub error: String,
    /// 요청 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            path: None,
        }
    }

    /// 요청 경로를 추가합니다.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// HTTP 경계의 에러.
///
/// 응답으로 변환될 때 본문과 함께 [`ErrorResponse`]를 응답 extension에 넣어 두며,
/// `error_path_layer` 미들웨어가 이를 이용해 `path`를 채웁니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{status}] {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    /// 응답 본문 생성.
    pub fn body(&self) -> ErrorResponse {
        ErrorResponse::new(self.status, self.message.clone())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.body();
        let mut response = (self.status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

impl From<FloginError> for ApiError {
    fn from(err: FloginError) -> Self {
        match err {
            FloginError::Validation(msg) | FloginError::InvalidArgument(msg) => {
                Self::bad_request(msg)
            }
            e @ FloginError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            FloginError::Conflict(msg) => Self::new(StatusCode::CONFLICT, msg),
            e => {
                error!(error = %e, "Unhandled service error");
                Self::internal()
            }
        }
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
