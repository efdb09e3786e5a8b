//! 서비스 에러 타입.
//!
//! 이 모듈은 도메인 계층과 저장소 계층에서 공통으로 사용되는 에러 타입을 정의합니다.
//! HTTP 상태 코드 매핑은 API 크레이트의 경계에서 처리합니다.

use thiserror::Error;

/// 핵심 서비스 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FloginError {
    /// 입력 필드 검증 실패
    #[error("{0}")]
    Validation(String),

    /// 잘못된 인자 (페이지 번호, 페이지 크기 등)
    #[error("{0}")]
    InvalidArgument(String),

    /// ID로 조회한 엔티티가 없음
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// 고유성 제약 위반 (중복 이름 등)
    #[error("{0}")]
    Conflict(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 서비스 작업을 위한 Result 타입.
pub type FloginResult<T> = Result<T, FloginError>;

impl FloginError {
    /// ID 조회 실패 에러를 생성합니다.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        FloginError::NotFound { entity, id }
    }

    /// 호출자의 입력 때문에 발생한 에러인지 확인합니다.
    ///
    /// 클라이언트 에러는 메시지를 그대로 응답에 노출해도 안전합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FloginError::Validation(_)
                | FloginError::InvalidArgument(_)
                | FloginError::NotFound { .. }
                | FloginError::Conflict(_)
        )
    }
}

impl From<serde_json::Error> for FloginError {
    fn from(err: serde_json::Error) -> Self {
        FloginError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for FloginError {
    fn from(err: config::ConfigError) -> Self {
        FloginError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = FloginError::not_found("Product", 42);
        assert_eq!(err.to_string(), "Product not found with id: 42");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(FloginError::Conflict("dup".to_string()).is_client_error());
        assert!(FloginError::InvalidArgument("page".to_string()).is_client_error());
        assert!(FloginError::not_found("Product", 1).is_client_error());

        assert!(!FloginError::Database("pool closed".to_string()).is_client_error());
        assert!(!FloginError::Internal("boom".to_string()).is_client_error());
    }
}
