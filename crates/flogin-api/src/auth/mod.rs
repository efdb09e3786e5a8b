//! 인증 및 권한 부여.
//!
//! JWT 기반 인증 및 역할 기반 접근 제어(RBAC)를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`AuthService`]: 로그인 자격증명 검증 및 토큰 발급
//! - [`TokenIssuer`]: HS256 토큰 발급/검증
//! - [`ACCESS_RULES`]: 엔드포인트별 접근 정책 테이블
//! - [`authorize`]: 정책을 적용하는 Axum 미들웨어
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! // 인가된 요청의 주체는 CurrentUser로 추출
//! async fn protected_handler(user: CurrentUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

mod access;
mod jwt;
mod middleware;
mod password;
mod service;

pub use access::{policy_for, AccessPolicy, AccessRule, Methods, ACCESS_RULES};
pub use jwt::{Claims, TokenError, TokenIssuer, DEVELOPMENT_SECRET};
pub use middleware::{authorize, bearer_token, resolve_user, AuthError, CurrentUser};
pub use password::{hash_password, verify_password, PasswordError};
pub use service::{validate_password, validate_username, AuthService, LoginRequest, LoginResponse};
