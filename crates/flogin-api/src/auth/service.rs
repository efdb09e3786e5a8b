//! 로그인 인증 서비스.
//!
//! 검사 순서는 고정되어 있습니다:
//! 사용자명 형식 → 비밀번호 형식 → 사용자 존재 여부 → 비밀번호 일치.
//! 어느 단계에서 실패했는지에 따라 호출자가 받는 메시지가 달라집니다.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use flogin_core::UserStore;

use super::jwt::TokenIssuer;
use super::password::{verify_password, PasswordError};
use crate::metrics::record_login;

pub const USERNAME_EMPTY: &str = "Username cannot be empty";
pub const USERNAME_LENGTH: &str = "Username must be 3-50 characters";
pub const USERNAME_CHARSET: &str = "Username contains invalid characters";
pub const PASSWORD_EMPTY: &str = "Password cannot be empty";
pub const PASSWORD_LENGTH: &str = "Password must be 6-100 characters";
pub const PASSWORD_COMPOSITION: &str = "Password must contain both letters and numbers";
pub const USER_NOT_FOUND: &str = "User not found";
pub const PASSWORD_INCORRECT: &str = "Password is incorrect";
pub const LOGIN_SUCCESS: &str = "Login successfully";
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// 로그인 요청.
///
/// 필드가 누락되어도 역직렬화는 성공하며, 누락은 검증 단계에서 "비어 있음"으로 처리됩니다.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// 로그인 응답.
///
/// 실패도 HTTP 200으로 전달되며 `success`와 `message`로 구분합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    /// 성공 시에만 존재하는 Bearer 토큰
    pub token: Option<String>,
}

impl LoginResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            token: None,
        }
    }

    fn success(token: String) -> Self {
        Self {
            success: true,
            message: LOGIN_SUCCESS.to_string(),
            token: Some(token),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// 사용자명 형식 검증.
///
/// 유효하면 빈 문자열, 아니면 첫 번째 위반에 대한 메시지를 반환합니다.
pub fn validate_username(username: Option<&str>) -> String {
    let Some(username) = username.filter(|u| !is_blank(u)) else {
        return USERNAME_EMPTY.to_string();
    };

    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return USERNAME_LENGTH.to_string();
    }
    if !username.chars().all(is_username_char) {
        return USERNAME_CHARSET.to_string();
    }
    String::new()
}

/// 비밀번호 형식 검증.
///
/// 유효하면 빈 문자열, 아니면 첫 번째 위반에 대한 메시지를 반환합니다.
pub fn validate_password(password: Option<&str>) -> String {
    let Some(password) = password.filter(|p| !is_blank(p)) else {
        return PASSWORD_EMPTY.to_string();
    };

    let len = password.chars().count();
    if !(6..=100).contains(&len) {
        return PASSWORD_LENGTH.to_string();
    }

    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return PASSWORD_COMPOSITION.to_string();
    }
    String::new()
}

/// 인증 서비스.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    /// 토큰 발급기.
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn validate_username(&self, username: Option<&str>) -> String {
        validate_username(username)
    }

    pub fn validate_password(&self, password: Option<&str>) -> String {
        validate_password(password)
    }

    /// 자격증명을 검증하고 토큰을 발급합니다.
    ///
    /// 모든 실패는 `success=false` 응답으로 변환되며 에러로 전파되지 않습니다.
    pub async fn authenticate(&self, request: &LoginRequest) -> LoginResponse {
        let response = self.check_credentials(request).await;
        record_login(if response.success { "success" } else { "failure" });
        response
    }

    async fn check_credentials(&self, request: &LoginRequest) -> LoginResponse {
        let username = request.username.as_deref();
        let password = request.password.as_deref();

        let username_error = validate_username(username);
        if !username_error.is_empty() {
            debug!(reason = %username_error, "Login rejected: invalid username");
            return LoginResponse::failure(username_error);
        }

        let password_error = validate_password(password);
        if !password_error.is_empty() {
            debug!(reason = %password_error, "Login rejected: invalid password");
            return LoginResponse::failure(password_error);
        }

        // 위의 검증을 통과했으므로 둘 다 Some
        let (Some(username), Some(password)) = (username, password) else {
            return LoginResponse::failure(AUTHENTICATION_FAILED);
        };

        let user = match self.users.find_by_username(username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                info!(username = %username, "Login failed: user not found");
                return LoginResponse::failure(USER_NOT_FOUND);
            }
            Err(e) => {
                error!(username = %username, error = %e, "Login failed: user lookup error");
                return LoginResponse::failure(AUTHENTICATION_FAILED);
            }
        };

        match verify_password(password, &user.password_hash) {
            Ok(()) => {}
            Err(PasswordError::InvalidHashFormat) => {
                warn!(username = %username, "Stored password hash is malformed");
                return LoginResponse::failure(PASSWORD_INCORRECT);
            }
            Err(_) => {
                info!(username = %username, "Login failed: password mismatch");
                return LoginResponse::failure(PASSWORD_INCORRECT);
            }
        }

        match self.tokens.issue(&user.username, user.role) {
            Ok(token) => {
                info!(username = %user.username, role = %user.role, "Login succeeded");
                LoginResponse::success(token)
            }
            Err(e) => {
                error!(username = %user.username, error = %e, "Token issuing failed");
                LoginResponse::failure(AUTHENTICATION_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::repository::MemoryUserStore;
    use flogin_core::{FloginError, FloginResult, NewUser, Role, User};
    use proptest::prelude::*;
    use secrecy::SecretString;

    const SECRET: &str = "auth-service-test-secret-minimum-32-chars";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SecretString::from(SECRET), 60)
    }

    async fn service_with_testuser() -> AuthService {
        let store = MemoryUserStore::new();
        let hash = hash_password("Test123").unwrap();
        store
            .insert(NewUser::new("testuser", hash, "testuser@example.com").with_role(Role::Admin))
            .await
            .unwrap();
        AuthService::new(Arc::new(store), issuer())
    }

    // ==================== validate_username ====================

    #[test]
    fn test_validate_username_valid() {
        assert_eq!(validate_username(Some("testuser")), "");
        assert_eq!(validate_username(Some("a.b_c-1")), "");
    }

    #[test]
    fn test_validate_username_empty() {
        assert_eq!(validate_username(None), USERNAME_EMPTY);
        assert_eq!(validate_username(Some("")), USERNAME_EMPTY);
        assert_eq!(validate_username(Some("   ")), USERNAME_EMPTY);
    }

    #[test]
    fn test_validate_username_length() {
        assert_eq!(validate_username(Some("u")), USERNAME_LENGTH);
        assert_eq!(validate_username(Some(&"u".repeat(51))), USERNAME_LENGTH);
        assert_eq!(validate_username(Some(&"u".repeat(50))), "");
    }

    #[test]
    fn test_validate_username_invalid_characters() {
        assert_eq!(validate_username(Some("test@")), USERNAME_CHARSET);
        assert_eq!(validate_username(Some("test user")), USERNAME_CHARSET);
        assert_eq!(validate_username(Some("사용자명")), USERNAME_CHARSET);
    }

    // ==================== validate_password ====================

    #[test]
    fn test_validate_password_valid() {
        assert_eq!(validate_password(Some("Test123")), "");
    }

    #[test]
    fn test_validate_password_empty() {
        assert_eq!(validate_password(None), PASSWORD_EMPTY);
        assert_eq!(validate_password(Some("")), PASSWORD_EMPTY);
        assert_eq!(validate_password(Some("\t ")), PASSWORD_EMPTY);
    }

    #[test]
    fn test_validate_password_length() {
        assert_eq!(validate_password(Some("u")), PASSWORD_LENGTH);
        let too_long = format!("u{}", "1".repeat(100));
        assert_eq!(validate_password(Some(&too_long)), PASSWORD_LENGTH);
    }

    #[test]
    fn test_validate_password_composition() {
        assert_eq!(validate_password(Some("password")), PASSWORD_COMPOSITION);
        assert_eq!(validate_password(Some("123456")), PASSWORD_COMPOSITION);
    }

    #[test]
    fn test_validate_password_numeric_symbols_are_not_digits() {
        assert_eq!(validate_password(Some("abcdef²")), PASSWORD_COMPOSITION);
        assert_eq!(validate_password(Some("abcde½")), PASSWORD_COMPOSITION);
        assert_eq!(validate_password(Some("abcdeⅧ")), PASSWORD_COMPOSITION);
        assert_eq!(validate_password(Some("abcde7")), "");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_username_length_rule(name in "[a-z]{0,80}") {
            let result = validate_username(Some(&name));
            let len = name.len();
            if len == 0 {
                prop_assert_eq!(result, USERNAME_EMPTY);
            } else if !(3..=50).contains(&len) {
                prop_assert_eq!(result, USERNAME_LENGTH);
            } else {
                prop_assert_eq!(result, "");
            }
        }

        #[test]
        fn prop_username_charset_rule(name in "[a-zA-Z0-9._-]{3,50}") {
            prop_assert_eq!(validate_username(Some(&name)), "");
        }

        #[test]
        fn prop_password_without_digit_rejected(password in "[a-zA-Z]{6,100}") {
            prop_assert_eq!(validate_password(Some(&password)), PASSWORD_COMPOSITION);
        }

        #[test]
        fn prop_password_without_letter_rejected(password in "[0-9!@#$%]{6,100}") {
            prop_assert_eq!(validate_password(Some(&password)), PASSWORD_COMPOSITION);
        }

        #[test]
        fn prop_password_with_letter_and_digit_accepted(
            letters in "[a-zA-Z]{1,50}",
            digits in "[0-9]{1,49}",
        ) {
            let password = format!("{letters}{digits}");
            prop_assume!(password.len() >= 6);
            prop_assert_eq!(validate_password(Some(&password)), "");
        }
    }

    // ==================== authenticate ====================

    #[tokio::test]
    async fn test_authenticate_success() {
        let service = service_with_testuser().await;
        let response = service
            .authenticate(&LoginRequest::new("testuser", "Test123"))
            .await;

        assert!(response.success);
        assert_eq!(response.message, LOGIN_SUCCESS);
        let token = response.token.unwrap();
        assert!(!token.is_empty());

        let claims = service.tokens().verify(&token).unwrap();
        assert_eq!(claims.sub, "testuser");
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_authenticate_user_not_found() {
        let service = service_with_testuser().await;
        let response = service
            .authenticate(&LoginRequest::new("nobody", "Test123"))
            .await;

        assert_eq!(response, LoginResponse::failure(USER_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = service_with_testuser().await;
        let response = service
            .authenticate(&LoginRequest::new("testuser", "Wrong123"))
            .await;

        assert_eq!(response, LoginResponse::failure(PASSWORD_INCORRECT));
    }

    #[tokio::test]
    async fn test_authenticate_validation_precedes_lookup() {
        let service = service_with_testuser().await;

        let response = service.authenticate(&LoginRequest::new("u", "Test123")).await;
        assert_eq!(response, LoginResponse::failure(USERNAME_LENGTH));

        let response = service.authenticate(&LoginRequest::new("testuser", "p")).await;
        assert_eq!(response, LoginResponse::failure(PASSWORD_LENGTH));

        // 존재하지 않는 사용자라도 비밀번호 형식 오류가 먼저 보고됨
        let response = service
            .authenticate(&LoginRequest::new("nobody", "password"))
            .await;
        assert_eq!(response, LoginResponse::failure(PASSWORD_COMPOSITION));

        let response = service.authenticate(&LoginRequest::default()).await;
        assert_eq!(response, LoginResponse::failure(USERNAME_EMPTY));
    }

    #[tokio::test]
    async fn test_authenticate_malformed_hash() {
        let store = MemoryUserStore::new();
        store
            .insert(NewUser::new("legacy", "Test123", "legacy@example.com"))
            .await
            .unwrap();
        let service = AuthService::new(Arc::new(store), issuer());

        let response = service
            .authenticate(&LoginRequest::new("legacy", "Test123"))
            .await;
        assert_eq!(response, LoginResponse::failure(PASSWORD_INCORRECT));
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl UserStore for FailingStore {
        async fn find_by_username(&self, _username: &str) -> FloginResult<Option<User>> {
            Err(FloginError::Database("connection refused".to_string()))
        }

        async fn insert(&self, _user: NewUser) -> FloginResult<User> {
            unreachable!()
        }

        async fn update_role(&self, _id: i64, _role: Role) -> FloginResult<User> {
            unreachable!()
        }

        async fn set_active(&self, _id: i64, _active: bool) -> FloginResult<User> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_authenticate_store_failure() {
        let service = AuthService::new(Arc::new(FailingStore), issuer());
        let response = service
            .authenticate(&LoginRequest::new("testuser", "Test123"))
            .await;

        assert_eq!(response, LoginResponse::failure(AUTHENTICATION_FAILED));
    }
}
