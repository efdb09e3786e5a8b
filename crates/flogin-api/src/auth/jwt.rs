//! JWT 토큰 발급 및 검증.
//!
//! 토큰의 subject는 사용자명이며, 역할은 참고용으로만 포함됩니다.
//! 접근 제어는 매 요청마다 저장소에서 사용자를 다시 조회하여 역할을 확인합니다.

use chrono::{Duration, Utc};
use flogin_core::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// 설정되지 않았을 때 사용하는 개발용 비밀 키.
pub const DEVELOPMENT_SECRET: &str = "development-secret-key-change-in-production";

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자명
    pub sub: String,
    /// 발급 시점의 사용자 역할
    pub role: Role,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 토큰 고유 식별자
    pub jti: String,
}

impl Claims {
    pub fn new(username: impl Into<String>, role: Role, expires_in_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: username.into(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expires_in_minutes)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("유효하지 않은 토큰")]
    Invalid,
}

/// HS256 토큰 발급기.
///
/// 비밀 키는 `SecretString`으로 보관되어 Debug 출력에 노출되지 않습니다.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: SecretString,
    ttl_minutes: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: SecretString, ttl_minutes: i64) -> Self {
        Self {
            secret,
            ttl_minutes,
        }
    }

    /// 토큰 유효 시간 (분).
    pub fn ttl_minutes(&self) -> i64 {
        self.ttl_minutes
    }

    /// 사용자명을 subject로 하는 서명된 토큰 발급.
    pub fn issue(&self, username: &str, role: Role) -> Result<String, TokenError> {
        let claims = Claims::new(username, role, self.ttl_minutes);
        self.encode_claims(&claims)
    }

    /// 주어진 Claims를 그대로 서명합니다.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(TokenError::from)
    }

    /// 서명과 만료 시간을 검증하고 Claims를 반환합니다.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SecretString::from(TEST_SECRET), 60)
    }

    #[test]
    fn test_issue_and_verify() {
        let token = issuer().issue("testuser", Role::Admin).unwrap();
        assert!(!token.is_empty());

        let claims = issuer().verify(&token).unwrap();
        assert_eq!(claims.sub, "testuser");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_unique_jti() {
        let a = issuer().verify(&issuer().issue("u1", Role::User).unwrap()).unwrap();
        let b = issuer().verify(&issuer().issue("u1", Role::User).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_token() {
        let mut claims = Claims::new("testuser", Role::User, 60);
        claims.iat -= 7200;
        claims.exp = Utc::now().timestamp() - 3600;
        let token = issuer().encode_claims(&claims).unwrap();

        assert!(matches!(issuer().verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_invalid_token() {
        assert!(matches!(
            issuer().verify("invalid.token.here"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let token = issuer().issue("testuser", Role::User).unwrap();
        let other = TokenIssuer::new(
            SecretString::from("wrong-secret-key-for-testing-minimum-32-chars"),
            60,
        );
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", issuer());
        assert!(!debug.contains(TEST_SECRET));
    }
}
