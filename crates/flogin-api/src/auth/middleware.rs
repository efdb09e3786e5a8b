//! 요청 인가 미들웨어.
//!
//! 요청마다 한 번 [`policy_for`]로 정책을 결정하고, 공개 엔드포인트가 아니면
//! Bearer 토큰을 검증한 뒤 저장소에서 사용자를 다시 읽어 역할을 확인합니다.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, warn};

use flogin_core::Role;

use super::access::{policy_for, AccessPolicy};
use super::jwt::TokenError;
use crate::error::ApiError;
use crate::state::AppState;

/// 인증된 요청 주체.
///
/// `authorize` 미들웨어가 request extension에 넣어 두며 핸들러에서 추출할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

/// 인증/인가 에러.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingToken,
    #[error("Invalid authorization header")]
    InvalidAuthHeader,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("User is not active or does not exist")]
    UnknownUser,
    #[error("Access denied")]
    InsufficientPermission,
    #[error("Authentication failed")]
    Lookup,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InsufficientPermission => ApiError::forbidden(err.to_string()),
            AuthError::Lookup => ApiError::internal(),
            _ => ApiError::unauthorized(err.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// `Authorization: Bearer <token>` 헤더에서 토큰을 추출합니다.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidAuthHeader)
}

/// 주어진 헤더와 정책으로 요청 주체를 확인합니다.
///
/// 공개 정책이면 `Ok(None)`을 반환합니다.
pub async fn resolve_user(
    state: &AppState,
    headers: &HeaderMap,
    policy: AccessPolicy,
) -> Result<Option<CurrentUser>, AuthError> {
    if policy == AccessPolicy::Public {
        return Ok(None);
    }

    let token = bearer_token(headers)?;
    let claims = state.auth.tokens().verify(token).map_err(|e| match e {
        TokenError::Expired => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    let user = state
        .users
        .find_by_username(&claims.sub)
        .await
        .map_err(|e| {
            error!(error = %e, "User lookup failed during authorization");
            AuthError::Lookup
        })?
        .filter(|u| u.is_enabled())
        .ok_or(AuthError::UnknownUser)?;

    if !policy.allows(user.role) {
        debug!(username = %user.username, role = %user.role, "Insufficient role");
        return Err(AuthError::InsufficientPermission);
    }

    Ok(Some(CurrentUser {
        id: user.id,
        username: user.username,
        role: user.role,
    }))
}

/// 인가 미들웨어.
///
/// `axum::middleware::from_fn_with_state`로 라우터에 적용합니다.
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let policy = policy_for(request.method(), request.uri().path());

    let resolved = resolve_user(&state, request.headers(), policy).await;
    match resolved {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(e) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = %e,
                "Request rejected"
            );
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&headers("Basic dXNlcjpwdw==")),
            Err(AuthError::InvalidAuthHeader)
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer ")),
            Err(AuthError::InvalidAuthHeader)
        ));
    }

    #[test]
    fn test_auth_error_statuses() {
        let cases = [
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidAuthHeader, StatusCode::UNAUTHORIZED),
            (AuthError::TokenExpired, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AuthError::UnknownUser, StatusCode::UNAUTHORIZED),
            (AuthError::InsufficientPermission, StatusCode::FORBIDDEN),
            (AuthError::Lookup, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_resolve_user_public_skips_token() {
        let state = crate::state::create_test_state();
        let resolved = resolve_user(&state, &HeaderMap::new(), AccessPolicy::Public)
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_resolve_user_rejects_unknown_subject() {
        let state = crate::state::create_test_state();
        let token = state.auth.tokens().issue("ghost", Role::Admin).unwrap();

        let result = resolve_user(
            &state,
            &headers(&format!("Bearer {token}")),
            AccessPolicy::Authenticated,
        )
        .await;
        assert!(matches!(result, Err(AuthError::UnknownUser)));
    }

    #[tokio::test]
    async fn test_resolve_user_checks_role_and_active_flag() {
        use flogin_core::{NewUser, UserStore};

        let state = crate::state::create_test_state();
        let user = state
            .users
            .insert(NewUser::new("reader", "hash", "reader@example.com"))
            .await
            .unwrap();
        let token = state.auth.tokens().issue("reader", Role::User).unwrap();
        let headers = headers(&format!("Bearer {token}"));

        let current = resolve_user(&state, &headers, AccessPolicy::Authenticated)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.username, "reader");
        assert_eq!(current.role, Role::User);

        let admin_only = AccessPolicy::Roles(&[Role::Admin]);
        assert!(matches!(
            resolve_user(&state, &headers, admin_only).await,
            Err(AuthError::InsufficientPermission)
        ));

        // 비활성화된 계정은 유효한 토큰이 있어도 거부
        state.users.set_active(user.id, false).await.unwrap();
        assert!(matches!(
            resolve_user(&state, &headers, AccessPolicy::Authenticated).await,
            Err(AuthError::UnknownUser)
        ));
    }
}
