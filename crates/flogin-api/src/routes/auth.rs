//! 인증 endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use crate::auth::{LoginRequest, LoginResponse};
use crate::state::AppState;

/// 로그인.
///
/// POST /api/auth/login
///
/// 자격증명 검증 실패도 200으로 응답하며 `success = false`와 사유를 담습니다.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 결과 (성공 시 token 포함)", body = LoginResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Json<LoginResponse> {
    Json(state.auth.authenticate(&request).await)
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}
