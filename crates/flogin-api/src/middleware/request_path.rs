//! 에러 응답 경로 보강 middleware.
//!
//! 핸들러와 인가 미들웨어가 만든 [`ErrorResponse`]에 요청 경로를 채웁니다.
//! 프레임워크가 만든 에러 응답(JSON 파싱 실패, 405 등)도 같은 형식으로 바꿉니다.

use axum::{
    body::to_bytes,
    extract::Request,
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;

/// 프레임워크 에러 본문을 읽을 최대 크기.
const MAX_REJECTION_BODY: usize = 16 * 1024;

/// 에러 응답에 요청 경로를 추가하는 미들웨어 레이어.
pub async fn error_path_layer(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let error_body = match parts.extensions.remove::<ErrorResponse>() {
        Some(existing) => existing,
        None => {
            // 프레임워크 rejection은 text/plain 본문에 사유를 담음
            let message = match to_bytes(body, MAX_REJECTION_BODY).await {
                Ok(bytes) if !bytes.is_empty() => String::from_utf8_lossy(&bytes).into_owned(),
                _ => status.canonical_reason().unwrap_or("Error").to_string(),
            };
            ErrorResponse::new(status, message)
        }
    };

    let mut rebuilt = (status, Json(error_body.with_path(path))).into_response();
    for (name, value) in parts.headers.iter() {
        if name != CONTENT_LENGTH && name != CONTENT_TYPE {
            rebuilt.headers_mut().append(name.clone(), value.clone());
        }
    }
    rebuilt
}
