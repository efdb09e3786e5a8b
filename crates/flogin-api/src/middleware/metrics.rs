//! HTTP 요청 metrics middleware.
//!
//! 경로 라벨은 매칭된 라우트 템플릿(`/api/products/{id}`)을 사용합니다.
//! 어떤 라우트에도 매칭되지 않은 요청만 실제 경로를 정규화해서 기록합니다.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
};

/// 요청의 메트릭 경로 라벨.
fn route_label(request: &Request) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => normalize_path(request.uri().path()),
    }
}

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// `Router::layer`로 적용해야 라우팅 이후에 실행되어 [`MatchedPath`]를 볼 수 있습니다.
///
/// - `http_requests_total`: 총 요청 수 (method, path 라벨)
/// - `http_responses_total`: 총 응답 수 (method, path, status 라벨)
/// - `http_request_duration_seconds`: 요청 처리 시간 히스토그램
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let route = route_label(&request);

    record_http_request(&method, &route);
    let started = Instant::now();

    let response = next.run(request).await;

    record_http_response(&method, &route, response.status().as_u16());
    record_http_duration(&method, &route, started.elapsed().as_secs_f64());
    response
}
