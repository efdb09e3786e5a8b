//! Flogin API 서버.
//!
//! 설정을 로드하고 저장소를 준비한 뒤 Axum REST API 서버를 시작합니다.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use flogin_api::app::{create_router, drain_deadline, DRAIN_TIMEOUT};
use flogin_api::auth::{TokenIssuer, DEVELOPMENT_SECRET};
use flogin_api::bootstrap::ensure_default_admin;
use flogin_api::metrics::setup_metrics_recorder;
use flogin_api::repository::Database;
use flogin_api::state::AppState;
use flogin_core::{init_logging, AppConfig, LogConfig};

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 인자 또는 `EXPORT_OPENAPI=1`이면 스펙을 stdout에 출력하고 종료합니다.
fn handle_export_openapi() -> anyhow::Result<()> {
    use flogin_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
        println!("{}", json);
        std::process::exit(0);
    }

    Ok(())
}

/// 설정에 따라 저장소를 준비하고 AppState를 생성합니다.
async fn create_app_state(config: &AppConfig, tokens: TokenIssuer) -> anyhow::Result<AppState> {
    match config.database.url.as_deref() {
        Some(url) => {
            let db = Database::connect(url, &config.database)
                .await
                .context("데이터베이스 연결 실패")?;
            db.migrate().await.context("마이그레이션 실패")?;
            info!("Connected to PostgreSQL, migrations applied");
            Ok(AppState::with_postgres(db.pool().clone(), tokens))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
            Ok(AppState::in_memory(tokens))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    handle_export_openapi()?;

    let config = AppConfig::load_default().context("설정 로드 실패")?;

    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

    info!("Starting Flogin API server...");

    let metrics_handle = setup_metrics_recorder().context("메트릭 레코더 설정 실패")?;
    info!("Prometheus metrics recorder initialized");

    let addr: SocketAddr = config.server.bind_address().parse().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        anyhow::Error::new(e)
    })?;

    let secret = config.auth.jwt_secret.clone().unwrap_or_else(|| {
        warn!("JWT_SECRET not set, using default (INSECURE for development only)");
        SecretString::from(DEVELOPMENT_SECRET)
    });
    let tokens = TokenIssuer::new(secret, config.auth.token_ttl_minutes);

    let state = Arc::new(create_app_state(&config, tokens).await?);
    info!(
        version = %state.version,
        storage = state.storage.as_str(),
        "Application state initialized"
    );

    ensure_default_admin(state.users.as_ref(), &config.bootstrap)
        .await
        .context("기본 관리자 계정 초기화 실패")?;

    let app = create_router(state, Some(metrics_handle));

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // 시그널 수신 시 취소되며, 서버 종료와 드레인 마감 시간이 이 토큰을 기다림
    let shutdown_token = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown_token.clone()));

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_token.clone().cancelled_owned())
        .into_future();

    tokio::select! {
        result = server => result?,
        _ = drain_deadline(shutdown_token) => {
            warn!(
                timeout_secs = DRAIN_TIMEOUT.as_secs(),
                "In-flight requests did not finish in time, forcing shutdown"
            );
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Ctrl+C 또는 SIGTERM을 받으면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    shutdown_token.cancel();
}
