//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
//! 요청 간에 공유되는 가변 상태는 저장소 외에는 없습니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use flogin_core::{ProductStore, UserStore};

use crate::auth::{AuthService, TokenIssuer};
use crate::repository::{MemoryProductStore, MemoryUserStore, PgProductStore, PgUserStore};
use crate::services::ProductService;

/// 저장소 백엔드 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL (sqlx)
    Postgres,
    /// 프로세스 메모리 (개발/테스트용)
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 사용자 저장소 - 로그인과 요청 인가에서 사용자 조회
    pub users: Arc<dyn UserStore>,

    /// 상품 저장소
    pub products: Arc<dyn ProductStore>,

    /// 로그인 인증 서비스 (토큰 발급기 포함)
    pub auth: Arc<AuthService>,

    /// 상품 CRUD 서비스
    pub product_service: Arc<ProductService>,

    /// 저장소 백엔드 종류
    pub storage: StorageBackend,

    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,

    /// 서버 버전
    pub version: String,
}

impl AppState {
    /// 주어진 저장소로 상태를 구성합니다.
    pub fn new(
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        tokens: TokenIssuer,
        storage: StorageBackend,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users.clone(), tokens)),
            product_service: Arc::new(ProductService::new(products.clone())),
            users,
            products,
            storage,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// PostgreSQL 저장소를 사용하는 상태.
    pub fn with_postgres(pool: sqlx::PgPool, tokens: TokenIssuer) -> Self {
        Self::new(
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgProductStore::new(pool)),
            tokens,
            StorageBackend::Postgres,
        )
    }

    /// 인메모리 저장소를 사용하는 상태.
    pub fn in_memory(tokens: TokenIssuer) -> Self {
        Self::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryProductStore::new()),
            tokens,
            StorageBackend::Memory,
        )
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        Utc::now().signed_duration_since(self.started_at).num_seconds()
    }

    /// 저장소 연결 상태 확인.
    pub async fn is_storage_healthy(&self) -> bool {
        self.users.ping().await.is_ok() && self.products.ping().await.is_ok()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 인메모리 저장소와 고정 비밀 키로 DB 없이 라우터를 테스트할 수 있는 상태를 만듭니다.
/// 사용자는 비어 있습니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use secrecy::SecretString;

    AppState::in_memory(TokenIssuer::new(
        SecretString::from("test-secret-key-for-router-tests-32-chars"),
        60,
    ))
}
