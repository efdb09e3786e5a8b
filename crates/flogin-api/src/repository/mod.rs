//! 저장소 구현.
//!
//! `flogin_core`의 [`UserStore`](flogin_core::UserStore)와
//! [`ProductStore`](flogin_core::ProductStore) trait의 PostgreSQL 구현과 인메모리 구현을 제공합니다.

mod memory;
mod products;
mod users;

pub use memory::{MemoryProductStore, MemoryUserStore};
pub use products::PgProductStore;
pub use users::PgUserStore;

use std::time::Duration;

use flogin_core::{DatabaseConfig, FloginError};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

/// 데이터베이스 연결 풀 래퍼.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 새로운 데이터베이스 연결 풀을 생성합니다.
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, FloginError> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connect(url)
            .await
            .map_err(|e| FloginError::Database(e.to_string()))?;

        info!("Database connection established");

        Ok(Self { pool })
    }

    /// 내부 연결 풀을 반환합니다.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 데이터베이스 마이그레이션을 실행합니다.
    pub async fn migrate(&self) -> Result<(), FloginError> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| FloginError::Database(e.to_string()))?;

        info!("Migrations completed successfully");
        Ok(())
    }
}

/// sqlx 에러를 도메인 에러로 변환합니다.
///
/// 고유 제약 위반은 `conflict` 메시지를 가진 `FloginError::Conflict`가 됩니다.
pub(crate) fn map_db_error(e: sqlx::Error, conflict: &str) -> FloginError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return FloginError::Conflict(conflict.to_string());
        }
    }
    FloginError::Database(e.to_string())
}

/// 연결 상태 확인 쿼리.
pub(crate) async fn ping(pool: &PgPool) -> Result<(), FloginError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| FloginError::Database(e.to_string()))
}
