//! Users Repository
//!
//! 사용자 자격증명 관련 데이터베이스 연산을 담당합니다.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use flogin_core::{FloginError, FloginResult, NewUser, Role, User, UserStore};

use super::map_db_error;

/// users 테이블 레코드.
///
/// 역할은 TEXT 컬럼("USER"/"ADMIN")으로 저장됩니다.
#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    email: String,
    active: bool,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = FloginError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).ok_or_else(|| {
            FloginError::Database(format!("알 수 없는 역할 값: {}", row.role))
        })?;

        Ok(User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            email: row.email,
            active: row.active,
            role,
        })
    }
}

const USER_COLUMNS: &str = "id, username, password_hash, email, active, role";

/// PostgreSQL 사용자 저장소.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// UPDATE ... RETURNING 결과를 사용자로 변환 (행이 없으면 NotFound).
    fn updated(id: i64, row: Result<Option<UserRow>, sqlx::Error>) -> FloginResult<User> {
        row.map_err(|e| FloginError::Database(e.to_string()))?
            .ok_or_else(|| FloginError::not_found("User", id))?
            .try_into()
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> FloginResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| FloginError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn insert(&self, user: NewUser) -> FloginResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (username, password_hash, email, active, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );
        let conflict = format!("Username already exists: {}", user.username);

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .bind(user.active)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, &conflict))?
            .try_into()
    }

    async fn update_role(&self, id: i64, role: Role) -> FloginResult<User> {
        let sql = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await;
        Self::updated(id, row)
    }

    async fn set_active(&self, id: i64, active: bool) -> FloginResult<User> {
        let sql = format!("UPDATE users SET active = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(active)
            .fetch_optional(&self.pool)
            .await;
        Self::updated(id, row)
    }

    async fn ping(&self) -> FloginResult<()> {
        super::ping(&self.pool).await
    }
}
