//! 영속 저장소 추상화.
//!
//! 사용자와 상품 저장소를 저장 엔진 중립적인 trait로 정의합니다.
//! PostgreSQL 구현과 인메모리 구현은 API 크레이트의 `repository` 모듈에 있습니다.

use async_trait::async_trait;

use super::{NewUser, Page, PageRequest, Product, ProductDraft, ProductFilter, Role, User};
use crate::error::FloginResult;

// =============================================================================
// UserStore Trait
// =============================================================================

/// 사용자(자격증명) 저장소.
///
/// 사용자명은 저장소 수준에서 고유합니다. 사용자는 물리적으로 삭제되지 않으며
/// 생성 이후에는 역할과 활성 상태만 변경됩니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 사용자명으로 조회.
    async fn find_by_username(&self, username: &str) -> FloginResult<Option<User>>;

    /// 새 사용자 저장.
    ///
    /// # Errors
    ///
    /// - `FloginError::Conflict`: 이미 존재하는 사용자명
    async fn insert(&self, user: NewUser) -> FloginResult<User>;

    /// 역할 변경.
    ///
    /// # Errors
    ///
    /// - `FloginError::NotFound`: 존재하지 않는 ID
    async fn update_role(&self, id: i64, role: Role) -> FloginResult<User>;

    /// 활성 상태 변경.
    ///
    /// # Errors
    ///
    /// - `FloginError::NotFound`: 존재하지 않는 ID
    async fn set_active(&self, id: i64, active: bool) -> FloginResult<User>;

    /// 저장소 연결 상태 확인 (readiness 체크용).
    async fn ping(&self) -> FloginResult<()> {
        Ok(())
    }
}

// =============================================================================
// ProductStore Trait
// =============================================================================

/// 상품 저장소.
///
/// 상품 이름은 활성/비활성 레코드를 통틀어 대소문자 무시로 고유해야 하며,
/// 구현체는 저장 계층에서도 이 제약을 강제해야 합니다.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// ID로 조회 (활성 여부와 무관).
    async fn find_by_id(&self, id: i64) -> FloginResult<Option<Product>>;

    /// 같은 이름(대소문자 무시)의 상품이 존재하는지 확인.
    async fn exists_by_name(&self, name: &str) -> FloginResult<bool>;

    /// 새 활성 상품 저장.
    ///
    /// # Errors
    ///
    /// - `FloginError::Conflict`: 이름 고유성 제약 위반
    async fn insert(&self, draft: ProductDraft) -> FloginResult<Product>;

    /// 변경 가능한 필드와 활성 상태를 그대로 덮어씁니다.
    ///
    /// # Errors
    ///
    /// - `FloginError::NotFound`: 존재하지 않는 ID
    /// - `FloginError::Conflict`: 이름 고유성 제약 위반
    async fn update(&self, product: &Product) -> FloginResult<Product>;

    /// 활성 상품 중 필터와 일치하는 항목을 이름 오름차순으로 페이지 조회.
    async fn search(&self, filter: &ProductFilter, page: PageRequest)
        -> FloginResult<Page<Product>>;

    /// 저장소 연결 상태 확인 (readiness 체크용).
    async fn ping(&self) -> FloginResult<()> {
        Ok(())
    }
}
