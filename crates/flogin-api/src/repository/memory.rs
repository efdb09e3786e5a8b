//! 인메모리 저장소.
//!
//! `DATABASE_URL`이 설정되지 않은 개발 환경과 테스트에서 사용합니다.
//! 프로세스가 종료되면 데이터는 사라집니다.

use async_trait::async_trait;
use tokio::sync::RwLock;

use flogin_core::{
    FloginError, FloginResult, NewUser, Page, PageRequest, Product, ProductDraft, ProductFilter,
    ProductStore, Role, User, UserStore, PRODUCT_NAME_TAKEN,
};

// ================================================================================================
// Users
// ================================================================================================

#[derive(Debug, Default)]
struct UserTable {
    rows: Vec<User>,
    next_id: i64,
}

impl UserTable {
    fn get_mut(&mut self, id: i64) -> FloginResult<&mut User> {
        self.rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| FloginError::not_found("User", id))
    }
}

/// 인메모리 사용자 저장소.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    table: RwLock<UserTable>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> FloginResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, user: NewUser) -> FloginResult<User> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|u| u.username == user.username) {
            return Err(FloginError::Conflict(format!(
                "Username already exists: {}",
                user.username
            )));
        }

        table.next_id += 1;
        let user = user.into_user(table.next_id);
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn update_role(&self, id: i64, role: Role) -> FloginResult<User> {
        let mut table = self.table.write().await;
        let user = table.get_mut(id)?;
        user.role = role;
        Ok(user.clone())
    }

    async fn set_active(&self, id: i64, active: bool) -> FloginResult<User> {
        let mut table = self.table.write().await;
        let user = table.get_mut(id)?;
        user.active = active;
        Ok(user.clone())
    }
}

// ================================================================================================
// Products
// ================================================================================================

#[derive(Debug, Default)]
struct ProductTable {
    rows: Vec<Product>,
    next_id: i64,
}

impl ProductTable {
    /// `except` 이외의 레코드 중 같은 이름(대소문자 무시)이 있는지 확인.
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.rows
            .iter()
            .any(|p| Some(p.id) != except && p.has_name(name))
    }
}

/// 인메모리 상품 저장소.
///
/// 쓰기 잠금 안에서 이름 고유성을 확인하므로 동시 생성 요청에도
/// 같은 이름의 상품이 두 개 생기지 않습니다.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    table: RwLock<ProductTable>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_by_id(&self, id: i64) -> FloginResult<Option<Product>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn exists_by_name(&self, name: &str) -> FloginResult<bool> {
        let table = self.table.read().await;
        Ok(table.name_taken(name, None))
    }

    async fn insert(&self, draft: ProductDraft) -> FloginResult<Product> {
        let mut table = self.table.write().await;
        if table.name_taken(&draft.name, None) {
            return Err(FloginError::Conflict(PRODUCT_NAME_TAKEN.to_string()));
        }

        table.next_id += 1;
        let product = draft.into_product(table.next_id);
        table.rows.push(product.clone());
        Ok(product)
    }

    async fn update(&self, product: &Product) -> FloginResult<Product> {
        let mut table = self.table.write().await;
        if table.name_taken(&product.name, Some(product.id)) {
            return Err(FloginError::Conflict(PRODUCT_NAME_TAKEN.to_string()));
        }

        let row = table
            .rows
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| FloginError::not_found("Product", product.id))?;
        *row = product.clone();
        Ok(product.clone())
    }

    async fn search(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> FloginResult<Page<Product>> {
        let table = self.table.read().await;
        let mut matched: Vec<&Product> = table.rows.iter().filter(|p| filter.matches(p)).collect();
        // PostgreSQL 쪽 `ORDER BY lower(name) COLLATE "C", id`와 같은 순서
        matched.sort_by_cached_key(|p| (p.name.to_lowercase(), p.id));

        let total = matched.len() as i64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(page.size()).unwrap_or(usize::MAX);
        let content = matched
            .into_iter()
            .skip(offset)
            .take(size)
            .cloned()
            .collect();

        Ok(Page::new(content, page, total))
    }
}
