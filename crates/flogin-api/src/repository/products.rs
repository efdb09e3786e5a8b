//! Products Repository
//!
//! 상품 관련 데이터베이스 연산을 담당합니다.
//! 이름 고유성은 `lower(name)` 고유 인덱스로 강제됩니다.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use flogin_core::{
    FloginError, FloginResult, Page, PageRequest, Product, ProductDraft, ProductFilter,
    ProductStore, PRODUCT_NAME_TAKEN,
};

use super::map_db_error;

/// products 테이블 레코드.
#[derive(Debug, Clone, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: i64,
    quantity: i32,
    #[sqlx(default)]
    description: Option<String>,
    category: String,
    active: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price: row.price,
            quantity: row.quantity,
            description: row.description,
            category: row.category,
            active: row.active,
        }
    }
}

/// PostgreSQL 상품 저장소.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_by_id(&self, id: i64) -> FloginResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, quantity, description, category, active
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| FloginError::Database(e.to_string()))?;

        Ok(row.map(Product::from))
    }

    async fn exists_by_name(&self, name: &str) -> FloginResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE lower(name) = lower($1))",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| FloginError::Database(e.to_string()))
    }

    async fn insert(&self, draft: ProductDraft) -> FloginResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, price, quantity, description, category, active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING id, name, price, quantity, description, category, active
            "#,
        )
        .bind(&draft.name)
        .bind(draft.price)
        .bind(draft.quantity)
        .bind(&draft.description)
        .bind(&draft.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, PRODUCT_NAME_TAKEN))?;

        Ok(row.into())
    }

    async fn update(&self, product: &Product) -> FloginResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $2, price = $3, quantity = $4, description = $5, category = $6,
                active = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, price, quantity, description, category, active
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.quantity)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, PRODUCT_NAME_TAKEN))?
        .ok_or_else(|| FloginError::not_found("Product", product.id))?;

        Ok(row.into())
    }

    async fn search(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> FloginResult<Page<Product>> {
        // strpos는 LIKE 와일드카드(%, _)를 해석하지 않으므로 키워드를 그대로 부분 문자열로 취급
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE active
              AND strpos(lower(name), $1) > 0
              AND strpos(lower(category), $2) > 0
            "#,
        )
        .bind(filter.name_keyword())
        .bind(filter.category_keyword())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| FloginError::Database(e.to_string()))?;

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, quantity, description, category, active
            FROM products
            WHERE active
              AND strpos(lower(name), $1) > 0
              AND strpos(lower(category), $2) > 0
            ORDER BY lower(name) COLLATE "C" ASC, id ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.name_keyword())
        .bind(filter.category_keyword())
        .bind(page.size())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| FloginError::Database(e.to_string()))?;

        let content = rows.into_iter().map(Product::from).collect();
        Ok(Page::new(content, page, total))
    }

    async fn ping(&self) -> FloginResult<()> {
        super::ping(&self.pool).await
    }
}
