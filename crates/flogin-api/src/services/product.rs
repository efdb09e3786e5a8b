//! 상품 서비스.
//!
//! 생성/수정/조회/목록/소프트 삭제를 담당합니다.
//! 이름 고유성은 여기서 먼저 확인하고, 동시 요청은 저장소의 고유 제약이 막습니다.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

use flogin_core::{
    FloginError, FloginResult, Page, PageRequest, Product, ProductDraft, ProductFilter,
    ProductStore, PRODUCT_NAME_TAKEN,
};

use crate::metrics::record_product_change;

/// 상품 응답 DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub description: Option<String>,
    pub category: String,
    pub active: bool,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            quantity: p.quantity,
            description: p.description,
            category: p.category,
            active: p.active,
        }
    }
}

/// 상품 서비스.
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    async fn find(&self, id: i64) -> FloginResult<Product> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| FloginError::not_found("Product", id))
    }

    /// 상품 생성.
    ///
    /// # Errors
    ///
    /// - `FloginError::Conflict`: 같은 이름(대소문자 무시)의 상품이 이미 존재
    pub async fn create(&self, draft: ProductDraft) -> FloginResult<ProductResponse> {
        if self.store.exists_by_name(&draft.name).await? {
            debug!(name = %draft.name, "Duplicate product name");
            return Err(FloginError::Conflict(PRODUCT_NAME_TAKEN.to_string()));
        }

        let product = self.store.insert(draft).await?;
        record_product_change("create");
        info!(id = product.id, name = %product.name, "Product created");
        Ok(product.into())
    }

    /// 상품 전체 수정.
    ///
    /// 이름이 바뀌는 경우(대소문자 무시 비교)에만 고유성을 다시 확인합니다.
    pub async fn update(&self, id: i64, draft: ProductDraft) -> FloginResult<ProductResponse> {
        let mut product = self.find(id).await?;

        if !product.has_name(&draft.name) && self.store.exists_by_name(&draft.name).await? {
            debug!(id, name = %draft.name, "Duplicate product name on rename");
            return Err(FloginError::Conflict(PRODUCT_NAME_TAKEN.to_string()));
        }

        product.apply(draft);
        let product = self.store.update(&product).await?;
        record_product_change("update");
        info!(id, name = %product.name, "Product updated");
        Ok(product.into())
    }

    /// ID로 조회 (활성 여부와 무관).
    pub async fn get_by_id(&self, id: i64) -> FloginResult<ProductResponse> {
        self.find(id).await.map(ProductResponse::from)
    }

    /// 활성 상품 목록 (이름 오름차순).
    ///
    /// # Errors
    ///
    /// - `FloginError::InvalidArgument`: `page < 0` 또는 `size < 1`
    pub async fn list(
        &self,
        name: Option<&str>,
        category: Option<&str>,
        page: i64,
        size: i64,
    ) -> FloginResult<Page<ProductResponse>> {
        let request = PageRequest::new(page, size)?;
        let filter = ProductFilter::new(name, category);

        let page = self.store.search(&filter, request).await?;
        Ok(page.map(ProductResponse::from))
    }

    /// 소프트 삭제 (`active = false`).
    pub async fn delete(&self, id: i64) -> FloginResult<()> {
        let mut product = self.find(id).await?;
        product.active = false;
        self.store.update(&product).await?;
        record_product_change("delete");
        info!(id, "Product deactivated");
        Ok(())
    }
}
