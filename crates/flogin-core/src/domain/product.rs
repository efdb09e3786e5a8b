//! 상품 카탈로그 레코드.

use serde::{Deserialize, Serialize};

/// 이름 중복(대소문자 무시) 시 응답 메시지.
pub const PRODUCT_NAME_TAKEN: &str = "Product with this name already exists";

/// 저장된 상품.
///
/// `active`는 소프트 삭제 표시입니다. 삭제된 상품은 저장소에 남아 있지만
/// 목록 조회에서는 제외됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub active: bool,
}

impl Product {
    /// 변경 가능한 필드를 draft 값으로 전부 교체합니다.
    ///
    /// `id`와 `active`는 유지됩니다.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.price = draft.price;
        self.quantity = draft.quantity;
        self.description = draft.description;
        self.category = draft.category;
    }

    /// 대소문자를 무시하고 이름이 같은지 확인.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// 상품의 변경 가능한 필드 묶음.
///
/// 생성과 수정(전체 교체) 모두에 사용되며, API 경계에서 검증을 마친 값만 담습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub description: Option<String>,
    pub category: String,
}

impl ProductDraft {
    /// ID를 부여하여 활성 상품으로 변환.
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            description: self.description,
            category: self.category,
            active: true,
        }
    }
}

/// 상품 목록 검색 조건.
///
/// 이름과 카테고리 모두 대소문자 무시 부분 문자열 매칭이며 두 조건은 AND로 결합됩니다.
/// 키워드가 없으면 빈 문자열로 취급되어 모든 상품과 매칭됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    name: String,
    category: String,
}

impl ProductFilter {
    pub fn new(name: Option<&str>, category: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or_default().to_lowercase(),
            category: category.unwrap_or_default().to_lowercase(),
        }
    }

    /// 소문자로 정규화된 이름 키워드.
    pub fn name_keyword(&self) -> &str {
        &self.name
    }

    /// 소문자로 정규화된 카테고리 키워드.
    pub fn category_keyword(&self) -> &str {
        &self.category
    }

    /// 활성 상품이면서 두 키워드를 모두 포함하는지 확인.
    pub fn matches(&self, product: &Product) -> bool {
        product.active
            && product.name.to_lowercase().contains(&self.name)
            && product.category.to_lowercase().contains(&self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, category: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: 100,
            quantity: 10,
            description: Some("desc".to_string()),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_into_product_is_active() {
        let product = draft("Laptop", "Electronics").into_product(1);
        assert_eq!(product.id, 1);
        assert!(product.active);
    }

    #[test]
    fn test_apply_keeps_identity_and_active_flag() {
        let mut product = draft("Laptop", "Electronics").into_product(3);
        product.active = false;

        product.apply(ProductDraft {
            description: None,
            ..draft("Notebook", "Computers")
        });

        assert_eq!(product.id, 3);
        assert!(!product.active);
        assert_eq!(product.name, "Notebook");
        assert_eq!(product.category, "Computers");
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_filter_matches_case_insensitive_and_joined() {
        let product = draft("Gaming Laptop", "Electronics").into_product(1);

        assert!(ProductFilter::new(Some("LAPTOP"), Some("elec")).matches(&product));
        assert!(ProductFilter::new(None, None).matches(&product));
        assert!(!ProductFilter::new(Some("laptop"), Some("books")).matches(&product));
        assert!(!ProductFilter::new(Some("phone"), None).matches(&product));
    }

    #[test]
    fn test_filter_excludes_inactive() {
        let mut product = draft("Laptop", "Electronics").into_product(1);
        product.active = false;
        assert!(!ProductFilter::default().matches(&product));
    }

    #[test]
    fn test_has_name_ignores_case() {
        let product = draft("Laptop", "Electronics").into_product(1);
        assert!(product.has_name("LAPTOP"));
        assert!(!product.has_name("Laptops"));
    }
}
