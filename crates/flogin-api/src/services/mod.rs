//! 비즈니스 로직 서비스.

mod product;

pub use flogin_core::PRODUCT_NAME_TAKEN;
pub use product::{ProductResponse, ProductService};
