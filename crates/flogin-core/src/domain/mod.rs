//! 서비스 도메인 모델.

mod page;
mod product;
mod role;
mod store;
mod user;

pub use page::*;
pub use product::*;
pub use role::*;
pub use store::*;
pub use user::*;
