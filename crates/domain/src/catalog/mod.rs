//! Product catalog: categories and products.

mod category;
mod product;

pub use category::Category;
pub use product::{Product, ProductParts};
