pub mod product;

pub use product::{ClickEvent, CreateProductRequest, Product, ProductType};
