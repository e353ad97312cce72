//! SeaORM entities for the commerce schema.

pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_category;
pub mod role;
pub mod user;
pub mod user_role;
