//! Repository layer for data access.

use sea_orm::{DbErr, SqlErr};

use common::AppError;

pub mod entities;
mod category_repository;
mod order_repository;
mod product_repository;
mod user_repository;

pub use category_repository::{CategoryRepository, CategoryStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Translate a write failure, surfacing foreign-key violations as
/// [`AppError::Integrity`] so services can tell them apart.
pub(crate) fn write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => AppError::integrity(msg),
        _ => AppError::from(err),
    }
}
