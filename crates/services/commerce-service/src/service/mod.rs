//! Service layer - use cases over the repositories.
//!
//! Each service is a `Send + Sync` trait with one concrete manager that
//! holds its collaborators as trait objects.

mod auth_service;
mod category_service;
mod order_service;
mod product_service;
mod user_service;

#[cfg(test)]
pub(crate) mod factory;

pub use auth_service::{AuthService, Authorizer};
pub use category_service::{CategoryManager, CategoryService};
pub use order_service::{OrderManager, OrderService};
pub use product_service::{ProductManager, ProductService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use category_service::MockCategoryService;
#[cfg(any(test, feature = "test-utils"))]
pub use order_service::MockOrderService;
#[cfg(any(test, feature = "test-utils"))]
pub use product_service::MockProductService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
