//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! catalog and order entities, the user aggregate with its role projection,
//! and the authorization predicates the services consult.

pub mod caller;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod order;
pub mod pagination;
pub mod user;

pub use caller::CallerContext;
pub use catalog::{Category, Product, ProductInput, ProductSummary};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use order::{
    resolve_order_owner, NewOrder, Order, OrderClient, OrderItem, OrderItemRequest, OrderRequest,
    OrderStatus, OwnerDecision,
};
pub use pagination::{Page, PageRequest};
pub use user::{assemble_users, Role, User, UserRoleRow};
