//! Service container - wires repositories into services.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repository::{CategoryStore, OrderStore, ProductStore, UserStore};
use crate::service::{
    AuthService, Authorizer, CategoryManager, CategoryService, OrderManager, OrderService,
    ProductManager, ProductService, UserManager, UserService,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn categories(&self) -> Arc<dyn CategoryService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn auth(&self) -> Arc<dyn AuthService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    category_service: Arc<dyn CategoryService>,
    product_service: Arc<dyn ProductService>,
    order_service: Arc<dyn OrderService>,
    user_service: Arc<dyn UserService>,
    auth_service: Arc<dyn AuthService>,
}

impl Services {
    /// Create a container from already built services
    pub fn new(
        category_service: Arc<dyn CategoryService>,
        product_service: Arc<dyn ProductService>,
        order_service: Arc<dyn OrderService>,
        user_service: Arc<dyn UserService>,
        auth_service: Arc<dyn AuthService>,
    ) -> Self {
        Self {
            category_service,
            product_service,
            order_service,
            user_service,
            auth_service,
        }
    }

    /// Build every repository and service on top of one connection pool
    pub fn from_connection(db: DatabaseConnection) -> Self {
        let product_repo = Arc::new(ProductStore::new(db.clone()));

        let user_service: Arc<dyn UserService> =
            Arc::new(UserManager::new(Arc::new(UserStore::new(db.clone()))));
        let auth_service: Arc<dyn AuthService> = Arc::new(Authorizer::new(user_service.clone()));

        let order_service = Arc::new(OrderManager::new(
            Arc::new(OrderStore::new(db.clone())),
            product_repo.clone(),
            user_service.clone(),
            auth_service.clone(),
        ));

        Self {
            category_service: Arc::new(CategoryManager::new(Arc::new(CategoryStore::new(db)))),
            product_service: Arc::new(ProductManager::new(product_repo)),
            order_service,
            user_service,
            auth_service,
        }
    }
}

impl ServiceContainer for Services {
    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }
}
