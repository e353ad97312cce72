//! Product catalog service.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use common::{AppError, AppResult, OptionExt};
use domain::{Page, PageRequest, Product, ProductInput, ProductSummary};

use crate::repository::ProductRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Get product by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Product>;

    /// Paginated case-insensitive search by name
    async fn search(&self, name: &str, page: PageRequest) -> AppResult<Page<ProductSummary>>;

    /// Create a product
    async fn insert(&self, input: ProductInput) -> AppResult<Product>;

    /// Replace the fields of an existing product
    async fn update(&self, id: i64, input: ProductInput) -> AppResult<Product>;

    /// Delete a product that no order references
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of ProductService using repository.
pub struct ProductManager {
    repo: Arc<dyn ProductRepository>,
}

impl ProductManager {
    /// Create new product service instance with repository
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }
}

/// Writes that hit an unknown category surface as a validation failure.
fn unknown_category(err: AppError) -> AppError {
    match err {
        AppError::Integrity(_) => AppError::validation("Unknown category"),
        other => other,
    }
}

#[async_trait]
impl ProductService for ProductManager {
    async fn find_by_id(&self, id: i64) -> AppResult<Product> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn search(&self, name: &str, page: PageRequest) -> AppResult<Page<ProductSummary>> {
        self.repo.search_by_name(name, page).await
    }

    async fn insert(&self, input: ProductInput) -> AppResult<Product> {
        input.validate()?;
        self.repo.insert(input).await.map_err(unknown_category)
    }

    async fn update(&self, id: i64, input: ProductInput) -> AppResult<Product> {
        input.validate()?;
        self.repo.update(id, input).await.map_err(unknown_category)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repo.exists_by_id(id).await? {
            return Err(AppError::NotFound);
        }

        match self.repo.delete_by_id(id).await {
            Ok(()) => {
                debug!(product_id = id, "Product deleted");
                Ok(())
            }
            Err(AppError::Integrity(detail)) => {
                warn!(product_id = id, %detail, "Product still referenced");
                Err(AppError::conflict("Referential integrity failure"))
            }
            Err(e) => Err(e),
        }
    }
}
