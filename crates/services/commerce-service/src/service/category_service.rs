//! Category lookup.

use async_trait::async_trait;
use std::sync::Arc;

use common::AppResult;
use domain::Category;

use crate::repository::CategoryRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Category service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// All categories, ordered by id
    async fn find_all(&self) -> AppResult<Vec<Category>>;
}

/// Concrete implementation of CategoryService using repository.
pub struct CategoryManager {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryManager {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CategoryService for CategoryManager {
    async fn find_all(&self) -> AppResult<Vec<Category>> {
        self.repo.find_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCategoryRepository;

    #[tokio::test]
    async fn test_find_all_passes_through() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_find_all().times(1).returning(|| {
            Ok(vec![Category::new(1, "Livros"), Category::new(2, "Eletrônicos")])
        });

        let service = CategoryManager::new(Arc::new(repo));
        let categories = service.find_all().await.unwrap();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Livros");
    }
}
