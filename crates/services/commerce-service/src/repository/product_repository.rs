//! Product repository implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::entities::category::Entity as CategoryEntity;
use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use super::entities::product_category;
use super::write_error;
use common::{AppError, AppResult};
use domain::{Category, Page, PageRequest, Product, ProductInput, ProductSummary};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID with its categories
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>>;

    /// Case-insensitive substring search on the name, ordered by id.
    /// An empty pattern matches every product.
    async fn search_by_name(
        &self,
        name: &str,
        page: PageRequest,
    ) -> AppResult<Page<ProductSummary>>;

    /// Insert a new product and link its categories
    async fn insert(&self, input: ProductInput) -> AppResult<Product>;

    /// Overwrite the mutable fields of an existing product.
    /// Fails with `NotFound` when the id is unknown.
    async fn update(&self, id: i64, input: ProductInput) -> AppResult<Product>;

    /// Check if a product with this id exists
    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;

    /// Delete product by ID. A product still referenced by an order
    /// fails with `Integrity`.
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load the categories linked to a product model
    async fn with_categories<C>(conn: &C, model: product::Model) -> AppResult<Product>
    where
        C: ConnectionTrait,
    {
        let categories = model
            .find_related(CategoryEntity)
            .all(conn)
            .await
            .map_err(AppError::from)?;

        Ok(to_domain(
            model,
            categories.into_iter().map(Category::from).collect(),
        ))
    }

    /// Replace the category links of a product
    async fn link_categories<C>(conn: &C, product_id: i64, category_ids: &[i64]) -> AppResult<()>
    where
        C: ConnectionTrait,
    {
        product_category::Entity::delete_many()
            .filter(product_category::Column::ProductId.eq(product_id))
            .exec(conn)
            .await
            .map_err(write_error)?;

        if category_ids.is_empty() {
            return Ok(());
        }

        let links = category_ids.iter().map(|category_id| product_category::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(*category_id),
        });

        product_category::Entity::insert_many(links)
            .exec_without_returning(conn)
            .await
            .map_err(write_error)?;

        Ok(())
    }
}

const LIKE_ESCAPE: char = '\\';

/// Lower-cased `LIKE` pattern matching `name` as a literal substring.
fn contains_pattern(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 2);
    pattern.push('%');
    for c in name.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn to_domain(model: product::Model, mut categories: Vec<Category>) -> Product {
    categories.sort();
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        img_url: model.img_url,
        categories,
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let model = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(model) => Ok(Some(Self::with_categories(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn search_by_name(
        &self,
        name: &str,
        page: PageRequest,
    ) -> AppResult<Page<ProductSummary>> {
        let pattern = LikeExpr::new(contains_pattern(name)).escape(LIKE_ESCAPE);

        let paginator = ProductEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(product::Column::Name))).like(pattern))
            .order_by_asc(product::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await.map_err(AppError::from)?;
        if page.is_past_end(total) {
            return Ok(Page::new(Vec::new(), page, total));
        }

        let models = paginator
            .fetch_page(page.page)
            .await
            .map_err(AppError::from)?;

        let content = models
            .into_iter()
            .map(|m| ProductSummary {
                id: m.id,
                name: m.name,
                price: m.price,
                img_url: m.img_url,
            })
            .collect();

        Ok(Page::new(content, page, total))
    }

    async fn insert(&self, input: ProductInput) -> AppResult<Product> {
        // A failed step drops the transaction, which rolls it back
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let active_model = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            img_url: Set(input.img_url),
            ..Default::default()
        };
        let model = active_model.insert(&txn).await.map_err(write_error)?;

        Self::link_categories(&txn, model.id, &input.category_ids).await?;
        let product = Self::with_categories(&txn, model).await?;

        txn.commit().await.map_err(AppError::from)?;
        Ok(product)
    }

    async fn update(&self, id: i64, input: ProductInput) -> AppResult<Product> {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let model = ProductEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = model.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.price = Set(input.price);
        active.img_url = Set(input.img_url);

        let model = active.update(&txn).await.map_err(write_error)?;

        Self::link_categories(&txn, model.id, &input.category_ids).await?;
        let product = Self::with_categories(&txn, model).await?;

        txn.commit().await.map_err(AppError::from)?;
        Ok(product)
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let count = ProductEntity::find_by_id(id)
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_pattern_is_a_literal_substring() {
        assert_eq!(contains_pattern("Phone"), "%phone%");
        assert_eq!(contains_pattern(""), "%%");
        assert_eq!(contains_pattern(" pc "), "% pc %");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\tmp"), "%c:\\\\tmp%");
    }
}
