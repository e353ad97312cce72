//! Order repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::entities::order::{self, Entity as OrderEntity};
use super::entities::order_item;
use super::entities::product::Entity as ProductEntity;
use super::entities::user::Entity as UserEntity;
use super::write_error;
use common::{AppError, AppResult};
use domain::{NewOrder, Order, OrderClient, OrderItem, OrderStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Order repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find order by ID with its client and line items
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>>;

    /// Persist an order together with its items, all or nothing
    async fn insert(&self, order: NewOrder) -> AppResult<Order>;
}

/// Concrete implementation of OrderRepository
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>> {
        let Some((model, client)) = OrderEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let client = client
            .ok_or_else(|| AppError::internal(format!("Order {} has no client", id)))?;

        let rows = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(id))
            .order_by_asc(order_item::Column::ProductId)
            .find_also_related(ProductEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut items = Vec::with_capacity(rows.len());
        for (item, product) in rows {
            let product = product.ok_or_else(|| {
                AppError::internal(format!("Order {} references a missing product", id))
            })?;
            let quantity = u32::try_from(item.quantity).map_err(|_| {
                AppError::internal(format!("Order {} has a negative quantity", id))
            })?;

            items.push(OrderItem {
                product_id: product.id,
                name: product.name,
                img_url: product.img_url,
                quantity,
                price: item.price,
            });
        }

        let status = model
            .status
            .parse::<OrderStatus>()
            .map_err(|e| AppError::internal(e.to_string()))?;

        Ok(Some(Order {
            id: model.id,
            moment: model.moment,
            status,
            client: OrderClient {
                id: client.id,
                name: client.name,
            },
            items,
        }))
    }

    async fn insert(&self, order: NewOrder) -> AppResult<Order> {
        // A failed step drops the transaction, which rolls it back
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let active_model = order::ActiveModel {
            moment: Set(order.moment),
            status: Set(order.status.to_string()),
            client_id: Set(order.client.id),
            ..Default::default()
        };
        let model = active_model.insert(&txn).await.map_err(write_error)?;

        let mut rows = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let quantity = i32::try_from(item.quantity)
                .map_err(|_| AppError::validation("Quantity is too large"))?;
            rows.push(order_item::ActiveModel {
                order_id: Set(model.id),
                product_id: Set(item.product_id),
                quantity: Set(quantity),
                price: Set(item.price),
            });
        }

        if !rows.is_empty() {
            order_item::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(write_error)?;
        }

        txn.commit().await.map_err(AppError::from)?;
        Ok(order.with_id(model.id))
    }
}
