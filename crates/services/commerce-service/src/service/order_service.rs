//! Order placement and retrieval.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use common::{AppResult, OptionExt};
use domain::{
    resolve_order_owner, CallerContext, NewOrder, Order, OrderClient, OrderItem, OrderRequest,
    OrderStatus, OwnerDecision,
};

use super::{AuthService, UserService};
use crate::repository::{OrderRepository, ProductRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Order service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Get an order visible to the caller (its owner or an administrator)
    async fn find_by_id(&self, ctx: &CallerContext, id: i64) -> AppResult<Order>;

    /// Place a new order for the caller, or for another user when the
    /// caller is an administrator
    async fn insert(&self, ctx: &CallerContext, request: OrderRequest) -> AppResult<Order>;
}

/// Concrete implementation of OrderService.
pub struct OrderManager {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    users: Arc<dyn UserService>,
    auth: Arc<dyn AuthService>,
}

impl OrderManager {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
        users: Arc<dyn UserService>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        Self {
            orders,
            products,
            users,
            auth,
        }
    }
}

#[async_trait]
impl OrderService for OrderManager {
    async fn find_by_id(&self, ctx: &CallerContext, id: i64) -> AppResult<Order> {
        let order = self.orders.find_by_id(id).await?.ok_or_not_found()?;
        self.auth.require_self_or_admin(ctx, order.client.id).await?;
        Ok(order)
    }

    async fn insert(&self, ctx: &CallerContext, request: OrderRequest) -> AppResult<Order> {
        let requested_items = request.line_items()?;

        let caller = self.users.current_caller(ctx).await?;
        let client = match resolve_order_owner(&caller, request.client_id) {
            OwnerDecision::Caller => OrderClient::from(&caller),
            OwnerDecision::OnBehalfOf(owner_id) => {
                debug!(admin_id = caller.id, owner_id, "Placing order on behalf of user");
                OrderClient::from(&self.users.find_by_id(owner_id).await?)
            }
        };

        // Every product is resolved before anything is written
        let mut items = Vec::with_capacity(requested_items.len());
        for requested in &requested_items {
            let product = self
                .products
                .find_by_id(requested.product_id)
                .await?
                .ok_or_not_found()?;

            items.push(OrderItem {
                product_id: product.id,
                name: product.name,
                img_url: product.img_url,
                quantity: requested.quantity,
                price: product.price,
            });
        }

        let order = self
            .orders
            .insert(NewOrder {
                moment: Utc::now(),
                status: OrderStatus::WaitingPayment,
                client,
                items,
            })
            .await?;

        info!(order_id = order.id, client_id = order.client.id, "Order placed");
        Ok(order)
    }
}
