//! Order aggregate, line items and the ownership policy for new orders.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::user::User;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum OrderStatus {
    #[default]
    WaitingPayment,
    Paid,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::WaitingPayment => "WAITING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING_PAYMENT" => Ok(OrderStatus::WaitingPayment),
            "PAID" => Ok(OrderStatus::Paid),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELED" => Ok(OrderStatus::Canceled),
            other => Err(DomainError::validation(format!("Unknown order status '{}'", other))),
        }
    }
}

/// Owner of an order as seen from the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderClient {
    pub id: i64,
    pub name: String,
}

impl From<&User> for OrderClient {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// Line item. The price is the unit price captured when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub name: String,
    pub img_url: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn sub_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub moment: DateTime<Utc>,
    pub status: OrderStatus,
    pub client: OrderClient,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of `quantity * price` over the items; never stored.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(OrderItem::sub_total).sum()
    }
}

/// Order assembled by the service, not yet assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub moment: DateTime<Utc>,
    pub status: OrderStatus,
    pub client: OrderClient,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Attach the identity handed out by storage.
    pub fn with_id(self, id: i64) -> Order {
        Order {
            id,
            moment: self.moment,
            status: self.status,
            client: self.client,
            items: self.items,
        }
    }
}

/// Requested line item: which product and how many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: u32,
}

/// Order placement request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderRequest {
    /// Owner asserted by the caller; only honored for administrators
    pub client_id: Option<i64>,
    pub items: Vec<OrderItemRequest>,
}

impl OrderRequest {
    /// Line items keyed by product, in first-seen order.
    ///
    /// Items are identified by (order, product), so repeated products are
    /// merged by adding their quantities. Fails on an empty request or a
    /// zero quantity.
    pub fn line_items(&self) -> DomainResult<Vec<OrderItemRequest>> {
        if self.items.is_empty() {
            return Err(DomainError::validation("Order must have at least one item"));
        }

        let mut merged: Vec<OrderItemRequest> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if item.quantity == 0 {
                return Err(DomainError::validation("Quantity must be positive"));
            }
            match merged.iter_mut().find(|m| m.product_id == item.product_id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .checked_add(item.quantity)
                        .ok_or_else(|| DomainError::validation("Quantity is too large"))?;
                }
                None => merged.push(item.clone()),
            }
        }
        Ok(merged)
    }
}

/// Who will own a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerDecision {
    /// The caller places the order for themselves
    Caller,
    /// An administrator places the order on behalf of another user
    OnBehalfOf(i64),
}

/// Ownership policy for new orders.
///
/// Non-admin callers always own what they order. Administrators may name
/// another owner.
pub fn resolve_order_owner(caller: &User, requested: Option<i64>) -> OwnerDecision {
    match requested {
        Some(id) if caller.is_admin() && id != caller.id => OwnerDecision::OnBehalfOf(id),
        _ => OwnerDecision::Caller,
    }
}
