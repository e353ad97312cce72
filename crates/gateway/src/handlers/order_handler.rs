//! Order handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{CallerContext, Order, OrderItem, OrderItemRequest, OrderRequest, OrderStatus};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Requested line item
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemPayload {
    #[schema(example = 1)]
    pub product_id: i64,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    #[schema(example = 2)]
    pub quantity: u32,
}

/// Order placement request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlaceOrderRequest {
    /// Owner of the order; only honored for administrators
    pub client_id: Option<i64>,
    #[validate(length(min = 1, message = "Order must have at least one item"), nested)]
    pub items: Vec<OrderItemPayload>,
}

impl From<PlaceOrderRequest> for OrderRequest {
    fn from(request: PlaceOrderRequest) -> Self {
        Self {
            client_id: request.client_id,
            items: request
                .items
                .into_iter()
                .map(|item| OrderItemRequest {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Order owner as shown on an order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    pub id: i64,
    pub name: String,
}

/// Line item with its captured unit price
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub name: String,
    pub img_url: String,
    pub quantity: u32,
    #[schema(value_type = String, example = "800.00")]
    pub price: Decimal,
    #[schema(value_type = String, example = "1600.00")]
    pub sub_total: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            sub_total: item.sub_total(),
            product_id: item.product_id,
            name: item.name,
            img_url: item.img_url,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Order with items and computed total
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub moment: DateTime<Utc>,
    pub status: OrderStatus,
    pub client: ClientResponse,
    pub items: Vec<OrderItemResponse>,
    #[schema(value_type = String, example = "1600.00")]
    pub total: Decimal,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let total = order.total();
        Self {
            id: order.id,
            moment: order.moment,
            status: order.status,
            client: ClientResponse {
                id: order.client.id,
                name: order.client.name,
            },
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            total,
        }
    }
}

/// Create order routes (all authenticated)
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(insert))
        .route("/:id", get(find_by_id))
}

/// Get an order (owner or admin)
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = OrderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Only the owner or an admin"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn find_by_id(
    Extension(ctx): Extension<CallerContext>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderResponse>> {
    let order = state.services.orders().find_by_id(&ctx, id).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// Place an order
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product or owner not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn insert(
    Extension(ctx): Extension<CallerContext>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let order = state.services.orders().insert(&ctx, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}
