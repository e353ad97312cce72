//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::health_handler::HealthResponse;
use crate::handlers::order_handler::{
    ClientResponse, OrderItemPayload, OrderItemResponse, OrderResponse, PlaceOrderRequest,
};
use crate::handlers::product_handler::{
    CategoryRef, ProductMinResponse, ProductPageResponse, ProductRequest, ProductResponse,
};
use crate::handlers::user_handler::UserResponse;
use domain::{Category, OrderStatus};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::category_handler::find_all,
        crate::handlers::product_handler::search,
        crate::handlers::product_handler::find_by_id,
        crate::handlers::product_handler::insert,
        crate::handlers::product_handler::update,
        crate::handlers::product_handler::delete,
        crate::handlers::order_handler::find_by_id,
        crate::handlers::order_handler::insert,
        crate::handlers::user_handler::get_me,
    ),
    components(
        schemas(
            HealthResponse,
            Category,
            CategoryRef,
            ProductRequest,
            ProductResponse,
            ProductMinResponse,
            ProductPageResponse,
            OrderStatus,
            OrderItemPayload,
            PlaceOrderRequest,
            ClientResponse,
            OrderItemResponse,
            OrderResponse,
            UserResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Catalog", description = "Categories and products"),
        (name = "Orders", description = "Order placement and retrieval"),
        (name = "Users", description = "User profile endpoints"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
