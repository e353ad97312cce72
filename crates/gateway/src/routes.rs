//! Route configuration.

use axum::{middleware, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    admin_product_routes, category_routes, health_routes, order_routes, product_routes,
    user_routes,
};
use crate::middleware::auth_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let auth_state = state.clone();
    let auth = || middleware::from_fn_with_state(auth_state.clone(), auth_middleware);

    Router::new()
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/categories", category_routes())
        // Reads are public, writes go through the auth layer
        .nest(
            "/products",
            product_routes().merge(admin_product_routes().route_layer(auth())),
        )
        .nest("/orders", order_routes().route_layer(auth()))
        .nest("/users", user_routes().route_layer(auth()))
        .with_state(state)
}
