//! Category handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use common::AppResult;
use domain::Category;

use crate::state::AppState;

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/", get(find_all))
}

/// List all categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Catalog",
    responses(
        (status = 200, description = "All categories ordered by id", body = Vec<Category>)
    )
)]
pub async fn find_all(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state.services.categories().find_all().await?;
    Ok(Json(categories))
}
