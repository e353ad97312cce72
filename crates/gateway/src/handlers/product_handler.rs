//! Product handlers.
//!
//! Reads are public; writes need an authenticated administrator.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use common::AppResult;
use domain::{
    CallerContext, Category, Page, PageRequest, Product, ProductInput, ProductSummary,
    DEFAULT_PAGE_SIZE,
};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Category reference inside a product payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryRef {
    #[schema(example = 2)]
    pub id: i64,
}

/// Product create/update request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(length(min = 3, max = 80, message = "Name must be between 3 and 80 characters"))]
    #[schema(example = "Phone")]
    pub name: String,
    #[validate(length(min = 10, message = "Description must have at least 10 characters"))]
    #[schema(example = "Good phone with a great camera")]
    pub description: String,
    #[validate(custom(function = "non_negative_price"))]
    #[schema(value_type = String, example = "800.00")]
    pub price: Decimal,
    #[serde(default)]
    #[schema(example = "https://img.com/img.png")]
    pub img_url: String,
    #[validate(length(min = 1, message = "Product must have at least one category"))]
    pub categories: Vec<CategoryRef>,
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut error = ValidationError::new("non_negative_price");
        error.message = Some("Price must not be negative".into());
        return Err(error);
    }
    Ok(())
}

impl From<ProductRequest> for ProductInput {
    fn from(request: ProductRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            price: request.price,
            img_url: request.img_url,
            category_ids: request.categories.into_iter().map(|c| c.id).collect(),
        }
    }
}

/// Full product representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "800.00")]
    pub price: Decimal,
    pub img_url: String,
    pub categories: Vec<Category>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            img_url: product.img_url,
            categories: product.categories,
        }
    }
}

/// Compact product representation used in listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductMinResponse {
    pub id: i64,
    pub name: String,
    #[schema(value_type = String, example = "800.00")]
    pub price: Decimal,
    pub img_url: String,
}

impl From<ProductSummary> for ProductMinResponse {
    fn from(summary: ProductSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            price: summary.price,
            img_url: summary.img_url,
        }
    }
}

/// One page of products
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductPageResponse {
    pub content: Vec<ProductMinResponse>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<ProductSummary>> for ProductPageResponse {
    fn from(page: Page<ProductSummary>) -> Self {
        let page = page.map(ProductMinResponse::from);
        Self {
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        }
    }
}

/// Search query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductSearchParams {
    /// Case-insensitive name fragment; empty matches everything
    #[serde(default)]
    pub name: String,
    /// Zero-based page index
    pub page: Option<u64>,
    /// Page size (capped at 100)
    pub size: Option<u64>,
}

impl ProductSearchParams {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// Public product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search))
        .route("/:id", get(find_by_id))
}

/// Product routes that need an authenticated caller
pub fn admin_product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(insert))
        .route("/:id", axum::routing::put(update).delete(delete))
}

/// Search products by name
#[utoipa::path(
    get,
    path = "/products",
    tag = "Catalog",
    params(ProductSearchParams),
    responses(
        (status = 200, description = "Matching products", body = ProductPageResponse)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<ProductSearchParams>,
) -> AppResult<Json<ProductPageResponse>> {
    let page = state
        .services
        .products()
        .search(&params.name, params.page_request())
        .await?;

    Ok(Json(ProductPageResponse::from(page)))
}

/// Get product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Catalog",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with its categories", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.services.products().find_by_id(id).await?;
    Ok(Json(ProductResponse::from(product)))
}

/// Create a product (admin only)
#[utoipa::path(
    post,
    path = "/products",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn insert(
    Extension(ctx): Extension<CallerContext>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    state.services.auth().require_admin(&ctx).await?;
    let product = state.services.products().insert(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

/// Replace a product (admin only)
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update(
    Extension(ctx): Extension<CallerContext>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    state.services.auth().require_admin(&ctx).await?;
    let product = state.services.products().update(id, payload.into()).await?;
    Ok(Json(ProductResponse::from(product)))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is referenced by an order")
    )
)]
pub async fn delete(
    Extension(ctx): Extension<CallerContext>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.auth().require_admin(&ctx).await?;
    state.services.products().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
