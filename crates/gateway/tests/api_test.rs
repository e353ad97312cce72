//! Integration tests for API endpoints.
//!
//! The router runs against hand-written services, so no database is needed.
//! Authorization goes through the real `Authorizer` on top of a stub user
//! directory.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use commerce_service_lib::service::{
    AuthService, Authorizer, CategoryService, OrderService, ProductService, UserService,
};
use commerce_service_lib::Services;
use common::{AppError, AppResult, JwtConfig, ServiceConfig};
use domain::{
    CallerContext, Category, NewOrder, Order, OrderClient, OrderItem, OrderRequest, OrderStatus,
    Page, PageRequest, Product, ProductInput, ProductSummary, Role, User, ROLE_ADMIN, ROLE_CLIENT,
};
use gateway_lib::config::GatewayConfig;
use gateway_lib::middleware::Claims;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;

const SECRET: &str = "test-secret-key-for-testing-only-32chars";

// =============================================================================
// Stub Services
// =============================================================================

fn user(id: i64, name: &str, email: &str, admin: bool) -> User {
    let mut roles = BTreeSet::from([Role::new(1, ROLE_CLIENT)]);
    if admin {
        roles.insert(Role::new(2, ROLE_ADMIN));
    }
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone: "988888888".to_string(),
        birth_date: None,
        password_hash: "hashed".to_string(),
        roles,
    }
}

fn directory() -> Vec<User> {
    vec![
        user(1, "Maria Brown", "maria@gmail.com", false),
        user(2, "Alex Green", "alex@gmail.com", true),
        user(3, "Ana Yellow", "ana@gmail.com", false),
    ]
}

fn price(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn product(id: i64) -> Product {
    Product {
        id,
        name: "Phone".to_string(),
        description: "Good Phone".to_string(),
        price: price("800.00"),
        img_url: "https://img.com/img.png".to_string(),
        categories: vec![Category::new(2, "Eletrônicos")],
    }
}

struct StubUserService;

#[async_trait]
impl UserService for StubUserService {
    async fn find_by_login_id(&self, login: &str) -> AppResult<User> {
        directory()
            .into_iter()
            .find(|u| u.email == login)
            .ok_or(AppError::NotFound)
    }

    async fn current_caller(&self, ctx: &CallerContext) -> AppResult<User> {
        let login = ctx.login().ok_or(AppError::Unauthorized)?;
        self.find_by_login_id(login)
            .await
            .map_err(|_| AppError::Unauthorized)
    }

    async fn get_me(&self, ctx: &CallerContext) -> AppResult<User> {
        self.current_caller(ctx).await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<User> {
        directory()
            .into_iter()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound)
    }
}

struct StubCategoryService;

#[async_trait]
impl CategoryService for StubCategoryService {
    async fn find_all(&self) -> AppResult<Vec<Category>> {
        Ok(vec![
            Category::new(1, "Livros"),
            Category::new(2, "Eletrônicos"),
            Category::new(3, "Computadores"),
        ])
    }
}

/// Products 1 and 3 exist; product 3 is referenced by an order.
struct StubProductService;

#[async_trait]
impl ProductService for StubProductService {
    async fn find_by_id(&self, id: i64) -> AppResult<Product> {
        match id {
            1 | 3 => Ok(product(id)),
            _ => Err(AppError::NotFound),
        }
    }

    async fn search(&self, name: &str, page: PageRequest) -> AppResult<Page<ProductSummary>> {
        let content: Vec<ProductSummary> = [product(1), product(3)]
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&name.to_lowercase()))
            .map(ProductSummary::from)
            .collect();
        let total = content.len() as u64;
        Ok(Page::new(content, page, total))
    }

    async fn insert(&self, input: ProductInput) -> AppResult<Product> {
        Ok(Product {
            id: 26,
            name: input.name,
            description: input.description,
            price: input.price,
            img_url: input.img_url,
            categories: input
                .category_ids
                .into_iter()
                .map(|id| Category::new(id, "Eletrônicos"))
                .collect(),
        })
    }

    async fn update(&self, id: i64, input: ProductInput) -> AppResult<Product> {
        let mut product = self.find_by_id(id).await?;
        product.name = input.name;
        Ok(product)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        match id {
            1 => Ok(()),
            3 => Err(AppError::conflict("Referential integrity failure")),
            _ => Err(AppError::NotFound),
        }
    }
}

/// Order 1 belongs to Maria (id 1).
struct StubOrderService {
    users: Arc<dyn UserService>,
    auth: Arc<dyn AuthService>,
}

#[async_trait]
impl OrderService for StubOrderService {
    async fn find_by_id(&self, ctx: &CallerContext, id: i64) -> AppResult<Order> {
        if id != 1 {
            return Err(AppError::NotFound);
        }
        let order = NewOrder {
            moment: Utc::now(),
            status: OrderStatus::Paid,
            client: OrderClient {
                id: 1,
                name: "Maria Brown".to_string(),
            },
            items: vec![
                OrderItem {
                    product_id: 1,
                    name: "Phone".to_string(),
                    img_url: String::new(),
                    quantity: 1,
                    price: price("800.00"),
                },
                OrderItem {
                    product_id: 2,
                    name: "Book".to_string(),
                    img_url: String::new(),
                    quantity: 2,
                    price: price("10.00"),
                },
            ],
        }
        .with_id(1);

        self.auth.require_self_or_admin(ctx, order.client.id).await?;
        Ok(order)
    }

    async fn insert(&self, ctx: &CallerContext, request: OrderRequest) -> AppResult<Order> {
        let caller = self.users.current_caller(ctx).await?;
        let items = request
            .items
            .iter()
            .map(|item| OrderItem {
                product_id: item.product_id,
                name: "Phone".to_string(),
                img_url: String::new(),
                quantity: item.quantity,
                price: price("800.00"),
            })
            .collect();

        Ok(NewOrder {
            moment: Utc::now(),
            status: OrderStatus::WaitingPayment,
            client: OrderClient::from(&caller),
            items,
        }
        .with_id(7))
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn app() -> Router {
    let users: Arc<dyn UserService> = Arc::new(StubUserService);
    let auth: Arc<dyn AuthService> = Arc::new(Authorizer::new(users.clone()));
    let orders = Arc::new(StubOrderService {
        users: users.clone(),
        auth: auth.clone(),
    });

    let services = Services::new(
        Arc::new(StubCategoryService),
        Arc::new(StubProductService),
        orders,
        users,
        auth,
    );

    let config = GatewayConfig {
        server: ServiceConfig::default(),
        jwt: JwtConfig {
            secret: SECRET.to_string(),
        },
    };

    create_router(AppState::new(Arc::new(services), config))
}

fn token_for(login: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: login.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn request(method: Method, uri: &str, login: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(login) = login {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(login)));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn product_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Lorem ipsum dolor sit amet",
        "price": "90.50",
        "img_url": "https://img.com/img.png",
        "categories": [{ "id": 2 }]
    })
}

// =============================================================================
// Public Endpoints
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = send(request(Method::GET, "/api-docs/openapi.json", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/products/{id}"].is_object());
}

#[tokio::test]
async fn test_list_categories() {
    let (status, body) = send(request(Method::GET, "/categories", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["name"], "Livros");
}

#[tokio::test]
async fn test_search_products_is_paginated() {
    let (status, body) = send(request(
        Method::GET,
        "/products?name=PHONE&page=0&size=12",
        None,
        None,
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_elements"], 2);
    assert_eq!(body["size"], 12);
    assert_eq!(body["content"][0]["price"], "800.00");
}

#[tokio::test]
async fn test_find_product_by_id() {
    let (status, body) = send(request(Method::GET, "/products/1", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Phone");
    assert_eq!(body["categories"][0]["id"], 2);
}

#[tokio::test]
async fn test_find_missing_product_is_not_found() {
    let (status, body) = send(request(Method::GET, "/products/2", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// Product Writes
// =============================================================================

#[tokio::test]
async fn test_insert_product_requires_token() {
    let (status, _) = send(request(
        Method::POST,
        "/products",
        None,
        Some(product_body("Console")),
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_insert_product_rejects_invalid_token() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/products")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(product_body("Console").to_string()))
        .unwrap();

    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_insert_product_forbidden_for_client() {
    let (status, _) = send(request(
        Method::POST,
        "/products",
        Some("maria@gmail.com"),
        Some(product_body("Console")),
    ))
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_insert_product_by_admin() {
    let (status, body) = send(request(
        Method::POST,
        "/products",
        Some("alex@gmail.com"),
        Some(product_body("Console")),
    ))
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 26);
    assert_eq!(body["name"], "Console");
    assert_eq!(body["price"], "90.50");
}

#[tokio::test]
async fn test_insert_free_product_is_accepted() {
    let mut body = product_body("Sticker");
    body["price"] = json!("0.00");

    let (status, body) = send(request(
        Method::POST,
        "/products",
        Some("alex@gmail.com"),
        Some(body),
    ))
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price"], "0.00");
}

#[tokio::test]
async fn test_insert_product_validates_payload() {
    let mut body = product_body("ab");
    let (status, response) = send(request(
        Method::POST,
        "/products",
        Some("alex@gmail.com"),
        Some(body.clone()),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["error"]["code"], "VALIDATION_ERROR");

    body["name"] = json!("Console");
    body["price"] = json!("-1.00");
    let (status, _) = send(request(
        Method::POST,
        "/products",
        Some("alex@gmail.com"),
        Some(body.clone()),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    body["price"] = json!("10.00");
    body["categories"] = json!([]);
    let (status, _) = send(request(
        Method::POST,
        "/products",
        Some("alex@gmail.com"),
        Some(body),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_product_by_admin() {
    let (status, body) = send(request(
        Method::PUT,
        "/products/1",
        Some("alex@gmail.com"),
        Some(product_body("Smart Phone")),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Smart Phone");
}

#[tokio::test]
async fn test_update_missing_product_is_not_found() {
    let (status, _) = send(request(
        Method::PUT,
        "/products/2",
        Some("alex@gmail.com"),
        Some(product_body("Smart Phone")),
    ))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product_outcomes() {
    let (status, _) = send(request(Method::DELETE, "/products/1", Some("alex@gmail.com"), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(request(Method::DELETE, "/products/2", Some("alex@gmail.com"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        send(request(Method::DELETE, "/products/3", Some("alex@gmail.com"), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Referential integrity failure");
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_find_order_by_owner_includes_total() {
    let (status, body) = send(request(Method::GET, "/orders/1", Some("maria@gmail.com"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["client"]["id"], 1);
    assert_eq!(body["status"], "PAID");
    assert_eq!(body["total"], "820.00");
}

#[tokio::test]
async fn test_find_order_by_admin() {
    let (status, _) = send(request(Method::GET, "/orders/1", Some("alex@gmail.com"), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_find_order_of_other_client_is_forbidden() {
    let (status, body) = send(request(Method::GET, "/orders/1", Some("ana@gmail.com"), None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_find_order_requires_token() {
    let (status, _) = send(request(Method::GET, "/orders/1", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_login_is_unauthorized() {
    let (status, _) = send(request(Method::GET, "/orders/1", Some("ghost@gmail.com"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_place_order() {
    let (status, body) = send(request(
        Method::POST,
        "/orders",
        Some("maria@gmail.com"),
        Some(json!({ "items": [{ "product_id": 1, "quantity": 2 }] })),
    ))
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "WAITING_PAYMENT");
    assert_eq!(body["client"]["name"], "Maria Brown");
    assert_eq!(body["items"][0]["sub_total"], "1600.00");
}

#[tokio::test]
async fn test_place_order_validates_items() {
    let (status, _) = send(request(
        Method::POST,
        "/orders",
        Some("maria@gmail.com"),
        Some(json!({ "items": [] })),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(request(
        Method::POST,
        "/orders",
        Some("maria@gmail.com"),
        Some(json!({ "items": [{ "product_id": 1, "quantity": 0 }] })),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_get_me() {
    let (status, body) = send(request(Method::GET, "/users/me", Some("alex@gmail.com"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alex@gmail.com");
    assert_eq!(body["roles"], json!(["ROLE_CLIENT", "ROLE_ADMIN"]));
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_get_me_requires_token() {
    let (status, body) = send(request(Method::GET, "/users/me", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}
