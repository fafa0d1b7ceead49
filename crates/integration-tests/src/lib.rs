//! Integration tests for the ReStore API.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database
//! cargo run -p restore-cli -- migrate
//! cargo run -p restore-cli -- seed
//!
//! # Start the API
//! cargo run -p restore-api
//!
//! # Run the ignored (server-backed) tests
//! cargo test -p restore-integration-tests -- --ignored
//! ```
//!
//! The API location is read from `RESTORE_API_URL`
//! (default `http://localhost:5000`).

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

/// Password accepted by the registration rules.
pub const TEST_PASSWORD: &str = "Pa$$w0rd";

/// Base URL of the running API.
#[must_use]
pub fn base_url() -> String {
    std::env::var("RESTORE_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Absolute URL for an API path.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// A client that keeps cookies, like a browser session.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Credentials of a freshly registered user.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub username: String,
    pub email: String,
}

/// Register a new user with a unique name.
///
/// # Panics
///
/// Panics if the request fails or registration is rejected.
pub async fn register_user(client: &Client) -> TestUser {
    let tag: String = Uuid::new_v4().simple().to_string().chars().take(12).collect();
    let user = TestUser {
        username: format!("it{tag}"),
        email: format!("it{tag}@test.com"),
    };

    let resp = client
        .post(url("/api/account/register"))
        .json(&json!({
            "username": user.username,
            "email": user.email,
            "password": TEST_PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    user
}

/// Login response body.
#[derive(Debug, Deserialize)]
pub struct UserBody {
    pub email: String,
    pub token: String,
    pub basket: Option<Value>,
}

/// Log in and return the response (cookies are kept by `client`).
///
/// # Panics
///
/// Panics if the request cannot be sent.
pub async fn login(client: &Client, username: &str, password: &str) -> Response {
    client
        .post(url("/api/account/login"))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send login")
}

/// Id of some product in the seeded catalog.
///
/// # Panics
///
/// Panics if the catalog is empty or unreachable.
pub async fn any_product_id(client: &Client) -> i64 {
    product_ids(client, 1)
        .await
        .first()
        .copied()
        .expect("Catalog is empty")
}

/// Ids of the first `n` products by name.
///
/// # Panics
///
/// Panics if the catalog is unreachable or has fewer than `n` products.
pub async fn product_ids(client: &Client, n: usize) -> Vec<i64> {
    let products: Vec<Value> = client
        .get(url(&format!("/api/products?pageSize={n}")))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Invalid product list");

    let ids: Vec<i64> = products.iter().filter_map(|p| p["id"].as_i64()).collect();
    assert!(ids.len() >= n, "need {n} seeded products, found {}", ids.len());
    ids
}

/// Add to the basket of whoever `client` is (cookie and/or token).
///
/// # Panics
///
/// Panics if the request cannot be sent.
pub async fn add_to_basket(client: &Client, token: Option<&str>, product_id: i64, quantity: u32) -> Response {
    let mut req = client.post(url(&format!(
        "/api/basket?productId={product_id}&quantity={quantity}"
    )));
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    req.send().await.expect("Failed to add to basket")
}

/// Quantity of `product_id` in a basket body, 0 when absent.
#[must_use]
pub fn quantity_of(basket: &Value, product_id: i64) -> u64 {
    basket["items"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|item| item["productId"].as_i64() == Some(product_id))
        .and_then(|item| item["quantity"].as_u64())
        .unwrap_or(0)
}
