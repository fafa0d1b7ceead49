//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Account
//! POST   /api/account/login        - Login, merge anonymous basket, issue token
//! POST   /api/account/register     - Register (role Member)
//! GET    /api/account/currentUser  - Current user with fresh token (auth)
//!
//! # Basket (user from token, else buyerId cookie)
//! GET    /api/basket               - Current basket
//! POST   /api/basket?productId&quantity   - Add item
//! DELETE /api/basket?productId&quantity   - Remove item
//!
//! # Products
//! GET    /api/products             - Listing (Pagination header)
//! GET    /api/products/filters     - Distinct brands and types
//! GET    /api/products/{id}        - Product detail
//!
//! # Error shapes
//! GET    /api/buggy/{not-found,bad-request,unauthorized,validation-error,server-error}
//! ```

pub mod account;
pub mod basket;
pub mod buggy;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(account::login))
        .route("/register", post(account::register))
        .route("/currentUser", get(account::current_user))
}

/// Create the basket routes router.
pub fn basket_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(basket::show)
            .post(basket::add_item)
            .delete(basket::remove_item),
    )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/filters", get(products::filters))
        .route("/{id}", get(products::show))
}

/// Create the error demonstration routes router.
pub fn buggy_routes() -> Router<AppState> {
    Router::new()
        .route("/not-found", get(buggy::not_found))
        .route("/bad-request", get(buggy::bad_request))
        .route("/unauthorized", get(buggy::unauthorized))
        .route("/validation-error", get(buggy::validation_error))
        .route("/server-error", get(buggy::server_error))
}

/// Create all `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/account", account_routes())
        .nest("/api/basket", basket_routes())
        .nest("/api/products", product_routes())
        .nest("/api/buggy", buggy_routes())
}
