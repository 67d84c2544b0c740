//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (in main)
//!
//! # Products
//! GET  /products               - Reconciled catalog (?category= filter)
//! GET  /products/try-on        - Try-on-eligible catalog
//! GET  /products/{id}          - Product detail
//! POST /products               - List a product (sellers only)
//!
//! # Cart (session-scoped)
//! GET  /cart                   - Cart contents with subtotal
//! POST /cart/add               - Add a product to the cart
//! POST /cart/remove            - Remove a product from the cart
//! POST /cart/checkout          - Convert the cart into an order (requires auth)
//! POST /cart/suggestions       - AI smart-cart suggestions
//!
//! # Wishlist (session-scoped)
//! GET  /wishlist               - Wishlist contents
//! POST /wishlist/add           - Add a product (idempotent by id)
//! POST /wishlist/remove        - Remove a product
//!
//! # Orders
//! GET  /orders                 - Signed-in user's order history
//!
//! # AI flows
//! POST /assistant/ask          - Shopping assistant Q&A
//! POST /recommendations        - Personalized recommendations
//! POST /try-on                 - Virtual try-on image generation
//!
//! # Auth
//! POST /auth/signup            - Create an account
//! POST /auth/login             - Sign in
//! POST /auth/logout            - Sign out
//! GET  /account                - Current user profile
//! ```

pub mod account;
pub mod assistant;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod recommendations;
pub mod try_on;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/try-on", get(products::try_on_index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
        .route("/suggestions", post(cart::suggestions))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Wishlist routes
        .nest("/wishlist", wishlist_routes())
        // Order history
        .route("/orders", get(orders::index))
        // AI flows
        .route("/assistant/ask", post(assistant::ask))
        .route("/recommendations", post(recommendations::index))
        .route("/try-on", post(try_on::generate))
        // Auth routes
        .nest("/auth", auth_routes())
        .route("/account", get(account::me))
}
