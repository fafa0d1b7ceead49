//! Business logic services for the API.
//!
//! # Services
//!
//! - `auth` - Registration, password login, user lookup
//! - `basket` - Basket read/add/remove and merge-on-login
//! - `token` - Access token issuing and verification

pub mod auth;
pub mod basket;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use basket::{BasketError, BasketOutcome, BasketService};
pub use token::{Claims, TokenError, TokenService};
