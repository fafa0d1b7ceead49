//! HTTP middleware and request extractors.
//!
//! # Middleware Order (outermost first in `main`)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. Catch panic (500 problem body)
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded on that span)
//! 5. CORS

pub mod auth;
pub mod buyer_cookie;
pub mod request_id;

pub use auth::{OptionalUser, RequireUser};
pub use buyer_cookie::{BUYER_COOKIE, BuyerCookie, BuyerCookieUpdate};
pub use request_id::request_id_middleware;
