//! Core types for ReStore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod buyer;
pub mod email;
pub mod id;
pub mod price;

pub use buyer::{BuyerId, BuyerIdError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
