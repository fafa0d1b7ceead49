//! ReStore Core - shared types and basket/catalog domain logic.
//!
//! Used by:
//! - `api` - the HTTP service (handlers, repositories, auth)
//! - `cli` - migrations and seed data
//!
//! # Architecture
//!
//! The core crate has no I/O: no database access, no HTTP, no clocks beyond
//! UUID generation. Everything here operates on in-memory values so the
//! interesting rules (basket mutation, merge-on-login, catalog filtering and
//! paging, buyer identity resolution) are testable without infrastructure.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails and buyer identities
//! - [`basket`] - The basket aggregate
//! - [`merge`] - Reconciling an anonymous basket with a user's basket at login
//! - [`catalog`] - Product model and the sort/search/filter pipeline
//! - [`pagination`] - Page windowing and the pagination envelope
//! - [`identity`] - Resolving the buyer identity for a request

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod basket;
pub mod catalog;
pub mod identity;
pub mod merge;
pub mod pagination;
pub mod types;

pub use basket::{Basket, BasketItem, MAX_LINE_QUANTITY};
pub use catalog::{CatalogFilters, OrderBy, Product, ProductQuery};
pub use identity::{CookieDirective, Resolution};
pub use merge::MergePlan;
pub use pagination::{MetaData, PageRequest, PagedList};
pub use types::*;
