//! Product catalog model and the query pipeline.
//!
//! Listing products runs three independent stages over the full catalog,
//! in order, before the result is windowed into a page:
//!
//! 1. [`sort`] by an [`OrderBy`] key
//! 2. [`search`] on the product name
//! 3. [`filter`] by brand and type lists
//!
//! Each stage takes and returns a `Vec<Product>`, so [`ProductQuery::apply`]
//! is plain function composition.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A catalog product.
///
/// Baskets reference products; nothing in the basket flow mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Price in minor currency units.
    pub price: Price,
    pub picture_url: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

/// Sort key for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    /// Alphabetical by name.
    #[default]
    Name,
    /// Cheapest first.
    Price,
    /// Most expensive first.
    PriceDesc,
}

impl OrderBy {
    /// Parse the `orderBy` query keyword.
    ///
    /// `"price"` and `"priceDesc"` select price ordering; anything else,
    /// including an absent or blank value, falls back to [`OrderBy::Name`].
    #[must_use]
    pub fn from_keyword(keyword: Option<&str>) -> Self {
        match keyword.map(str::trim) {
            Some("price") => Self::Price,
            Some("priceDesc") => Self::PriceDesc,
            _ => Self::Name,
        }
    }
}

/// Sort products by `order`. Ties are broken by product id.
#[must_use]
pub fn sort(mut products: Vec<Product>, order: OrderBy) -> Vec<Product> {
    match order {
        OrderBy::Name => products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
        OrderBy::Price => products.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id))),
        OrderBy::PriceDesc => {
            products.sort_by(|a, b| b.price.cmp(&a.price).then(a.id.cmp(&b.id)));
        }
    }
    products
}

/// Keep products whose name contains `term`, ignoring case.
///
/// The term is trimmed first; a missing or blank term keeps everything.
#[must_use]
pub fn search(products: Vec<Product>, term: Option<&str>) -> Vec<Product> {
    let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return products;
    };
    let needle = term.to_lowercase();
    products
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Keep products whose brand and type are in the given comma-separated lists.
///
/// Matching is case-insensitive. An empty list matches every product, so
/// `filter(products, None, Some("boots"))` filters on type alone.
#[must_use]
pub fn filter(products: Vec<Product>, brands: Option<&str>, types: Option<&str>) -> Vec<Product> {
    let brands = parse_list(brands);
    let types = parse_list(types);
    if brands.is_empty() && types.is_empty() {
        return products;
    }

    products
        .into_iter()
        .filter(|p| brands.is_empty() || brands.contains(&p.brand.to_lowercase()))
        .filter(|p| types.is_empty() || types.contains(&p.product_type.to_lowercase()))
        .collect()
}

/// Split a comma-separated list into lower-cased, trimmed, non-empty entries.
fn parse_list(raw: Option<&str>) -> BTreeSet<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// The non-paging half of a product listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub order_by: OrderBy,
    pub search_term: Option<String>,
    pub brands: Option<String>,
    pub types: Option<String>,
}

impl ProductQuery {
    /// Run sort, search and filter over `products`.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let products = sort(products, self.order_by);
        let products = search(products, self.search_term.as_deref());
        filter(products, self.brands.as_deref(), self.types.as_deref())
    }
}

/// Distinct brands and types across a set of products, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogFilters {
    pub brands: Vec<String>,
    pub types: Vec<String>,
}

impl CatalogFilters {
    /// Collect the distinct brand and type names from `products`.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let brands: BTreeSet<&str> = products.iter().map(|p| p.brand.as_str()).collect();
        let types: BTreeSet<&str> = products.iter().map(|p| p.product_type.as_str()).collect();
        Self {
            brands: brands.into_iter().map(str::to_owned).collect(),
            types: types.into_iter().map(str::to_owned).collect(),
        }
    }
}
