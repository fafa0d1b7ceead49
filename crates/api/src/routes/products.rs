//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue},
};
use serde::Deserialize;
use tracing::instrument;

use restore_core::{CatalogFilters, OrderBy, PageRequest, PagedList, Product, ProductId, ProductQuery};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Response header carrying the page metadata.
pub const PAGINATION_HEADER: HeaderName = HeaderName::from_static("pagination");

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductParams {
    pub order_by: Option<String>,
    pub search_term: Option<String>,
    pub brands: Option<String>,
    pub types: Option<String>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl ProductParams {
    fn query(&self) -> ProductQuery {
        ProductQuery {
            order_by: OrderBy::from_keyword(self.order_by.as_deref()),
            search_term: self.search_term.clone(),
            brands: self.brands.clone(),
            types: self.types.clone(),
        }
    }

    fn page(&self) -> PageRequest {
        PageRequest::new(self.page_number, self.page_size)
    }
}

/// Sort, search, filter and page the catalog.
///
/// The body is the page of products; the metadata goes in the
/// `Pagination` header.
fn list_page(products: Vec<Product>, params: &ProductParams) -> PagedList<Product> {
    PagedList::paginate(params.query().apply(products), params.page())
}

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ProductParams>,
) -> Result<([(HeaderName, HeaderValue); 1], Json<Vec<Product>>)> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    let page = list_page(products, &params);

    let header = HeaderValue::from_str(&page.meta_data.to_header_value())
        .map_err(|e| AppError::Internal(format!("pagination header: {e}")))?;

    Ok(([(PAGINATION_HEADER, header)], Json(page.items)))
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))
}

/// `GET /api/products/filters`
#[instrument(skip(state))]
pub async fn filters(State(state): State<AppState>) -> Result<Json<CatalogFilters>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(CatalogFilters::from_products(&products)))
}

#[cfg(test)]
mod tests {
    use restore_core::Price;

    use super::*;

    fn product(id: i32, name: &str, price: i64, brand: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: String::new(),
            price: Price::from_minor(price),
            picture_url: String::new(),
            product_type: "Boards".to_string(),
            brand: brand.to_string(),
            quantity_in_stock: 10,
        }
    }

    fn catalog(n: i32) -> Vec<Product> {
        (1..=n)
            .map(|i| product(i, &format!("Board {i:02}"), i64::from(i) * 100, "Angular"))
            .collect()
    }

    #[test]
    fn test_default_listing_is_first_six_by_name() {
        let page = list_page(catalog(12), &ProductParams::default());
        assert_eq!(page.items.len(), 6);
        assert_eq!(page.items[0].name, "Board 01");
        assert_eq!(page.meta_data.total_pages, 2);
    }

    #[test]
    fn test_params_flow_into_pipeline() {
        let params = ProductParams {
            order_by: Some("priceDesc".to_string()),
            search_term: Some(" BOARD 1 ".to_string()),
            page_size: Some(2),
            page_number: Some(2),
            ..ProductParams::default()
        };
        let page = list_page(catalog(12), &params);

        // "Board 1" matches 10, 11, 12; priceDesc gives 12, 11, 10
        assert_eq!(page.meta_data.total_count, 3);
        assert_eq!(page.items.iter().map(|p| p.id.as_i32()).collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn test_page_size_capped() {
        let params = ProductParams {
            page_size: Some(500),
            ..ProductParams::default()
        };
        let page = list_page(catalog(60), &params);
        assert_eq!(page.items.len(), 50);
        assert_eq!(page.meta_data.page_size, 50);
    }

    #[test]
    fn test_brand_filter_miss_is_empty_page() {
        let params = ProductParams {
            brands: Some("react".to_string()),
            ..ProductParams::default()
        };
        let page = list_page(catalog(3), &params);
        assert!(page.items.is_empty());
        assert_eq!(page.meta_data.total_pages, 0);
    }
}
