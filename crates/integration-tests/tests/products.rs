//! Integration tests for the catalog endpoints.
//!
//! These tests require:
//! - A migrated and seeded `PostgreSQL` database
//! - The API running (cargo run -p restore-api)

use reqwest::{Response, StatusCode};
use restore_integration_tests::{browser, url};
use serde_json::Value;

async fn get(path: &str) -> Response {
    browser().get(url(path)).send().await.unwrap()
}

fn pagination(resp: &Response) -> Value {
    let header = resp
        .headers()
        .get("pagination")
        .expect("Pagination header missing")
        .to_str()
        .unwrap();
    serde_json::from_str(header).unwrap()
}

fn prices(products: &[Value]) -> Vec<i64> {
    products.iter().filter_map(|p| p["price"].as_i64()).collect()
}

#[tokio::test]
#[ignore = "Requires running API with seeded database"]
async fn test_default_page() {
    let resp = get("/api/products").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let meta = pagination(&resp);
    assert_eq!(meta["currentPage"], 1);
    assert_eq!(meta["pageSize"], 6);

    let products: Vec<Value> = resp.json().await.unwrap();
    assert!(products.len() <= 6);

    let names: Vec<&str> = products.iter().filter_map(|p| p["name"].as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[tokio::test]
#[ignore = "Requires running API with seeded database"]
async fn test_page_size_capped() {
    let resp = get("/api/products?pageSize=500").await;
    assert_eq!(pagination(&resp)["pageSize"], 50);
}

#[tokio::test]
#[ignore = "Requires running API with seeded database"]
async fn test_page_past_the_end_is_empty() {
    let resp = get("/api/products?pageNumber=999").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(pagination(&resp)["currentPage"], 999);

    let products: Vec<Value> = resp.json().await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
#[ignore = "Requires running API with seeded database"]
async fn test_order_by_price() {
    let resp = get("/api/products?orderBy=price&pageSize=50").await;
    let products: Vec<Value> = resp.json().await.unwrap();
    let got = prices(&products);
    let mut sorted = got.clone();
    sorted.sort_unstable();
    assert_eq!(got, sorted);

    let resp = get("/api/products?orderBy=priceDesc&pageSize=50").await;
    let products: Vec<Value> = resp.json().await.unwrap();
    let got = prices(&products);
    let mut sorted = got.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(got, sorted);
}

#[tokio::test]
#[ignore = "Requires running API with seeded database"]
async fn test_search_and_filter() {
    let resp = get("/api/products?searchTerm=BOOTS&pageSize=50").await;
    let products: Vec<Value> = resp.json().await.unwrap();
    assert!(!products.is_empty());
    assert!(products.iter().all(|p| {
        p["name"]
            .as_str()
            .is_some_and(|n| n.to_lowercase().contains("boots"))
    }));

    let resp = get("/api/products?brands=React,Redis&types=Boots&pageSize=50").await;
    let meta = pagination(&resp);
    let products: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(meta["totalCount"], products.len());
    assert!(products.iter().all(|p| p["type"] == "Boots"));
    assert!(products
        .iter()
        .all(|p| p["brand"] == "React" || p["brand"] == "Redis"));
}

#[tokio::test]
#[ignore = "Requires running API with seeded database"]
async fn test_filters_lists_brands_and_types() {
    let resp = get("/api/products/filters").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let filters: Value = resp.json().await.unwrap();
    let types: Vec<&str> = filters["types"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(types.contains(&"Boards"));
    assert!(filters["brands"].as_array().is_some_and(|b| !b.is_empty()));
}

#[tokio::test]
#[ignore = "Requires running API with seeded database"]
async fn test_product_by_id() {
    let products: Vec<Value> = get("/api/products?pageSize=1").await.json().await.unwrap();
    let id = products[0]["id"].as_i64().unwrap();

    let resp = get(&format!("/api/products/{id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let product: Value = resp.json().await.unwrap();
    assert_eq!(product["id"], id);

    let resp = get("/api/products/999999").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
