//! Request and response bodies.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use restore_core::{Basket, BasketItem, Price, ProductId};

/// `POST /api/account/login` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /api/account/register` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Authenticated user returned by login and `currentUser`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub email: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basket: Option<BasketDto>,
}

/// A basket as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketDto {
    pub id: i32,
    pub buyer_id: String,
    pub items: Vec<BasketItemDto>,
    /// Units across all lines.
    pub item_count: u64,
    /// Sum of line totals, minor units.
    pub subtotal: Price,
}

/// One basket line, flattened with its product details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketItemDto {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub picture_url: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub quantity: u32,
}

impl From<&BasketItem> for BasketItemDto {
    fn from(item: &BasketItem) -> Self {
        Self {
            product_id: item.product.id,
            name: item.product.name.clone(),
            price: item.product.price,
            picture_url: item.product.picture_url.clone(),
            brand: item.product.brand.clone(),
            product_type: item.product.product_type.clone(),
            quantity: item.quantity,
        }
    }
}

impl From<&Basket> for BasketDto {
    /// Unsaved baskets map to id 0; handlers only return saved ones.
    fn from(basket: &Basket) -> Self {
        Self {
            id: basket.id.map_or(0, |id| id.as_i32()),
            buyer_id: basket.buyer_id.to_string(),
            items: basket.items.iter().map(BasketItemDto::from).collect(),
            item_count: basket.item_count(),
            subtotal: basket.subtotal(),
        }
    }
}
