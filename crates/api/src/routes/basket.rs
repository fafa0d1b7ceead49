//! Basket route handlers.
//!
//! The basket belongs to the authenticated user when a valid token is
//! sent, otherwise to the anonymous `buyerId` cookie.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use restore_core::identity::resolve_buyer;
use restore_core::{MAX_LINE_QUANTITY, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::{BuyerCookie, BuyerCookieUpdate, OptionalUser};
use crate::models::BasketDto;
use crate::services::{BasketError, BasketService};
use crate::state::AppState;

/// Query parameters for adding or removing a basket line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemParams {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl ItemParams {
    /// The requested quantity, if a basket line can hold it.
    fn quantity(&self) -> Result<u32> {
        if self.quantity > MAX_LINE_QUANTITY {
            return Err(AppError::BadRequest(format!(
                "Quantity must be at most {MAX_LINE_QUANTITY}"
            )));
        }
        Ok(self.quantity)
    }
}

fn persistence_error(err: BasketError, title: &str) -> AppError {
    match err {
        BasketError::NothingSaved => AppError::Persistence(title.to_string()),
        other => other.into(),
    }
}

/// `GET /api/basket`
///
/// A missing basket is a 404; the stale-cookie deletion still goes out
/// with it.
#[instrument(skip(state, cookie))]
pub async fn show(
    State(state): State<AppState>,
    user: OptionalUser,
    cookie: BuyerCookie,
) -> Result<Response> {
    let resolution = resolve_buyer(user.user_name(), cookie.as_deref());
    let outcome = BasketService::new(state.pool()).get(resolution).await?;
    let update = BuyerCookieUpdate::new(outcome.cookie, state.config().secure_cookies());

    Ok(match outcome.basket {
        Some(basket) => (update, Json(BasketDto::from(&basket))).into_response(),
        None => (update, AppError::NotFound("Basket not found".to_string())).into_response(),
    })
}

/// `POST /api/basket?productId=&quantity=`
///
/// Creates the basket (and, for guests, the anonymous cookie) on demand.
#[instrument(skip(state, cookie))]
pub async fn add_item(
    State(state): State<AppState>,
    user: OptionalUser,
    cookie: BuyerCookie,
    Query(params): Query<ItemParams>,
) -> Result<Response> {
    let quantity = params.quantity()?;
    let resolution = resolve_buyer(user.user_name(), cookie.as_deref());
    let outcome = BasketService::new(state.pool())
        .add_item(user.user_name(), resolution, params.product_id, quantity)
        .await
        .map_err(|e| persistence_error(e, "Problem saving item to basket"))?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, "/api/basket")],
        BuyerCookieUpdate::new(outcome.cookie, state.config().secure_cookies()),
        Json(BasketDto::from(&outcome.basket)),
    )
        .into_response())
}

/// `DELETE /api/basket?productId=&quantity=`
#[instrument(skip(state, cookie))]
pub async fn remove_item(
    State(state): State<AppState>,
    user: OptionalUser,
    cookie: BuyerCookie,
    Query(params): Query<ItemParams>,
) -> Result<Response> {
    let quantity = params.quantity()?;
    let resolution = resolve_buyer(user.user_name(), cookie.as_deref());
    let outcome = BasketService::new(state.pool())
        .remove_item(resolution, params.product_id, quantity)
        .await
        .map_err(|e| persistence_error(e, "Problem removing item from the basket"))?;

    Ok((
        BuyerCookieUpdate::new(outcome.cookie, state.config().secure_cookies()),
        StatusCode::OK,
    )
        .into_response())
}
