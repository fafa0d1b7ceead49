//! Basket workflows: read, add, remove and merge-on-login.
//!
//! Handlers resolve the request identity once and pass it in. Every
//! operation returns the basket together with the cookie change the
//! response has to carry.

use sqlx::PgPool;
use thiserror::Error;

use restore_core::identity::{self, CookieDirective, Resolution};
use restore_core::merge::plan_merge;
use restore_core::{Basket, BuyerId, ProductId};

use crate::db::{BasketRepository, ProductRepository, RepositoryError};

/// Errors from basket workflows.
#[derive(Debug, Error)]
pub enum BasketError {
    /// The buyer has no basket.
    #[error("basket not found")]
    NotFound,

    /// The product to add does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The save completed but wrote no rows.
    #[error("basket save wrote no rows")]
    NothingSaved,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A basket (if any) plus the cookie change to send with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketOutcome<B> {
    pub basket: B,
    pub cookie: CookieDirective,
}

/// Basket workflows over the basket and product repositories.
pub struct BasketService<'a> {
    baskets: BasketRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> BasketService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            baskets: BasketRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Load the basket for an already resolved identity.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::Repository` if loading fails.
    pub async fn get(
        &self,
        resolution: Resolution,
    ) -> Result<BasketOutcome<Option<Basket>>, BasketError> {
        let basket = match &resolution.buyer {
            Some(buyer) => self.baskets.get_by_buyer(buyer).await?,
            None => None,
        };
        Ok(BasketOutcome {
            basket,
            cookie: resolution.cookie,
        })
    }

    /// Add `quantity` of a product, creating the basket on demand.
    ///
    /// A guest without a basket gets a fresh anonymous id, returned as a
    /// `Set` directive.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::ProductNotFound` for an unknown product and
    /// `BasketError::NothingSaved` when the save wrote nothing.
    pub async fn add_item(
        &self,
        principal: Option<&str>,
        resolution: Resolution,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<BasketOutcome<Basket>, BasketError> {
        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or(BasketError::ProductNotFound(product_id))?;

        let existing = match &resolution.buyer {
            Some(buyer) => self.baskets.get_by_buyer(buyer).await?,
            None => None,
        };

        let (mut basket, cookie) = match existing {
            Some(basket) => (basket, resolution.cookie),
            None => {
                let (buyer, created) = identity::identity_for_new_basket(principal);
                (Basket::new(buyer), resolution.cookie.then(created))
            }
        };

        basket.add_item(&product, quantity);
        if self.baskets.save(&mut basket).await? == 0 {
            return Err(BasketError::NothingSaved);
        }

        tracing::info!(
            buyer_id = %basket.buyer_id,
            product_id = %product_id,
            quantity,
            "Item added to basket"
        );

        Ok(BasketOutcome { basket, cookie })
    }

    /// Remove up to `quantity` of a product from the buyer's basket.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::NotFound` when there is no basket and
    /// `BasketError::NothingSaved` when nothing changed (e.g. the product
    /// was not in the basket).
    pub async fn remove_item(
        &self,
        resolution: Resolution,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<BasketOutcome<Basket>, BasketError> {
        let Some(buyer) = &resolution.buyer else {
            return Err(BasketError::NotFound);
        };
        let mut basket = self
            .baskets
            .get_by_buyer(buyer)
            .await?
            .ok_or(BasketError::NotFound)?;

        basket.remove_item(product_id, quantity);
        if self.baskets.save(&mut basket).await? == 0 {
            return Err(BasketError::NothingSaved);
        }

        Ok(BasketOutcome {
            basket,
            cookie: resolution.cookie,
        })
    }

    /// Reconcile the anonymous basket (from the cookie) with the basket of
    /// `user_name` right after login.
    ///
    /// The anonymous basket, when present, becomes the user's basket and
    /// replaces any basket the user already had. With `clear_cookie` set,
    /// the cookie is expired once its basket has been adopted.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::Repository` if loading or applying the merge fails.
    pub async fn merge_on_login(
        &self,
        user_name: &BuyerId,
        cookie: Option<&str>,
        clear_cookie: bool,
    ) -> Result<BasketOutcome<Option<Basket>>, BasketError> {
        let anonymous = identity::resolve_anonymous(cookie);

        let user_basket = self.baskets.get_by_buyer(user_name).await?;
        let anonymous_basket = match &anonymous.buyer {
            Some(buyer) if buyer != user_name => self.baskets.get_by_buyer(buyer).await?,
            _ => None,
        };

        let plan = plan_merge(user_basket, anonymous_basket, user_name);
        self.baskets.apply_merge(&plan).await?;

        let mut cookie = anonymous.cookie;
        if plan.rekeyed {
            tracing::info!(user_name = %user_name, "Anonymous basket adopted at login");
            if clear_cookie {
                cookie = cookie.then(CookieDirective::Delete);
            }
        }

        Ok(BasketOutcome {
            basket: plan.basket,
            cookie,
        })
    }
}
