//! Basket repository.
//!
//! A basket is stored as one `basket` row keyed by `buyer_id` plus one
//! `basket_item` row per product. Loading always brings the product rows
//! along so the aggregate is complete without further queries.

use sqlx::{FromRow, PgPool, Postgres, Transaction};

use restore_core::{Basket, BasketId, BasketItem, BuyerId, MergePlan, Product};

use super::RepositoryError;
use super::products::ProductRow;

#[derive(Debug, FromRow)]
struct BasketRow {
    id: BasketId,
    buyer_id: BuyerId,
}

#[derive(Debug, FromRow)]
struct BasketLineRow {
    quantity: i32,
    #[sqlx(flatten)]
    product: ProductRow,
}

impl TryFrom<BasketLineRow> for BasketItem {
    type Error = RepositoryError;

    fn try_from(row: BasketLineRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "invalid basket quantity {} for product {}",
                    row.quantity, row.product.id
                ))
            })?;

        Ok(Self {
            product: Product::from(row.product),
            quantity,
        })
    }
}

/// Repository for basket persistence.
pub struct BasketRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BasketRepository<'a> {
    /// Create a new basket repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the basket owned by `buyer_id`, with its items and products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored quantity is not positive.
    pub async fn get_by_buyer(&self, buyer_id: &BuyerId) -> Result<Option<Basket>, RepositoryError> {
        let Some(row) = sqlx::query_as::<_, BasketRow>(
            "SELECT id, buyer_id FROM basket WHERE buyer_id = $1",
        )
        .bind(buyer_id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, BasketLineRow>(
            r"
            SELECT bi.quantity,
                   p.id, p.name, p.description, p.price, p.picture_url,
                   p.type, p.brand, p.quantity_in_stock
            FROM basket_item bi
            JOIN product p ON p.id = bi.product_id
            WHERE bi.basket_id = $1
            ORDER BY bi.id
            ",
        )
        .bind(row.id)
        .fetch_all(self.pool)
        .await?;

        let items = lines
            .into_iter()
            .map(BasketItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Basket {
            id: Some(row.id),
            buyer_id: row.buyer_id,
            items,
        }))
    }

    /// Persist `basket`, inserting it first if it has no id yet.
    ///
    /// Item lines are upserted and lines no longer in the aggregate are
    /// deleted, all in one transaction. On success `basket.id` is set.
    ///
    /// Returns the number of rows written. Zero means the stored state
    /// already matched and nothing changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if another basket already uses the buyer id.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn save(&self, basket: &mut Basket) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;

        let id = match basket.id {
            Some(id) => id,
            None => {
                let id: BasketId =
                    sqlx::query_scalar("INSERT INTO basket (buyer_id) VALUES ($1) RETURNING id")
                        .bind(&basket.buyer_id)
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(|e| super::conflict_on_unique(e, "basket for buyer"))?;
                affected += 1;
                id
            }
        };

        affected += write_items(&mut tx, id, &basket.items).await?;

        tx.commit().await?;
        basket.id = Some(id);
        Ok(affected)
    }

    /// Apply a login merge plan: drop the discarded basket, then re-key the
    /// surviving one to its new owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    /// Returns `RepositoryError::NotFound` if the basket to re-key no longer exists.
    pub async fn apply_merge(&self, plan: &MergePlan) -> Result<(), RepositoryError> {
        if !plan.has_changes() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        if let Some(discard) = plan.discard {
            sqlx::query("DELETE FROM basket WHERE id = $1")
                .bind(discard)
                .execute(&mut *tx)
                .await?;
        }

        if plan.rekeyed
            && let Some(basket) = &plan.basket
        {
            let id = basket.id.ok_or(RepositoryError::NotFound)?;
            let result = sqlx::query("UPDATE basket SET buyer_id = $1 WHERE id = $2")
                .bind(&basket.buyer_id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| super::conflict_on_unique(e, "basket for buyer"))?;
            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Sync the stored lines of basket `id` with `items`.
async fn write_items(
    tx: &mut Transaction<'_, Postgres>,
    id: BasketId,
    items: &[BasketItem],
) -> Result<u64, RepositoryError> {
    let mut affected = 0;

    for item in items {
        let quantity = i32::try_from(item.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "quantity {} of product {} does not fit the basket_item column",
                item.quantity,
                item.product_id()
            ))
        })?;
        affected += sqlx::query(
            r"
            INSERT INTO basket_item (basket_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (basket_id, product_id)
            DO UPDATE SET quantity = EXCLUDED.quantity
            WHERE basket_item.quantity <> EXCLUDED.quantity
            ",
        )
        .bind(id)
        .bind(item.product_id())
        .bind(quantity)
        .execute(&mut **tx)
        .await?
        .rows_affected();
    }

    let keep: Vec<i32> = items.iter().map(|i| i.product_id().as_i32()).collect();
    affected += sqlx::query("DELETE FROM basket_item WHERE basket_id = $1 AND product_id <> ALL($2)")
        .bind(id)
        .bind(keep)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    Ok(affected)
}
