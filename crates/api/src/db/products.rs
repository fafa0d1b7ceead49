//! Product repository.

use sqlx::{FromRow, PgPool};

use restore_core::{Price, Product, ProductId};

use super::RepositoryError;

/// Row shape shared by product queries.
#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub picture_url: String,
    #[sqlx(rename = "type")]
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            picture_url: row.picture_url,
            product_type: row.product_type,
            brand: row.brand,
            quantity_in_stock: row.quantity_in_stock,
        }
    }
}

/// Repository for catalog reads and seeding.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the whole catalog ordered by id.
    ///
    /// Listing endpoints sort, search, filter and page this in memory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, picture_url, type, brand, quantity_in_stock
            FROM product
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, picture_url, type, brand, quantity_in_stock
            FROM product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a product, returning it with its assigned id.
    ///
    /// The `id` of `product` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, product: &NewProduct<'_>) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO product (name, description, price, picture_url, type, brand, quantity_in_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, price, picture_url, type, brand, quantity_in_stock
            ",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.picture_url)
        .bind(product.product_type)
        .bind(product.brand)
        .bind(product.quantity_in_stock)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}

/// Fields for inserting a catalog product.
#[derive(Debug, Clone, Copy)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: Price,
    pub picture_url: &'a str,
    pub product_type: &'a str,
    pub brand: &'a str,
    pub quantity_in_stock: i32,
}
