//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table.
///
/// Ids are TEXT rather than UUID: reviews arriving from a commerce
/// integration reference products by an externally assigned id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One review rating attributed to a product, for listing-level aggregation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRatingRow {
    pub product_id: String,
    pub rating: i16,
}

/// Fields for product creation.
#[derive(Debug, Clone, Default)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Option<Decimal>,
    pub image_url: Option<&'a str>,
    pub sku: Option<&'a str>,
}

/// Partial-merge update: `Some(v)` overwrites, `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<Decimal>,
    pub image_url: Option<&'a str>,
    pub sku: Option<&'a str>,
    pub active: Option<bool>,
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image_url, sku, active, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Creates a product with a generated id and returns the full inserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_product(pool: &PgPool, product: &NewProduct<'_>) -> Result<ProductRow, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "INSERT INTO products (name, description, price, image_url, sku) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, name, description, price, image_url, sku, active, created_at, updated_at",
    )
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.image_url)
    .bind(product.sku)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Creates the product under the given id if no row exists yet.
///
/// A single `INSERT ... ON CONFLICT DO NOTHING` so that concurrent first-time
/// reviews for the same external product cannot race a separate check against
/// a later insert. Returns `true` when this call inserted the row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn ensure_product_exists(
    pool: &PgPool,
    id: &str,
    name: &str,
    description: Option<&str>,
    sku: Option<&str>,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT INTO products (id, name, description, sku, active) \
         VALUES ($1, $2, $3, $4, TRUE) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(sku)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns a single product by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: &str) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Returns all active products, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_products(pool: &PgPool) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE active = TRUE ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns the products whose ids appear in `ids`. Used to hydrate review lists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products_by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<ProductRow>, DbError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns `(product_id, rating)` pairs for every review of an active product.
/// Feeds the per-product aggregates on the listing endpoint.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_product_ratings(pool: &PgPool) -> Result<Vec<ProductRatingRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRatingRow>(
        "SELECT r.product_id, r.rating \
         FROM reviews r \
         JOIN products p ON p.id = r.product_id \
         WHERE p.active = TRUE",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns the rating values of every review for one product.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_ratings_for_product(pool: &PgPool, product_id: &str) -> Result<Vec<i16>, DbError> {
    let ratings = sqlx::query_scalar::<_, i16>(
        "SELECT rating FROM reviews WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(ratings)
}

/// Applies a partial update in a single `UPDATE ... RETURNING`, or returns
/// `None` if the product does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_product(
    pool: &PgPool,
    id: &str,
    update: &ProductUpdate<'_>,
) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "UPDATE products \
         SET name        = COALESCE($2, name), \
             description = COALESCE($3, description), \
             price       = COALESCE($4, price), \
             image_url   = COALESCE($5, image_url), \
             sku         = COALESCE($6, sku), \
             active      = COALESCE($7, active), \
             updated_at  = NOW() \
         WHERE id = $1 \
         RETURNING id, name, description, price, image_url, sku, active, created_at, updated_at",
    )
    .bind(id)
    .bind(update.name)
    .bind(update.description)
    .bind(update.price)
    .bind(update.image_url)
    .bind(update.sku)
    .bind(update.active)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Hard-deletes a product (reviews cascade). Returns `true` if a row was deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_product(pool: &PgPool, id: &str) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
