//! Database operations for the `reviews` and `review_media` tables.
//!
//! A review and its media items form one logical unit: media rows are only
//! ever written inside the same transaction as their parent review.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub verified: bool,
    pub helpful: i32,
    pub product_id: String,
    pub user_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub shopify_shop: Option<String>,
    pub shopify_product_id: Option<String>,
    pub invitation_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `review_media` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewMediaRow {
    pub id: Uuid,
    pub review_id: Uuid,
    pub media_type: String,
    pub url: String,
    pub filename: Option<String>,
    pub size_bytes: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Fields for review creation. Identity invariants (rating range, user or
/// guest identity present) are validated by the caller and enforced again by
/// CHECK constraints.
#[derive(Debug, Clone)]
pub struct NewReview<'a> {
    pub rating: i16,
    pub comment: Option<&'a str>,
    pub product_id: &'a str,
    pub user_id: Option<Uuid>,
    pub customer_name: Option<&'a str>,
    pub customer_email: Option<&'a str>,
    pub shopify_shop: Option<&'a str>,
    pub shopify_product_id: Option<&'a str>,
    pub invitation_token: Option<&'a str>,
}

/// A media item to attach to a review at creation time.
#[derive(Debug, Clone)]
pub struct NewReviewMedia<'a> {
    /// `IMAGE` or `VIDEO`.
    pub media_type: &'a str,
    pub url: &'a str,
    pub filename: Option<&'a str>,
    pub size_bytes: Option<i64>,
}

const REVIEW_COLUMNS: &str = "id, rating, comment, verified, helpful, product_id, user_id, \
     customer_name, customer_email, shopify_shop, shopify_product_id, invitation_token, \
     created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Creates a review together with its media items in one transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails; nothing is committed in
/// that case.
pub async fn create_review(
    pool: &PgPool,
    review: &NewReview<'_>,
    media: &[NewReviewMedia<'_>],
) -> Result<(ReviewRow, Vec<ReviewMediaRow>), DbError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ReviewRow>(
        "INSERT INTO reviews \
           (rating, comment, product_id, user_id, customer_name, customer_email, \
            shopify_shop, shopify_product_id, invitation_token) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING id, rating, comment, verified, helpful, product_id, user_id, \
                   customer_name, customer_email, shopify_shop, shopify_product_id, \
                   invitation_token, created_at, updated_at",
    )
    .bind(review.rating)
    .bind(review.comment)
    .bind(review.product_id)
    .bind(review.user_id)
    .bind(review.customer_name)
    .bind(review.customer_email)
    .bind(review.shopify_shop)
    .bind(review.shopify_product_id)
    .bind(review.invitation_token)
    .fetch_one(&mut *tx)
    .await?;

    let mut media_rows = Vec::with_capacity(media.len());
    for item in media {
        let media_row = sqlx::query_as::<_, ReviewMediaRow>(
            "INSERT INTO review_media (review_id, media_type, url, filename, size_bytes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, review_id, media_type, url, filename, size_bytes, created_at",
        )
        .bind(row.id)
        .bind(item.media_type)
        .bind(item.url)
        .bind(item.filename)
        .bind(item.size_bytes)
        .fetch_one(&mut *tx)
        .await?;
        media_rows.push(media_row);
    }

    tx.commit().await?;
    Ok((row, media_rows))
}

/// Atomically increments a review's helpful counter and returns the new row,
/// or `None` for an unknown id.
///
/// The increment happens inside the single UPDATE statement so concurrent
/// calls cannot lose a count to a read-modify-write race.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn mark_helpful(pool: &PgPool, id: Uuid) -> Result<Option<ReviewRow>, DbError> {
    let row = sqlx::query_as::<_, ReviewRow>(&format!(
        "UPDATE reviews SET helpful = helpful + 1, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Returns the reviews for one product, newest first, optionally capped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews_for_product(
    pool: &PgPool,
    product_id: &str,
    limit: Option<i64>,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews \
         WHERE product_id = $1 \
         ORDER BY created_at DESC \
         LIMIT $2"
    ))
    .bind(product_id)
    .bind(limit.unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns the reviews sourced from one commerce shop, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews_by_shop(pool: &PgPool, shop: &str) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews \
         WHERE shopify_shop = $1 \
         ORDER BY created_at DESC"
    ))
    .bind(shop)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns all reviews, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews(pool: &PgPool) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns the media items belonging to any of the given reviews, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_media_for_reviews(
    pool: &PgPool,
    review_ids: &[Uuid],
) -> Result<Vec<ReviewMediaRow>, DbError> {
    if review_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, ReviewMediaRow>(
        "SELECT id, review_id, media_type, url, filename, size_bytes, created_at \
         FROM review_media \
         WHERE review_id = ANY($1) \
         ORDER BY created_at ASC",
    )
    .bind(review_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
