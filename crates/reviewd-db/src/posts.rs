//! Database operations for the `posts` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post joined with its author's identity, for listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthorRow {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: Uuid,
    pub author_email: String,
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creates a post and returns the full inserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails (including FK violations on
/// a missing author).
pub async fn create_post(
    pool: &PgPool,
    title: &str,
    content: Option<&str>,
    author_id: Uuid,
) -> Result<PostRow, DbError> {
    let row = sqlx::query_as::<_, PostRow>(
        "INSERT INTO posts (title, content, author_id) \
         VALUES ($1, $2, $3) \
         RETURNING id, title, content, published, author_id, created_at, updated_at",
    )
    .bind(title)
    .bind(content)
    .bind(author_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Returns all posts with their author, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts_with_author(pool: &PgPool) -> Result<Vec<PostWithAuthorRow>, DbError> {
    let rows = sqlx::query_as::<_, PostWithAuthorRow>(
        "SELECT p.id, p.title, p.content, p.published, p.author_id, \
                u.email AS author_email, u.name AS author_name, \
                p.created_at, p.updated_at \
         FROM posts p \
         JOIN users u ON u.id = p.author_id \
         ORDER BY p.created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns the posts written by any of the given authors, newest first.
/// Used to hydrate the user listing.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts_by_authors(pool: &PgPool, author_ids: &[Uuid]) -> Result<Vec<PostRow>, DbError> {
    if author_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, PostRow>(
        "SELECT id, title, content, published, author_id, created_at, updated_at \
         FROM posts \
         WHERE author_id = ANY($1) \
         ORDER BY created_at DESC",
    )
    .bind(author_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
