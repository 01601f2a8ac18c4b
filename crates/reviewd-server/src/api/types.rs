//! Shared wire types for the JSON API.
//!
//! The HTTP surface speaks camelCase; database rows are snake_case. Each type
//! here is an explicit response shape with a `From<row>` conversion so route
//! handlers never leak raw rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use reviewd_db::{PostRow, ProductRow, ReviewMediaRow, ReviewRow, UserRow};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserData {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostRow> for PostData {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            published: row.published,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
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

impl From<ProductRow> for ProductData {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            sku: row.sku,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMediaData {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    pub filename: Option<String>,
    pub size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewMediaRow> for ReviewMediaData {
    fn from(row: ReviewMediaRow) -> Self {
        Self {
            id: row.id,
            media_type: row.media_type,
            url: row.url,
            filename: row.filename,
            size: row.size_bytes,
            created_at: row.created_at,
        }
    }
}

/// A hydrated review. `user` is absent for guest reviews; `product` is only
/// loaded on endpoints that include it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewData {
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
    pub user: Option<UserData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductData>,
    pub media: Vec<ReviewMediaData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewData {
    pub fn from_parts(
        row: ReviewRow,
        user: Option<UserData>,
        product: Option<ProductData>,
        media: Vec<ReviewMediaData>,
    ) -> Self {
        Self {
            id: row.id,
            rating: row.rating,
            comment: row.comment,
            verified: row.verified,
            helpful: row.helpful,
            product_id: row.product_id,
            user_id: row.user_id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            shopify_shop: row.shopify_shop,
            shopify_product_id: row.shopify_product_id,
            invitation_token: row.invitation_token,
            user,
            product,
            media,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
