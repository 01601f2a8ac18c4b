//! Product handlers: listing with aggregate ratings, detail with statistics
//! and hydrated reviews, create, partial update, delete.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reviewd_core::stats::RatingStats;
use reviewd_db::{NewProduct, ProductUpdate};

use crate::middleware::RequestId;

use super::types::{ProductData, ReviewData, ReviewMediaData, UserData};
use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Request/response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub active: Option<bool>,
}

/// Listing row: product fields plus the aggregate rating summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct ProductListItem {
    #[serde(flatten)]
    pub product: ProductData,
    pub total_reviews: i64,
    pub average_rating: f64,
}

/// Detail response: product fields, full statistics, hydrated reviews.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductData,
    #[serde(flatten)]
    pub stats: RatingStats,
    pub reviews: Vec<ReviewData>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /products — active products, newest first, with rating aggregates.
pub(in crate::api) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ProductListItem>>>, ApiError> {
    let rid = &req_id.0;

    let products = reviewd_db::list_active_products(&state.pool)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let ratings = reviewd_db::list_product_ratings(&state.pool)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let mut ratings_by_product: HashMap<String, Vec<i16>> = HashMap::new();
    for row in ratings {
        ratings_by_product
            .entry(row.product_id)
            .or_default()
            .push(row.rating);
    }

    let data = products
        .into_iter()
        .map(|product| {
            let ratings = ratings_by_product.remove(&product.id).unwrap_or_default();
            let stats = reviewd_core::compute_rating_stats(&ratings);
            ProductListItem {
                product: ProductData::from(product),
                total_reviews: stats.total_reviews,
                average_rating: stats.average_rating,
            }
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /products — create a product.
pub(in crate::api) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductData>>), ApiError> {
    let rid = &req_id.0;

    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::new(rid, "validation_error", "product name is required"))?;

    let row = reviewd_db::create_product(
        &state.pool,
        &NewProduct {
            name,
            description: body.description.as_deref(),
            price: body.price,
            image_url: body.image_url.as_deref(),
            sku: body.sku.as_deref(),
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ProductData::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /products/{id} — product detail with statistics and reviews.
pub(in crate::api) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProductDetail>>, ApiError> {
    let rid = &req_id.0;

    let product = reviewd_db::get_product(&state.pool, &id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "product not found"))?;

    let ratings = reviewd_db::list_ratings_for_product(&state.pool, &id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let stats = reviewd_core::compute_rating_stats(&ratings);

    let review_rows = reviewd_db::list_reviews_for_product(&state.pool, &id, None)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let reviews = hydrate_reviews(&state, rid, review_rows).await?;

    Ok(Json(ApiResponse {
        data: ProductDetail {
            product: ProductData::from(product),
            stats,
            reviews,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /products/{id} — partial-merge update.
pub(in crate::api) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductData>>, ApiError> {
    let rid = &req_id.0;

    let row = reviewd_db::update_product(
        &state.pool,
        &id,
        &ProductUpdate {
            name: body.name.as_deref(),
            description: body.description.as_deref(),
            price: body.price,
            image_url: body.image_url.as_deref(),
            sku: body.sku.as_deref(),
            active: body.active,
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?
    .ok_or_else(|| ApiError::new(rid, "not_found", "product not found"))?;

    Ok(Json(ApiResponse {
        data: ProductData::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /products/{id} — hard delete; reviews and media cascade.
pub(in crate::api) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;

    let deleted = reviewd_db::delete_product(&state.pool, &id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    if !deleted {
        return Err(ApiError::new(rid, "not_found", "product not found"));
    }

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

// ---------------------------------------------------------------------------
// Hydration
// ---------------------------------------------------------------------------

/// Attaches user and media to each review row. The product is not loaded:
/// callers already know which product these reviews belong to.
pub(in crate::api) async fn hydrate_reviews(
    state: &AppState,
    rid: &str,
    rows: Vec<reviewd_db::ReviewRow>,
) -> Result<Vec<ReviewData>, ApiError> {
    let review_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let user_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.user_id).collect();

    let media_rows = reviewd_db::list_media_for_reviews(&state.pool, &review_ids)
        .await
        .map_err(|e| map_db_error(rid.to_owned(), &e))?;
    let users = reviewd_db::list_users_by_ids(&state.pool, &user_ids)
        .await
        .map_err(|e| map_db_error(rid.to_owned(), &e))?;

    let mut media_by_review: HashMap<Uuid, Vec<ReviewMediaData>> = HashMap::new();
    for media in media_rows {
        media_by_review
            .entry(media.review_id)
            .or_default()
            .push(ReviewMediaData::from(media));
    }
    let users_by_id: HashMap<Uuid, UserData> = users
        .into_iter()
        .map(|u| (u.id, UserData::from(u)))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let user = row.user_id.and_then(|id| users_by_id.get(&id).cloned());
            let media = media_by_review.remove(&row.id).unwrap_or_default();
            ReviewData::from_parts(row, user, None, media)
        })
        .collect())
}
