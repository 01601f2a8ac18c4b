//! Review handlers: listing with optional product/shop filters, submission
//! (including auto-provisioning of externally-sourced products), and the
//! helpful counter.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reviewd_db::{NewReview, NewReviewMedia};

use crate::middleware::RequestId;

use super::types::{ProductData, ReviewData, ReviewMediaData, UserData};
use super::{
    map_constraint_violation, map_db_error, normalize_limit, ApiError, ApiResponse, AppState,
    ResponseMeta,
};

// ---------------------------------------------------------------------------
// Request/response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct ListReviewsParams {
    pub product_id: Option<String>,
    pub shopify_shop: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct MediaItem {
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    pub filename: Option<String>,
    pub size: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct CreateReviewRequest {
    pub rating: Option<i16>,
    pub comment: Option<String>,
    pub product_id: Option<String>,
    pub user_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub shopify_shop: Option<String>,
    pub shopify_product_id: Option<String>,
    pub invitation_token: Option<String>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct HelpfulResponse {
    pub message: &'static str,
    pub helpful: i32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /reviews — all reviews, or filtered by `productId` / `shopifyShop`.
/// `productId` wins when both filters are present.
pub(in crate::api) async fn list_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ListReviewsParams>,
) -> Result<Json<ApiResponse<Vec<ReviewData>>>, ApiError> {
    let rid = &req_id.0;
    let limit = normalize_limit(params.limit);

    let (rows, include_product) = if let Some(product_id) = params.product_id.as_deref() {
        let rows = reviewd_db::list_reviews_for_product(&state.pool, product_id, limit)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?;
        (rows, false)
    } else if let Some(shop) = params.shopify_shop.as_deref() {
        let mut rows = reviewd_db::list_reviews_by_shop(&state.pool, shop)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?;
        if let Some(cap) = limit {
            rows.truncate(usize::try_from(cap).unwrap_or(usize::MAX));
        }
        (rows, true)
    } else {
        let mut rows = reviewd_db::list_reviews(&state.pool)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?;
        if let Some(cap) = limit {
            rows.truncate(usize::try_from(cap).unwrap_or(usize::MAX));
        }
        (rows, true)
    };

    let data = hydrate(&state, rid, rows, include_product).await?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /reviews — submit a review, with optional media and optional
/// auto-provisioning of the product when the review arrives from an
/// external shop.
pub(in crate::api) async fn create_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewData>>), ApiError> {
    let rid = &req_id.0;

    let (Some(rating), Some(product_id)) = (body.rating, body.product_id.as_deref()) else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "rating and productId are required",
        ));
    };
    if !(1..=5).contains(&rating) {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "rating must be between 1 and 5",
        ));
    }

    // Empty strings count as absent for the guest-identity check.
    let customer_name = non_empty(body.customer_name.as_deref());
    let customer_email = non_empty(body.customer_email.as_deref());
    if body.user_id.is_none() && customer_name.is_none() && customer_email.is_none() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "customer name or email is required for guest reviews",
        ));
    }

    let media: Vec<NewReviewMedia<'_>> = body
        .media
        .iter()
        .map(|item| {
            let media_type = match item.media_type.as_str() {
                "IMAGE" | "VIDEO" => item.media_type.as_str(),
                other => {
                    return Err(ApiError::new(
                        rid,
                        "validation_error",
                        format!("media type {other} is not supported"),
                    ))
                }
            };
            Ok(NewReviewMedia {
                media_type,
                url: &item.url,
                filename: item.filename.as_deref(),
                size_bytes: item.size,
            })
        })
        .collect::<Result<_, _>>()?;

    let shopify_shop = non_empty(body.shopify_shop.as_deref());
    let shopify_product_id = non_empty(body.shopify_product_id.as_deref());

    // Reviews imported from a shop may reference products this service has
    // never seen. Provision a placeholder row first; the insert is a no-op
    // when the product already exists, so concurrent submissions are safe.
    if let (Some(spid), Some(shop)) = (shopify_product_id, shopify_shop) {
        let name = format!("Product {spid}");
        let description = format!("Product imported from shop {shop}");
        reviewd_db::ensure_product_exists(
            &state.pool,
            product_id,
            &name,
            Some(&description),
            Some(spid),
        )
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    }

    let new_review = NewReview {
        rating,
        comment: non_empty(body.comment.as_deref()),
        product_id,
        user_id: body.user_id,
        customer_name,
        customer_email,
        shopify_shop,
        shopify_product_id,
        invitation_token: non_empty(body.invitation_token.as_deref()),
    };

    let (row, media_rows) = reviewd_db::create_review(&state.pool, &new_review, &media)
        .await
        .map_err(|e| {
            map_constraint_violation(rid, &e, "review conflicts with an existing record")
        })?;

    let user = match row.user_id {
        Some(user_id) => reviewd_db::list_users_by_ids(&state.pool, &[user_id])
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?
            .into_iter()
            .next()
            .map(UserData::from),
        None => None,
    };
    let product = reviewd_db::get_product(&state.pool, &row.product_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .map(ProductData::from);

    let data = ReviewData::from_parts(
        row,
        user,
        product,
        media_rows.into_iter().map(ReviewMediaData::from).collect(),
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// POST /reviews/{id}/helpful — bump the helpful counter.
pub(in crate::api) async fn mark_helpful(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<HelpfulResponse>>, ApiError> {
    let rid = &req_id.0;

    let row = reviewd_db::mark_helpful(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", "review not found"))?;

    Ok(Json(ApiResponse {
        data: HelpfulResponse {
            message: "Review marked as helpful",
            helpful: row.helpful,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Attaches user and media to each review, plus the product when the listing
/// spans multiple products.
async fn hydrate(
    state: &AppState,
    rid: &str,
    rows: Vec<reviewd_db::ReviewRow>,
    include_product: bool,
) -> Result<Vec<ReviewData>, ApiError> {
    if !include_product {
        return super::products::hydrate_reviews(state, rid, rows).await;
    }

    let review_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let user_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.user_id).collect();
    let mut product_ids: Vec<String> = rows.iter().map(|r| r.product_id.clone()).collect();
    product_ids.sort_unstable();
    product_ids.dedup();

    let media_rows = reviewd_db::list_media_for_reviews(&state.pool, &review_ids)
        .await
        .map_err(|e| map_db_error(rid.to_owned(), &e))?;
    let users = reviewd_db::list_users_by_ids(&state.pool, &user_ids)
        .await
        .map_err(|e| map_db_error(rid.to_owned(), &e))?;
    let products = reviewd_db::list_products_by_ids(&state.pool, &product_ids)
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
    let products_by_id: HashMap<String, ProductData> = products
        .into_iter()
        .map(|p| (p.id.clone(), ProductData::from(p)))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let user = row.user_id.and_then(|id| users_by_id.get(&id).cloned());
            let product = products_by_id.get(&row.product_id).cloned();
            let media = media_by_review.remove(&row.id).unwrap_or_default();
            ReviewData::from_parts(row, user, product, media)
        })
        .collect())
}
