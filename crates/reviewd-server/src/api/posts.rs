//! Post handlers: list (with author) and create.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::types::PostData;
use super::{map_constraint_violation, map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct PostAuthor {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct PostWithAuthor {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: Uuid,
    pub author: PostAuthor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// GET /posts — all posts with their author, newest first.
pub(in crate::api) async fn list_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<PostWithAuthor>>>, ApiError> {
    let rid = &req_id.0;

    let rows = reviewd_db::list_posts_with_author(&state.pool)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| PostWithAuthor {
            id: row.id,
            title: row.title,
            content: row.content,
            published: row.published,
            author_id: row.author_id,
            author: PostAuthor {
                id: row.author_id,
                email: row.author_email,
                name: row.author_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /posts — create a post.
pub(in crate::api) async fn create_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostData>>), ApiError> {
    let rid = &req_id.0;

    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let author_raw = body
        .author_id
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());
    let (Some(title), Some(author_raw)) = (title, author_raw) else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "title and authorId are required",
        ));
    };

    let author_id = author_raw.parse::<Uuid>().map_err(|_| {
        ApiError::new(rid, "validation_error", "authorId must be a valid id")
    })?;

    let row = reviewd_db::create_post(&state.pool, title, body.content.as_deref(), author_id)
        .await
        .map_err(|e| map_constraint_violation(rid, &e, "duplicate post"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: PostData::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
