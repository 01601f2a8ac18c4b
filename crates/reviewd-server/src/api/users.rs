//! User handlers: list (with posts) and create.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::types::{PostData, UserData};
use super::{map_constraint_violation, map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CreateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct UserWithPosts {
    #[serde(flatten)]
    pub user: UserData,
    pub posts: Vec<PostData>,
}

/// GET /users — all users, newest first, each with their posts.
pub(in crate::api) async fn list_users(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<UserWithPosts>>>, ApiError> {
    let rid = &req_id.0;

    let users = reviewd_db::list_users(&state.pool)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let user_ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let posts = reviewd_db::list_posts_by_authors(&state.pool, &user_ids)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let mut posts_by_author: HashMap<Uuid, Vec<PostData>> = HashMap::new();
    for post in posts {
        posts_by_author
            .entry(post.author_id)
            .or_default()
            .push(PostData::from(post));
    }

    let data = users
        .into_iter()
        .map(|user| {
            let posts = posts_by_author.remove(&user.id).unwrap_or_default();
            UserWithPosts {
                user: UserData::from(user),
                posts,
            }
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /users — create a user.
pub(in crate::api) async fn create_user(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserData>>), ApiError> {
    let rid = &req_id.0;

    let email = body
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::new(rid, "validation_error", "email is required"))?;

    let row = reviewd_db::create_user(&state.pool, email, body.name.as_deref())
        .await
        .map_err(|e| {
            map_constraint_violation(rid, &e, "a user with that email already exists")
        })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: UserData::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
