//! Invitation endpoints. These proxy the external invitation service: the
//! upstream JSON body and status are passed through unmodified, success or
//! failure, so storefront widgets see exactly what the service said. Only
//! locally detected problems (missing token, transport failure) use this
//! API's own error envelope.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use reviewd_invites::InviteError;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct ValidateInvitationRequest {
    pub token: Option<String>,
    pub product_id: Option<String>,
    pub shop: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct MarkRespondedRequest {
    pub token: Option<String>,
}

/// POST /validate-invitation — check a token with the invitation service.
pub(in crate::api) async fn validate_invitation(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ValidateInvitationRequest>,
) -> Result<Response, ApiError> {
    let rid = &req_id.0;
    let token = require_token(rid, body.token.as_deref())?;

    let result = state
        .invites
        .validate(token, body.product_id.as_deref(), body.shop.as_deref())
        .await;
    passthrough(rid, result)
}

/// POST /mark-invitation-responded — record that an invitation was used.
pub(in crate::api) async fn mark_invitation_responded(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<MarkRespondedRequest>,
) -> Result<Response, ApiError> {
    let rid = &req_id.0;
    let token = require_token(rid, body.token.as_deref())?;

    let result = state.invites.mark_responded(token).await;
    passthrough(rid, result)
}

fn require_token<'a>(rid: &str, token: Option<&'a str>) -> Result<&'a str, ApiError> {
    token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::new(rid, "validation_error", "token is required"))
}

fn passthrough(
    rid: &str,
    result: Result<serde_json::Value, InviteError>,
) -> Result<Response, ApiError> {
    match result {
        Ok(payload) => Ok(Json(payload).into_response()),
        Err(InviteError::Upstream { status, body }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok((status, Json(body)).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "invitation service call failed");
            Err(ApiError::new(
                rid,
                "internal_error",
                "invitation service unavailable",
            ))
        }
    }
}
