//! HTTP client for the review-invitation service.
//!
//! Wraps `reqwest` with bounded timeouts and the error translation the API
//! layer relies on: upstream non-2xx responses keep their status and JSON
//! body, transport failures surface as [`InviteError::Http`].

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::InviteError;

/// Client for the review-invitation service.
///
/// Use [`InvitesClient::new`] in production or point `base_url` at a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct InvitesClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
struct ValidateBody<'a> {
    token: &'a str,
    #[serde(rename = "productId", skip_serializing_if = "Option::is_none")]
    product_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shop: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct MarkRespondedBody<'a> {
    token: &'a str,
}

impl InvitesClient {
    /// Creates a client for the service at `base_url` with the given request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`InviteError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`InviteError::InvalidBaseUrl`] for an
    /// unparseable base URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, InviteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("reviewd/0.1 (review-collection)")
            .build()?;

        // Keep exactly one trailing slash so Url::join appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| InviteError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Asks the service whether an invitation token is valid for a product.
    ///
    /// On success returns the upstream payload unmodified (expected to carry
    /// `valid` and the invitation details).
    ///
    /// # Errors
    ///
    /// - [`InviteError::Upstream`] when the service answers non-2xx; the
    ///   status and body are preserved for passthrough.
    /// - [`InviteError::Http`] on network failure.
    /// - [`InviteError::Deserialize`] when the body is not JSON.
    pub async fn validate(
        &self,
        token: &str,
        product_id: Option<&str>,
        shop: Option<&str>,
    ) -> Result<serde_json::Value, InviteError> {
        self.post_json(
            "api/validate-invitation",
            &ValidateBody {
                token,
                product_id,
                shop,
            },
        )
        .await
    }

    /// Marks an invitation as responded to.
    ///
    /// # Errors
    ///
    /// Same contract as [`InvitesClient::validate`].
    pub async fn mark_responded(&self, token: &str) -> Result<serde_json::Value, InviteError> {
        self.post_json("api/mark-responded", &MarkRespondedBody { token })
            .await
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &'static str,
        body: &B,
    ) -> Result<serde_json::Value, InviteError> {
        let url = self.endpoint(path);
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let payload: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| InviteError::Deserialize {
                context: path,
                source: e,
            })?;

        if status.is_success() {
            Ok(payload)
        } else {
            tracing::warn!(status = status.as_u16(), endpoint = path, "invitation service reported failure");
            Err(InviteError::Upstream {
                status: status.as_u16(),
                body: payload,
            })
        }
    }

    fn endpoint(&self, path: &str) -> Url {
        // The base URL is normalised with a trailing slash, so join cannot fail
        // for the fixed relative paths used here.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;
