use thiserror::Error;

/// Errors returned by the invitation-service client.
///
/// An upstream-reported failure (the service answered with a non-2xx status)
/// is distinct from a transport failure: the former carries a status and body
/// to pass through to the caller, the latter is an internal error.
#[derive(Debug, Error)]
pub enum InviteError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The invitation service answered with a non-2xx status.
    #[error("invitation service returned status {status}")]
    Upstream {
        status: u16,
        body: serde_json::Value,
    },

    /// The response body could not be parsed as JSON.
    #[error("invalid JSON from invitation service for {context}: {source}")]
    Deserialize {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid invitation service base URL '{0}'")]
    InvalidBaseUrl(String),
}
