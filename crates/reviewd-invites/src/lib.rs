//! Client for the external review-invitation service.
//!
//! The service owns invitation tokens end to end; this crate only forwards
//! validation and mark-responded calls and translates the outcomes. Upstream
//! responses are kept opaque so the API layer can pass them through unchanged.

mod client;
mod error;

pub use client::InvitesClient;
pub use error::InviteError;
