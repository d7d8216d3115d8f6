//! Errors surfaced by the client state.
//!
//! Every variant is recoverable: the failing operation leaves the state as it
//! was (or keeps the stale cache) and the message is shown to the user.
use thiserror::Error;

use crate::RemoteError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A list fetch failed; the previous cache stays visible.
    #[error("{0}")]
    Load(String),
    /// A create request failed; nothing was changed locally.
    #[error("{0}")]
    Create(String),
    /// A local precondition failed before any request was sent.
    #[error("{0}")]
    Validation(String),
    #[error("Invalid username or password")]
    Auth,
    #[error("Unable to save local state: {0}")]
    Storage(String),
}

impl LedgerError {
    pub(crate) fn load(what: &str, err: RemoteError) -> Self {
        Self::Load(format!("Failed to load {what}: {err}"))
    }

    pub(crate) fn create(what: &str, err: RemoteError) -> Self {
        Self::Create(format!("Failed to {what}: {err}"))
    }
}
