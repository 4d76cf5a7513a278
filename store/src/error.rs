//! Flat error type for every remote store call.
//!
//! ERROR HANDLING
//! ==============
//! There is no retryable/fatal split: callers render `to_string()` inline
//! next to the form that triggered the call and the user decides whether to
//! resubmit.

/// Error returned by any [`crate::RemoteStore`] operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Credentials rejected or no active session.
    #[error("{0}")]
    Auth(String),

    /// The request never produced a response (transport failure).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Response { status: u16, message: String },

    /// A row or payload could not be (de)serialized.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The write was refused (constraint or policy violation).
    #[error("{0}")]
    Rejected(String),

    /// The operation is not available in this build (e.g. during SSR).
    #[error("{0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err)
    }
}
