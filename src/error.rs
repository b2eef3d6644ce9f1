//! Error types for chainfr session operations
//!
//! Each collaborator has its own error type. The session layer wraps them in
//! [`SessionError`], choosing the variant by the step that failed rather than
//! by the collaborator that produced it.

use thiserror::Error;

/// Boxed error used by collaborators whose failure type is implementation-defined
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by the identity provider
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Sign-in cancelled by user")]
    Cancelled,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Failure of a call against the remote API
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Other(String),
}

impl BackendError {
    /// Build a status error from a non-success response
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Failure of the cloud drive holding the wallet file
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),
}

/// Errors surfaced to callers of the session layer
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Registration failed: {0}")]
    Registration(#[source] BackendError),

    #[error("Wallet lookup failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Cloud wallet creation failed: {0}")]
    WalletCreation(#[source] BoxError),

    #[error("Failed to fetch crypto accounts: {0}")]
    AccountFetch(#[source] BackendError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Recipient already exists: {email}")]
    Duplicate { email: String },

    #[error("No user is logged in")]
    NotLoggedIn,
}

impl SessionError {
    pub fn wallet_creation(err: impl Into<BoxError>) -> Self {
        Self::WalletCreation(err.into())
    }
}
