//! Error types for the fitclub client core
//!
//! Every remote failure degrades to a user-visible message with prior state
//! retained; nothing here is fatal to the process. Operations are attempted
//! exactly once per user action, so no error carries retry hints.

use thiserror::Error;

/// Result type for fitclub operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the remote record gateway.
///
/// All gateway operations are single-shot and non-retrying; the caller
/// decides how to present the failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a usable response (DNS, connect, TLS, body
    /// read). Carries the transport error text.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The remote store answered with a non-success status.
    #[error("remote rejection ({status}): {message}")]
    RemoteRejection { status: u16, message: String },
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::NetworkFailure(err.to_string())
    }
}

/// Authentication failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Form-level validation failures, surfaced before any remote call is made
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    EmptyRequiredField(&'static str),

    #[error("{0} must be a number")]
    InvalidNumber(&'static str),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("password must be at least 6 characters")]
    CredentialTooShort,

    #[error("passwords do not match")]
    CredentialMismatch,

    #[error("no changes detected")]
    NoChangesDetected,
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session user lacks the role required for the operation. Checked
    /// before any gateway call is issued.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Per-phase outcome report for operations composed of independent remote
/// calls (profile patch + credential change, user insert + invite email).
///
/// `None` means the phase was not requested or not attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialSuccess {
    pub profile_ok: Option<bool>,
    pub credential_ok: Option<bool>,
    pub email_ok: Option<bool>,
}

impl PartialSuccess {
    fn phases(&self) -> [Option<bool>; 3] {
        [self.profile_ok, self.credential_ok, self.email_ok]
    }

    /// At least one phase was attempted and every attempted phase succeeded.
    pub fn all_succeeded(&self) -> bool {
        let phases = self.phases();
        phases.iter().any(Option::is_some) && !phases.contains(&Some(false))
    }

    /// Some attempted phase failed.
    pub fn any_failed(&self) -> bool {
        self.phases().contains(&Some(false))
    }
}
