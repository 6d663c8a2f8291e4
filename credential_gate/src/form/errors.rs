use thiserror::Error;

use crate::identity::AuthErrorKind;

/// Errors returned by the credential form controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A previous attempt on this form has not settled
    #[error("An authentication attempt is already in progress")]
    AttemptInProgress,

    /// The identity provider or profile store rejected the attempt
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(AuthErrorKind),

    /// The operation is not available on this form
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl FormError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::AttemptInProgress => tracing::warn!("Authentication attempt already in progress"),
            Self::AuthenticationFailed(kind) => tracing::warn!("Authentication failed: {:?}", kind),
            Self::NotConfigured(msg) => tracing::error!("Not configured: {}", msg),
        }
        self
    }
}
