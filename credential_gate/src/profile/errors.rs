use thiserror::Error;

use crate::identity::{AuthErrorKind, ProviderError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store is not configured: {0}")]
    NotConfigured(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// Identifier in the same `<service>/<reason>` shape as provider codes
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "store/not-configured",
            Self::PermissionDenied(_) => "store/permission-denied",
            Self::Network(_) => "store/unavailable",
            Self::Serde(_) => "store/invalid-argument",
            Self::Storage(_) => "store/internal",
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

/// Failure of any step of account registration
#[derive(Debug, Error, Clone)]
pub enum RegistrationError {
    #[error("Identity provider error: {0}")]
    Provider(ProviderError),

    #[error("Profile store error: {0}")]
    Store(StoreError),
}

impl RegistrationError {
    /// Both failure sources render through the same form error display.
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::Provider(err) => err.kind(),
            Self::Store(err) => AuthErrorKind::Other(err.code().to_string()),
        }
    }
}

impl From<ProviderError> for RegistrationError {
    fn from(err: ProviderError) -> Self {
        let error = Self::Provider(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        let error = Self::Store(err);
        tracing::error!("{}", error);
        error
    }
}
