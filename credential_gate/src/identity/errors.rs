use std::fmt;
use thiserror::Error;

/// Rejection from the identity provider.
///
/// `code` is the provider-defined identifier, normalized to the `auth/...`
/// form (e.g. `auth/wrong-password`). `message` is diagnostic text only and is
/// never shown to users.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Provider error: {code}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Transport-level failure talking to the provider
    pub fn network(message: impl Into<String>) -> Self {
        Self::new("auth/network-request-failed", message)
    }

    /// Provider answered with something that could not be understood
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("auth/internal-error", message)
    }

    pub fn kind(&self) -> AuthErrorKind {
        AuthErrorKind::from_code(&self.code)
    }

    /// Build an error from an Identity Toolkit REST error string such as
    /// `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be at least 6 characters`.
    pub fn from_rest_message(message: &str) -> Self {
        let symbol = message.split(':').next().unwrap_or_default().trim();
        let code = match symbol {
            "INVALID_PASSWORD" => "auth/wrong-password",
            "INVALID_LOGIN_CREDENTIALS" => "auth/invalid-credential",
            "EMAIL_NOT_FOUND" => "auth/user-not-found",
            "EMAIL_EXISTS" => "auth/email-already-in-use",
            "WEAK_PASSWORD" => "auth/weak-password",
            "INVALID_EMAIL" => "auth/invalid-email",
            "MISSING_PASSWORD" => "auth/missing-password",
            "USER_DISABLED" => "auth/user-disabled",
            "TOO_MANY_ATTEMPTS_TRY_LATER" => "auth/too-many-requests",
            "INVALID_IDP_RESPONSE" => "auth/invalid-credential",
            "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => "auth/operation-not-allowed",
            "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" => "auth/user-token-expired",
            "USER_NOT_FOUND" => "auth/user-not-found",
            _ => {
                return Self::new(format!("auth/{}", rest_symbol_to_code(symbol)), message);
            }
        };
        Self::new(code, message)
    }
}

// `SOME_NEW_ERROR` -> `some-new-error`; empty input -> `internal-error`
fn rest_symbol_to_code(symbol: &str) -> String {
    let code: String = symbol
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| {
            if c == '_' {
                '-'
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect();
    if code.is_empty() {
        "internal-error".to_string()
    } else {
        code
    }
}

/// Known authentication failure kinds, each with a fixed user-facing label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorKind {
    WrongPassword,
    InvalidCredential,
    UserNotFound,
    EmailAlreadyInUse,
    WeakPassword,
    InvalidEmail,
    MissingPassword,
    UserDisabled,
    TooManyRequests,
    PopupClosedByUser,
    NetworkRequestFailed,
    OperationNotAllowed,
    UserTokenExpired,
    /// Any identifier without a dedicated entry; keeps the raw code for logs
    Other(String),
}

impl AuthErrorKind {
    /// Map a provider identifier to a kind. Total over all strings.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "auth/wrong-password" => Self::WrongPassword,
            "auth/invalid-credential" | "auth/invalid-login-credentials" => {
                Self::InvalidCredential
            }
            "auth/user-not-found" => Self::UserNotFound,
            "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "auth/weak-password" => Self::WeakPassword,
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/missing-password" => Self::MissingPassword,
            "auth/user-disabled" => Self::UserDisabled,
            "auth/too-many-requests" => Self::TooManyRequests,
            "auth/popup-closed-by-user" | "auth/cancelled-popup-request" => {
                Self::PopupClosedByUser
            }
            "auth/network-request-failed" => Self::NetworkRequestFailed,
            "auth/operation-not-allowed" => Self::OperationNotAllowed,
            "auth/user-token-expired" => Self::UserTokenExpired,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WrongPassword => "Wrong password",
            Self::InvalidCredential => "Invalid credential",
            Self::UserNotFound => "User not found",
            Self::EmailAlreadyInUse => "Email already in use",
            Self::WeakPassword => "Weak password",
            Self::InvalidEmail => "Invalid email",
            Self::MissingPassword => "Missing password",
            Self::UserDisabled => "User disabled",
            Self::TooManyRequests => "Too many requests",
            Self::PopupClosedByUser => "Popup closed by user",
            Self::NetworkRequestFailed => "Network request failed",
            Self::OperationNotAllowed => "Operation not allowed",
            Self::UserTokenExpired => "User token expired",
            Self::Other(_) => "Authentication failed",
        }
    }

    /// Message shown inline on the form
    pub fn user_message(&self) -> String {
        format!("{}, Please try again.", self.label())
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}
