use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity attached to a signed-in session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    /// Identifier assigned by the identity provider
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// How the session was obtained
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SignInMethod {
    Password,
    /// Federated sign-in; carries the provider id, e.g. `google.com`
    Federated(String),
    Registration,
}

/// A currently authenticated identity as issued by the identity provider
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user: SessionUser,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub method: SignInMethod,
}

impl Session {
    /// Build a session whose token lifetime starts now.
    ///
    /// Returns `None` when `expires_in` seconds from now is not a
    /// representable instant.
    pub fn new(
        user: SessionUser,
        id_token: String,
        refresh_token: String,
        expires_in: i64,
        method: SignInMethod,
    ) -> Option<Self> {
        let expires_at = Utc::now().checked_add_signed(Duration::try_seconds(expires_in)?)?;
        Some(Self {
            user,
            id_token,
            refresh_token,
            expires_at,
            method,
        })
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("id_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .field("method", &self.method)
            .finish()
    }
}
