use serde::{Deserialize, Serialize};
use std::fmt;

/// Email and password as submitted on the login form
#[derive(Clone, Deserialize)]
pub struct PasswordCredential {
    pub email: String,
    pub password: String,
}

impl PasswordCredential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for PasswordCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCredential")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Fields of the registration form
#[derive(Clone, Deserialize)]
pub struct RegistrationInput {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

impl RegistrationInput {
    pub fn new(
        display_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Token handed back by a federated sign-in popup (e.g. Google Identity Services)
#[derive(Clone, Serialize, Deserialize)]
pub struct FederatedCredential {
    /// Provider id understood by the identity provider, e.g. `google.com`
    pub provider_id: String,
    pub id_token: String,
}

impl FederatedCredential {
    pub fn google(id_token: impl Into<String>) -> Self {
        Self {
            provider_id: "google.com".to_string(),
            id_token: id_token.into(),
        }
    }
}

impl fmt::Debug for FederatedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FederatedCredential")
            .field("provider_id", &self.provider_id)
            .field("id_token", &"[redacted]")
            .finish()
    }
}

// Identity Toolkit REST payloads

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PasswordRequest<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IdpRequest {
    pub(super) post_body: String,
    pub(super) request_uri: String,
    pub(super) return_idp_credential: bool,
    pub(super) return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateProfileRequest<'a> {
    pub(super) id_token: &'a str,
    pub(super) display_name: &'a str,
    pub(super) return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeleteAccountRequest<'a> {
    pub(super) id_token: &'a str,
}

/// Token-bearing response shared by sign-in, sign-up and IdP sign-in
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TokenResponse {
    pub(super) local_id: String,
    #[serde(default)]
    pub(super) email: String,
    #[serde(default)]
    pub(super) display_name: Option<String>,
    pub(super) id_token: String,
    pub(super) refresh_token: String,
    /// Seconds, sent as a decimal string
    pub(super) expires_in: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateProfileResponse {
    pub(super) local_id: String,
    #[serde(default)]
    pub(super) email: String,
    #[serde(default)]
    pub(super) display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RestErrorBody {
    pub(super) error: RestErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(super) struct RestErrorDetail {
    #[serde(default)]
    pub(super) message: String,
}
