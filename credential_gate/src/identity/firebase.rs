use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::config::{CG_IDENTITY_TOOLKIT_URL, CG_IDP_REQUEST_URI, FIREBASE_API_KEY};
use crate::session::{Session, SessionUser, SignInMethod};
use crate::utils::get_client;

use super::errors::ProviderError;
use super::provider::IdentityProvider;
use super::types::{
    DeleteAccountRequest, FederatedCredential, IdpRequest, PasswordCredential, PasswordRequest,
    RestErrorBody, TokenResponse, UpdateProfileRequest, UpdateProfileResponse,
};

/// Identity provider backed by the Firebase Identity Toolkit REST API
#[derive(Debug, Clone)]
pub struct FirebaseIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    request_uri: String,
}

impl FirebaseIdentityProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = get_client().map_err(|e| ProviderError::internal(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            request_uri: CG_IDP_REQUEST_URI.to_string(),
        })
    }

    /// Build from `FIREBASE_API_KEY` and `CG_IDENTITY_TOOLKIT_URL`
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = FIREBASE_API_KEY.as_ref().ok_or_else(|| {
            ProviderError::new("auth/invalid-api-key", "FIREBASE_API_KEY is not set")
        })?;
        Self::new(CG_IDENTITY_TOOLKIT_URL.as_str(), api_key.as_str())
    }

    pub fn with_request_uri(mut self, request_uri: impl Into<String>) -> Self {
        self.request_uri = request_uri.into();
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.base_url,
            method,
            urlencoding::encode(&self.api_key)
        )
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::network(e.to_string()))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!("accounts:{} failed with {}: {}", method, status, response_body);
            return Err(match serde_json::from_str::<RestErrorBody>(&response_body) {
                Ok(parsed) => ProviderError::from_rest_message(&parsed.error.message),
                Err(_) => ProviderError::internal(format!("HTTP {status}")),
            });
        }

        serde_json::from_str(&response_body)
            .map_err(|e| ProviderError::internal(format!("Failed to deserialize response: {e}")))
    }
}

fn session_from_token_response(
    response: TokenResponse,
    method: SignInMethod,
) -> Result<Session, ProviderError> {
    let expires_in = response
        .expires_in
        .trim()
        .parse::<i64>()
        .map_err(|e| ProviderError::internal(format!("Invalid expiresIn: {e}")))?;

    let user = SessionUser {
        uid: response.local_id,
        email: response.email,
        display_name: response.display_name.filter(|name| !name.is_empty()),
    };

    Session::new(
        user,
        response.id_token,
        response.refresh_token,
        expires_in,
        method,
    )
    .ok_or_else(|| ProviderError::internal(format!("Invalid expiresIn: {expires_in}")))
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    #[tracing::instrument(skip_all, fields(email = %credential.email))]
    async fn sign_in_with_password(
        &self,
        credential: &PasswordCredential,
    ) -> Result<Session, ProviderError> {
        let request = PasswordRequest {
            email: &credential.email,
            password: &credential.password,
            return_secure_token: true,
        };
        let response: TokenResponse = self.call("signInWithPassword", &request).await?;
        session_from_token_response(response, SignInMethod::Password)
    }

    #[tracing::instrument(skip_all, fields(provider_id = %credential.provider_id))]
    async fn sign_in_with_popup(
        &self,
        credential: &FederatedCredential,
    ) -> Result<Session, ProviderError> {
        let request = IdpRequest {
            post_body: format!(
                "id_token={}&providerId={}",
                urlencoding::encode(&credential.id_token),
                urlencoding::encode(&credential.provider_id)
            ),
            request_uri: self.request_uri.clone(),
            return_idp_credential: true,
            return_secure_token: true,
        };
        let response: TokenResponse = self.call("signInWithIdp", &request).await?;
        session_from_token_response(
            response,
            SignInMethod::Federated(credential.provider_id.clone()),
        )
    }

    #[tracing::instrument(skip(self, password))]
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: TokenResponse = self.call("signUp", &request).await?;
        session_from_token_response(response, SignInMethod::Registration)
    }

    #[tracing::instrument(skip(self, session), fields(uid = %session.user.uid))]
    async fn update_display_name(
        &self,
        session: &Session,
        display_name: &str,
    ) -> Result<SessionUser, ProviderError> {
        let request = UpdateProfileRequest {
            id_token: &session.id_token,
            display_name,
            return_secure_token: false,
        };
        let response: UpdateProfileResponse = self.call("update", &request).await?;
        tracing::debug!("Updated profile: {:?}", response);

        Ok(SessionUser {
            uid: response.local_id,
            email: response.email,
            display_name: response.display_name.filter(|name| !name.is_empty()),
        })
    }

    #[tracing::instrument(skip(self, session), fields(uid = %session.user.uid))]
    async fn delete_account(&self, session: &Session) -> Result<(), ProviderError> {
        let request = DeleteAccountRequest {
            id_token: &session.id_token,
        };
        let _: serde_json::Value = self.call("delete", &request).await?;
        Ok(())
    }
}
