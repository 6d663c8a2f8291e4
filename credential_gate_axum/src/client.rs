use axum::{
    RequestPartsExt,
    extract::FromRequestParts,
    response::{IntoResponse, Response},
};
use axum_extra::{TypedHeader, headers};
use chrono::{DateTime, Duration, Utc};
use http::{HeaderValue, StatusCode, header::SET_COOKIE, request::Parts};
use std::{collections::HashMap, sync::Arc};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;

use credential_gate::{
    CredentialFormController, DocumentStore, IdentityProvider, ProfileProvisioner, Session,
    SessionError, SessionState, gen_random_string,
};

use crate::config::{CG_CLIENT_COOKIE_MAX_AGE, CG_CLIENT_COOKIE_NAME};
use crate::error::IntoResponseError;
use crate::state::AppState;

/// Flow state of one browser: its session and the two screens' controllers
pub struct ClientContext {
    id: String,
    csrf_token: String,
    created_at: DateTime<Utc>,
    session: SessionState,
    login: CredentialFormController,
    register: CredentialFormController,
}

impl ClientContext {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn login(&self) -> &CredentialFormController {
        &self.login
    }

    pub fn register(&self) -> &CredentialFormController {
        &self.register
    }

    pub(crate) fn verify_csrf(&self, submitted: &str) -> Result<(), SessionError> {
        if submitted
            .as_bytes()
            .ct_eq(self.csrf_token.as_bytes())
            .into()
        {
            Ok(())
        } else {
            tracing::error!("CSRF token mismatch for client {}", self.id);
            Err(SessionError::CsrfToken("CSRF token mismatch".to_string()))
        }
    }

    /// Drop the session and return both screens to their initial state
    pub fn sign_out(&self) -> Option<Session> {
        let previous = self.session.clear();
        self.login.reset();
        self.register.reset();
        previous
    }

    fn is_expired(&self, max_age: Duration) -> bool {
        Utc::now() - self.created_at > max_age
    }
}

/// Per-browser flow contexts, keyed by the client cookie value
#[derive(Clone)]
pub struct ClientRegistry {
    identity: Arc<dyn IdentityProvider>,
    provisioner: ProfileProvisioner,
    clients: Arc<Mutex<HashMap<String, Arc<ClientContext>>>>,
    max_age: Duration,
}

impl ClientRegistry {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        let provisioner = ProfileProvisioner::new(identity.clone(), store);
        Self::with_provisioner(identity, provisioner)
    }

    pub fn with_provisioner(
        identity: Arc<dyn IdentityProvider>,
        provisioner: ProfileProvisioner,
    ) -> Self {
        Self {
            identity,
            provisioner,
            clients: Arc::new(Mutex::new(HashMap::new())),
            max_age: max_age_duration(*CG_CLIENT_COOKIE_MAX_AGE),
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub async fn get(&self, id: &str) -> Option<Arc<ClientContext>> {
        let clients = self.clients.lock().await;
        clients
            .get(id)
            .filter(|context| !context.is_expired(self.max_age))
            .cloned()
    }

    /// Register a fresh context with its own session and controllers
    pub async fn create(&self) -> Result<Arc<ClientContext>, SessionError> {
        let session = SessionState::new();
        let context = Arc::new(ClientContext {
            id: gen_random_string(32)?,
            csrf_token: gen_random_string(32)?,
            created_at: Utc::now(),
            login: CredentialFormController::new(self.identity.clone(), session.clone()),
            register: CredentialFormController::new(self.identity.clone(), session.clone())
                .with_provisioner(self.provisioner.clone()),
            session,
        });

        let mut clients = self.clients.lock().await;
        let max_age = self.max_age;
        clients.retain(|_, existing| !existing.is_expired(max_age));
        clients.insert(context.id.clone(), context.clone());
        tracing::debug!(
            "Created client context {} ({} active)",
            context.id,
            clients.len()
        );
        Ok(context)
    }

    pub async fn remove(&self, id: &str) -> Option<Arc<ClientContext>> {
        self.clients.lock().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }
}

/// Extractor resolving the caller's context, creating one when the cookie is
/// missing or stale
pub(crate) struct Client {
    pub(crate) context: Arc<ClientContext>,
    pub(crate) is_new: bool,
}

impl Client {
    /// Attach the client cookie to a response when the context is new
    pub(crate) fn finish(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.is_new {
            match client_cookie(&self.context.id) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => tracing::error!("Failed to set client cookie: {}", e),
            }
        }
        response
    }
}

pub(crate) fn client_cookie(id: &str) -> Result<HeaderValue, SessionError> {
    let cookie = format!(
        "{}={}; SameSite=Lax; Secure; HttpOnly; Path=/; Max-Age={}",
        *CG_CLIENT_COOKIE_NAME, id, *CG_CLIENT_COOKIE_MAX_AGE
    );
    cookie
        .parse()
        .map_err(|_| SessionError::Cookie("Failed to parse cookie".to_string()))
}

pub(crate) async fn client_id_from_parts(parts: &mut Parts) -> Option<String> {
    let cookies: TypedHeader<headers::Cookie> = parts.extract().await.ok()?;
    cookies
        .get(CG_CLIENT_COOKIE_NAME.as_str())
        .map(str::to_string)
}

impl FromRequestParts<AppState> for Client {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(id) = client_id_from_parts(parts).await {
            if let Some(context) = state.registry.get(&id).await {
                return Ok(Self {
                    context,
                    is_new: false,
                });
            }
            tracing::debug!("Client cookie present but context unknown or expired");
        }

        let context = state.registry.create().await.into_response_error()?;
        Ok(Self {
            context,
            is_new: true,
        })
    }
}

// Saturates for values beyond what `Duration` can hold
fn max_age_duration(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}
