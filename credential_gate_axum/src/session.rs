use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Redirect, Response},
};
use http::{Method, StatusCode, request::Parts};

use credential_gate::SessionUser;

use crate::client::client_id_from_parts;
use crate::config::CG_LOGIN_URL;
use crate::state::AppState;

pub struct AuthRedirect {
    method: Method,
}

impl AuthRedirect {
    fn new(method: Method) -> Self {
        Self { method }
    }
}

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        if self.method == Method::GET {
            tracing::debug!("Redirecting to {}", CG_LOGIN_URL.as_str());
            Redirect::temporary(CG_LOGIN_URL.as_str()).into_response()
        } else {
            tracing::debug!("Unauthorized");
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}

/// Signed-in user, available as an Axum extractor
///
/// Anonymous GET requests are redirected to the login page; other methods
/// get 401. Use `Option<AuthUser>` to handle both cases in the handler.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get};
/// use credential_gate_axum::{AppState, AuthUser};
///
/// async fn home(user: AuthUser) -> String {
///     format!("Hello, {}!", user.email)
/// }
///
/// fn app(state: AppState) -> Router {
///     Router::new().route("/", get(home)).with_state(state)
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Token to embed in forms posted back to the credential pages
    pub csrf_token: String,
}

impl AuthUser {
    fn new(user: SessionUser, csrf_token: &str) -> Self {
        Self {
            uid: user.uid,
            email: user.email,
            display_name: user.display_name,
            csrf_token: csrf_token.to_string(),
        }
    }

    /// Display name when set, email otherwise
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let method = parts.method.clone();
        let client_id = client_id_from_parts(parts).await.ok_or_else(|| {
            tracing::debug!("No client cookie");
            AuthRedirect::new(method.clone())
        })?;

        let context = state.registry.get(&client_id).await.ok_or_else(|| {
            tracing::debug!("Unknown client {}", client_id);
            AuthRedirect::new(method.clone())
        })?;

        match context.session().current() {
            Some(session) if !session.is_expired() => {
                Ok(AuthUser::new(session.user, context.csrf_token()))
            }
            _ => Err(AuthRedirect::new(method)),
        }
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AuthRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let result: Result<Self, Self::Rejection> =
            <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await;
        Ok(result.ok())
    }
}
