mod login;
mod logout;
mod register;

use axum::response::{Html, Redirect, Response};
use http::StatusCode;
use serde::Deserialize;

use credential_gate::{FormError, Session};

use crate::client::{Client, ClientContext};
use crate::error::form_error_status;
use crate::state::AppState;

pub(crate) use login::{login_google, login_page, login_submit};
pub(crate) use logout::logout;
pub(crate) use register::{register_google, register_page, register_submit};

/// Token posted back by the Google Identity Services popup callback
#[derive(Deserialize)]
pub(crate) struct GoogleForm {
    credential: String,
    csrf_token: String,
}

type Render = fn(&AppState, &ClientContext) -> Result<Html<String>, (StatusCode, String)>;

/// Turn the outcome of a submit into a response: redirect home on success,
/// re-render the form with its updated state on failure.
fn finish_attempt(
    app: &AppState,
    client: &Client,
    result: Result<Session, FormError>,
    render: Render,
) -> Result<Response, (StatusCode, String)> {
    match result {
        Ok(session) => {
            tracing::debug!("Client {} signed in as {}", client.context.id(), session.user.uid);
            Ok(client.finish(Redirect::to(app.gate.home())))
        }
        Err(e) => {
            let status = form_error_status(&e);
            let html = render(app, &client.context)?;
            Ok(client.finish((status, html)))
        }
    }
}

/// Shared view of a form's state for the templates
struct FormView {
    error_message: Option<String>,
    loading: bool,
}

impl FormView {
    fn from_state(state: credential_gate::FormState) -> Self {
        Self {
            error_message: state.error_message(),
            loading: state.loading,
        }
    }
}
