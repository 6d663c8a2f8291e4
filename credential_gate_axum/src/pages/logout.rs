use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Redirect, Response},
};
use serde::Deserialize;

use crate::client::Client;
use crate::config::CG_LOGIN_URL;
use crate::error::IntoResponseError;
use crate::state::AppState;

#[derive(Deserialize)]
pub(crate) struct LogoutForm {
    csrf_token: String,
}

pub(crate) async fn logout(
    State(_app): State<AppState>,
    client: Client,
    Form(form): Form<LogoutForm>,
) -> Result<Response, (StatusCode, String)> {
    client
        .context
        .verify_csrf(&form.csrf_token)
        .into_response_error()?;

    match client.context.sign_out() {
        Some(session) => tracing::info!("Signed out {}", session.user.uid),
        None => tracing::debug!("Logout without a session"),
    }
    Ok(client.finish(Redirect::to(CG_LOGIN_URL.as_str())))
}
