use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Redirect, Response},
};
use serde::Deserialize;

use credential_gate::{FederatedCredential, GateDecision, RegistrationInput};

use crate::client::{Client, ClientContext};
use crate::config::{CG_LOGIN_URL, CG_REGISTER_URL};
use crate::error::IntoResponseError;
use crate::state::AppState;

use super::{FormView, GoogleForm, finish_attempt};

#[derive(Template)]
#[template(path = "register.j2")]
struct RegisterTemplate<'a> {
    error_message: Option<String>,
    loading: bool,
    csrf_token: &'a str,
    register_url: &'a str,
    google_url: String,
    login_url: &'a str,
    google_client_id: Option<&'a str>,
}

#[derive(Deserialize)]
pub(crate) struct RegisterForm {
    display_name: String,
    email: String,
    password: String,
    csrf_token: String,
}

fn render_register(
    app: &AppState,
    context: &ClientContext,
) -> Result<Html<String>, (StatusCode, String)> {
    let view = FormView::from_state(context.register().state());
    let template = RegisterTemplate {
        error_message: view.error_message,
        loading: view.loading,
        csrf_token: context.csrf_token(),
        register_url: CG_REGISTER_URL.as_str(),
        google_url: format!("{}/google", *CG_REGISTER_URL),
        login_url: CG_LOGIN_URL.as_str(),
        google_client_id: app.google_client_id.as_deref(),
    };
    Ok(Html(template.render().into_response_error()?))
}

pub(crate) async fn register_page(
    State(app): State<AppState>,
    client: Client,
) -> Result<Response, (StatusCode, String)> {
    if let GateDecision::Redirect(to) = app.gate.check(client.context.session()) {
        return Ok(client.finish(Redirect::to(&to)));
    }
    client.context.register().release_stale_loading();
    let html = render_register(&app, &client.context)?;
    Ok(client.finish(html))
}

pub(crate) async fn register_submit(
    State(app): State<AppState>,
    client: Client,
    Form(form): Form<RegisterForm>,
) -> Result<Response, (StatusCode, String)> {
    client
        .context
        .verify_csrf(&form.csrf_token)
        .into_response_error()?;
    if let GateDecision::Redirect(to) = app.gate.check(client.context.session()) {
        return Ok(client.finish(Redirect::to(&to)));
    }

    let input = RegistrationInput::new(form.display_name, form.email, form.password);
    let result = client.context.register().submit_registration(&input).await;
    finish_attempt(&app, &client, result, render_register)
}

/// Popup sign-up shares the provider's sign-in: the account is created on
/// first use and no profile document is written.
pub(crate) async fn register_google(
    State(app): State<AppState>,
    client: Client,
    Form(form): Form<GoogleForm>,
) -> Result<Response, (StatusCode, String)> {
    client
        .context
        .verify_csrf(&form.csrf_token)
        .into_response_error()?;
    if let GateDecision::Redirect(to) = app.gate.check(client.context.session()) {
        return Ok(client.finish(Redirect::to(&to)));
    }

    let credential = FederatedCredential::google(form.credential);
    let result = client
        .context
        .register()
        .submit_with_popup(&credential)
        .await;
    finish_attempt(&app, &client, result, render_register)
}
