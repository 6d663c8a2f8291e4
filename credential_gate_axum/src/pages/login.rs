use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Redirect, Response},
};
use serde::Deserialize;

use credential_gate::{FederatedCredential, GateDecision};

use crate::client::{Client, ClientContext};
use crate::config::{CG_LOGIN_URL, CG_REGISTER_URL};
use crate::error::IntoResponseError;
use crate::state::AppState;

use super::{FormView, GoogleForm, finish_attempt};

#[derive(Template)]
#[template(path = "login.j2")]
struct LoginTemplate<'a> {
    error_message: Option<String>,
    loading: bool,
    csrf_token: &'a str,
    login_url: &'a str,
    google_url: String,
    register_url: &'a str,
    google_client_id: Option<&'a str>,
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    email: String,
    password: String,
    csrf_token: String,
}

fn render_login(
    app: &AppState,
    context: &ClientContext,
) -> Result<Html<String>, (StatusCode, String)> {
    let view = FormView::from_state(context.login().state());
    let template = LoginTemplate {
        error_message: view.error_message,
        loading: view.loading,
        csrf_token: context.csrf_token(),
        login_url: CG_LOGIN_URL.as_str(),
        google_url: format!("{}/google", *CG_LOGIN_URL),
        register_url: CG_REGISTER_URL.as_str(),
        google_client_id: app.google_client_id.as_deref(),
    };
    Ok(Html(template.render().into_response_error()?))
}

pub(crate) async fn login_page(
    State(app): State<AppState>,
    client: Client,
) -> Result<Response, (StatusCode, String)> {
    if let GateDecision::Redirect(to) = app.gate.check(client.context.session()) {
        return Ok(client.finish(Redirect::to(&to)));
    }
    client.context.login().release_stale_loading();
    let html = render_login(&app, &client.context)?;
    Ok(client.finish(html))
}

pub(crate) async fn login_submit(
    State(app): State<AppState>,
    client: Client,
    Form(form): Form<LoginForm>,
) -> Result<Response, (StatusCode, String)> {
    client
        .context
        .verify_csrf(&form.csrf_token)
        .into_response_error()?;
    if let GateDecision::Redirect(to) = app.gate.check(client.context.session()) {
        return Ok(client.finish(Redirect::to(&to)));
    }

    let result = client
        .context
        .login()
        .submit_with_password(&form.email, &form.password)
        .await;
    finish_attempt(&app, &client, result, render_login)
}

pub(crate) async fn login_google(
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
    let result = client.context.login().submit_with_popup(&credential).await;
    finish_attempt(&app, &client, result, render_login)
}
