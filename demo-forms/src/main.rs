use askama::Template;
use axum::{Router, http::StatusCode, response::Html, routing::get};
use std::sync::Arc;

use credential_gate_axum::{
    AppState, AuthUser, CG_LOGIN_URL, CG_LOGOUT_URL, CG_REGISTER_URL, FIREBASE_API_KEY,
    FirebaseIdentityProvider, FirestoreDocumentStore, InMemoryDocumentStore,
    InMemoryIdentityProvider, credential_gate_router,
};

mod server;

use server::{init_tracing, serve_http};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "password";

#[derive(Template)]
#[template(path = "index.j2")]
struct IndexTemplate<'a> {
    user: Option<AuthUser>,
    login_url: &'a str,
    register_url: &'a str,
    logout_url: &'a str,
}

async fn index(user: Option<AuthUser>) -> Result<Html<String>, (StatusCode, String)> {
    let template = IndexTemplate {
        user,
        login_url: CG_LOGIN_URL.as_str(),
        register_url: CG_REGISTER_URL.as_str(),
        logout_url: CG_LOGOUT_URL.as_str(),
    };
    let html = Html(
        template
            .render()
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
    );
    Ok(html)
}

async fn app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    if FIREBASE_API_KEY.is_some() {
        tracing::info!("Using Firebase identity provider and Firestore");
        let identity = FirebaseIdentityProvider::from_env()?;
        let store = FirestoreDocumentStore::from_env()?;
        return Ok(AppState::new(Arc::new(identity), Arc::new(store)));
    }

    tracing::warn!("FIREBASE_API_KEY is not set, using in-memory backends");
    let identity = InMemoryIdentityProvider::new();
    identity
        .add_password_account(DEMO_EMAIL, DEMO_PASSWORD, Some("Demo User"))
        .await?;
    tracing::info!("Sign in with {} / {}", DEMO_EMAIL, DEMO_PASSWORD);
    Ok(AppState::new(
        Arc::new(identity),
        Arc::new(InMemoryDocumentStore::new()),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("demo_forms");

    let state = app_state().await?;
    let app = Router::new()
        .route("/", get(index))
        .with_state(state.clone())
        .merge(credential_gate_router(state));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    serve_http(port, app).await?;
    Ok(())
}
