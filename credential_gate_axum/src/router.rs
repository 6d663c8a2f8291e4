//! Router for the credential pages

use axum::{Router, routing::get, routing::post};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::pages;
use crate::state::AppState;

fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(pages::login_page).post(pages::login_submit))
        .route("/login/google", post(pages::login_google))
        .route(
            "/register",
            get(pages::register_page).post(pages::register_submit),
        )
        .route("/register/google", post(pages::register_google))
        .route("/logout", post(pages::logout))
}

/// Create a router serving the login, registration and logout pages
///
/// The endpoints are relative to the mount point, which must match
/// `CG_ROUTE_PREFIX` so that the links rendered in the pages resolve:
/// - GET/POST {CG_ROUTE_PREFIX}/login
/// - POST {CG_ROUTE_PREFIX}/login/google
/// - GET/POST {CG_ROUTE_PREFIX}/register
/// - POST {CG_ROUTE_PREFIX}/register/google
/// - POST {CG_ROUTE_PREFIX}/logout
pub fn credential_gate_router(state: AppState) -> Router {
    routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(state)
}

/// Same as `credential_gate_router()` without the HTTP tracing middleware
pub fn credential_gate_router_no_trace(state: AppState) -> Router {
    routes().with_state(state)
}
