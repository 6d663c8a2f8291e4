//! credential_gate_axum - Axum pages for the credential_gate flows
//!
//! Serves the login and registration screens, keeps one flow context per
//! browser behind an opaque cookie, and exposes an [`AuthUser`] extractor for
//! the host application's own pages.

mod client;
mod config;
mod error;
mod pages;
mod router;
mod session;
mod state;

pub use client::{ClientContext, ClientRegistry};
pub use config::{
    CG_CLIENT_COOKIE_MAX_AGE, CG_CLIENT_COOKIE_NAME, CG_GOOGLE_CLIENT_ID, CG_LOGIN_URL,
    CG_LOGOUT_URL, CG_REGISTER_URL, CG_ROUTE_PREFIX,
};
pub use router::{credential_gate_router, credential_gate_router_no_trace};
pub use session::AuthUser;
pub use state::AppState;

pub use credential_gate::{
    FIREBASE_API_KEY, FIREBASE_PROJECT_ID, FirebaseIdentityProvider, FirestoreDocumentStore,
    InMemoryDocumentStore, InMemoryIdentityProvider,
};
