//! Central configuration for the credential_gate crate

use std::{env, sync::LazyLock};

const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_PROFILE_COLLECTION: &str = "users";
const DEFAULT_REDIRECT_HOME: &str = "/";
const DEFAULT_IDP_REQUEST_URI: &str = "http://localhost";

/// Web API key of the Firebase project. Absent means no REST backend is configured.
pub static FIREBASE_API_KEY: LazyLock<Option<String>> =
    LazyLock::new(|| non_empty(env::var("FIREBASE_API_KEY").ok()));

/// Firebase project id used to address Firestore documents.
pub static FIREBASE_PROJECT_ID: LazyLock<Option<String>> =
    LazyLock::new(|| non_empty(env::var("FIREBASE_PROJECT_ID").ok()));

/// Base URL of the Identity Toolkit REST API
/// Default: "https://identitytoolkit.googleapis.com/v1"
pub static CG_IDENTITY_TOOLKIT_URL: LazyLock<String> =
    LazyLock::new(|| env_setting("CG_IDENTITY_TOOLKIT_URL", DEFAULT_IDENTITY_TOOLKIT_URL));

/// Base URL of the Firestore REST API
/// Default: "https://firestore.googleapis.com/v1"
pub static CG_FIRESTORE_URL: LazyLock<String> =
    LazyLock::new(|| env_setting("CG_FIRESTORE_URL", DEFAULT_FIRESTORE_URL));

/// Collection that receives profile documents at registration time
/// Default: "users"
pub static CG_PROFILE_COLLECTION: LazyLock<String> =
    LazyLock::new(|| env_setting("CG_PROFILE_COLLECTION", DEFAULT_PROFILE_COLLECTION));

/// Where the session gate sends users who are already signed in
/// Default: "/"
pub static CG_REDIRECT_HOME: LazyLock<String> =
    LazyLock::new(|| env_setting("CG_REDIRECT_HOME", DEFAULT_REDIRECT_HOME));

/// `requestUri` sent with federated sign-in requests
/// Default: "http://localhost"
pub static CG_IDP_REQUEST_URI: LazyLock<String> =
    LazyLock::new(|| env_setting("CG_IDP_REQUEST_URI", DEFAULT_IDP_REQUEST_URI));

fn env_setting(name: &str, default: &str) -> String {
    setting_or_default(env::var(name).ok(), default)
}

// Blank values count as unset
fn setting_or_default(env_value: Option<String>, default: &str) -> String {
    non_empty(env_value).unwrap_or_else(|| default.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
