//! Configuration for the credential_gate_axum pages

use std::sync::LazyLock;

/// Prefix under which the host application mounts `credential_gate_router`
/// Default: "" (mounted at the root)
pub static CG_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CG_ROUTE_PREFIX")
        .map(|prefix| prefix.trim_end_matches('/').to_string())
        .unwrap_or_default()
});

/// Default: "/login"
pub static CG_LOGIN_URL: LazyLock<String> =
    LazyLock::new(|| format!("{}/login", *CG_ROUTE_PREFIX));

/// Default: "/register"
pub static CG_REGISTER_URL: LazyLock<String> =
    LazyLock::new(|| format!("{}/register", *CG_ROUTE_PREFIX));

/// Default: "/logout"
pub static CG_LOGOUT_URL: LazyLock<String> =
    LazyLock::new(|| format!("{}/logout", *CG_ROUTE_PREFIX));

/// Name of the cookie that identifies a browser's flow context
/// Default: "__Host-CgClient"
pub static CG_CLIENT_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CG_CLIENT_COOKIE_NAME").unwrap_or_else(|_| "__Host-CgClient".to_string())
});

/// Lifetime of a flow context in seconds
/// Default: 86400
pub static CG_CLIENT_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("CG_CLIENT_COOKIE_MAX_AGE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(86400)
});

/// OAuth client id for the "Continue with Google" button; unset hides the button
pub static CG_GOOGLE_CLIENT_ID: LazyLock<Option<String>> = LazyLock::new(|| {
    std::env::var("CG_GOOGLE_CLIENT_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
});
