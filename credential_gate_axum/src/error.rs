use http::{Result as HttpResponse, StatusCode};

use credential_gate::{FormError, SessionError};

/// Helper trait for converting errors to a standard response error format
pub(crate) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

impl<T> IntoResponseError<T> for Result<T, SessionError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                SessionError::ClientNotFound => StatusCode::UNAUTHORIZED,
                SessionError::CsrfToken(_) => StatusCode::FORBIDDEN,
                SessionError::Cookie(_) => StatusCode::BAD_REQUEST,
                SessionError::Utils(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

impl<T> IntoResponseError<T> for Result<T, askama::Error> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            tracing::error!("Template rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
    }
}

/// Implementation for http::Error (used by Response::builder())
impl<T> IntoResponseError<T> for HttpResponse<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }
}

/// Status of a form re-rendered after a failed submit
pub(crate) fn form_error_status(err: &FormError) -> StatusCode {
    match err {
        FormError::AttemptInProgress => StatusCode::CONFLICT,
        FormError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
        FormError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
