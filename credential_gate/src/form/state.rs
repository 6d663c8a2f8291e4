use crate::identity::AuthErrorKind;

/// UI state of one credential screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Set when an attempt starts; only a failure clears it
    pub loading: bool,
    /// Kind of the last failure, kept until the next attempt starts
    pub error: Option<AuthErrorKind>,
}

impl FormState {
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(AuthErrorKind::user_message)
    }
}
