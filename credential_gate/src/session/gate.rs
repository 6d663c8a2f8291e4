use crate::config::CG_REDIRECT_HOME;

use super::state::SessionState;
use super::types::Session;

/// What a credential screen should do for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    RenderForm,
    Redirect(String),
}

/// Keeps signed-in users away from the login and registration forms
#[derive(Debug, Clone)]
pub struct AuthSessionGate {
    home: String,
}

impl AuthSessionGate {
    pub fn new(home: impl Into<String>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn check(&self, state: &SessionState) -> GateDecision {
        self.decide(state.current().as_ref())
    }

    /// An expired session is treated the same as no session.
    pub fn decide(&self, session: Option<&Session>) -> GateDecision {
        match session {
            Some(session) if !session.is_expired() => {
                tracing::debug!(
                    "Session present for uid {}, redirecting to {}",
                    session.user.uid,
                    self.home
                );
                GateDecision::Redirect(self.home.clone())
            }
            _ => GateDecision::RenderForm,
        }
    }
}

impl Default for AuthSessionGate {
    fn default() -> Self {
        Self::new(CG_REDIRECT_HOME.as_str())
    }
}
