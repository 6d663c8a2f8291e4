use std::sync::Arc;
use tokio::sync::watch;

use super::types::Session;

/// Owned, observable "current user" value.
///
/// Controllers publish into it after a successful sign-in; gates and the host
/// application read or subscribe to it. Clones share the same underlying value.
#[derive(Clone, Debug)]
pub struct SessionState {
    sender: Arc<watch::Sender<Option<Session>>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            sender: Arc::new(watch::Sender::new(None)),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.sender.borrow().clone()
    }

    /// True when a session is present and its token has not expired
    pub fn is_signed_in(&self) -> bool {
        self.sender
            .borrow()
            .as_ref()
            .is_some_and(|session| !session.is_expired())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sender.subscribe()
    }

    pub fn publish(&self, session: Session) {
        tracing::debug!("Publishing session for uid: {}", session.user.uid);
        self.sender.send_replace(Some(session));
    }

    /// Sign out. Returns the session that was present, if any.
    pub fn clear(&self) -> Option<Session> {
        let previous = self.sender.send_replace(None);
        if let Some(session) = &previous {
            tracing::debug!("Cleared session for uid: {}", session.user.uid);
        }
        previous
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
