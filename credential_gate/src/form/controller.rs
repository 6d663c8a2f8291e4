use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::watch;

use crate::identity::{
    AuthErrorKind, FederatedCredential, IdentityProvider, PasswordCredential, RegistrationInput,
};
use crate::profile::ProfileProvisioner;
use crate::session::{Session, SessionState};

use super::errors::FormError;
use super::state::FormState;

/// Drives one credential screen (login or register).
///
/// Every submit starts by atomically flipping `loading` from false to true;
/// a submit that finds an attempt in flight is rejected before the identity
/// provider is called. A failure clears `loading` and records the error kind.
/// A success publishes the session and leaves `loading` set, since the screen
/// is expected to be left once the session gate sees the new session.
///
/// `loading` left over from a success no longer blocks the form once that
/// session is gone (signed out or expired), and an attempt whose future is
/// dropped before it settles releases the form.
pub struct CredentialFormController {
    identity: Arc<dyn IdentityProvider>,
    provisioner: Option<ProfileProvisioner>,
    session: SessionState,
    state: watch::Sender<FormState>,
    // Only written inside `state`'s send closures, so it changes together with `loading`
    in_flight: AtomicBool,
}

impl CredentialFormController {
    pub fn new(identity: Arc<dyn IdentityProvider>, session: SessionState) -> Self {
        Self {
            identity,
            provisioner: None,
            session,
            state: watch::Sender::new(FormState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Enable `submit_registration` on this form
    pub fn with_provisioner(mut self, provisioner: ProfileProvisioner) -> Self {
        self.provisioner = Some(provisioner);
        self
    }

    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Return to the initial state, e.g. after sign-out
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            if self.in_flight.load(Ordering::SeqCst) {
                // keep the running attempt's `loading`
                let modified = state.error.is_some();
                state.error = None;
                return modified;
            }
            *state = FormState::default();
            true
        });
    }

    /// Clear `loading` left over from a successful attempt whose session is
    /// no longer signed in. Returns whether the form was released.
    pub fn release_stale_loading(&self) -> bool {
        let released = self.state.send_if_modified(|state| {
            if !self.is_stale(state) {
                return false;
            }
            state.loading = false;
            true
        });
        if released {
            tracing::debug!("Released form left loading by an ended session");
        }
        released
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn submit_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, FormError> {
        let attempt = self.begin_attempt()?;
        let credential = PasswordCredential::new(email, password);
        match self.identity.sign_in_with_password(&credential).await {
            Ok(session) => Ok(attempt.succeed(session)),
            Err(e) => {
                tracing::debug!("Password sign-in rejected: {} ({})", e.code, e.message);
                Err(attempt.fail(e.kind()))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn submit_with_popup(
        &self,
        credential: &FederatedCredential,
    ) -> Result<Session, FormError> {
        let attempt = self.begin_attempt()?;
        match self.identity.sign_in_with_popup(credential).await {
            Ok(session) => Ok(attempt.succeed(session)),
            Err(e) => {
                tracing::debug!("Federated sign-in rejected: {} ({})", e.code, e.message);
                Err(attempt.fail(e.kind()))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn submit_registration(
        &self,
        input: &RegistrationInput,
    ) -> Result<Session, FormError> {
        let provisioner = self.provisioner.as_ref().ok_or_else(|| {
            FormError::NotConfigured("registration is not enabled on this form".to_string())
                .log()
        })?;

        let attempt = self.begin_attempt()?;
        match provisioner.complete_registration(input).await {
            Ok(session) => Ok(attempt.succeed(session)),
            Err(e) => Err(attempt.fail(e.kind())),
        }
    }

    // `loading` set by a success whose session has since ended
    fn is_stale(&self, state: &FormState) -> bool {
        state.loading && !self.in_flight.load(Ordering::SeqCst) && !self.session.is_signed_in()
    }

    fn begin_attempt(&self) -> Result<Attempt<'_>, FormError> {
        let started = self.state.send_if_modified(|state| {
            if state.loading && !self.is_stale(state) {
                return false;
            }
            state.loading = true;
            state.error = None;
            self.in_flight.store(true, Ordering::SeqCst);
            true
        });
        if started {
            Ok(Attempt {
                controller: self,
                settled: false,
            })
        } else {
            Err(FormError::AttemptInProgress.log())
        }
    }
}

/// An attempt that holds the form's `loading` flag until it settles.
/// Dropping it unsettled (e.g. a cancelled request) releases the form.
struct Attempt<'a> {
    controller: &'a CredentialFormController,
    settled: bool,
}

impl Attempt<'_> {
    fn succeed(mut self, session: Session) -> Session {
        tracing::info!("Signed in as {}", session.user.uid);
        let controller = self.controller;
        controller.session.publish(session.clone());
        controller.state.send_if_modified(|_| {
            controller.in_flight.store(false, Ordering::SeqCst);
            false
        });
        self.settled = true;
        session
    }

    fn fail(mut self, kind: AuthErrorKind) -> FormError {
        let controller = self.controller;
        controller.state.send_modify(|state| {
            state.loading = false;
            state.error = Some(kind.clone());
            controller.in_flight.store(false, Ordering::SeqCst);
        });
        self.settled = true;
        FormError::AuthenticationFailed(kind).log()
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!("Authentication attempt dropped before it settled");
        let controller = self.controller;
        controller.state.send_modify(|state| {
            state.loading = false;
            controller.in_flight.store(false, Ordering::SeqCst);
        });
    }
}
