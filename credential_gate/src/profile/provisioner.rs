use std::sync::Arc;

use crate::config::CG_PROFILE_COLLECTION;
use crate::identity::{IdentityProvider, RegistrationInput};
use crate::session::{Session, SessionUser};

use super::errors::{RegistrationError, StoreError};
use super::store::DocumentStore;
use super::types::ProfileRecord;

/// Creates an account and its profile document as one unit.
///
/// If a step after account creation fails, the new account is deleted again
/// so that no account exists without a profile. A failed profile write may
/// still have landed, so that document is deleted first.
#[derive(Clone)]
pub struct ProfileProvisioner {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl ProfileProvisioner {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            identity,
            store,
            collection: CG_PROFILE_COLLECTION.to_string(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[tracing::instrument(skip(self), fields(email = %input.email))]
    pub async fn complete_registration(
        &self,
        input: &RegistrationInput,
    ) -> Result<Session, RegistrationError> {
        let session = self
            .identity
            .create_account(&input.email, &input.password)
            .await?;
        tracing::info!("Created account {}", session.user.uid);

        match self.provision(&session, input).await {
            Ok(user) => Ok(Session { user, ..session }),
            Err(err) => {
                let wrote_profile = matches!(err, RegistrationError::Store(_));
                self.compensate(&session, wrote_profile).await;
                Err(err)
            }
        }
    }

    async fn provision(
        &self,
        session: &Session,
        input: &RegistrationInput,
    ) -> Result<SessionUser, RegistrationError> {
        let user = self
            .identity
            .update_display_name(session, &input.display_name)
            .await?;

        let record = ProfileRecord {
            uid: session.user.uid.clone(),
            display_name: input.display_name.clone(),
            email: input.email.clone(),
        };
        let value = serde_json::to_value(&record).map_err(StoreError::from)?;
        self.store
            .write_document(&self.collection, &record.uid, &value, &session.id_token)
            .await?;
        tracing::debug!("Wrote profile {}/{}", self.collection, record.uid);

        Ok(user)
    }

    async fn compensate(&self, session: &Session, wrote_profile: bool) {
        tracing::warn!(
            "Rolling back account {} after failed provisioning",
            session.user.uid
        );
        if wrote_profile {
            // The token is still valid, so this must run before the account goes away
            if let Err(e) = self
                .store
                .delete_document(&self.collection, &session.user.uid, &session.id_token)
                .await
            {
                tracing::warn!(
                    "Failed to delete profile {}/{} during rollback: {}",
                    self.collection,
                    session.user.uid,
                    e
                );
            }
        }
        if let Err(e) = self.identity.delete_account(session).await {
            tracing::error!(
                "Failed to delete account {} during rollback: {}",
                session.user.uid,
                e
            );
        }
    }
}
