use async_trait::async_trait;

use crate::session::{Session, SessionUser};

use super::errors::ProviderError;
use super::types::{FederatedCredential, PasswordCredential};

/// External identity provider client
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn sign_in_with_password(
        &self,
        credential: &PasswordCredential,
    ) -> Result<Session, ProviderError>;

    /// Exchange the token produced by a federated popup for a session.
    async fn sign_in_with_popup(
        &self,
        credential: &FederatedCredential,
    ) -> Result<Session, ProviderError>;

    async fn create_account(&self, email: &str, password: &str)
    -> Result<Session, ProviderError>;

    /// Set the display name on the provider's record of the signed-in user.
    async fn update_display_name(
        &self,
        session: &Session,
        display_name: &str,
    ) -> Result<SessionUser, ProviderError>;

    /// Remove the signed-in user's account.
    async fn delete_account(&self, session: &Session) -> Result<(), ProviderError>;
}
