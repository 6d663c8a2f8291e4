use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::session::{Session, SessionUser, SignInMethod};
use crate::utils::gen_random_string;

use super::errors::ProviderError;
use super::provider::IdentityProvider;
use super::types::{FederatedCredential, PasswordCredential};

const TOKEN_LIFETIME_SECS: i64 = 3600;
const MIN_PASSWORD_LEN: usize = 6;

/// Identity provider operations, used to script failures and count calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOperation {
    SignInWithPassword,
    SignInWithPopup,
    CreateAccount,
    UpdateDisplayName,
    DeleteAccount,
}

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    email: String,
    password: Option<String>,
    display_name: Option<String>,
}

#[derive(Default)]
struct Inner {
    // keyed by lowercase email
    accounts: HashMap<String, Account>,
    // federated id token -> email
    federated: HashMap<String, String>,
    // id token -> uid
    tokens: HashMap<String, String>,
    failures: HashMap<ProviderOperation, ProviderError>,
    calls: HashMap<ProviderOperation, usize>,
    token_lifetime: Option<i64>,
}

/// In-process identity provider for tests and offline demos
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    inner: Mutex<Inner>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory identity provider");
        Self::default()
    }

    /// Pre-register a password account
    pub async fn add_password_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<String, ProviderError> {
        let mut inner = self.inner.lock().await;
        let uid = new_uid()?;
        inner.accounts.insert(
            email.to_lowercase(),
            Account {
                uid: uid.clone(),
                email: email.to_string(),
                password: Some(password.to_string()),
                display_name: display_name.map(str::to_string),
            },
        );
        Ok(uid)
    }

    /// Accept `id_token` as a federated credential for `email`
    pub async fn add_federated_token(&self, id_token: &str, email: &str) {
        let mut inner = self.inner.lock().await;
        inner
            .federated
            .insert(id_token.to_string(), email.to_lowercase());
    }

    /// Make every call to `operation` fail with `error` until cleared
    pub async fn fail_with(&self, operation: ProviderOperation, error: ProviderError) {
        self.inner.lock().await.failures.insert(operation, error);
    }

    /// Lifetime in seconds of sessions issued from now on; negative values
    /// issue already expired sessions
    pub async fn set_token_lifetime(&self, secs: i64) {
        self.inner.lock().await.token_lifetime = Some(secs);
    }

    pub async fn clear_failure(&self, operation: ProviderOperation) {
        self.inner.lock().await.failures.remove(&operation);
    }

    pub async fn call_count(&self, operation: ProviderOperation) -> usize {
        self.inner
            .lock()
            .await
            .calls
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    pub async fn has_account(&self, email: &str) -> bool {
        self.inner
            .lock()
            .await
            .accounts
            .contains_key(&email.to_lowercase())
    }

    pub async fn display_name_of(&self, email: &str) -> Option<String> {
        self.inner
            .lock()
            .await
            .accounts
            .get(&email.to_lowercase())
            .and_then(|account| account.display_name.clone())
    }
}

impl Inner {
    fn enter(&mut self, operation: ProviderOperation) -> Result<(), ProviderError> {
        *self.calls.entry(operation).or_insert(0) += 1;
        match self.failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn issue_session(
        &mut self,
        account: &Account,
        method: SignInMethod,
    ) -> Result<Session, ProviderError> {
        let id_token = gen_random_string(32).map_err(|e| ProviderError::internal(e.to_string()))?;
        let refresh_token =
            gen_random_string(32).map_err(|e| ProviderError::internal(e.to_string()))?;
        self.tokens.insert(id_token.clone(), account.uid.clone());

        Session::new(
            SessionUser {
                uid: account.uid.clone(),
                email: account.email.clone(),
                display_name: account.display_name.clone(),
            },
            id_token,
            refresh_token,
            self.token_lifetime.unwrap_or(TOKEN_LIFETIME_SECS),
            method,
        )
        .ok_or_else(|| ProviderError::internal("Invalid token lifetime"))
    }

    fn account_for_token(&mut self, id_token: &str) -> Result<&mut Account, ProviderError> {
        let uid = self
            .tokens
            .get(id_token)
            .cloned()
            .ok_or_else(|| ProviderError::new("auth/user-token-expired", "Unknown id token"))?;
        self.accounts
            .values_mut()
            .find(|account| account.uid == uid)
            .ok_or_else(|| ProviderError::new("auth/user-not-found", "Account no longer exists"))
    }
}

fn new_uid() -> Result<String, ProviderError> {
    // 21 bytes encode to the 28 characters of a Firebase uid
    gen_random_string(21).map_err(|e| ProviderError::internal(e.to_string()))
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in_with_password(
        &self,
        credential: &PasswordCredential,
    ) -> Result<Session, ProviderError> {
        let mut inner = self.inner.lock().await;
        inner.enter(ProviderOperation::SignInWithPassword)?;

        let account = inner
            .accounts
            .get(&credential.email.to_lowercase())
            .cloned()
            .ok_or_else(|| ProviderError::new("auth/user-not-found", "EMAIL_NOT_FOUND"))?;

        match &account.password {
            Some(password) if *password == credential.password => {
                inner.issue_session(&account, SignInMethod::Password)
            }
            _ => Err(ProviderError::new("auth/wrong-password", "INVALID_PASSWORD")),
        }
    }

    async fn sign_in_with_popup(
        &self,
        credential: &FederatedCredential,
    ) -> Result<Session, ProviderError> {
        let mut inner = self.inner.lock().await;
        inner.enter(ProviderOperation::SignInWithPopup)?;

        let email = inner
            .federated
            .get(&credential.id_token)
            .cloned()
            .ok_or_else(|| ProviderError::new("auth/invalid-credential", "INVALID_IDP_RESPONSE"))?;

        // First federated sign-in creates the account
        let account = match inner.accounts.get(&email).cloned() {
            Some(account) => account,
            None => {
                let account = Account {
                    uid: new_uid()?,
                    email: email.clone(),
                    password: None,
                    display_name: None,
                };
                inner.accounts.insert(email, account.clone());
                account
            }
        };

        inner.issue_session(
            &account,
            SignInMethod::Federated(credential.provider_id.clone()),
        )
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        let mut inner = self.inner.lock().await;
        inner.enter(ProviderOperation::CreateAccount)?;

        if !email.contains('@') {
            return Err(ProviderError::new("auth/invalid-email", "INVALID_EMAIL"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ProviderError::new(
                "auth/weak-password",
                "WEAK_PASSWORD : Password should be at least 6 characters",
            ));
        }
        let key = email.to_lowercase();
        if inner.accounts.contains_key(&key) {
            return Err(ProviderError::new(
                "auth/email-already-in-use",
                "EMAIL_EXISTS",
            ));
        }

        let account = Account {
            uid: new_uid()?,
            email: email.to_string(),
            password: Some(password.to_string()),
            display_name: None,
        };
        inner.accounts.insert(key, account.clone());
        inner.issue_session(&account, SignInMethod::Registration)
    }

    async fn update_display_name(
        &self,
        session: &Session,
        display_name: &str,
    ) -> Result<SessionUser, ProviderError> {
        let mut inner = self.inner.lock().await;
        inner.enter(ProviderOperation::UpdateDisplayName)?;

        let account = inner.account_for_token(&session.id_token)?;
        account.display_name = Some(display_name.to_string());

        Ok(SessionUser {
            uid: account.uid.clone(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
        })
    }

    async fn delete_account(&self, session: &Session) -> Result<(), ProviderError> {
        let mut inner = self.inner.lock().await;
        inner.enter(ProviderOperation::DeleteAccount)?;

        let uid = inner.account_for_token(&session.id_token)?.uid.clone();
        inner.accounts.retain(|_, account| account.uid != uid);
        inner.tokens.retain(|_, token_uid| *token_uid != uid);
        tracing::debug!("Deleted in-memory account {}", uid);
        Ok(())
    }
}
