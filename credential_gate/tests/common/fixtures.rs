use std::sync::Arc;

use credential_gate::{
    CredentialFormController, FirebaseIdentityProvider, FirestoreDocumentStore,
    InMemoryDocumentStore, InMemoryIdentityProvider, ProfileProvisioner, SessionState,
};

use super::mock_firebase::{MOCK_API_KEY, MOCK_PROJECT_ID, MockFirebase};

pub const ALICE_EMAIL: &str = "alice@example.com";
pub const ALICE_PASSWORD: &str = "secret123";

/// Login and register controllers sharing one session, backed by in-memory services
pub struct Screens {
    pub identity: Arc<InMemoryIdentityProvider>,
    pub store: Arc<InMemoryDocumentStore>,
    pub session: SessionState,
    pub login: CredentialFormController,
    pub register: CredentialFormController,
}

pub async fn in_memory_screens() -> Screens {
    let identity = Arc::new(InMemoryIdentityProvider::new());
    identity
        .add_password_account(ALICE_EMAIL, ALICE_PASSWORD, Some("Alice"))
        .await
        .expect("Failed to add account");
    let store = Arc::new(InMemoryDocumentStore::new());
    let session = SessionState::new();

    let login = CredentialFormController::new(identity.clone(), session.clone());
    let register = CredentialFormController::new(identity.clone(), session.clone())
        .with_provisioner(ProfileProvisioner::new(identity.clone(), store.clone()));

    Screens {
        identity,
        store,
        session,
        login,
        register,
    }
}

/// REST backends pointed at a fresh mock server
pub async fn firebase_backends() -> (MockFirebase, FirebaseIdentityProvider, FirestoreDocumentStore) {
    let mock = MockFirebase::start().await;
    let identity = FirebaseIdentityProvider::new(mock.identity_url(), MOCK_API_KEY)
        .expect("Failed to build identity provider");
    let store = FirestoreDocumentStore::new(mock.firestore_url(), MOCK_PROJECT_ID)
        .expect("Failed to build document store");
    (mock, identity, store)
}
