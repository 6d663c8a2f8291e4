//! credential_gate - Login and registration flow controllers
//!
//! This crate drives the two credential screens of an application (login and
//! registration) against an external identity provider and document store.
//! The session is an explicitly owned observable value that the controllers
//! publish into and the gate reads from.

mod config;
mod form;
mod identity;
mod profile;
mod session;
mod utils;

pub use config::{
    CG_FIRESTORE_URL, CG_IDENTITY_TOOLKIT_URL, CG_IDP_REQUEST_URI, CG_PROFILE_COLLECTION,
    CG_REDIRECT_HOME, FIREBASE_API_KEY, FIREBASE_PROJECT_ID,
};

pub use form::{CredentialFormController, FormError, FormState};

pub use identity::{
    AuthErrorKind, FederatedCredential, FirebaseIdentityProvider, IdentityProvider,
    InMemoryIdentityProvider, PasswordCredential, ProviderError, ProviderOperation,
    RegistrationInput,
};

pub use profile::{
    DocumentStore, FirestoreDocumentStore, InMemoryDocumentStore, ProfileProvisioner,
    ProfileRecord, RegistrationError, StoreError,
};

pub use session::{
    AuthSessionGate, GateDecision, Session, SessionError, SessionState, SessionUser,
    SignInMethod,
};

pub use utils::{UtilError, gen_random_string};
