mod errors;
mod firebase;
mod memory;
mod provider;
mod types;

pub use errors::{AuthErrorKind, ProviderError};
pub use firebase::FirebaseIdentityProvider;
pub use memory::{InMemoryIdentityProvider, ProviderOperation};
pub use provider::IdentityProvider;
pub use types::{FederatedCredential, PasswordCredential, RegistrationInput};
