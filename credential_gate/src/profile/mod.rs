mod errors;
mod firestore;
mod memory;
mod provisioner;
mod store;
mod types;

pub use errors::{RegistrationError, StoreError};
pub use firestore::FirestoreDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use provisioner::ProfileProvisioner;
pub use store::DocumentStore;
pub use types::ProfileRecord;
