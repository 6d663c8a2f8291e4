pub mod fixtures;
pub mod mock_firebase;

pub use blocking_provider::BlockingIdentityProvider;
pub use fixtures::*;
pub use mock_firebase::{MOCK_API_KEY, MOCK_PROJECT_ID, MockFirebase};
