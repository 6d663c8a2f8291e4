mod controller;
mod errors;
mod state;

pub use controller::CredentialFormController;
pub use errors::FormError;
pub use state::FormState;
