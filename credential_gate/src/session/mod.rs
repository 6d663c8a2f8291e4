mod errors;
mod gate;
mod state;
mod types;

pub use errors::SessionError;
pub use gate::{AuthSessionGate, GateDecision};
pub use state::SessionState;
pub use types::{Session, SessionUser, SignInMethod};
