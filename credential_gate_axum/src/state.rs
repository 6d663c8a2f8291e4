use std::sync::Arc;

use credential_gate::{AuthSessionGate, DocumentStore, IdentityProvider};

use crate::client::ClientRegistry;
use crate::config::CG_GOOGLE_CLIENT_ID;

/// Shared state of the credential pages
#[derive(Clone)]
pub struct AppState {
    pub(crate) registry: ClientRegistry,
    pub(crate) gate: AuthSessionGate,
    pub(crate) google_client_id: Option<String>,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self::with_registry(ClientRegistry::new(identity, store))
    }

    pub fn with_registry(registry: ClientRegistry) -> Self {
        Self {
            registry,
            gate: AuthSessionGate::default(),
            google_client_id: CG_GOOGLE_CLIENT_ID.clone(),
        }
    }

    pub fn with_gate(mut self, gate: AuthSessionGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_google_client_id(mut self, client_id: Option<String>) -> Self {
        self.google_client_id = client_id;
        self
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn gate(&self) -> &AuthSessionGate {
        &self.gate
    }
}
