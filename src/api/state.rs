//! API shared state

use crate::actors::registry::RegistryHandle;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Handle to the registry actor
    pub registry: RegistryHandle,
}

impl ApiState {
    pub fn new(registry: RegistryHandle) -> Self {
        Self { registry }
    }
}
