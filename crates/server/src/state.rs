use std::sync::Arc;

use service::{ResourceService, ResourceStore};

/// Shared handler state. The store is chosen by whoever builds the router.
#[derive(Clone)]
pub struct ServerState {
    pub resources: ResourceService,
}

impl ServerState {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { resources: ResourceService::new(store) }
    }
}
