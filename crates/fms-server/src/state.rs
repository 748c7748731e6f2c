use std::sync::Arc;

use fms_client::FmsClient;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<FmsClient>,
}

impl AppState {
    pub fn new(client: FmsClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Directory used for uploads that do not name one.
    pub fn upload_directory(&self) -> &str {
        &self.client.config().upload_directory
    }
}
