use crate::config::Config;
use crate::core::WindowRelay;
use crate::error::Result;
use std::sync::Arc;

/// Trait for backend watchers that can run in different modes
#[async_trait::async_trait]
pub trait BackendWatcher {
    /// Run the backend watcher until the host aborts it
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate backend watcher based on the dry_run flag
pub fn create_backend_watcher(
    config: Arc<Config>,
    relay: Arc<WindowRelay>,
    dry_run: bool,
) -> Result<Box<dyn BackendWatcher + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunBackend::new(relay)))
    } else {
        Ok(Box::new(super::polling::PollingBackend::new(
            config, relay,
        )?))
    }
}
