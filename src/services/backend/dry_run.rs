use crate::core::WindowRelay;
use crate::error::Result;
use crate::events::{WindowDescriptor, WindowSignal};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use super::r#trait::BackendWatcher;

/// Эмуляция наблюдателя для dry-run режима
///
/// Прогоняет через ядро фиксированный сценарий: активации разных окон,
/// смену заголовка и повторный снимок без изменений, чтобы были видны и
/// доставки, и подавление дубликатов.
pub struct DryRunBackend {
    relay: Arc<WindowRelay>,
}

impl DryRunBackend {
    pub fn new(relay: Arc<WindowRelay>) -> Self {
        Self { relay }
    }

    fn scripted_steps() -> Vec<(WindowDescriptor, WindowSignal)> {
        vec![
            (
                WindowDescriptor::new("dry-1")
                    .with_caption("Terminal - dry_run")
                    .with_resource_class("DryRun")
                    .active(true),
                WindowSignal::Activated,
            ),
            (
                WindowDescriptor::new("dry-2")
                    .with_caption("Browser - dry_run")
                    .with_resource_class("DryRun")
                    .active(true),
                WindowSignal::Activated,
            ),
            (
                // Заголовок сменился, пока окно в фокусе - доставляется
                WindowDescriptor::new("dry-2")
                    .with_caption("Browser - new tab")
                    .with_resource_class("DryRun")
                    .active(true),
                WindowSignal::PropertyChanged,
            ),
            (
                // Смена свойства у несфокусированного окна - подавляется
                WindowDescriptor::new("dry-1")
                    .with_caption("Terminal - idle")
                    .with_resource_class("DryRun")
                    .active(false),
                WindowSignal::PropertyChanged,
            ),
            (
                WindowDescriptor::new("dry-1")
                    .with_caption("Terminal - idle")
                    .with_resource_class("DryRun")
                    .active(true),
                WindowSignal::Activated,
            ),
        ]
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Dry-run режим - BackendWatcher работает в режиме эмуляции");

        let steps = Self::scripted_steps();
        let mut step_index = 0;
        let mut interval = interval(Duration::from_secs(10));

        loop {
            interval.tick().await;

            let (descriptor, signal) = &steps[step_index];
            info!("Dry-run: эмулируем {:?} для {}", signal, descriptor);

            match self.relay.handle_signal(descriptor, *signal).await {
                Ok(outcome) => {
                    info!(
                        "Dry-run: подписка={}, доставлено={}",
                        outcome.new_subscription, outcome.delivered
                    );
                }
                Err(e) => warn!("Dry-run: ядро вернуло ошибку: {}", e),
            }

            step_index = (step_index + 1) % steps.len();
        }
    }
}

#[async_trait::async_trait]
impl BackendWatcher for DryRunBackend {
    async fn run(mut self: Box<Self>) -> Result<()> {
        (*self).run().await
    }
}
