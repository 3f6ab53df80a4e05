use crate::core::filter::should_notify;
use crate::core::normalizer::normalize;
use crate::core::registry::IdentityRegistry;
use crate::error::Result;
use crate::events::{WindowDescriptor, WindowSignal};
use crate::services::sink::NotificationSink;
use std::sync::Arc;
use tracing::{debug, trace};

/// Итог обработки одного сигнала
///
/// `new_subscription` сообщает бэкенд-адаптеру, что платформенный хук на
/// смену заголовка нужно подключить именно сейчас (и только один раз).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalOutcome {
    pub new_subscription: bool,
    pub delivered: bool,
}

/// Ядро нормализации и доставки: реестр → фильтр → нормализатор → приёмник
///
/// Каждый платформенный наблюдатель приводит свои нативные события к
/// контракту `handle_signal` и дальше ни о чём не заботится.
pub struct WindowRelay {
    registry: IdentityRegistry,
    sink: Arc<dyn NotificationSink>,
}

impl WindowRelay {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            registry: IdentityRegistry::new(),
            sink,
        }
    }

    /// Обработать один сигнал наблюдателя.
    ///
    /// Ошибка доставки всплывает к вызывающему, но подписка к этому моменту
    /// уже зафиксирована и не откатывается: следующее легитимное событие
    /// окна попробует доставку заново и ни на какое другое окно не влияет.
    pub async fn handle_signal(
        &self,
        descriptor: &WindowDescriptor,
        signal: WindowSignal,
    ) -> Result<SignalOutcome> {
        let new_subscription = self.registry.observe(descriptor)?;

        if !should_notify(descriptor, new_subscription) {
            trace!("Подавляем {:?} для {}", signal, descriptor);
            return Ok(SignalOutcome {
                new_subscription,
                delivered: false,
            });
        }

        let event = normalize(descriptor);
        debug!("Доставляем {:?} для {}: {}", signal, descriptor, event);
        self.sink.deliver(&event).await?;

        Ok(SignalOutcome {
            new_subscription,
            delivered: true,
        })
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Сброс состояния для изоляции тестов
    pub fn reset(&self) {
        self.registry.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WinwatchError;
    use crate::events::CanonicalEvent;
    use crate::winwatch_error;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Приёмник-магнитофон: запоминает всё, что ему доставили
    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<CanonicalEvent>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn deliver(&self, event: &CanonicalEvent) -> Result<()> {
            self.delivered.lock().push(event.clone());
            Ok(())
        }
    }

    /// Приёмник, у которого транспорт всегда лежит
    struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn deliver(&self, _event: &CanonicalEvent) -> Result<()> {
            Err(winwatch_error!(delivery, "шина недоступна"))
        }
    }

    fn relay_with_recorder() -> (WindowRelay, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (WindowRelay::new(sink.clone()), sink)
    }

    #[tokio::test]
    async fn test_scenario_first_sight_of_active_window() {
        let (relay, sink) = relay_with_recorder();
        let w1 = WindowDescriptor::new("w1").with_caption("Inbox").active(true);

        let outcome = relay.handle_signal(&w1, WindowSignal::Activated).await.unwrap();
        assert!(outcome.new_subscription);
        assert!(outcome.delivered);

        let delivered = sink.delivered.lock();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].caption, "Inbox");
        assert_eq!(delivered[0].resource_class, "");
        assert_eq!(delivered[0].resource_name, "");
        assert_eq!(delivered[0].pid, None);
    }

    #[tokio::test]
    async fn test_scenario_inactive_caption_change_suppressed() {
        let (relay, sink) = relay_with_recorder();
        let w1 = WindowDescriptor::new("w1").with_caption("Inbox").active(true);
        relay.handle_signal(&w1, WindowSignal::Activated).await.unwrap();

        // Окно потеряло фокус, заголовок сменился на "Drafts"
        let renamed = WindowDescriptor::new("w1").with_caption("Drafts").active(false);
        let outcome = relay
            .handle_signal(&renamed, WindowSignal::PropertyChanged)
            .await
            .unwrap();

        assert!(!outcome.new_subscription);
        assert!(!outcome.delivered);
        assert_eq!(sink.delivered.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_scenario_reactivation_reports_current_caption() {
        let (relay, sink) = relay_with_recorder();
        let w1 = WindowDescriptor::new("w1").with_caption("Inbox").active(true);
        relay.handle_signal(&w1, WindowSignal::Activated).await.unwrap();

        let hidden = WindowDescriptor::new("w1").with_caption("Drafts").active(false);
        relay
            .handle_signal(&hidden, WindowSignal::PropertyChanged)
            .await
            .unwrap();

        // Окно снова в фокусе: доставляется текущее состояние
        let reactivated = WindowDescriptor::new("w1").with_caption("Drafts").active(true);
        let outcome = relay
            .handle_signal(&reactivated, WindowSignal::Activated)
            .await
            .unwrap();

        assert!(outcome.delivered);
        let delivered = sink.delivered.lock();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[1].caption, "Drafts");
    }

    #[tokio::test]
    async fn test_scenario_second_window_is_independent() {
        let (relay, sink) = relay_with_recorder();
        let w1 = WindowDescriptor::new("w1").with_caption("Inbox").active(true);
        relay.handle_signal(&w1, WindowSignal::Activated).await.unwrap();

        let w2 = WindowDescriptor::new("w2").with_caption("Terminal").active(true);
        let outcome = relay.handle_signal(&w2, WindowSignal::Activated).await.unwrap();
        assert!(outcome.new_subscription);
        assert!(outcome.delivered);

        // Подписка W1 не тронута, W2 доставлен ровно один раз
        assert_eq!(relay.registry().len(), 2);
        let delivered = sink.delivered.lock();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[1].caption, "Terminal");
    }

    #[tokio::test]
    async fn test_scenario_missing_identity() {
        let (relay, sink) = relay_with_recorder();
        let ghost = WindowDescriptor::anonymous().with_caption("???").active(true);

        let result = relay.handle_signal(&ghost, WindowSignal::Activated).await;
        assert!(matches!(result, Err(WinwatchError::IdentityUnavailable)));

        // Ни подписок, ни доставок
        assert!(relay.registry().is_empty());
        assert!(sink.delivered.lock().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_keeps_subscription() {
        let relay = WindowRelay::new(Arc::new(FailingSink));
        let w1 = WindowDescriptor::new("w1").with_caption("Inbox").active(true);

        let result = relay.handle_signal(&w1, WindowSignal::Activated).await;
        assert!(matches!(result, Err(WinwatchError::Delivery(_))));

        // Подписка уже зафиксирована и не откатилась
        assert_eq!(relay.registry().len(), 1);

        // Следующее событие того же окна остаётся легитимным и не дублирует подписку
        let again = WindowDescriptor::new("w1").with_caption("Inbox").active(true);
        let result = relay.handle_signal(&again, WindowSignal::Activated).await;
        assert!(matches!(result, Err(WinwatchError::Delivery(_))));
        assert_eq!(relay.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_for_test_isolation() {
        let (relay, sink) = relay_with_recorder();
        let w1 = WindowDescriptor::new("w1").with_caption("Inbox").active(true);
        relay.handle_signal(&w1, WindowSignal::Activated).await.unwrap();

        relay.reset();
        assert!(relay.registry().is_empty());

        // После сброса то же окно снова даёт базовую запись
        let outcome = relay.handle_signal(&w1, WindowSignal::Activated).await.unwrap();
        assert!(outcome.new_subscription);
        assert_eq!(sink.delivered.lock().len(), 2);
    }
}
