use crate::error::{Result, WinwatchError};
use crate::events::CanonicalEvent;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use zbus::message::{Flags, Message};
use zbus::Connection;

/// Фиксированный адрес потребителя на сессионной шине.
/// Известен на этапе сборки и намеренно не выносится в конфигурацию.
const NOTIFY_SERVICE: &str = "com.github.winwatch.tracker";
const NOTIFY_PATH: &str = "/com/github/winwatch/tracker";
const NOTIFY_INTERFACE: &str = "com.github.winwatch.tracker";
const NOTIFY_METHOD: &str = "NotifyActiveWindow";

/// Trait for notification sinks the relay can deliver to
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one canonical event. Must not retain the event or retry on its own.
    async fn deliver(&self, event: &CanonicalEvent) -> Result<()>;
}

/// Доставка через D-Bus методом NotifyActiveWindow
///
/// Вызов отправляется с флагом NoReplyExpected: подтверждение не ожидается,
/// отсутствие слушателя на шине не считается ошибкой ядра. Неудача отправки
/// всплывает к вызывающему и не трогает ни подписки, ни реестр.
pub struct DbusNotificationSink {
    connection: Connection,
}

impl DbusNotificationSink {
    pub async fn new() -> Result<Self> {
        let connection = Connection::session().await?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl NotificationSink for DbusNotificationSink {
    async fn deliver(&self, event: &CanonicalEvent) -> Result<()> {
        // На проводе pid - обычный i32: отсутствующее значение кодируем нулём
        let body = (
            event.caption.as_str(),
            event.resource_class.as_str(),
            event.resource_name.as_str(),
            event.pid.unwrap_or(0),
        );

        let message = Message::method_call(NOTIFY_PATH, NOTIFY_METHOD)
            .and_then(|builder| builder.destination(NOTIFY_SERVICE))
            .and_then(|builder| builder.interface(NOTIFY_INTERFACE))
            .and_then(|builder| builder.with_flags(Flags::NoReplyExpected))
            .and_then(|builder| builder.build(&body))
            .map_err(|e| WinwatchError::Delivery(format!("не удалось собрать сообщение: {e}")))?;

        self.connection
            .send(&message)
            .await
            .map_err(|e| WinwatchError::Delivery(format!("отправка на шину не удалась: {e}")))?;

        debug!("Отправлено {NOTIFY_METHOD}: {event}");
        Ok(())
    }
}

/// Приёмник для dry-run режима: пишет событие в лог вместо шины
pub struct DryRunSink;

#[async_trait]
impl NotificationSink for DryRunSink {
    async fn deliver(&self, event: &CanonicalEvent) -> Result<()> {
        info!("Dry-run: {NOTIFY_METHOD}({event}, pid={:?})", event.pid);
        Ok(())
    }
}

/// Factory function to create an appropriate sink based on the dry_run flag
pub async fn create_notification_sink(dry_run: bool) -> Result<Arc<dyn NotificationSink>> {
    if dry_run {
        Ok(Arc::new(DryRunSink))
    } else {
        Ok(Arc::new(DbusNotificationSink::new().await?))
    }
}
