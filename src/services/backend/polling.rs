use crate::config::Config;
use crate::core::WindowRelay;
use crate::error::{Result, WinwatchError};
use crate::events::{WindowDescriptor, WindowSignal};
use crate::utils::desktop::{detect_session, SessionKind};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

use super::kdotool::KdotoolAdapter;
use super::r#trait::BackendWatcher;
use super::sway::SwayAdapter;
use super::wmctrl::WmctrlAdapter;
use super::xdotool::XdotoolAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkingMethod {
    Kdotool,
    Xdotool,
    Wmctrl,
    Sway,
}

impl WorkingMethod {
    fn from_mode(mode: &str) -> Option<Self> {
        match mode {
            "kdotool" => Some(Self::Kdotool),
            "xdotool" => Some(Self::Xdotool),
            "wmctrl" => Some(Self::Wmctrl),
            "sway" => Some(Self::Sway),
            _ => None,
        }
    }
}

/// Наблюдатель активного окна через опрос внешних утилит
///
/// Рабочий метод выбирается один раз при инициализации пробой доступных
/// утилит (порядок пробы зависит от обнаруженной среды), а не ветвлением на
/// каждом событии. Сигналы Activated/PropertyChanged синтезируются из
/// разницы соседних снимков; решение об уведомлении остаётся за ядром.
pub struct PollingBackend {
    config: Arc<Config>,
    relay: Arc<WindowRelay>,
    session: SessionKind,
    current_window: Arc<RwLock<Option<WindowDescriptor>>>,

    // Адаптеры утилит
    kdotool: KdotoolAdapter,
    xdotool: XdotoolAdapter,
    wmctrl: WmctrlAdapter,
    sway: SwayAdapter,
}

impl PollingBackend {
    pub fn new(config: Arc<Config>, relay: Arc<WindowRelay>) -> Result<Self> {
        info!("Инициализация PollingBackend");

        let session = detect_session();
        info!("Обнаружена среда рабочего стола: {:?}", session);

        Ok(Self {
            config,
            relay,
            session,
            current_window: Arc::new(RwLock::new(None)),
            kdotool: KdotoolAdapter::new(),
            xdotool: XdotoolAdapter::new(),
            wmctrl: WmctrlAdapter::new(),
            sway: SwayAdapter::new(),
        })
    }

    pub async fn run(self) -> Result<()> {
        info!("PollingBackend запущен для среды: {:?}", self.session);

        // Метод фиксируется здесь, до первого события
        let mut working_method = self.resolve_working_method().await?;
        info!("Опрос активен с методом: {:?}", working_method);

        let mut interval = interval(Duration::from_millis(self.config.backend.polling_interval_ms));

        loop {
            interval.tick().await;

            match self.snapshot_by_method(working_method).await {
                Ok(descriptor) => {
                    self.process_snapshot(descriptor).await;
                }
                Err(e) => {
                    warn!("Рабочий метод {:?} перестал работать: {}. Переопределяем...", working_method, e);
                    match self.detect_working_method().await {
                        Ok(new_method) => {
                            info!("Переключились на новый метод: {:?}", new_method);
                            working_method = new_method;
                        }
                        Err(_) => {
                            error!("Ни один метод не работает. Приостанавливаем опрос на 10 секунд");
                            tokio::time::sleep(Duration::from_secs(10)).await;
                        }
                    }
                }
            }
        }
    }

    /// Выбрать метод: либо закреплённый конфигурацией, либо автопроба
    async fn resolve_working_method(&self) -> Result<WorkingMethod> {
        let mode = self.config.backend.detection_mode.as_str();

        if let Some(method) = WorkingMethod::from_mode(mode) {
            self.probe_method(method).await.map_err(|e| {
                WinwatchError::ServiceUnavailable(format!(
                    "Заданный в конфигурации метод {} не работает: {}",
                    mode, e
                ))
            })?;
            return Ok(method);
        }

        self.detect_working_method().await
    }

    async fn detect_working_method(&self) -> Result<WorkingMethod> {
        info!("Определяем рабочий метод детекции окон...");

        for method in self.probe_order() {
            if self.probe_method(method).await.is_ok() {
                info!("Используем {:?}", method);
                return Ok(method);
            }
        }

        Err(WinwatchError::ServiceUnavailable(
            "Ни один метод детекции окон не работает".to_string(),
        ))
    }

    // Порядок пробы: сперва родная для среды утилита
    fn probe_order(&self) -> [WorkingMethod; 4] {
        match self.session {
            SessionKind::Kde => [
                WorkingMethod::Kdotool,
                WorkingMethod::Xdotool,
                WorkingMethod::Wmctrl,
                WorkingMethod::Sway,
            ],
            SessionKind::WaylandGeneric => [
                WorkingMethod::Sway,
                WorkingMethod::Kdotool,
                WorkingMethod::Xdotool,
                WorkingMethod::Wmctrl,
            ],
            _ => [
                WorkingMethod::Xdotool,
                WorkingMethod::Wmctrl,
                WorkingMethod::Kdotool,
                WorkingMethod::Sway,
            ],
        }
    }

    async fn probe_method(&self, method: WorkingMethod) -> Result<()> {
        match method {
            WorkingMethod::Kdotool => self.kdotool.probe().await,
            WorkingMethod::Xdotool => self.xdotool.probe().await,
            WorkingMethod::Wmctrl => self.wmctrl.probe().await,
            WorkingMethod::Sway => self.sway.probe().await,
        }
    }

    async fn snapshot_by_method(&self, method: WorkingMethod) -> Result<WindowDescriptor> {
        match method {
            WorkingMethod::Kdotool => self.kdotool.snapshot().await,
            WorkingMethod::Xdotool => self.xdotool.snapshot().await,
            WorkingMethod::Wmctrl => self.wmctrl.snapshot().await,
            WorkingMethod::Sway => self.sway.snapshot().await,
        }
    }

    /// Синтез сигнала из разницы соседних снимков
    fn classify_snapshot(&self, descriptor: &WindowDescriptor) -> Option<WindowSignal> {
        let current = self.current_window.read();
        match current.as_ref() {
            None => Some(WindowSignal::Activated),
            Some(previous) if previous.identity() != descriptor.identity() => {
                Some(WindowSignal::Activated)
            }
            Some(previous) if previous.caption != descriptor.caption => {
                Some(WindowSignal::PropertyChanged)
            }
            _ => None,
        }
    }

    async fn process_snapshot(&self, descriptor: WindowDescriptor) {
        let Some(signal) = self.classify_snapshot(&descriptor) else {
            return;
        };

        if signal == WindowSignal::Activated {
            info!("Смена активного окна на: {}", descriptor);
        } else {
            debug!("Смена заголовка активного окна: {}", descriptor);
        }

        match self.relay.handle_signal(&descriptor, signal).await {
            Ok(outcome) => {
                if outcome.new_subscription {
                    // Для опроса хук - это само отслеживание заголовка в снимках
                    debug!("Подписка создана, следим за заголовком окна {}", descriptor);
                }
            }
            Err(WinwatchError::IdentityUnavailable) => {
                // Пропускаем наблюдение целиком, без повторов
                warn!("Снимок без идентификатора окна, пропускаем: {}", descriptor);
            }
            Err(e) => {
                error!("Не удалось обработать событие окна: {}", e);
            }
        }

        // Снимок запоминается и при неудачной доставке: повторную попытку
        // сделает следующее реальное изменение, а не опрос
        *self.current_window.write() = Some(descriptor);
    }
}

impl Drop for PollingBackend {
    fn drop(&mut self) {
        info!("PollingBackend завершает работу");
    }
}

#[async_trait::async_trait]
impl BackendWatcher for PollingBackend {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run().await
    }
}
