use serde::{Deserialize, Serialize};
use std::fmt;

/// Стабильный идентификатор окна.
///
/// Выводится только из платформенного handle (id окна в X11, UUID в KWin,
/// id контейнера в sway). Никогда не строится из заголовка: заголовки мутируют.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowIdentity(String);

impl WindowIdentity {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Сырой снимок окна от платформенного наблюдателя
///
/// Поля опциональны: разные бэкенды отдают разный набор атрибутов
/// (например, композитор без доступа к pid). Снимок неизменяем и живёт
/// только на время одного вызова ядра.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowDescriptor {
    pub handle: Option<String>,
    pub caption: Option<String>,
    pub resource_class: Option<String>,
    pub resource_name: Option<String>,
    pub pid: Option<i32>,
    pub is_active: bool,
}

impl WindowDescriptor {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: Some(handle.into()),
            caption: None,
            resource_class: None,
            resource_name: None,
            pid: None,
            is_active: false,
        }
    }

    /// Дескриптор без идентификатора (бэкенд не смог получить handle)
    pub fn anonymous() -> Self {
        Self {
            handle: None,
            caption: None,
            resource_class: None,
            resource_name: None,
            pid: None,
            is_active: false,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_resource_class(mut self, class: impl Into<String>) -> Self {
        self.resource_class = Some(class.into());
        self
    }

    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = Some(name.into());
        self
    }

    pub fn with_pid(mut self, pid: i32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Разрешить стабильный идентификатор окна.
    ///
    /// Пустой handle считается отсутствующим: по нему нельзя дедуплицировать.
    pub fn identity(&self) -> Option<WindowIdentity> {
        match self.handle.as_deref() {
            Some(handle) if !handle.is_empty() => Some(WindowIdentity::new(handle)),
            _ => None,
        }
    }
}

impl fmt::Display for WindowDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let caption = self.caption.as_deref().unwrap_or("<без заголовка>");
        match self.handle.as_deref() {
            Some(handle) => write!(f, "\"{}\" [{}]", caption, handle),
            None => write!(f, "\"{}\" [без id]", caption),
        }
    }
}

/// Дискриминатор входящего сигнала от платформенного наблюдателя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowSignal {
    /// Окно получило фокус
    Activated,
    /// У окна изменилось свойство (заголовок и т.п.)
    PropertyChanged,
}
