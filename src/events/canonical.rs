use serde::{Deserialize, Serialize};
use std::fmt;

/// Каноническое событие "NotifyActiveWindow"
///
/// Единственная форма, которую когда-либо видит приёмник. Различия бэкендов
/// в доступности полей уже стёрты нормализатором: текстовые поля пустые,
/// если бэкенд их не отдал, pid отсутствует, если неизвестен.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub caption: String,
    pub resource_class: String,
    pub resource_name: String,
    pub pid: Option<i32>,
}

impl fmt::Display for CanonicalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.resource_class.is_empty() {
            write!(f, "\"{}\"", self.caption)
        } else {
            write!(f, "\"{}\" ({})", self.caption, self.resource_class)
        }
    }
}
