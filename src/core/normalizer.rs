use crate::events::{CanonicalEvent, WindowDescriptor};

/// Привести платформенный дескриптор к каноническому событию.
///
/// Тотальная функция: отсутствующие опциональные поля подменяются
/// каноническими значениями по умолчанию (пустая строка, отсутствующий pid),
/// а не превращаются в ошибку: несколько бэкендов принципиально не могут
/// отдать весь набор полей, и частичные данные лучше, чем никакие.
pub fn normalize(descriptor: &WindowDescriptor) -> CanonicalEvent {
    CanonicalEvent {
        caption: descriptor.caption.clone().unwrap_or_default(),
        resource_class: descriptor.resource_class.clone().unwrap_or_default(),
        resource_name: descriptor.resource_name.clone().unwrap_or_default(),
        pid: descriptor.pid,
    }
}
