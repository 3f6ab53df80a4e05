use thiserror::Error;

#[derive(Error, Debug)]
pub enum WinwatchError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка D-Bus: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Дескриптор окна не содержит стабильного идентификатора")]
    IdentityUnavailable,

    #[error("Не удалось доставить уведомление: {0}")]
    Delivery(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, WinwatchError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! winwatch_error {
    (delivery, $($arg:tt)*) => {
        $crate::error::WinwatchError::Delivery(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::WinwatchError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::WinwatchError::Internal(format!($($arg)*))
    };
}
