pub mod backend;
pub mod sink;

pub use backend::create_backend_watcher;
pub use sink::create_notification_sink;
