//! BackendWatcher service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for observing the
//! active window on one platform and feeding WindowDescriptor snapshots into
//! the relay via `WindowRelay::handle_signal`. It MUST NOT contain any
//! dedup or normalization logic. All notify decisions are made exclusively
//! by the core (`core::filter::should_notify`).

mod dry_run;
mod kdotool;
mod polling;
mod sway;
mod r#trait;
mod wmctrl;
mod xdotool;

pub use self::r#trait::create_backend_watcher;
