//! Normalization core: responsibility and boundaries
//!
//! This module owns the registry/filter/normalizer/relay pipeline and nothing
//! else. It MUST NOT know how a platform watcher obtains its snapshots or how
//! the transport reaches the consumer; both sides talk to it only through
//! `WindowRelay::handle_signal` and the `NotificationSink` trait.

pub mod filter;
pub mod normalizer;
pub mod registry;
pub mod relay;

pub use registry::IdentityRegistry;
pub use relay::{SignalOutcome, WindowRelay};
