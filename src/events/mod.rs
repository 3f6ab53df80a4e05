pub mod canonical;
pub mod descriptor;

pub use canonical::CanonicalEvent;
pub use descriptor::{WindowDescriptor, WindowIdentity, WindowSignal};
