pub mod channel;
pub mod gate;
pub mod store;

pub use channel::{HostLink, ModeChannel, NullHostLink, SignalOutcome};
pub use gate::active_source;
pub use store::ModeStore;
