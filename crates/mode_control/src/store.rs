use std::sync::Arc;

use shared::domain::{Mode, ModeSnapshot};
use tokio::sync::watch;

/// Observable record of the current mode. A `set` publishes one complete
/// [`ModeSnapshot`], so readers never see the mode and the derived
/// interaction flag out of sync. Consumers subscribe instead of polling.
#[derive(Clone)]
pub struct ModeStore {
    tx: Arc<watch::Sender<ModeSnapshot>>,
}

impl ModeStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ModeSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn set(&self, mode: Mode) {
        self.tx.send_replace(ModeSnapshot::of(mode));
    }

    /// Back to `Unset`, dropping any derived flags.
    pub fn clear(&self) {
        self.set(Mode::Unset);
    }

    pub fn snapshot(&self) -> ModeSnapshot {
        *self.tx.borrow()
    }

    pub fn mode(&self) -> Mode {
        self.snapshot().mode
    }

    pub fn interaction_disabled(&self) -> bool {
        self.snapshot().interaction_disabled
    }

    pub fn subscribe(&self) -> watch::Receiver<ModeSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for ModeStore {
    fn default() -> Self {
        Self::new()
    }
}
