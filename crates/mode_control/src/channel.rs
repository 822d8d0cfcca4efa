use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::Mode,
    protocol::{HostSignal, ModeEnvelope},
};
use tracing::{debug, info};

use crate::store::ModeStore;

/// Outbound side of the cross-window channel.
#[async_trait]
pub trait HostLink: Send + Sync {
    async fn post_to_host(&self, signal: &HostSignal) -> Result<()>;
}

/// Fallback for a process not embedded in any host: logs and discards.
pub struct NullHostLink;

#[async_trait]
impl HostLink for NullHostLink {
    async fn post_to_host(&self, signal: &HostSignal) -> Result<()> {
        debug!(?signal, "no embedding host; dropping outbound signal");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Applied(Mode),
    Rejected,
}

/// Inbound cross-window message handler. Payloads carrying a recognized
/// `mode` are applied to the store; everything else is rejected, counted,
/// and logged at debug level so sender-side integration bugs stay visible
/// without crashing the channel.
pub struct ModeChannel {
    store: ModeStore,
    link: Arc<dyn HostLink>,
    ready_sent: AtomicBool,
    rejected: AtomicU64,
}

impl ModeChannel {
    pub fn new(store: ModeStore, link: Arc<dyn HostLink>) -> Self {
        Self {
            store,
            link,
            ready_sent: AtomicBool::new(false),
            rejected: AtomicU64::new(0),
        }
    }

    /// Tells the embedding host the channel is listening. Emitted at most
    /// once per channel regardless of how often this is called.
    pub async fn announce_ready(&self) -> Result<()> {
        if self.ready_sent.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.link.post_to_host(&HostSignal::Ready).await
    }

    pub fn receive(&self, raw: &str) -> SignalOutcome {
        match serde_json::from_str::<ModeEnvelope>(raw) {
            Ok(envelope) => {
                let mode = Mode::from(envelope.mode);
                info!(%mode, "mode signal received from host");
                self.store.set(mode);
                SignalOutcome::Applied(mode)
            }
            Err(err) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                debug!(error = %err, "rejected malformed host signal");
                SignalOutcome::Rejected
            }
        }
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}
