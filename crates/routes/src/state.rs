use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

/// Fetch lifecycle for one route view. Reset whenever the route's key
/// inputs change; at most one live `Loading` exists per route.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

/// Pairs the published fetch state with a monotonically increasing
/// generation counter. In-flight work is never cancelled; instead a result
/// may only be applied while its generation is still the latest, so a late
/// response from a superseded plan cannot overwrite newer state.
pub struct RouteState<T> {
    generation: AtomicU64,
    tx: watch::Sender<FetchState<T>>,
}

impl<T: Clone> RouteState<T> {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(FetchState::Idle);
        Self {
            generation: AtomicU64::new(0),
            tx,
        }
    }

    /// Start a new plan: supersede any in-flight generation and publish
    /// `Loading`. Returns the token the plan must present to `resolve`.
    pub fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx.send_replace(FetchState::Loading);
        generation
    }

    /// Apply a result if `generation` is still current. A plan may resolve
    /// several times (stale-then-fresh emits up to two states); all of them
    /// are dropped once a newer plan has begun.
    pub fn resolve(&self, generation: u64, state: FetchState<T>) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding response from superseded plan");
            return false;
        }
        self.tx.send_replace(state);
        true
    }

    /// Back to `Idle`, invalidating any outstanding generation.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.tx.send_replace(FetchState::Idle);
    }

    pub fn current(&self) -> FetchState<T> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Default for RouteState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_publishes_loading() {
        let state: RouteState<u32> = RouteState::new();
        assert_eq!(state.current(), FetchState::Idle);
        state.begin();
        assert!(state.current().is_loading());
    }

    #[test]
    fn current_generation_resolves() {
        let state: RouteState<u32> = RouteState::new();
        let generation = state.begin();
        assert!(state.resolve(generation, FetchState::Success(7)));
        assert_eq!(state.current(), FetchState::Success(7));
    }

    #[test]
    fn superseded_generation_is_discarded() {
        let state: RouteState<u32> = RouteState::new();
        let stale = state.begin();
        let fresh = state.begin();

        assert!(!state.resolve(stale, FetchState::Success(1)));
        assert!(state.current().is_loading(), "stale result must not land");

        assert!(state.resolve(fresh, FetchState::Success(2)));
        assert_eq!(state.current(), FetchState::Success(2));

        // Even after the fresh plan resolved, the stale one stays dead.
        assert!(!state.resolve(stale, FetchState::Error("late".into())));
        assert_eq!(state.current(), FetchState::Success(2));
    }

    #[test]
    fn one_generation_may_resolve_repeatedly() {
        let state: RouteState<u32> = RouteState::new();
        let generation = state.begin();
        assert!(state.resolve(generation, FetchState::Success(1)));
        assert!(state.resolve(generation, FetchState::Success(2)));
        assert_eq!(state.current(), FetchState::Success(2));
    }

    #[test]
    fn reset_invalidates_outstanding_generations() {
        let state: RouteState<u32> = RouteState::new();
        let generation = state.begin();
        state.reset();
        assert_eq!(state.current(), FetchState::Idle);
        assert!(!state.resolve(generation, FetchState::Success(9)));
        assert_eq!(state.current(), FetchState::Idle);
    }

    #[tokio::test]
    async fn subscribers_see_the_lifecycle() {
        let state: RouteState<u32> = RouteState::new();
        let mut rx = state.subscribe();

        let generation = state.begin();
        rx.changed().await.expect("state alive");
        assert!(rx.borrow().is_loading());

        state.resolve(generation, FetchState::Success(3));
        rx.changed().await.expect("state alive");
        assert_eq!(*rx.borrow(), FetchState::Success(3));
    }
}
