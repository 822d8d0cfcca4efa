use shared::domain::{ActiveSource, SourceFamily};

use crate::state::FetchState;

/// Success payload that may still turn out to name a missing entity:
/// not-found is detected post-fetch and kept distinct from transport
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Located<T> {
    Found(T),
    Missing(String),
}

/// What the presentation layer renders for one route.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteView<T> {
    /// The route's required source is not the gate-enabled one. Inert: no
    /// fetch was or will be issued while this holds.
    SourceDisabled {
        required: SourceFamily,
        active: ActiveSource,
    },
    Idle,
    Loading,
    Ready(T),
    NotFound(String),
    Failed(String),
}

impl<T: Clone> RouteView<T> {
    pub fn from_fetch(state: FetchState<T>) -> Self {
        match state {
            FetchState::Idle => RouteView::Idle,
            FetchState::Loading => RouteView::Loading,
            FetchState::Success(value) => RouteView::Ready(value),
            FetchState::Error(reason) => RouteView::Failed(reason),
        }
    }

    pub fn from_located(state: FetchState<Located<T>>) -> Self {
        match state {
            FetchState::Idle => RouteView::Idle,
            FetchState::Loading => RouteView::Loading,
            FetchState::Success(Located::Found(value)) => RouteView::Ready(value),
            FetchState::Success(Located::Missing(reason)) => RouteView::NotFound(reason),
            FetchState::Error(reason) => RouteView::Failed(reason),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, RouteView::Ready(_))
    }
}
