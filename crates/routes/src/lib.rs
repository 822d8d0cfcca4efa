//! Per-route orchestration over the two back-end families. Every route
//! entry point consults the source gate before any network activity, runs
//! its fetches through a generation-guarded state machine, and exposes a
//! uniform view for the presentation layer.

pub mod graph;
pub mod rest;
pub mod state;
pub mod view;

pub use state::{FetchState, RouteState};
pub use view::{Located, RouteView};
