use shared::domain::{ActiveSource, Mode, SourceFamily};

/// Pure mapping from the current mode to the one enabled data-source family.
/// Re-evaluated on every call, never cached.
pub fn active_source(mode: Mode) -> ActiveSource {
    match mode {
        Mode::Unset | Mode::Current => ActiveSource::Rest,
        Mode::Preview | Mode::Draft => ActiveSource::Graph,
    }
}

/// Whether a route requiring `family` may issue network calls under `mode`.
pub fn allows(mode: Mode, family: SourceFamily) -> bool {
    active_source(mode).allows(family)
}
