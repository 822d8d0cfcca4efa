use serde::{Deserialize, Serialize};

/// Externally controlled flag selecting which back-end family is active.
///
/// `Unset` is the process default and never appears on the wire; the host
/// can only push one of the three named modes through the signal channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Unset,
    Current,
    Preview,
    Draft,
}

impl Mode {
    pub fn interaction_disabled(self) -> bool {
        self == Mode::Draft
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Unset => "unset",
            Mode::Current => "current",
            Mode::Preview => "preview",
            Mode::Draft => "draft",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomically published unit of mode state. The derived flag is computed
/// at write time so readers never observe mode and flag out of sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSnapshot {
    pub mode: Mode,
    pub interaction_disabled: bool,
}

impl ModeSnapshot {
    pub fn of(mode: Mode) -> Self {
        Self {
            mode,
            interaction_disabled: mode.interaction_disabled(),
        }
    }
}

/// The back-end family a route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFamily {
    Rest,
    Graph,
}

impl std::fmt::Display for SourceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFamily::Rest => f.write_str("REST"),
            SourceFamily::Graph => f.write_str("GraphQL"),
        }
    }
}

/// Output domain of the source gate. `None` is part of the gate contract
/// even though the closed mode set currently always enables one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    Rest,
    Graph,
    None,
}

impl ActiveSource {
    pub fn allows(self, family: SourceFamily) -> bool {
        matches!(
            (self, family),
            (ActiveSource::Rest, SourceFamily::Rest) | (ActiveSource::Graph, SourceFamily::Graph)
        )
    }
}

impl std::fmt::Display for ActiveSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveSource::Rest => f.write_str("REST"),
            ActiveSource::Graph => f.write_str("GraphQL"),
            ActiveSource::None => f.write_str("none"),
        }
    }
}
