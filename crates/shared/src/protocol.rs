use serde::{Deserialize, Serialize};

use crate::domain::Mode;

/// Wire form of a mode value pushed by the embedding host. Deliberately a
/// separate enum from [`Mode`] so `unset` can never arrive over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSignal {
    Current,
    Preview,
    Draft,
}

impl From<ModeSignal> for Mode {
    fn from(value: ModeSignal) -> Self {
        match value {
            ModeSignal::Current => Mode::Current,
            ModeSignal::Preview => Mode::Preview,
            ModeSignal::Draft => Mode::Draft,
        }
    }
}

/// Inbound cross-window envelope. Anything that does not deserialize to this
/// exact shape is rejected by the channel, never applied to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeEnvelope {
    pub mode: ModeSignal,
}

/// Outbound signals to the embedding host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostSignal {
    /// Sent exactly once when the channel starts listening.
    Ready,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_accepts_every_named_mode() {
        for (raw, expected) in [
            (r#"{"mode":"current"}"#, ModeSignal::Current),
            (r#"{"mode":"preview"}"#, ModeSignal::Preview),
            (r#"{"mode":"draft"}"#, ModeSignal::Draft),
        ] {
            let envelope: ModeEnvelope = serde_json::from_str(raw).expect("valid envelope");
            assert_eq!(envelope.mode, expected);
        }
    }

    #[test]
    fn envelope_rejects_unset_and_unknown_values() {
        assert!(serde_json::from_str::<ModeEnvelope>(r#"{"mode":"unset"}"#).is_err());
        assert!(serde_json::from_str::<ModeEnvelope>(r#"{"mode":"published"}"#).is_err());
        assert!(serde_json::from_str::<ModeEnvelope>(r#"{"other":"current"}"#).is_err());
    }

    #[test]
    fn ready_signal_wire_shape_is_stable() {
        assert_eq!(
            serde_json::to_string(&HostSignal::Ready).expect("serialize"),
            r#"{"type":"ready"}"#
        );
    }
}
