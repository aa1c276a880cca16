//! The contract every kernel event type implements.

use crate::ktime::KtimeError;

/// Routing class of an event, used by the dispatcher to pick an output path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Rendered and written straight to the output sink.
    Output,
    /// Consumed by the owning capture module.
    ModuleData,
    /// Fed into the stream processor, which regroups events by identity.
    EventProcessor,
}

/// Why a buffer could not be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer is shorter than the fixed header.
    TruncatedHeader { needed: usize, available: usize },
    /// The header declares more payload than the buffer holds.
    TruncatedPayload { declared: usize, available: usize },
    /// Header and payload decoded, but the timestamp could not be normalized and was
    /// left as the raw kernel value.
    Ktime(KtimeError),
}

impl DecodeError {
    /// `true` when only timestamp normalization failed; the event itself is complete.
    pub fn is_ktime(&self) -> bool {
        matches!(self, Self::Ktime(_))
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TruncatedHeader { needed, available } => {
                write!(f, "truncated header: need {needed} bytes, have {available}")
            }
            Self::TruncatedPayload {
                declared,
                available,
            } => write!(
                f,
                "truncated payload: declared {declared} bytes, have {available}"
            ),
            Self::Ktime(e) => write!(f, "timestamp not normalized: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ktime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<KtimeError> for DecodeError {
    fn from(e: KtimeError) -> Self {
        Self::Ktime(e)
    }
}

/// Capabilities shared by all kernel event types.
///
/// A dispatcher holds one zero-valued prototype per event kind, calls
/// [`fresh`](Self::fresh) for every delivered buffer, and then [`decode`](Self::decode)s
/// into the new instance. Decoding is in place so that a timestamp-only failure still
/// leaves a fully populated event behind.
pub trait EventStruct: Send + Sync {
    /// Populate `self` from one ring buffer record.
    fn decode(&mut self, buf: &[u8]) -> Result<(), DecodeError>;

    /// One-line human-readable summary.
    fn summary(&self) -> String;

    /// Structured rendering; falls back to [`summary`](Self::summary) if encoding fails.
    fn structured(&self) -> String;

    /// Colorized hex dump of the payload, prefixed with the summary line.
    fn hex_dump(&self) -> String;

    /// A new zero-valued instance of the same concrete type.
    fn fresh(&self) -> Box<dyn EventStruct>;

    fn event_type(&self) -> EventType;

    /// Correlation key grouping events of the same traced stream.
    ///
    /// Built from process id, thread id and command name only, so it can collide when a
    /// pid is reused.
    fn identity(&self) -> String;

    /// Payload truncated to the declared length.
    fn payload(&self) -> &[u8];

    fn payload_len(&self) -> usize;
}
