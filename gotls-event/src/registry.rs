//! Maps event kind discriminators to zero-valued instances.

use std::collections::HashMap;

use log::{debug, warn};

use crate::event::{DecodeError, EventStruct};
use crate::gotls::GoTlsEvent;

/// Discriminator of [`GoTlsEvent`] in [`EventRegistry::with_defaults`].
pub const KIND_GOTLS: u32 = 1;

/// Builds a zero-valued event ready to be decoded into.
pub type EventCtor = fn() -> Box<dyn EventStruct>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No event type registered for this kind.
    UnknownKind(u32),
    /// The buffer did not decode into a usable event.
    Decode { kind: u32, source: DecodeError },
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind(kind) => write!(f, "no event type registered for kind {kind}"),
            Self::Decode { kind, source } => write!(f, "kind {kind}: {source}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Registered event types, keyed by kind.
pub struct EventRegistry {
    ctors: HashMap<u32, EventCtor>,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EventRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        EventRegistry {
            ctors: HashMap::new(),
        }
    }

    /// A registry with all built-in event types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(KIND_GOTLS, || Box::new(GoTlsEvent::new()));
        registry
    }

    /// Register `ctor` for `kind`, replacing any previous entry.
    pub fn register(&mut self, kind: u32, ctor: EventCtor) {
        if self.ctors.insert(kind, ctor).is_some() {
            debug!("replaced event constructor for kind {}", kind);
        }
    }

    pub fn contains(&self, kind: u32) -> bool {
        self.ctors.contains_key(&kind)
    }

    /// A fresh zero-valued event of the given kind.
    pub fn instantiate(&self, kind: u32) -> Option<Box<dyn EventStruct>> {
        self.ctors.get(&kind).map(|ctor| ctor())
    }

    /// Decode one delivered buffer as an event of `kind`.
    ///
    /// Truncated buffers are rejected. An event whose timestamp could not be normalized is
    /// still returned, carrying the raw kernel timestamp.
    pub fn dispatch(&self, kind: u32, buf: &[u8]) -> Result<Box<dyn EventStruct>, DispatchError> {
        let mut event = self
            .instantiate(kind)
            .ok_or(DispatchError::UnknownKind(kind))?;

        match event.decode(buf) {
            Ok(()) => Ok(event),
            Err(e) if e.is_ktime() => {
                warn!("{}: keeping raw timestamp ({})", event.identity(), e);
                Ok(event)
            }
            Err(source) => {
                debug!("dropping {} byte buffer of kind {}: {}", buf.len(), kind, source);
                Err(DispatchError::Decode { kind, source })
            }
        }
    }
}
