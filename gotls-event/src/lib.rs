//! Turns raw ring buffer records from the Go TLS uprobes into events you can read.
//!
//! The kernel side hands userspace one byte buffer per captured `Read`/`Write` call: a fixed
//! header (timestamp, pid, tid, declared length, payload tag, command name) followed by the
//! plaintext. This crate decodes that buffer, corrects the kernel timestamp to wall-clock
//! time, and renders the result three ways:
//!
//! - [`EventStruct::summary`] — one line of text, payload printed as-is.
//! - [`EventStruct::structured`] — a [`Base`] record through an [`EventEncoder`]
//!   (JSON by default). If encoding fails the summary line is returned instead.
//! - [`EventStruct::hex_dump`] — the summary head followed by a colorized hex/ASCII dump.
//!
//! # How data flows
//!
//! ```text
//! ring buffer ──bytes──▶ EventRegistry::dispatch ──▶ Box<dyn EventStruct> ──▶ String
//!                         (fresh + decode)              (identity, render)
//! ```
//!
//! Every event type implements [`EventStruct`]; the [`EventRegistry`] maps a kind
//! discriminator to a zero-valued instance so the dispatcher never needs to know concrete
//! types. [`GoTlsEvent`] is the built-in implementation.
//!
//! Nothing here does I/O or holds shared mutable state. The only global is the read-only
//! [`RenderConfig`], installed once through [`config::init`].
//!
//! # Usage
//!
//! ```no_run
//! use gotls_event::{EventRegistry, KIND_GOTLS};
//!
//! # fn example(buf: &[u8]) -> Result<(), gotls_event::DispatchError> {
//! let registry = EventRegistry::with_defaults();
//! let event = registry.dispatch(KIND_GOTLS, buf)?;
//! println!("{}", event.hex_dump());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encoding;
pub mod event;
pub mod gotls;
pub mod hexdump;
pub mod ktime;
pub mod registry;

pub use config::{ConfigError, RenderConfig};
pub use encoding::{Base, EncodeError, EventEncoder, JsonEncoder};
pub use event::{DecodeError, EventStruct, EventType};
pub use gotls::GoTlsEvent;
pub use gotls_types::{GoTlsEventHeader, GOTLS_HEADER_LEN, TASK_COMM_LEN};
pub use ktime::{ClockSource, KtimeError, KtimeNormalizer, SystemClock};
pub use registry::{DispatchError, EventCtor, EventRegistry, KIND_GOTLS};
