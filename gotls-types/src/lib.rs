//! The data contract between the Go TLS uprobes and userspace.
//!
//! When a uprobe on a Go program's `crypto/tls` read or write path fires, the kernel side
//! copies the plaintext into a ring buffer record: a fixed header followed by `len` bytes
//! of payload. This crate describes that header so both sides agree on it byte-for-byte.
//!
//! The kernel writes the record field by field with no alignment padding, so the header is
//! [`GOTLS_HEADER_LEN`] (37) bytes on the wire even though a `#[repr(C)]` struct of the same
//! fields would be padded to 40. Userspace therefore never casts a buffer to
//! [`GoTlsEventHeader`]; it reads the fields in order (see `gotls-event`).
//!
//! ```text
//! offset  size  field
//!      0     8  timestamp_ns   (u64, kernel monotonic ns)
//!      8     4  pid            (u32)
//!     12     4  tid            (u32)
//!     16     4  len            (i32, declared payload length)
//!     20     1  payload_type   (u8)
//!     21    16  comm           ([u8; 16], NUL padded)
//!     37     -  payload        (len bytes)
//! ```
//!
//! # Feature Flags
//!
//! - **`user`** — userspace helpers for extracting the command name
//!   (in the [`userspace`] module).

#![cfg_attr(not(feature = "user"), no_std)]

/// Maximum length for process names.
pub const TASK_COMM_LEN: usize = 16;

/// Size of the fixed header on the wire, in bytes.
pub const GOTLS_HEADER_LEN: usize = 8 + 4 + 4 + 4 + 1 + TASK_COMM_LEN;

/// Payload captured on the `Write` path (plaintext about to be encrypted).
pub const PAYLOAD_TYPE_WRITE: u8 = 0;

/// Payload captured on the `Read` path (plaintext just decrypted).
pub const PAYLOAD_TYPE_READ: u8 = 1;

/// Fixed header of a Go TLS capture record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoTlsEventHeader {
    /// Timestamp (nanoseconds, CLOCK_MONOTONIC) as written by the uprobe.
    pub timestamp_ns: u64,
    /// Process ID
    pub pid: u32,
    /// Thread ID
    pub tid: u32,
    /// Declared payload length. Non-positive means no payload.
    pub len: i32,
    /// Opaque payload tag, see [`PAYLOAD_TYPE_WRITE`] / [`PAYLOAD_TYPE_READ`].
    pub payload_type: u8,
    /// Process/command name
    pub comm: [u8; TASK_COMM_LEN],
}

impl Default for GoTlsEventHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl GoTlsEventHeader {
    pub const fn new() -> Self {
        GoTlsEventHeader {
            timestamp_ns: 0,
            pid: 0,
            tid: 0,
            len: 0,
            payload_type: 0,
            comm: [0; TASK_COMM_LEN],
        }
    }

    /// Declared payload length clamped to zero.
    pub const fn payload_len(&self) -> usize {
        if self.len > 0 {
            self.len as usize
        } else {
            0
        }
    }
}


/// Userspace helper methods for the wire types (requires `user` feature).
#[cfg(feature = "user")]
pub mod userspace {
    use super::*;
    use std::borrow::Cow;

    impl GoTlsEventHeader {
        /// Command name up to the first NUL. Invalid UTF-8 becomes U+FFFD.
        pub fn process_name(&self) -> Cow<'_, str> {
            let len = self
                .comm
                .iter()
                .position(|&c| c == 0)
                .unwrap_or(self.comm.len());
            String::from_utf8_lossy(&self.comm[..len])
        }

        /// Command name bytes with the trailing NUL padding removed.
        ///
        /// Unlike [`process_name`](Self::process_name) this keeps anything after an
        /// embedded NUL, so two different `comm` arrays never map to the same slice.
        pub fn comm_bytes(&self) -> &[u8] {
            let len = self.comm.iter().rposition(|&c| c != 0).map_or(0, |i| i + 1);
            &self.comm[..len]
        }
    }
}
