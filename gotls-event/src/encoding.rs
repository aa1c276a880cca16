//! Machine-readable event records.
//!
//! Every event family renders into the same [`Base`] record so sinks only ever deal with
//! one shape. The wire encoding is pluggable through [`EventEncoder`]; [`JsonEncoder`] is
//! what the library uses unless told otherwise.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Flat record shared by all event types.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    /// Event timestamp: epoch seconds when normalized, raw kernel ns otherwise.
    pub timestamp: u64,
    /// Correlation key, see `EventStruct::identity`.
    pub uuid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub src_ip: String,
    #[serde(default)]
    pub src_port: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dst_ip: String,
    #[serde(default)]
    pub dst_port: u32,
    pub pid: i32,
    pub pname: String,
    #[serde(rename = "type")]
    pub kind: u32,
    pub length: u32,
    pub payload_base64: String,
}

impl Base {
    /// Encode `payload` into [`payload_base64`](Self::payload_base64) (standard alphabet, padded).
    pub fn set_payload(&mut self, payload: &[u8]) {
        self.payload_base64 = base64::engine::general_purpose::STANDARD.encode(payload);
    }

    /// Decode [`payload_base64`](Self::payload_base64) back to bytes.
    pub fn payload(&self) -> Result<Vec<u8>, EncodeError> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.payload_base64)
            .map_err(|e| EncodeError(e.to_string()))
    }
}

/// Error returned by an [`EventEncoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError(pub String);

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "encode: {}", self.0)
    }
}

impl std::error::Error for EncodeError {}

/// Turns a [`Base`] record into bytes for a sink.
pub trait EventEncoder: Send + Sync {
    fn encode(&self, base: &Base) -> Result<Vec<u8>, EncodeError>;
}

/// One compact JSON object per record.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonEncoder;

impl EventEncoder for JsonEncoder {
    fn encode(&self, base: &Base) -> Result<Vec<u8>, EncodeError> {
        serde_json::to_vec(base).map_err(|e| EncodeError(e.to_string()))
    }
}
