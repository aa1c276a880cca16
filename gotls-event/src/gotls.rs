//! Plaintext captured from a Go program's `crypto/tls` connection.
//!
//! The uprobes on `(*Conn).Write` and `(*Conn).Read` emit one record per call: the fixed
//! [`GoTlsEventHeader`] followed by `len` bytes of plaintext.

use bytes::Buf;
use gotls_types::{GoTlsEventHeader, GOTLS_HEADER_LEN};

use crate::config::{self, RenderConfig};
use crate::encoding::{Base, EventEncoder, JsonEncoder};
use crate::event::{DecodeError, EventStruct, EventType};
use crate::hexdump;
use crate::ktime::{self, ClockSource, KtimeNormalizer, SystemClock};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoTlsEvent {
    pub header: GoTlsEventHeader,
    /// Payload bytes. Exactly `header.len` long after decoding.
    pub data: Vec<u8>,
    ts_normalized: bool,
}

impl GoTlsEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read header and payload from `buf` without touching the timestamp.
    ///
    /// Returns the event and the number of bytes it occupies. Bytes past the declared
    /// payload are left alone.
    pub fn read_from(buf: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut cur = buf;
        if cur.remaining() < GOTLS_HEADER_LEN {
            return Err(DecodeError::TruncatedHeader {
                needed: GOTLS_HEADER_LEN,
                available: cur.remaining(),
            });
        }

        let mut header = GoTlsEventHeader::new();
        header.timestamp_ns = cur.get_u64_le();
        header.pid = cur.get_u32_le();
        header.tid = cur.get_u32_le();
        header.len = cur.get_i32_le();
        header.payload_type = cur.get_u8();
        cur.copy_to_slice(&mut header.comm);

        let data = if header.len > 0 {
            let declared = header.len as usize;
            if cur.remaining() < declared {
                return Err(DecodeError::TruncatedPayload {
                    declared,
                    available: cur.remaining(),
                });
            }
            cur[..declared].to_vec()
        } else {
            header.len = 0;
            Vec::new()
        };

        let consumed = GOTLS_HEADER_LEN + data.len();
        let event = GoTlsEvent {
            header,
            data,
            ts_normalized: false,
        };
        Ok((event, consumed))
    }

    /// Decode `buf` into `self`, normalizing the timestamp with `normalizer`.
    ///
    /// On a truncated buffer `self` is left unchanged. If only normalization fails, `self`
    /// holds the decoded event with the raw kernel timestamp and the error is returned.
    pub fn decode_with(
        &mut self,
        buf: &[u8],
        normalizer: &dyn KtimeNormalizer,
        clock: ClockSource,
    ) -> Result<(), DecodeError> {
        let (event, _) = Self::read_from(buf)?;
        *self = event;

        let secs = normalizer
            .normalize(self.header.timestamp_ns, clock)
            .and_then(ktime::epoch_secs)?;
        self.header.timestamp_ns = secs;
        self.ts_normalized = true;
        Ok(())
    }

    /// Decode a complete event; any failure, including normalization, yields no event.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, DecodeError> {
        let mut event = Self::new();
        event.decode(buf)?;
        Ok(event)
    }

    /// Epoch seconds if [`timestamp_normalized`](Self::timestamp_normalized), otherwise
    /// the raw kernel nanoseconds the uprobe wrote.
    pub fn timestamp(&self) -> u64 {
        self.header.timestamp_ns
    }

    /// Whether [`timestamp`](Self::timestamp) is wall-clock seconds. Raw kernel values are
    /// not comparable with normalized ones.
    pub fn timestamp_normalized(&self) -> bool {
        self.ts_normalized
    }

    pub fn pid(&self) -> u32 {
        self.header.pid
    }

    pub fn tid(&self) -> u32 {
        self.header.tid
    }

    pub fn payload_type(&self) -> u8 {
        self.header.payload_type
    }

    /// Command name up to the first NUL, lossily decoded.
    pub fn comm(&self) -> String {
        self.header.process_name().into_owned()
    }

    /// The record built for structured output.
    ///
    /// Carries the whole `data` buffer, not just the first `len` bytes.
    pub fn to_base(&self) -> Base {
        let mut base = Base {
            timestamp: self.header.timestamp_ns,
            uuid: self.identity(),
            pid: self.header.pid as i32,
            pname: self.comm(),
            kind: self.header.payload_type as u32,
            length: self.payload_len() as u32,
            ..Default::default()
        };
        base.set_payload(&self.data);
        base
    }

    /// Structured rendering through `encoder`.
    ///
    /// Encoding failures are never reported: the summary line is returned instead.
    pub fn structured_with(&self, encoder: &dyn EventEncoder) -> String {
        match encoder.encode(&self.to_base()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                log::debug!("structured encoding failed, using summary: {}", e);
                self.summary()
            }
        }
    }

    pub fn hex_dump_with(&self, config: &RenderConfig) -> String {
        let mut dump = hexdump::dump(self.payload(), config.color_start());
        if !dump.is_empty() {
            dump.push_str(config.color_reset());
        }
        format!("{}, Payload: \n{}\n", self.head(), dump)
    }

    fn head(&self) -> String {
        format!(
            "PID: {}, Comm: {}, TID: {}, PayloadType:{}",
            self.header.pid,
            self.comm(),
            self.header.tid,
            self.header.payload_type
        )
    }
}

impl EventStruct for GoTlsEvent {
    fn decode(&mut self, buf: &[u8]) -> Result<(), DecodeError> {
        self.decode_with(buf, &SystemClock, config::get().clock)
    }

    fn summary(&self) -> String {
        format!(
            "{}, Payload: {}\n",
            self.head(),
            String::from_utf8_lossy(self.payload())
        )
    }

    fn structured(&self) -> String {
        self.structured_with(&JsonEncoder)
    }

    fn hex_dump(&self) -> String {
        self.hex_dump_with(config::get())
    }

    fn fresh(&self) -> Box<dyn EventStruct> {
        Box::new(GoTlsEvent::new())
    }

    fn event_type(&self) -> EventType {
        EventType::Output
    }

    fn identity(&self) -> String {
        format!(
            "{}_{}_{}",
            self.header.pid,
            self.header.tid,
            self.header.comm_bytes().escape_ascii()
        )
    }

    fn payload(&self) -> &[u8] {
        let len = self.payload_len().min(self.data.len());
        &self.data[..len]
    }

    fn payload_len(&self) -> usize {
        self.header.payload_len()
    }
}
