use gotls_event::*;
use proptest::prelude::*;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

struct FixedClock;

impl KtimeNormalizer for FixedClock {
    fn normalize(&self, _raw_ns: u64, _clock: ClockSource) -> Result<SystemTime, KtimeError> {
        Ok(UNIX_EPOCH + Duration::from_secs(1))
    }
}

fn header(pid: u32, tid: u32, len: i32, comm: [u8; TASK_COMM_LEN]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(GOTLS_HEADER_LEN);
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&pid.to_le_bytes());
    buf.extend_from_slice(&tid.to_le_bytes());
    buf.extend_from_slice(&len.to_le_bytes());
    buf.push(0);
    buf.extend_from_slice(&comm);
    buf
}

fn plain() -> RenderConfig {
    RenderConfig {
        color: false,
        ..RenderConfig::new()
    }
}

// ---------------------------------------------------------------------------
// Property: decoding never panics on arbitrary bytes
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn decode_never_panics(
        data in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let mut e = GoTlsEvent::new();
        let _ = e.decode_with(&data, &FixedClock, ClockSource::Monotonic);
    }
}

// ---------------------------------------------------------------------------
// Property: short buffers fail with TruncatedHeader
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn short_buffers_truncated_header(
        data in proptest::collection::vec(any::<u8>(), 0..GOTLS_HEADER_LEN),
    ) {
        let err = GoTlsEvent::read_from(&data).unwrap_err();
        prop_assert_eq!(err, DecodeError::TruncatedHeader {
            needed: GOTLS_HEADER_LEN,
            available: data.len(),
        });
    }
}

// ---------------------------------------------------------------------------
// Property: declared length beyond the buffer fails with TruncatedPayload
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn overlong_len_truncated_payload(
        payload in proptest::collection::vec(any::<u8>(), 0..256),
        extra in 1i32..10_000,
    ) {
        let len = payload.len() as i32 + extra;
        let mut buf = header(1, 1, len, [0; TASK_COMM_LEN]);
        buf.extend_from_slice(&payload);
        let is_truncated_payload = matches!(
            GoTlsEvent::read_from(&buf),
            Err(DecodeError::TruncatedPayload { .. })
        );
        prop_assert!(is_truncated_payload);
    }
}

// ---------------------------------------------------------------------------
// Property: non-positive length consumes only the header
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn non_positive_len_is_empty(
        len in i32::MIN..=0,
        tail in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut buf = header(1, 1, len, [0; TASK_COMM_LEN]);
        buf.extend_from_slice(&tail);
        let (e, consumed) = GoTlsEvent::read_from(&buf).unwrap();
        prop_assert_eq!(consumed, GOTLS_HEADER_LEN);
        prop_assert_eq!(e.header.len, 0);
        prop_assert!(e.data.is_empty());
    }
}

// ---------------------------------------------------------------------------
// Property: positive length consumes exactly header + len
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn positive_len_consumes_exactly(
        payload in proptest::collection::vec(any::<u8>(), 1..512),
        tail in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut buf = header(1, 1, payload.len() as i32, [0; TASK_COMM_LEN]);
        buf.extend_from_slice(&payload);
        buf.extend_from_slice(&tail);
        let (e, consumed) = GoTlsEvent::read_from(&buf).unwrap();
        prop_assert_eq!(consumed, GOTLS_HEADER_LEN + payload.len());
        prop_assert_eq!(&e.data, &payload);
        prop_assert_eq!(e.payload(), &payload[..]);
    }
}

// ---------------------------------------------------------------------------
// Property: identity is pure and separates (pid, tid, comm)
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn identity_is_injective(
        a in (any::<u32>(), any::<u32>(), any::<[u8; TASK_COMM_LEN]>()),
        b in (any::<u32>(), any::<u32>(), any::<[u8; TASK_COMM_LEN]>()),
    ) {
        let (ea, _) = GoTlsEvent::read_from(&header(a.0, a.1, 0, a.2)).unwrap();
        let (eb, _) = GoTlsEvent::read_from(&header(b.0, b.1, 0, b.2)).unwrap();
        prop_assert_eq!(ea.identity(), ea.identity());
        prop_assert_eq!(a == b, ea.identity() == eb.identity());
    }
}

// ---------------------------------------------------------------------------
// Property: hex dump depends only on the first len bytes
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn hex_dump_ignores_tail(
        payload in proptest::collection::vec(any::<u8>(), 0..200),
        extra in proptest::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut buf = header(5, 6, payload.len() as i32, *b"prop\0\0\0\0\0\0\0\0\0\0\0\0");
        buf.extend_from_slice(&payload);
        let (mut e, _) = GoTlsEvent::read_from(&buf).unwrap();
        let before = e.hex_dump_with(&plain());
        e.data.extend_from_slice(&extra);
        prop_assert_eq!(e.hex_dump_with(&plain()), before);
        prop_assert_eq!(e.payload().len(), payload.len());
    }
}
