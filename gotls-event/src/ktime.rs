//! Conversion of kernel clock timestamps to wall-clock time.
//!
//! Uprobes stamp records with `bpf_ktime_get_ns()`, which counts from an arbitrary
//! kernel-relative origin. To place a record on the wall clock we read the same kernel
//! clock *now*, take the (signed) distance between the record and now, and apply that
//! distance to `SystemTime::now()`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Kernel clock a raw timestamp was taken from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClockSource {
    /// `CLOCK_MONOTONIC`, what `bpf_ktime_get_ns()` reads.
    #[default]
    Monotonic,
    /// `CLOCK_BOOTTIME`, what `bpf_ktime_get_boot_ns()` reads (includes suspend).
    Boot,
}

/// Errors from timestamp normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KtimeError {
    /// `clock_gettime` failed with the given errno.
    ClockRead(i32),
    /// The normalized time falls before the Unix epoch.
    BeforeEpoch,
    /// No kernel clock is available on this platform.
    Unsupported,
}

impl std::fmt::Display for KtimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClockRead(errno) => write!(f, "clock_gettime failed: errno {errno}"),
            Self::BeforeEpoch => write!(f, "normalized timestamp is before the Unix epoch"),
            Self::Unsupported => write!(f, "kernel clock not available on this platform"),
        }
    }
}

impl std::error::Error for KtimeError {}

/// Converts raw kernel timestamps to wall-clock time.
///
/// Implementations must be usable from several decoders at once.
pub trait KtimeNormalizer: Send + Sync {
    fn normalize(&self, raw_ns: u64, clock: ClockSource) -> Result<SystemTime, KtimeError>;
}

/// Normalizer backed by the host's kernel clocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl KtimeNormalizer for SystemClock {
    fn normalize(&self, raw_ns: u64, clock: ClockSource) -> Result<SystemTime, KtimeError> {
        let now_ns = read_clock_ns(clock)?;
        shift(SystemTime::now(), raw_ns as i128 - now_ns as i128)
    }
}

/// Whole seconds since the Unix epoch.
pub fn epoch_secs(t: SystemTime) -> Result<u64, KtimeError> {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| KtimeError::BeforeEpoch)
}

/// Move `base` by a signed nanosecond offset.
fn shift(base: SystemTime, diff_ns: i128) -> Result<SystemTime, KtimeError> {
    let magnitude = Duration::from_nanos(diff_ns.unsigned_abs().min(u64::MAX as u128) as u64);
    let shifted = if diff_ns >= 0 {
        base.checked_add(magnitude)
    } else {
        base.checked_sub(magnitude)
    };
    shifted.ok_or(KtimeError::BeforeEpoch)
}

#[cfg(target_os = "linux")]
fn read_clock_ns(clock: ClockSource) -> Result<u64, KtimeError> {
    let clk = match clock {
        ClockSource::Monotonic => libc::CLOCK_MONOTONIC,
        ClockSource::Boot => libc::CLOCK_BOOTTIME,
    };
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    let ret = unsafe { libc::clock_gettime(clk, &mut ts) };
    if ret != 0 {
        let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        return Err(KtimeError::ClockRead(errno));
    }
    Ok(ts.tv_sec as u64 * 1_000_000_000 + ts.tv_nsec as u64)
}

#[cfg(not(target_os = "linux"))]
fn read_clock_ns(_clock: ClockSource) -> Result<u64, KtimeError> {
    Err(KtimeError::Unsupported)
}
