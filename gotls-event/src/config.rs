//! Process-wide rendering configuration.
//!
//! Installed at most once, before the first event is decoded, and read-only afterwards.
//! Code that needs a different configuration (tests, embedders) passes a [`RenderConfig`]
//! explicitly to the `*_with` methods instead of touching the global.

use once_cell::sync::OnceCell;

use crate::hexdump::{COLOR_GREEN, COLOR_RESET};
use crate::ktime::ClockSource;

static CONFIG: OnceCell<RenderConfig> = OnceCell::new();
static DEFAULT: RenderConfig = RenderConfig::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Wrap hex dumps in ANSI color markers.
    pub color: bool,
    /// Kernel clock the uprobes stamp records with.
    pub clock: ClockSource,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderConfig {
    pub const fn new() -> Self {
        RenderConfig {
            color: true,
            clock: ClockSource::Monotonic,
        }
    }

    /// Marker written before each hex dump row.
    pub fn color_start(&self) -> &'static str {
        if self.color {
            COLOR_GREEN
        } else {
            ""
        }
    }

    /// Marker written after a hex dump.
    pub fn color_reset(&self) -> &'static str {
        if self.color {
            COLOR_RESET
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    AlreadyInitialized,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "render config already initialized"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Install the process-wide configuration. Fails if one is already installed.
pub fn init(config: RenderConfig) -> Result<(), ConfigError> {
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    log::debug!("render config installed: {:?}", config);
    Ok(())
}

/// The installed configuration, or the default when none was installed.
pub fn get() -> &'static RenderConfig {
    CONFIG.get().unwrap_or(&DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_colored_monotonic() {
        let c = RenderConfig::default();
        assert!(c.color);
        assert_eq!(c.clock, ClockSource::Monotonic);
    }

    #[test]
    fn markers_follow_color_flag() {
        let on = RenderConfig::new();
        assert_eq!(on.color_start(), COLOR_GREEN);
        assert_eq!(on.color_reset(), COLOR_RESET);

        let off = RenderConfig {
            color: false,
            ..RenderConfig::new()
        };
        assert_eq!(off.color_start(), "");
        assert_eq!(off.color_reset(), "");
    }

    // The only test in this crate that touches the global.
    #[test]
    fn init_is_once_only() {
        let cfg = RenderConfig {
            color: false,
            clock: ClockSource::Boot,
        };
        assert_eq!(init(cfg), Ok(()));
        assert_eq!(*get(), cfg);
        assert_eq!(init(RenderConfig::new()), Err(ConfigError::AlreadyInitialized));
        assert_eq!(*get(), cfg);
    }
}
