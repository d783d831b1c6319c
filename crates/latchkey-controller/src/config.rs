//! Controller configuration.

use latchkey_core::constants::*;
use latchkey_core::{AccessWindow, PinCode, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the access controller.
///
/// Every field has a default matching the stock firmware values, so a
/// partial (or absent) config file works.
///
/// # Examples
///
/// ```
/// use latchkey_controller::config::ControllerConfig;
///
/// let config = ControllerConfig::default();
/// assert_eq!(config.master_pin, "9999");
/// assert_eq!(config.unlock_hold().as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Initial master PIN.
    pub master_pin: String,

    /// Hour fingerprint access opens (inclusive).
    pub open_hour: u8,

    /// Hour fingerprint access closes (exclusive).
    pub close_hour: u8,

    /// How long the relay holds the lock open (milliseconds).
    pub unlock_hold_ms: u64,

    /// Verification scan timeout (milliseconds).
    pub scan_timeout_ms: u64,

    /// Short notice duration (milliseconds).
    pub notice_short_ms: u64,

    /// Long notice duration (milliseconds).
    pub notice_long_ms: u64,

    /// Pause between enrollment samples (milliseconds).
    pub sample_pause_ms: u64,

    /// Main loop polling interval (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            master_pin: DEFAULT_MASTER_PIN.to_string(),
            open_hour: DEFAULT_OPEN_HOUR,
            close_hour: DEFAULT_CLOSE_HOUR,
            unlock_hold_ms: UNLOCK_HOLD_MS,
            scan_timeout_ms: SCAN_TIMEOUT_MS,
            notice_short_ms: NOTICE_SHORT_MS,
            notice_long_ms: NOTICE_LONG_MS,
            sample_pause_ms: SAMPLE_PAUSE_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }
}

impl ControllerConfig {
    /// Parse and validate the master PIN.
    ///
    /// # Errors
    /// Returns `Error::InvalidPinFormat` if the configured PIN is not
    /// 0-16 digits.
    pub fn pin(&self) -> Result<PinCode> {
        PinCode::new(&self.master_pin)
    }

    /// Build the access window.
    ///
    /// # Errors
    /// Returns `Error::Config` if the hours do not form a valid window.
    pub fn window(&self) -> Result<AccessWindow> {
        AccessWindow::new(self.open_hour, self.close_hour)
    }

    /// Lock-open hold duration.
    pub fn unlock_hold(&self) -> Duration {
        Duration::from_millis(self.unlock_hold_ms)
    }

    /// Verification scan timeout.
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }

    /// Short notice duration.
    pub fn notice_short(&self) -> Duration {
        Duration::from_millis(self.notice_short_ms)
    }

    /// Long notice duration.
    pub fn notice_long(&self) -> Duration {
        Duration::from_millis(self.notice_long_ms)
    }

    /// Pause between enrollment samples.
    pub fn sample_pause(&self) -> Duration {
        Duration::from_millis(self.sample_pause_ms)
    }

    /// Main loop polling interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
