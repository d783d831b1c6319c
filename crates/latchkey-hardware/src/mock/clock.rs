//! Mock time source for testing and development.

use crate::{Result, traits::ClockSource};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct ClockInner {
    hour: u8,
    time: String,
}

/// Mock time source with a settable hour and time string.
///
/// Defaults to 12:00:00, inside the usual access window.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockClock;
/// use latchkey_hardware::traits::ClockSource;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut clock, handle) = MockClock::new();
///
///     handle.set_hour(21);
///     assert_eq!(clock.current_hour().await?, 21);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockClock {
    inner: Arc<Mutex<ClockInner>>,
}

impl MockClock {
    /// Create a new mock clock fixed at 12:00:00.
    pub fn new() -> (Self, MockClockHandle) {
        let inner = Arc::new(Mutex::new(ClockInner {
            hour: 12,
            time: "12:00:00".to_string(),
        }));

        let clock = Self {
            inner: Arc::clone(&inner),
        };

        let handle = MockClockHandle { inner };

        (clock, handle)
    }

    fn lock(&self) -> MutexGuard<'_, ClockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new().0
    }
}

impl ClockSource for MockClock {
    async fn current_hour(&mut self) -> Result<u8> {
        Ok(self.lock().hour)
    }

    async fn formatted_time(&mut self) -> Result<String> {
        Ok(self.lock().time.clone())
    }
}

/// Handle for controlling a mock clock.
#[derive(Debug, Clone)]
pub struct MockClockHandle {
    inner: Arc<Mutex<ClockInner>>,
}

impl MockClockHandle {
    fn lock(&self) -> MutexGuard<'_, ClockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the hour of day (0-23) and align the time string to it.
    pub fn set_hour(&self, hour: u8) {
        let mut inner = self.lock();
        inner.hour = hour;
        inner.time = format!("{hour:02}:00:00");
    }

    /// Set the exact time string shown on the idle screen.
    pub fn set_time(&self, time: impl Into<String>) {
        self.lock().time = time.into();
    }
}
