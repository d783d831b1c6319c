//! Real time source backed by the system clock.

use crate::{Result, traits::ClockSource};
use chrono::{Local, Timelike};

/// Time source reading the local system clock.
///
/// The host keeps the clock synchronized (NTP or otherwise); this type
/// only reads it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock source.
    pub fn new() -> Self {
        Self
    }
}

impl ClockSource for SystemClock {
    async fn current_hour(&mut self) -> Result<u8> {
        Ok(Local::now().hour() as u8)
    }

    async fn formatted_time(&mut self) -> Result<String> {
        Ok(Local::now().format("%H:%M:%S").to_string())
    }
}
