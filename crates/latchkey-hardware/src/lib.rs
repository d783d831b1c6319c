//! Hardware device abstraction layer for the Latchkey door controller.
//!
//! This crate provides trait-based abstractions for the controller's
//! peripherals: the 4x4 keypad, the fingerprint sensor with on-module
//! template storage, the 16x2 character panel, the time source, and the
//! lock relay. The traits enable substitution between mock
//! implementations (for development and testing) and real drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native
//!   `async fn` in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Poll-friendly**: The controller runs a single cooperative loop, so
//!   keypad and sensor sampling never block; waiting is the caller's
//!   decision.
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed
//!   error information.
//!
//! # Example
//!
//! ```no_run
//! use latchkey_hardware::traits::{FingerprintSensor, LockActuator};
//! use latchkey_hardware::error::Result;
//! use latchkey_core::SampleSlot;
//!
//! async fn admit<S, L>(sensor: &mut S, lock: &mut L) -> Result<bool>
//! where
//!     S: FingerprintSensor,
//!     L: LockActuator,
//! {
//!     if !sensor.capture_image().await? {
//!         return Ok(false);
//!     }
//!     sensor.convert_image(SampleSlot::First).await?;
//!
//!     if sensor.search().await?.is_some() {
//!         lock.set_active(true).await?;
//!         return Ok(true);
//!     }
//!     Ok(false)
//! }
//! ```
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides one controllable fake per trait, each
//! returned together with a handle for driving it from tests.

pub mod clock;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use clock::SystemClock;
pub use error::{HardwareError, Result};
pub use traits::{
    ClockSource, DisplayDevice, FingerprintSensor, Key, KeypadDevice, LockActuator,
};
pub use types::DeviceInfo;
