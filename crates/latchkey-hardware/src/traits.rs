//! Hardware device trait definitions.
//!
//! This module defines trait interfaces for the door controller's
//! peripherals: the 4x4 keypad, the fingerprint sensor, the character
//! panel, the time source, and the lock relay. These traits establish the
//! contract between the controller core and its collaborators, enabling
//! substitution between mock and real hardware implementations.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.
//!
//! # Object Safety and Dynamic Dispatch
//!
//! These traits are NOT object-safe because `async fn` methods return
//! `impl Future`, which cannot be used in trait objects. Use generic type
//! parameters instead:
//!
//! ```no_run
//! use latchkey_hardware::traits::{Key, KeypadDevice};
//! use latchkey_hardware::error::Result;
//!
//! async fn drain_keys<K: KeypadDevice>(keypad: &mut K) -> Result<Vec<Key>> {
//!     let mut keys = Vec::new();
//!     while let Some(key) = keypad.poll_key().await? {
//!         keys.push(key);
//!     }
//!     Ok(keys)
//! }
//! ```

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::DeviceInfo;
use latchkey_core::{SampleSlot, SlotId};

/// A key on the 4x4 matrix keypad.
///
/// Covers the full keypad alphabet: digits, the letter column used for
/// navigation, and the `*` / `#` control keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Letter key A (navigate forward).
    A,

    /// Letter key B (navigate back / backspace).
    B,

    /// Letter key C (clear entry).
    C,

    /// Letter key D (unassigned).
    D,

    /// Star key (*), menu / cancel.
    Star,

    /// Hash key (#), open / confirm.
    Hash,
}

impl Key {
    /// Create a digit key.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit is greater than 9.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_hardware::traits::Key;
    ///
    /// let key = Key::digit(5).unwrap();
    /// assert_eq!(key.as_digit(), Some(5));
    ///
    /// assert!(Key::digit(10).is_err());
    /// ```
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(crate::error::HardwareError::invalid_data(format!(
                "Digit must be 0-9, got {}",
                d
            )));
        }
        Ok(Self::Digit(d))
    }

    /// Map a keypad character to a key.
    ///
    /// Accepts the sixteen characters of the 4x4 layout; letters may be
    /// lowercase. Returns `None` for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_hardware::traits::Key;
    ///
    /// assert_eq!(Key::from_char('7'), Some(Key::Digit(7)));
    /// assert_eq!(Key::from_char('#'), Some(Key::Hash));
    /// assert_eq!(Key::from_char('a'), Some(Key::A));
    /// assert_eq!(Key::from_char('x'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Self::Digit(c as u8 - b'0')),
            'A' | 'a' => Some(Self::A),
            'B' | 'b' => Some(Self::B),
            'C' | 'c' => Some(Self::C),
            'D' | 'd' => Some(Self::D),
            '*' => Some(Self::Star),
            '#' => Some(Self::Hash),
            _ => None,
        }
    }

    /// The keypad character for this key.
    pub fn to_char(self) -> char {
        match self {
            Self::Digit(d) => (b'0' + d) as char,
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::Star => '*',
            Self::Hash => '#',
        }
    }

    /// Check if this key is a digit.
    pub fn is_digit(&self) -> bool {
        matches!(self, Self::Digit(_))
    }

    /// Get the digit value if this is a digit key.
    pub fn as_digit(&self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Keypad device abstraction.
///
/// Represents the 4x4 matrix keypad. Key presses are sampled, not
/// awaited: the controller loop shares its single task between the
/// keypad, the clock, and the sensor, so the poll must return
/// immediately when no key is pending.
pub trait KeypadDevice: Send + Sync {
    /// Sample the keypad once.
    ///
    /// Returns `Ok(Some(key))` if a key press is pending, `Ok(None)`
    /// otherwise. Never blocks waiting for input.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The device is disconnected
    /// - A communication error occurs
    async fn poll_key(&mut self) -> Result<Option<Key>>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Fingerprint sensor abstraction.
///
/// Models an optical sensor with on-module template storage (R307S
/// class): images are captured into an image buffer, converted into one
/// of two sample buffers, combined into a model, and stored into a
/// numbered flash slot. The sensor's flash is the system of record for
/// which slots hold a template.
///
/// # Examples
///
/// ```no_run
/// use latchkey_hardware::traits::FingerprintSensor;
/// use latchkey_hardware::error::Result;
/// use latchkey_core::{SampleSlot, SlotId};
///
/// async fn identify<S: FingerprintSensor>(sensor: &mut S) -> Result<Option<SlotId>> {
///     if !sensor.capture_image().await? {
///         return Ok(None);
///     }
///     sensor.convert_image(SampleSlot::First).await?;
///     sensor.search().await
/// }
/// ```
pub trait FingerprintSensor: Send + Sync {
    /// Try to capture a fingerprint image into the image buffer.
    ///
    /// Returns `Ok(true)` when a finger was present and an image was
    /// captured, `Ok(false)` when no finger is on the sensor. Callers
    /// poll this in a loop; the sensor itself never waits.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a
    /// communication error occurs.
    async fn capture_image(&mut self) -> Result<bool>;

    /// Convert the image buffer into the given sample buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No image has been captured
    /// - The image is too poor to extract features from
    async fn convert_image(&mut self, sample: SampleSlot) -> Result<()>;

    /// Combine the two sample buffers into a template model.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples are missing or do not belong to
    /// the same finger.
    async fn create_model(&mut self) -> Result<()>;

    /// Write the current model into a template slot.
    ///
    /// # Errors
    ///
    /// Returns an error if no model has been created or the flash
    /// write fails.
    async fn store_template(&mut self, slot: SlotId) -> Result<()>;

    /// Search the stored templates for the converted sample.
    ///
    /// Returns the slot of the matching template, or `None` when
    /// nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs.
    async fn search(&mut self) -> Result<Option<SlotId>>;

    /// Check whether a slot holds a template.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs.
    async fn template_exists(&mut self, slot: SlotId) -> Result<bool>;

    /// Delete the template stored in a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is empty or the flash write fails.
    async fn delete_template(&mut self, slot: SlotId) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Character panel abstraction.
///
/// A fixed-geometry character display (16x2 in this system). The
/// controller positions text by row and column; layout beyond that is
/// the panel's concern.
pub trait DisplayDevice: Send + Sync {
    /// Write text starting at the given row and column.
    ///
    /// Text that runs past the end of the row is truncated by the
    /// device.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the panel or a
    /// communication error occurs.
    async fn show_at(&mut self, row: u8, col: u8, text: &str) -> Result<()>;

    /// Blank the whole panel.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs.
    async fn clear(&mut self) -> Result<()>;
}

/// Time source abstraction.
///
/// Supplies the hour of day for the access-window check and a formatted
/// time string for the idle screen. Assumed synchronized at startup.
pub trait ClockSource: Send + Sync {
    /// Current hour of day (0-23).
    ///
    /// # Errors
    ///
    /// Returns an error if the time source is unavailable.
    async fn current_hour(&mut self) -> Result<u8>;

    /// Current time formatted as `HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Returns an error if the time source is unavailable.
    async fn formatted_time(&mut self) -> Result<String>;
}

/// Lock relay abstraction.
///
/// A single relay channel driving the door strike. The controller is
/// responsible for timing; the actuator only switches.
pub trait LockActuator: Send + Sync {
    /// Energize or release the relay.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay driver is unavailable.
    async fn set_active(&mut self, active: bool) -> Result<()>;
}
