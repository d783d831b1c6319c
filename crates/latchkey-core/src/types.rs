use crate::{
    Result,
    constants::{MAX_PIN_LENGTH, MAX_SLOT_ID, MIN_SLOT_ID},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Template slot identifier (0-127)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(u8);

impl SlotId {
    /// Create a new slot ID with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidSlotId` if the ID is outside the valid range (0-127).
    pub fn new(id: u8) -> Result<Self> {
        if !(MIN_SLOT_ID..=MAX_SLOT_ID).contains(&id) {
            return Err(Error::InvalidSlotId(format!(
                "Slot ID must be {MIN_SLOT_ID}-{MAX_SLOT_ID}, got {id}"
            )));
        }
        Ok(SlotId(id))
    }

    /// Get the raw slot ID as u8.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Iterate over every valid slot ID in ascending order.
    pub fn all() -> impl Iterator<Item = SlotId> {
        (MIN_SLOT_ID..=MAX_SLOT_ID).map(SlotId)
    }

    /// Find the lowest slot ID not present in `occupied`.
    ///
    /// Returns `None` when every slot is taken.
    #[must_use]
    pub fn first_free(occupied: &[SlotId]) -> Option<SlotId> {
        Self::all().find(|slot| !occupied.contains(slot))
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SlotId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id: u8 = s
            .parse()
            .map_err(|_| Error::InvalidSlotId(format!("Invalid slot ID: {s}")))?;
        SlotId::new(id)
    }
}

/// Master PIN (0-16 digits)
///
/// # Security
/// This type implements constant-time comparison to prevent timing attacks
/// when checking an entered PIN during authentication.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct PinCode(String);

impl PinCode {
    /// Create a new PIN with validation.
    ///
    /// The empty PIN is accepted; the PIN-change flow allows committing it.
    ///
    /// # Errors
    /// Returns `Error::InvalidPinFormat` if:
    /// - The PIN is longer than 16 digits
    /// - The PIN contains non-digit characters
    pub fn new(pin: &str) -> Result<Self> {
        if pin.len() > MAX_PIN_LENGTH {
            return Err(Error::InvalidPinFormat(format!(
                "PIN must be at most {MAX_PIN_LENGTH} digits, got {}",
                pin.len()
            )));
        }

        if !pin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidPinFormat(
                "PIN must contain only digits".to_string(),
            ));
        }

        Ok(PinCode(pin.to_string()))
    }

    /// Get the PIN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty PIN.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::str::FromStr for PinCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PinCode::new(s)
    }
}

/// Constant-time comparison implementation for PinCode
///
/// This prevents timing attacks by ensuring comparison takes the same time
/// regardless of where the digit strings differ.
impl PartialEq for PinCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl From<&PinBuffer> for PinCode {
    fn from(buffer: &PinBuffer) -> Self {
        // The buffer only ever holds ASCII digits within the length cap.
        PinCode(buffer.as_str().to_string())
    }
}

/// Fixed-capacity PIN entry buffer.
///
/// Collects digit presses during PIN entry. Appends saturate at
/// [`MAX_PIN_LENGTH`]; backspace and clear never underflow. The buffer
/// is rendered masked, one `*` per accepted digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinBuffer {
    digits: [u8; MAX_PIN_LENGTH],
    len: usize,
}

impl PinBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        PinBuffer {
            digits: [0; MAX_PIN_LENGTH],
            len: 0,
        }
    }

    /// Append a digit (0-9).
    ///
    /// Returns `false` when the buffer is full or the value is not a
    /// digit; the buffer is unchanged in either case.
    pub fn push(&mut self, digit: u8) -> bool {
        if digit > 9 || self.len >= MAX_PIN_LENGTH {
            return false;
        }
        self.digits[self.len] = b'0' + digit;
        self.len += 1;
        true
    }

    /// Remove the last digit.
    ///
    /// Returns `false` when the buffer is already empty.
    pub fn backspace(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        self.digits[self.len] = 0;
        true
    }

    /// Remove all digits.
    pub fn clear(&mut self) {
        self.digits = [0; MAX_PIN_LENGTH];
        self.len = 0;
    }

    /// Number of accepted digits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no digits have been accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The accepted digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.digits[..self.len]).unwrap_or("")
    }

    /// Masked rendering, one `*` per accepted digit.
    #[must_use]
    pub fn masked(&self) -> String {
        "*".repeat(self.len)
    }

    /// Constant-time comparison against a stored PIN.
    #[must_use]
    pub fn matches(&self, pin: &PinCode) -> bool {
        self.as_str().as_bytes().ct_eq(pin.as_str().as_bytes()).into()
    }
}

impl Default for PinBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Enrollment sample position.
///
/// The sensor requires two images of the same finger; each is converted
/// into a numbered character buffer before the model is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SampleSlot {
    First = 1,
    Second = 2,
}

impl SampleSlot {
    /// Convert the sample slot to its sensor buffer number.
    #[inline]
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Zero-based index, for addressing sample arrays.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        (self as usize) - 1
    }
}

impl fmt::Display for SampleSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SampleSlot::First => write!(f, "First"),
            SampleSlot::Second => write!(f, "Second"),
        }
    }
}

/// Half-open hour-of-day window `[open_hour, close_hour)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessWindow {
    open_hour: u8,
    close_hour: u8,
}

impl AccessWindow {
    /// Create a new access window with validation.
    ///
    /// # Errors
    /// Returns `Error::Config` if the hours are out of range or the
    /// window is empty.
    pub fn new(open_hour: u8, close_hour: u8) -> Result<Self> {
        if open_hour >= 24 || close_hour > 24 {
            return Err(Error::Config(format!(
                "Window hours out of range: {open_hour}..{close_hour}"
            )));
        }
        if open_hour >= close_hour {
            return Err(Error::Config(format!(
                "Window must be non-empty: {open_hour}..{close_hour}"
            )));
        }
        Ok(AccessWindow {
            open_hour,
            close_hour,
        })
    }

    /// Returns `true` when `hour` falls inside the window.
    ///
    /// The opening hour is included, the closing hour is not.
    #[must_use]
    pub fn contains(&self, hour: u8) -> bool {
        hour >= self.open_hour && hour < self.close_hour
    }

    /// Opening hour (inclusive).
    #[must_use]
    pub fn open_hour(&self) -> u8 {
        self.open_hour
    }

    /// Closing hour (exclusive).
    #[must_use]
    pub fn close_hour(&self) -> u8 {
        self.close_hour
    }
}

impl fmt::Display for AccessWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.open_hour, self.close_hour)
    }
}
