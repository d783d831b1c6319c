//! Mock keypad implementation for testing and development.
//!
//! This module provides a simulated keypad device that can be controlled
//! programmatically for testing without requiring physical hardware.

use crate::{
    Result,
    traits::{Key, KeypadDevice},
    types::DeviceInfo,
};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Mock keypad device for testing and development.
///
/// This device simulates a 4x4 matrix keypad by receiving key presses
/// through an internal channel. Tests and applications can press keys
/// programmatically using a `MockKeypadHandle`; the device reports them
/// one per poll, preserving order.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockKeypad;
/// use latchkey_hardware::traits::{Key, KeypadDevice};
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.press(Key::Digit(9)).await?;
///     handle.press(Key::Hash).await?;
///
///     assert_eq!(keypad.poll_key().await?, Some(Key::Digit(9)));
///     assert_eq!(keypad.poll_key().await?, Some(Key::Hash));
///     assert_eq!(keypad.poll_key().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated key presses
    key_rx: mpsc::Receiver<Key>,

    /// Device name
    name: String,
}

impl MockKeypad {
    /// Create a new mock keypad with the default name.
    ///
    /// Returns a tuple of (MockKeypad, MockKeypadHandle) where the handle
    /// can be used to simulate key presses.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_hardware::mock::MockKeypad;
    ///
    /// let (keypad, handle) = MockKeypad::new();
    /// ```
    pub fn new() -> (Self, MockKeypadHandle) {
        Self::with_name("Mock Keypad".to_string())
    }

    /// Create a new mock keypad with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeypadHandle) {
        let (key_tx, key_rx) = mpsc::channel(32);

        let keypad = Self {
            key_rx,
            name: name.clone(),
        };

        let handle = MockKeypadHandle { key_tx, name };

        (keypad, handle)
    }
}

impl Default for MockKeypad {
    fn default() -> Self {
        Self::new().0
    }
}

impl KeypadDevice for MockKeypad {
    async fn poll_key(&mut self) -> Result<Option<Key>> {
        match self.key_rx.try_recv() {
            Ok(key) => Ok(Some(key)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(crate::HardwareError::disconnected(
                "Keypad input channel closed",
            )),
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Keypad v1.0").with_firmware_version("1.0.0"))
    }
}

/// Handle for controlling a mock keypad.
///
/// This handle allows programmatic control of the mock keypad by sending
/// key presses. It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated key presses
    key_tx: mpsc::Sender<Key>,

    /// Device name
    name: String,
}

impl MockKeypadHandle {
    /// Press a single key.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped and the channel is closed.
    pub async fn press(&self, key: Key) -> Result<()> {
        self.key_tx
            .send(key)
            .await
            .map_err(|_| crate::HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Press a sequence of digit keys.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any digit is greater than 9
    /// - The keypad has been dropped and the channel is closed
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_hardware::mock::MockKeypad;
    ///
    /// #[tokio::main]
    /// async fn main() -> latchkey_hardware::Result<()> {
    ///     let (_keypad, handle) = MockKeypad::new();
    ///
    ///     handle.press_digits(&[9, 9, 9, 9]).await?;
    ///
    ///     Ok(())
    /// }
    /// ```
    pub async fn press_digits(&self, digits: &[u8]) -> Result<()> {
        for &digit in digits {
            let key = Key::digit(digit)?;
            self.press(key).await?;
        }
        Ok(())
    }

    /// Press the keys spelled out by a string, e.g. `"9999#"`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any character is not on the 4x4 keypad
    /// - The keypad has been dropped and the channel is closed
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_hardware::mock::MockKeypad;
    ///
    /// #[tokio::main]
    /// async fn main() -> latchkey_hardware::Result<()> {
    ///     let (_keypad, handle) = MockKeypad::new();
    ///
    ///     handle.press_str("*9999#").await?;
    ///
    ///     Ok(())
    /// }
    /// ```
    pub async fn press_str(&self, keys: &str) -> Result<()> {
        for c in keys.chars() {
            let key = Key::from_char(c).ok_or_else(|| {
                crate::HardwareError::invalid_data(format!("Not a keypad character: {c:?}"))
            })?;
            self.press(key).await?;
        }
        Ok(())
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
