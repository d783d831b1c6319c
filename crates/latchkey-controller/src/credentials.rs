//! Master PIN storage.

use latchkey_core::{PinBuffer, PinCode};

/// Holds the master PIN.
///
/// Verification is constant-time. The PIN changes only when a completed
/// PIN-change flow commits a replacement; a cancelled flow never touches
/// it.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    pin: PinCode,
}

impl CredentialStore {
    /// Create a store holding the given PIN.
    pub fn new(pin: PinCode) -> Self {
        Self { pin }
    }

    /// Compare an entry buffer against the stored PIN in constant time.
    ///
    /// Exact equality; no prefix or padding rules.
    #[must_use]
    pub fn verify(&self, entered: &PinBuffer) -> bool {
        entered.matches(&self.pin)
    }

    /// Replace the stored PIN.
    pub fn set_pin(&mut self, pin: PinCode) {
        self.pin = pin;
    }

    /// The stored PIN.
    #[must_use]
    pub fn pin(&self) -> &PinCode {
        &self.pin
    }
}
