//! Error types for hardware operations.
//!
//! This module defines error types specific to hardware device operations,
//! covering failure scenarios such as device disconnection, timeouts,
//! sensor capture problems, and template storage faults.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Operation timed out after specified duration.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Operation is not supported by this device.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Invalid data received from device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Fingerprint image capture or conversion error.
    #[error("Capture error: {message}")]
    CaptureError { message: String },

    /// Template flash read/write error.
    #[error("Storage error: {message}")]
    StorageError { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new capture error.
    pub fn capture(message: impl Into<String>) -> Self {
        Self::CaptureError {
            message: message.into(),
        }
    }

    /// Create a new storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("R307S");
        assert!(matches!(error, HardwareError::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: R307S");
    }

    #[test]
    fn test_timeout_error() {
        let error = HardwareError::timeout(5000);
        assert!(matches!(error, HardwareError::Timeout { .. }));
        assert_eq!(error.to_string(), "Operation timeout after 5000ms");
    }

    #[test]
    fn test_capture_error() {
        let error = HardwareError::capture("no image in buffer");
        assert!(matches!(error, HardwareError::CaptureError { .. }));
        assert_eq!(error.to_string(), "Capture error: no image in buffer");
    }

    #[test]
    fn test_storage_error() {
        let error = HardwareError::storage("flash write failed");
        assert!(matches!(error, HardwareError::StorageError { .. }));
        assert_eq!(error.to_string(), "Storage error: flash write failed");
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            HardwareError::disconnected("Device1"),
            HardwareError::timeout(1000),
            HardwareError::unsupported("operation"),
            HardwareError::communication("serial port closed"),
        ];

        for error in errors {
            let _ = format!("{}", error);
            let _ = format!("{:?}", error);
        }
    }
}
