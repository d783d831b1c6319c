//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware.

pub mod clock;
pub mod display;
pub mod keypad;
pub mod lock;
pub mod sensor;

// Re-export commonly used types
pub use clock::{MockClock, MockClockHandle};
pub use display::{PanelDisplay, PanelDisplayHandle};
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use lock::{MockLock, MockLockHandle};
pub use sensor::{MockSensor, MockSensorHandle};
