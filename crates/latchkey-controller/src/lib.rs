//! Access controller for the fingerprint door lock.
//!
//! The controller is split into a pure state machine and a thin async
//! runtime:
//!
//! - [`machine::AccessController`] holds the menu and authentication
//!   flows as explicit `(mode, event) -> (mode, effects)` transitions.
//!   It never touches hardware and is tested with plain assertions.
//! - [`runtime::Runtime`] polls the keypad and clock, performs the
//!   effects against the five hardware traits, and feeds results back
//!   as events.
//!
//! # Examples
//!
//! ```
//! use latchkey_controller::{AccessController, ControllerConfig, Event};
//! use latchkey_hardware::Key;
//!
//! let mut machine = AccessController::new(ControllerConfig::default()).unwrap();
//! machine.handle_event(Event::Clock {
//!     hour: 12,
//!     time: "12:00:00".to_string(),
//! });
//!
//! // '#' inside the access window starts a fingerprint scan.
//! let effects = machine.handle_event(Event::Key(Key::Hash));
//! assert_eq!(effects.len(), 2);
//! ```

pub mod config;
pub mod credentials;
pub mod effects;
pub mod events;
pub mod machine;
pub mod runtime;

pub use config::ControllerConfig;
pub use credentials::CredentialStore;
pub use effects::{Effect, Notice, PinPrompt, Screen};
pub use events::{Event, ScanOutcome, SensorEvent};
pub use machine::{AccessController, EnrollStep, Mode, PinChangeStep, RemoveStep, Resume};
pub use runtime::Runtime;
