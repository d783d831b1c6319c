//! Events consumed by the access controller.
//!
//! Everything the outside world can tell the state machine arrives as an
//! [`Event`]: key presses, clock ticks, and the results of sensor work
//! the runtime performed on the machine's behalf.

use latchkey_core::{SampleSlot, SlotId};
use latchkey_hardware::Key;

/// An input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed on the keypad.
    Key(Key),

    /// Periodic clock tick with the current hour and formatted time.
    Clock { hour: u8, time: String },

    /// A verification scan finished.
    Scan(ScanOutcome),

    /// A sensor operation requested by an enrollment or removal flow
    /// finished.
    Sensor(SensorEvent),

    /// Slot occupancy was enumerated from the sensor flash, ascending.
    SlotsLoaded(Vec<SlotId>),

    /// A timed notice finished displaying.
    NoticeElapsed,
}

/// Result of a bounded verification scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The finger matched the template in this slot.
    Match(SlotId),

    /// A finger was scanned but matched no stored template.
    NoMatch,

    /// A finger was scanned but could not be processed.
    Failed,

    /// No finger arrived within the scan timeout.
    Timeout,
}

/// Result of a single sensor operation during enrollment or removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorEvent {
    /// An enrollment sample was captured and converted.
    SampleCaptured(SampleSlot),

    /// Capturing or converting an enrollment sample failed.
    CaptureFailed,

    /// The two samples were combined into a model.
    ModelCreated,

    /// The samples could not be combined.
    ModelFailed,

    /// The model was written to this slot.
    Stored(SlotId),

    /// Writing the model failed.
    StoreFailed,

    /// The template in this slot was deleted.
    Deleted(SlotId),

    /// Deleting the template failed.
    DeleteFailed,
}
