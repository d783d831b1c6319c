//! Core constants for the door lock controller.
//!
//! This module centralizes the values shared by the state machine, the
//! hardware layer, and the default configuration: credential limits,
//! template slot range, timing, the access window, and the fixed texts
//! shown on the 16x2 operator panel.
//!
//! # Usage
//!
//! ```
//! use latchkey_core::constants::*;
//! use std::time::Duration;
//!
//! let hold = Duration::from_millis(UNLOCK_HOLD_MS);
//! assert_eq!(hold.as_secs(), 5);
//! assert!((MAX_SLOT_ID as usize) < SLOT_CAPACITY);
//! ```

// ============================================================================
// Credential Constraints
// ============================================================================

/// Maximum PIN length (digits).
///
/// PIN entry saturates at this length; further digit presses are ignored.
///
/// # Value: 16 digits
pub const MAX_PIN_LENGTH: usize = 16;

/// Factory master PIN.
///
/// Grants access to the operator menu until changed through the
/// PIN-change flow.
pub const DEFAULT_MASTER_PIN: &str = "9999";

// ============================================================================
// Template Slots
// ============================================================================

/// Lowest valid template slot ID.
pub const MIN_SLOT_ID: u8 = 0;

/// Highest valid template slot ID.
///
/// The sensor's template flash holds slots 0..=127.
///
/// # Value: 127
pub const MAX_SLOT_ID: u8 = 127;

/// Total number of template slots.
///
/// # Value: 128
pub const SLOT_CAPACITY: usize = (MAX_SLOT_ID as usize) + 1;

// ============================================================================
// Access Window
// ============================================================================

/// Hour of day at which fingerprint access opens (inclusive).
///
/// # Value: 8 (08:00)
pub const DEFAULT_OPEN_HOUR: u8 = 8;

/// Hour of day at which fingerprint access closes (exclusive).
///
/// # Value: 20 (20:00)
pub const DEFAULT_CLOSE_HOUR: u8 = 20;

// ============================================================================
// Timing
// ============================================================================

/// How long the relay holds the lock open after a granted access
/// (milliseconds).
///
/// # Value: 5000ms (5 seconds)
pub const UNLOCK_HOLD_MS: u64 = 5000;

/// Maximum wait for a finger during verification (milliseconds).
///
/// Enrollment capture has no such bound; an operator supervises it.
///
/// # Value: 5000ms (5 seconds)
pub const SCAN_TIMEOUT_MS: u64 = 5000;

/// Display duration for short notices such as "Wrong PIN" (milliseconds).
///
/// # Value: 2000ms (2 seconds)
pub const NOTICE_SHORT_MS: u64 = 2000;

/// Display duration for notices the user must read, such as the
/// access-window restriction (milliseconds).
///
/// # Value: 3000ms (3 seconds)
pub const NOTICE_LONG_MS: u64 = 3000;

/// Pause between the two enrollment samples, while the user lifts the
/// finger off the sensor (milliseconds).
///
/// # Value: 2000ms (2 seconds)
pub const SAMPLE_PAUSE_MS: u64 = 2000;

/// Main loop polling interval (milliseconds).
///
/// # Value: 50ms
pub const POLL_INTERVAL_MS: u64 = 50;

// ============================================================================
// Panel Geometry
// ============================================================================

/// Panel rows.
pub const DISPLAY_ROWS: u8 = 2;

/// Panel columns.
pub const DISPLAY_COLS: u8 = 16;

// ============================================================================
// Panel Messages
// ============================================================================

/// Idle screen, first line.
pub const MSG_IDLE_MENU: &str = "* for Menu";

/// Idle screen, second line prefix; the current time follows.
pub const MSG_IDLE_OPEN: &str = "# for Open ";

/// Shown when `#` is pressed outside the access window.
pub const MSG_NO_TIMESLOT: &str = "No Timeslot";

/// Second line of the access-window restriction notice.
pub const MSG_WINDOW_HOURS: &str = "Access: 8AM-8PM";

/// Prompt while waiting for a finger during verification.
pub const MSG_PLACE_FINGER: &str = "Place Finger...";

/// Shown when a scanned finger matched a stored template.
pub const MSG_ACCESS_GRANTED: &str = "Access Granted";

/// Shown when a scanned finger matched no stored template.
pub const MSG_NO_MATCH: &str = "No Match Found";

/// Shown when no finger arrived within the scan timeout.
pub const MSG_TIMEOUT: &str = "Timeout";

/// Menu PIN prompt.
pub const MSG_ENTER_PIN: &str = "Enter PIN:";

/// Shown when the entered menu PIN did not match.
pub const MSG_WRONG_PIN: &str = "Wrong PIN";

/// Shown when the menu PIN matched.
pub const MSG_MENU_ACCESS: &str = "Menu Access";

/// Main menu, first line.
pub const MSG_MENU_FINGERPRINT: &str = "1: Fingerprint";

/// Main menu, second line.
pub const MSG_MENU_CHANGE_PIN: &str = "2: Change PIN";

/// Fingerprint menu, first line.
pub const MSG_MENU_ADD_FINGER: &str = "1: Add Finger";

/// Fingerprint menu, second line.
pub const MSG_MENU_REMOVE_FINGER: &str = "2: Remove Finger";

/// Shown while the enrollment flow looks for a free slot.
pub const MSG_ASSIGNING_ID: &str = "Assigning ID...";

/// Shown when every template slot is occupied.
pub const MSG_NO_FREE_IDS: &str = "No Free IDs";

/// Prompt for the first enrollment sample.
pub const MSG_SCAN_FINGER: &str = "Scan Finger";

/// Second line of the prompt for the second enrollment sample.
pub const MSG_SCAN_AGAIN: &str = "Again";

/// Shown between enrollment samples.
pub const MSG_REMOVE_FINGER: &str = "Remove Finger";

/// Shown when image capture or conversion failed during enrollment.
pub const MSG_ERROR_CAPTURING: &str = "Error Capturing";

/// Shown when the two samples could not be combined into a model.
pub const MSG_ERROR_CREATING: &str = "Error Creating";

/// Shown when writing the model to a template slot failed.
pub const MSG_STORE_FAILED: &str = "Store Failed";

/// Shown after a successful enrollment; the slot ID follows on line two.
pub const MSG_FINGER_ADDED: &str = "Finger Added";

/// Prefix for the assigned slot ID line.
pub const MSG_ID_PREFIX: &str = "ID: ";

/// Shown while the removal flow enumerates occupied slots.
pub const MSG_LOADING_IDS: &str = "Loading IDs...";

/// Shown when no templates are enrolled.
pub const MSG_NO_FINGER: &str = "No Finger";

/// Removal browsing, second line (navigation hint).
pub const MSG_REMOVE_NAV: &str = "Nav: A/B    -> #";

/// Removal confirmation prompt prefix; the slot ID follows.
pub const MSG_DELETE_PREFIX: &str = "Delete ID: ";

/// Removal confirmation, second line.
pub const MSG_CONFIRM_NAV: &str = "No: *  |  Yes: #";

/// Shown when deleting a template failed.
pub const MSG_DELETE_FAILED: &str = "Delete Failed";

/// Prompt for the current PIN in the PIN-change flow.
pub const MSG_OLD_PIN: &str = "Old PIN:";

/// Prompt for the replacement PIN in the PIN-change flow.
pub const MSG_NEW_PIN: &str = "New PIN:";

/// Shown after the PIN-change flow committed.
pub const MSG_PIN_CHANGED: &str = "PIN Changed";

/// Shown when the old-PIN check failed.
pub const MSG_WRONG_OLD_PIN: &str = "Wrong Old PIN";
