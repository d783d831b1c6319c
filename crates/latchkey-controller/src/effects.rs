//! Effects produced by the access controller.
//!
//! The state machine never touches hardware. Each transition returns a
//! list of [`Effect`] values describing what should happen; the runtime
//! performs them against the real (or mock) devices and feeds results
//! back as events. This keeps every flow testable by asserting on plain
//! data.

use latchkey_core::constants::*;
use latchkey_core::{SampleSlot, SlotId};
use std::fmt;
use std::time::Duration;

/// A side effect requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the panel contents with a screen.
    Render(Screen),

    /// Show a notice for a fixed duration, then report
    /// [`Event::NoticeElapsed`](crate::events::Event::NoticeElapsed).
    ShowNotice(Notice, Duration),

    /// Do nothing for a fixed duration (the finger-removal pause).
    Pause(Duration),

    /// Poll the sensor for a finger, identify it, and report an
    /// [`Event::Scan`](crate::events::Event::Scan). Gives up after the
    /// timeout.
    StartScan { timeout: Duration },

    /// Enumerate occupied slots from the sensor flash and report
    /// [`Event::SlotsLoaded`](crate::events::Event::SlotsLoaded).
    LoadSlots,

    /// Wait for a finger (no timeout; enrollment is supervised),
    /// convert it into the given sample buffer, and report an
    /// [`Event::Sensor`](crate::events::Event::Sensor).
    CaptureSample(SampleSlot),

    /// Combine the two samples into a model.
    CreateModel,

    /// Write the model into a slot.
    StoreTemplate(SlotId),

    /// Delete the template in a slot.
    DeleteTemplate(SlotId),

    /// Energize the lock relay, hold it for the duration, release it.
    OpenLock(Duration),
}

/// Which PIN the entry screen is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinPrompt {
    /// Menu access PIN.
    Enter,

    /// Current PIN, first step of the PIN-change flow.
    Old,

    /// Replacement PIN, second step of the PIN-change flow.
    New,
}

impl PinPrompt {
    fn text(self) -> &'static str {
        match self {
            PinPrompt::Enter => MSG_ENTER_PIN,
            PinPrompt::Old => MSG_OLD_PIN,
            PinPrompt::New => MSG_NEW_PIN,
        }
    }
}

/// A distinct panel layout.
///
/// One variant per screen the controller can show, carrying only the
/// data that varies. [`Screen::lines`] produces the two panel rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Idle screen with the current time.
    Idle { time: String },

    /// PIN entry with a masked digit count.
    PinEntry { prompt: PinPrompt, masked: usize },

    /// Operator main menu.
    MainMenu,

    /// Fingerprint management menu.
    FingerprintMenu,

    /// Waiting for a finger during verification.
    PlaceFinger,

    /// Access granted, lock about to open.
    AccessGranted,

    /// Enrollment is choosing a slot.
    AssigningId,

    /// Prompt for an enrollment sample.
    ScanFinger { again: bool },

    /// Lift the finger between samples.
    RemoveFinger,

    /// Removal flow is enumerating slots.
    LoadingIds,

    /// Removal browsing, cursor on this slot.
    RemoveBrowse { slot: SlotId },

    /// Removal confirmation for this slot.
    RemoveConfirm { slot: SlotId },
}

impl Screen {
    /// The two panel rows for this screen.
    pub fn lines(&self) -> (String, String) {
        match self {
            Screen::Idle { time } => (
                MSG_IDLE_MENU.to_string(),
                format!("{MSG_IDLE_OPEN}{time}"),
            ),
            Screen::PinEntry { prompt, masked } => {
                (prompt.text().to_string(), "*".repeat(*masked))
            }
            Screen::MainMenu => (
                MSG_MENU_FINGERPRINT.to_string(),
                MSG_MENU_CHANGE_PIN.to_string(),
            ),
            Screen::FingerprintMenu => (
                MSG_MENU_ADD_FINGER.to_string(),
                MSG_MENU_REMOVE_FINGER.to_string(),
            ),
            Screen::PlaceFinger => (MSG_PLACE_FINGER.to_string(), String::new()),
            Screen::AccessGranted => (MSG_ACCESS_GRANTED.to_string(), String::new()),
            Screen::AssigningId => (MSG_ASSIGNING_ID.to_string(), String::new()),
            Screen::ScanFinger { again } => (
                MSG_SCAN_FINGER.to_string(),
                if *again {
                    MSG_SCAN_AGAIN.to_string()
                } else {
                    String::new()
                },
            ),
            Screen::RemoveFinger => (MSG_REMOVE_FINGER.to_string(), String::new()),
            Screen::LoadingIds => (MSG_LOADING_IDS.to_string(), String::new()),
            Screen::RemoveBrowse { slot } => {
                (format!("{MSG_ID_PREFIX}{slot}"), MSG_REMOVE_NAV.to_string())
            }
            Screen::RemoveConfirm { slot } => (
                format!("{MSG_DELETE_PREFIX}{slot}"),
                MSG_CONFIRM_NAV.to_string(),
            ),
        }
    }
}

/// A fixed-duration message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// `#` pressed outside the access window.
    NoTimeslot,

    /// Scanned finger matched nothing.
    NoMatch,

    /// No finger within the scan timeout.
    ScanTimeout,

    /// Menu PIN accepted.
    MenuAccess,

    /// Menu PIN rejected.
    WrongPin,

    /// Old PIN rejected during PIN change.
    WrongOldPin,

    /// New PIN committed.
    PinChanged,

    /// Every slot is occupied.
    NoFreeSlots,

    /// No templates enrolled.
    NoFinger,

    /// Enrollment sample capture failed.
    CaptureError,

    /// Model creation failed.
    ModelError,

    /// Template store failed.
    StoreError,

    /// Enrollment finished into this slot.
    FingerAdded(SlotId),

    /// The template in this slot was deleted.
    Deleted(SlotId),

    /// Template deletion failed.
    DeleteFailed,
}

impl Notice {
    /// The two panel rows for this notice.
    pub fn lines(&self) -> (String, String) {
        match self {
            Notice::NoTimeslot => (MSG_NO_TIMESLOT.to_string(), MSG_WINDOW_HOURS.to_string()),
            Notice::NoMatch => (MSG_NO_MATCH.to_string(), String::new()),
            Notice::ScanTimeout => (MSG_TIMEOUT.to_string(), String::new()),
            Notice::MenuAccess => (MSG_MENU_ACCESS.to_string(), String::new()),
            Notice::WrongPin => (MSG_WRONG_PIN.to_string(), String::new()),
            Notice::WrongOldPin => (MSG_WRONG_OLD_PIN.to_string(), String::new()),
            Notice::PinChanged => (MSG_PIN_CHANGED.to_string(), String::new()),
            Notice::NoFreeSlots => (MSG_NO_FREE_IDS.to_string(), String::new()),
            Notice::NoFinger => (MSG_NO_FINGER.to_string(), String::new()),
            Notice::CaptureError => (MSG_ERROR_CAPTURING.to_string(), String::new()),
            Notice::ModelError => (MSG_ERROR_CREATING.to_string(), String::new()),
            Notice::StoreError => (MSG_STORE_FAILED.to_string(), String::new()),
            Notice::FingerAdded(slot) => (
                MSG_FINGER_ADDED.to_string(),
                format!("{MSG_ID_PREFIX}{slot}"),
            ),
            Notice::Deleted(slot) => (format!("ID {slot} Deleted"), String::new()),
            Notice::DeleteFailed => (MSG_DELETE_FAILED.to_string(), String::new()),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: u8) -> SlotId {
        SlotId::new(id).unwrap()
    }

    #[test]
    fn test_idle_screen_lines() {
        let screen = Screen::Idle {
            time: "12:34:56".to_string(),
        };
        let (line1, line2) = screen.lines();
        assert_eq!(line1, "* for Menu");
        assert_eq!(line2, "# for Open 12:34:56");
    }

    #[test]
    fn test_pin_entry_masking() {
        let screen = Screen::PinEntry {
            prompt: PinPrompt::Enter,
            masked: 4,
        };
        assert_eq!(screen.lines(), ("Enter PIN:".to_string(), "****".to_string()));
    }

    #[test]
    fn test_pin_prompts_differ() {
        let prompts = [PinPrompt::Enter, PinPrompt::Old, PinPrompt::New];
        let texts: Vec<&str> = prompts.iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["Enter PIN:", "Old PIN:", "New PIN:"]);
    }

    #[test]
    fn test_remove_screens_carry_slot() {
        let (line1, line2) = Screen::RemoveBrowse { slot: slot(12) }.lines();
        assert_eq!(line1, "ID: 12");
        assert_eq!(line2, "Nav: A/B    -> #");

        let (line1, line2) = Screen::RemoveConfirm { slot: slot(12) }.lines();
        assert_eq!(line1, "Delete ID: 12");
        assert_eq!(line2, "No: *  |  Yes: #");
    }

    #[test]
    fn test_notice_lines() {
        assert_eq!(
            Notice::NoTimeslot.lines(),
            ("No Timeslot".to_string(), "Access: 8AM-8PM".to_string())
        );
        assert_eq!(
            Notice::FingerAdded(slot(3)).lines(),
            ("Finger Added".to_string(), "ID: 3".to_string())
        );
        assert_eq!(
            Notice::Deleted(slot(7)).lines(),
            ("ID 7 Deleted".to_string(), String::new())
        );
    }

    #[test]
    fn test_notice_display_is_first_line() {
        assert_eq!(Notice::WrongPin.to_string(), "Wrong PIN");
    }
}
