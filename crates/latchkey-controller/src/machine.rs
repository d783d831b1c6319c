//! Access controller state machine.
//!
//! This module provides the complete menu and authentication flow of the
//! door controller as a pure state machine: every transition is
//! `(mode, event) -> (mode, effects)`, with effects returned as data and
//! performed by the runtime. The machine owns the credential store and
//! the last observed clock reading, nothing else.
//!
//! # Modes
//!
//! - `Idle`: default screen, waiting for `*` (menu) or `#` (open)
//! - `MenuPinEntry`: collecting the menu PIN
//! - `MainMenu` / `FingerprintMenu`: operator menus
//! - `Verifying`: a bounded fingerprint scan is in flight
//! - `Enroll`: two-sample enrollment into the lowest free slot
//! - `Remove`: browse, confirm, delete a stored template
//! - `PinChange`: old-PIN check, then new-PIN entry and commit
//! - `Notice`: a fixed-duration message, resuming to a recorded mode
//!
//! # Examples
//!
//! ```
//! use latchkey_controller::{AccessController, ControllerConfig, Effect, Event, Screen};
//! use latchkey_hardware::Key;
//!
//! let mut machine = AccessController::new(ControllerConfig::default()).unwrap();
//!
//! let effects = machine.handle_event(Event::Key(Key::Star));
//! assert!(matches!(effects[0], Effect::Render(Screen::PinEntry { .. })));
//! ```

use std::fmt;

use latchkey_core::{AccessWindow, PinBuffer, PinCode, SampleSlot, SlotId};
use latchkey_hardware::Key;

use crate::config::ControllerConfig;
use crate::credentials::CredentialStore;
use crate::effects::{Effect, Notice, PinPrompt, Screen};
use crate::events::{Event, ScanOutcome, SensorEvent};

/// Enrollment flow position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollStep {
    /// Waiting for slot enumeration.
    Assigning,

    /// Waiting for a sample of the finger.
    WaitingSample { slot: SlotId, sample: SampleSlot },

    /// Waiting for the model to be built.
    CreatingModel { slot: SlotId },

    /// Waiting for the flash write.
    Storing { slot: SlotId },
}

/// Removal flow position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveStep {
    /// Waiting for slot enumeration.
    Loading,

    /// Cycling through occupied slots.
    Browsing { slots: Vec<SlotId>, cursor: usize },

    /// Confirmation prompt for the slot under the cursor.
    Confirming { slots: Vec<SlotId>, cursor: usize },

    /// Waiting for the flash erase.
    Deleting { slots: Vec<SlotId>, cursor: usize },
}

impl RemoveStep {
    fn current(slots: &[SlotId], cursor: usize) -> SlotId {
        slots[cursor]
    }
}

/// PIN-change flow position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinChangeStep {
    /// Collecting the current PIN.
    Old { entered: PinBuffer },

    /// Collecting the replacement PIN.
    New { entered: PinBuffer },
}

/// Where a notice resumes to when its timer elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resume {
    Idle,
    MainMenu,
    FingerprintMenu,

    /// Back into removal browsing with the cursor where it was.
    RemoveBrowse { slots: Vec<SlotId>, cursor: usize },
}

/// Top-level controller mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Default screen, waiting for `*` or `#`.
    Idle,

    /// Collecting the menu PIN.
    MenuPinEntry { entered: PinBuffer },

    /// Operator main menu.
    MainMenu,

    /// Fingerprint management menu.
    FingerprintMenu,

    /// A bounded verification scan is in flight.
    Verifying,

    /// Enrollment flow.
    Enroll(EnrollStep),

    /// Removal flow.
    Remove(RemoveStep),

    /// PIN-change flow.
    PinChange(PinChangeStep),

    /// A fixed-duration message is showing.
    Notice { resume: Resume },
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode_str = match self {
            Mode::Idle => "Idle",
            Mode::MenuPinEntry { .. } => "MenuPinEntry",
            Mode::MainMenu => "MainMenu",
            Mode::FingerprintMenu => "FingerprintMenu",
            Mode::Verifying => "Verifying",
            Mode::Enroll(_) => "Enroll",
            Mode::Remove(_) => "Remove",
            Mode::PinChange(_) => "PinChange",
            Mode::Notice { .. } => "Notice",
        };
        write!(f, "{}", mode_str)
    }
}

/// The door controller state machine.
///
/// Pure: [`handle_event`](Self::handle_event) is the only entry point,
/// and hardware work leaves as [`Effect`] values. One flow is active at
/// a time; events that make no sense in the current mode are ignored.
#[derive(Debug)]
pub struct AccessController {
    mode: Mode,
    credentials: CredentialStore,
    window: AccessWindow,
    config: ControllerConfig,

    /// Last observed hour of day, updated by clock events.
    hour: u8,

    /// Last observed formatted time, shown on the idle screen.
    time: String,
}

impl AccessController {
    /// Create a controller in `Idle` from a validated configuration.
    ///
    /// # Errors
    /// Returns an error if the configured master PIN or access window
    /// is invalid.
    pub fn new(config: ControllerConfig) -> latchkey_core::Result<Self> {
        let credentials = CredentialStore::new(config.pin()?);
        let window = config.window()?;
        Ok(Self {
            mode: Mode::Idle,
            credentials,
            window,
            config,
            hour: 0,
            time: "--:--:--".to_string(),
        })
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Current credential store.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Feed one event through the machine.
    ///
    /// Returns the effects the runtime must perform, in order. Clock
    /// events always update the stored hour and time, whatever the
    /// mode.
    pub fn handle_event(&mut self, event: Event) -> Vec<Effect> {
        if let Event::Clock { hour, time } = &event {
            self.hour = *hour;
            self.time = time.clone();
        }

        let mode = std::mem::replace(&mut self.mode, Mode::Idle);
        let (next, effects) = self.dispatch(mode, event);
        self.mode = next;
        effects
    }

    fn dispatch(&mut self, mode: Mode, event: Event) -> (Mode, Vec<Effect>) {
        match mode {
            Mode::Idle => self.on_idle(event),
            Mode::MenuPinEntry { entered } => self.on_menu_pin_entry(entered, event),
            Mode::MainMenu => self.on_main_menu(event),
            Mode::FingerprintMenu => self.on_fingerprint_menu(event),
            Mode::Verifying => self.on_verifying(event),
            Mode::Enroll(step) => self.on_enroll(step, event),
            Mode::Remove(step) => self.on_remove(step, event),
            Mode::PinChange(step) => self.on_pin_change(step, event),
            Mode::Notice { resume } => self.on_notice(resume, event),
        }
    }

    // ------------------------------------------------------------------
    // Per-mode handlers
    // ------------------------------------------------------------------

    fn on_idle(&self, event: Event) -> (Mode, Vec<Effect>) {
        match event {
            Event::Key(Key::Star) => (
                Mode::MenuPinEntry {
                    entered: PinBuffer::new(),
                },
                vec![Effect::Render(Screen::PinEntry {
                    prompt: PinPrompt::Enter,
                    masked: 0,
                })],
            ),
            Event::Key(Key::Hash) => {
                if self.window.contains(self.hour) {
                    (
                        Mode::Verifying,
                        vec![
                            Effect::Render(Screen::PlaceFinger),
                            Effect::StartScan {
                                timeout: self.config.scan_timeout(),
                            },
                        ],
                    )
                } else {
                    self.notice(Resume::Idle, Notice::NoTimeslot, self.config.notice_long())
                }
            }
            Event::Clock { .. } => (Mode::Idle, vec![Effect::Render(self.idle_screen())]),
            _ => (Mode::Idle, vec![]),
        }
    }

    fn on_menu_pin_entry(&mut self, mut entered: PinBuffer, event: Event) -> (Mode, Vec<Effect>) {
        match event {
            Event::Key(Key::Star) => (Mode::Idle, vec![Effect::Render(self.idle_screen())]),
            Event::Key(Key::Hash) => {
                if self.credentials.verify(&entered) {
                    self.notice(
                        Resume::MainMenu,
                        Notice::MenuAccess,
                        self.config.notice_short(),
                    )
                } else {
                    self.notice(Resume::Idle, Notice::WrongPin, self.config.notice_short())
                }
            }
            Event::Key(key) if Self::edit(&mut entered, key) => {
                let masked = entered.len();
                (
                    Mode::MenuPinEntry { entered },
                    vec![Effect::Render(Screen::PinEntry {
                        prompt: PinPrompt::Enter,
                        masked,
                    })],
                )
            }
            _ => (Mode::MenuPinEntry { entered }, vec![]),
        }
    }

    fn on_main_menu(&self, event: Event) -> (Mode, Vec<Effect>) {
        match event {
            Event::Key(Key::Digit(1)) => (
                Mode::FingerprintMenu,
                vec![Effect::Render(Screen::FingerprintMenu)],
            ),
            Event::Key(Key::Digit(2)) => (
                Mode::PinChange(PinChangeStep::Old {
                    entered: PinBuffer::new(),
                }),
                vec![Effect::Render(Screen::PinEntry {
                    prompt: PinPrompt::Old,
                    masked: 0,
                })],
            ),
            Event::Key(Key::Star) => (Mode::Idle, vec![Effect::Render(self.idle_screen())]),
            _ => (Mode::MainMenu, vec![]),
        }
    }

    fn on_fingerprint_menu(&self, event: Event) -> (Mode, Vec<Effect>) {
        match event {
            Event::Key(Key::Digit(1)) => (
                Mode::Enroll(EnrollStep::Assigning),
                vec![Effect::Render(Screen::AssigningId), Effect::LoadSlots],
            ),
            Event::Key(Key::Digit(2)) => (
                Mode::Remove(RemoveStep::Loading),
                vec![Effect::Render(Screen::LoadingIds), Effect::LoadSlots],
            ),
            Event::Key(Key::Star) => (Mode::Idle, vec![Effect::Render(self.idle_screen())]),
            _ => (Mode::FingerprintMenu, vec![]),
        }
    }

    fn on_verifying(&self, event: Event) -> (Mode, Vec<Effect>) {
        match event {
            Event::Scan(ScanOutcome::Match(_)) => (
                Mode::Idle,
                vec![
                    Effect::Render(Screen::AccessGranted),
                    Effect::OpenLock(self.config.unlock_hold()),
                ],
            ),
            Event::Scan(ScanOutcome::NoMatch) | Event::Scan(ScanOutcome::Failed) => {
                self.notice(Resume::Idle, Notice::NoMatch, self.config.notice_short())
            }
            Event::Scan(ScanOutcome::Timeout) => self.notice(
                Resume::Idle,
                Notice::ScanTimeout,
                self.config.notice_short(),
            ),
            _ => (Mode::Verifying, vec![]),
        }
    }

    fn on_enroll(&self, step: EnrollStep, event: Event) -> (Mode, Vec<Effect>) {
        match (step, event) {
            (EnrollStep::Assigning, Event::SlotsLoaded(occupied)) => {
                match SlotId::first_free(&occupied) {
                    Some(slot) => (
                        Mode::Enroll(EnrollStep::WaitingSample {
                            slot,
                            sample: SampleSlot::First,
                        }),
                        vec![
                            Effect::Render(Screen::ScanFinger { again: false }),
                            Effect::CaptureSample(SampleSlot::First),
                        ],
                    ),
                    None => self.notice(
                        Resume::FingerprintMenu,
                        Notice::NoFreeSlots,
                        self.config.notice_short(),
                    ),
                }
            }
            (
                EnrollStep::WaitingSample { slot, sample },
                Event::Sensor(SensorEvent::SampleCaptured(captured)),
            ) if captured == sample => match sample {
                SampleSlot::First => (
                    Mode::Enroll(EnrollStep::WaitingSample {
                        slot,
                        sample: SampleSlot::Second,
                    }),
                    vec![
                        Effect::Render(Screen::RemoveFinger),
                        Effect::Pause(self.config.sample_pause()),
                        Effect::Render(Screen::ScanFinger { again: true }),
                        Effect::CaptureSample(SampleSlot::Second),
                    ],
                ),
                SampleSlot::Second => (
                    Mode::Enroll(EnrollStep::CreatingModel { slot }),
                    vec![Effect::CreateModel],
                ),
            },
            (EnrollStep::WaitingSample { .. }, Event::Sensor(SensorEvent::CaptureFailed)) => self
                .notice(
                    Resume::FingerprintMenu,
                    Notice::CaptureError,
                    self.config.notice_short(),
                ),
            (EnrollStep::CreatingModel { slot }, Event::Sensor(SensorEvent::ModelCreated)) => (
                Mode::Enroll(EnrollStep::Storing { slot }),
                vec![Effect::StoreTemplate(slot)],
            ),
            (EnrollStep::CreatingModel { .. }, Event::Sensor(SensorEvent::ModelFailed)) => self
                .notice(
                    Resume::FingerprintMenu,
                    Notice::ModelError,
                    self.config.notice_short(),
                ),
            (EnrollStep::Storing { slot }, Event::Sensor(SensorEvent::Stored(_))) => self.notice(
                Resume::FingerprintMenu,
                Notice::FingerAdded(slot),
                self.config.notice_long(),
            ),
            (EnrollStep::Storing { .. }, Event::Sensor(SensorEvent::StoreFailed)) => self.notice(
                Resume::FingerprintMenu,
                Notice::StoreError,
                self.config.notice_short(),
            ),
            (step, _) => (Mode::Enroll(step), vec![]),
        }
    }

    fn on_remove(&self, step: RemoveStep, event: Event) -> (Mode, Vec<Effect>) {
        match (step, event) {
            (RemoveStep::Loading, Event::SlotsLoaded(slots)) => {
                if slots.is_empty() {
                    self.notice(
                        Resume::FingerprintMenu,
                        Notice::NoFinger,
                        self.config.notice_short(),
                    )
                } else {
                    let slot = slots[0];
                    (
                        Mode::Remove(RemoveStep::Browsing { slots, cursor: 0 }),
                        vec![Effect::Render(Screen::RemoveBrowse { slot })],
                    )
                }
            }
            (RemoveStep::Browsing { slots, cursor }, Event::Key(Key::A)) => {
                let cursor = (cursor + 1) % slots.len();
                let slot = RemoveStep::current(&slots, cursor);
                (
                    Mode::Remove(RemoveStep::Browsing { slots, cursor }),
                    vec![Effect::Render(Screen::RemoveBrowse { slot })],
                )
            }
            (RemoveStep::Browsing { slots, cursor }, Event::Key(Key::B)) => {
                let cursor = (cursor + slots.len() - 1) % slots.len();
                let slot = RemoveStep::current(&slots, cursor);
                (
                    Mode::Remove(RemoveStep::Browsing { slots, cursor }),
                    vec![Effect::Render(Screen::RemoveBrowse { slot })],
                )
            }
            (RemoveStep::Browsing { slots, cursor }, Event::Key(Key::Hash)) => {
                let slot = RemoveStep::current(&slots, cursor);
                (
                    Mode::Remove(RemoveStep::Confirming { slots, cursor }),
                    vec![Effect::Render(Screen::RemoveConfirm { slot })],
                )
            }
            (RemoveStep::Browsing { .. }, Event::Key(Key::Star)) => (
                Mode::FingerprintMenu,
                vec![Effect::Render(Screen::FingerprintMenu)],
            ),
            (RemoveStep::Confirming { slots, cursor }, Event::Key(Key::Hash)) => {
                let slot = RemoveStep::current(&slots, cursor);
                (
                    Mode::Remove(RemoveStep::Deleting { slots, cursor }),
                    vec![Effect::DeleteTemplate(slot)],
                )
            }
            (RemoveStep::Confirming { slots, cursor }, Event::Key(Key::Star)) => {
                let slot = RemoveStep::current(&slots, cursor);
                (
                    Mode::Remove(RemoveStep::Browsing { slots, cursor }),
                    vec![Effect::Render(Screen::RemoveBrowse { slot })],
                )
            }
            (RemoveStep::Deleting { .. }, Event::Sensor(SensorEvent::Deleted(slot))) => self
                .notice(
                    Resume::FingerprintMenu,
                    Notice::Deleted(slot),
                    self.config.notice_short(),
                ),
            (RemoveStep::Deleting { slots, cursor }, Event::Sensor(SensorEvent::DeleteFailed)) => {
                // Keep the list and cursor; the operator may retry.
                self.notice(
                    Resume::RemoveBrowse { slots, cursor },
                    Notice::DeleteFailed,
                    self.config.notice_short(),
                )
            }
            (step, _) => (Mode::Remove(step), vec![]),
        }
    }

    fn on_pin_change(&mut self, step: PinChangeStep, event: Event) -> (Mode, Vec<Effect>) {
        match step {
            PinChangeStep::Old { mut entered } => match event {
                Event::Key(Key::Star) => (Mode::Idle, vec![Effect::Render(self.idle_screen())]),
                Event::Key(Key::Hash) => {
                    if self.credentials.verify(&entered) {
                        (
                            Mode::PinChange(PinChangeStep::New {
                                entered: PinBuffer::new(),
                            }),
                            vec![Effect::Render(Screen::PinEntry {
                                prompt: PinPrompt::New,
                                masked: 0,
                            })],
                        )
                    } else {
                        self.notice(
                            Resume::Idle,
                            Notice::WrongOldPin,
                            self.config.notice_short(),
                        )
                    }
                }
                Event::Key(key) if Self::edit(&mut entered, key) => {
                    let masked = entered.len();
                    (
                        Mode::PinChange(PinChangeStep::Old { entered }),
                        vec![Effect::Render(Screen::PinEntry {
                            prompt: PinPrompt::Old,
                            masked,
                        })],
                    )
                }
                _ => (Mode::PinChange(PinChangeStep::Old { entered }), vec![]),
            },
            PinChangeStep::New { mut entered } => match event {
                // Cancel commits nothing; the old PIN stays.
                Event::Key(Key::Star) => (Mode::Idle, vec![Effect::Render(self.idle_screen())]),
                Event::Key(Key::Hash) => {
                    self.credentials.set_pin(PinCode::from(&entered));
                    self.notice(Resume::Idle, Notice::PinChanged, self.config.notice_short())
                }
                Event::Key(key) if Self::edit(&mut entered, key) => {
                    let masked = entered.len();
                    (
                        Mode::PinChange(PinChangeStep::New { entered }),
                        vec![Effect::Render(Screen::PinEntry {
                            prompt: PinPrompt::New,
                            masked,
                        })],
                    )
                }
                _ => (Mode::PinChange(PinChangeStep::New { entered }), vec![]),
            },
        }
    }

    fn on_notice(&self, resume: Resume, event: Event) -> (Mode, Vec<Effect>) {
        match event {
            Event::NoticeElapsed => match resume {
                Resume::Idle => (Mode::Idle, vec![Effect::Render(self.idle_screen())]),
                Resume::MainMenu => (Mode::MainMenu, vec![Effect::Render(Screen::MainMenu)]),
                Resume::FingerprintMenu => (
                    Mode::FingerprintMenu,
                    vec![Effect::Render(Screen::FingerprintMenu)],
                ),
                Resume::RemoveBrowse { slots, cursor } => {
                    let slot = RemoveStep::current(&slots, cursor);
                    (
                        Mode::Remove(RemoveStep::Browsing { slots, cursor }),
                        vec![Effect::Render(Screen::RemoveBrowse { slot })],
                    )
                }
            },
            // Input during a notice is ignored.
            _ => (Mode::Notice { resume }, vec![]),
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Apply an editing key to a PIN buffer.
    ///
    /// Returns `true` if the key was an editing key (digit, backspace,
    /// clear), whether or not it changed the buffer; saturated appends
    /// still re-render.
    fn edit(entered: &mut PinBuffer, key: Key) -> bool {
        match key {
            Key::Digit(d) => {
                entered.push(d);
                true
            }
            Key::B => {
                entered.backspace();
                true
            }
            Key::C => {
                entered.clear();
                true
            }
            _ => false,
        }
    }

    fn idle_screen(&self) -> Screen {
        Screen::Idle {
            time: self.time.clone(),
        }
    }

    fn notice(
        &self,
        resume: Resume,
        notice: Notice,
        duration: std::time::Duration,
    ) -> (Mode, Vec<Effect>) {
        (
            Mode::Notice { resume },
            vec![Effect::ShowNotice(notice, duration)],
        )
    }
}
