//! End-to-end flows through the runtime and mock devices.
//!
//! These tests drive [`Runtime`] the way the firmware loop would:
//! queue key presses, step the loop, and assert on what the panel,
//! lock, and sensor flash ended up doing. Time is paused, so scan
//! timeouts and notice durations elapse instantly.

use std::time::Duration;

use latchkey_controller::{ControllerConfig, Mode, Runtime};
use latchkey_core::SlotId;
use latchkey_hardware::mock::{
    MockClock, MockClockHandle, MockKeypad, MockKeypadHandle, MockLock, MockLockHandle,
    MockSensor, MockSensorHandle, PanelDisplay, PanelDisplayHandle,
};

type MockRuntime = Runtime<MockKeypad, MockSensor, PanelDisplay, MockClock, MockLock>;

struct Handles {
    keypad: MockKeypadHandle,
    sensor: MockSensorHandle,
    display: PanelDisplayHandle,
    clock: MockClockHandle,
    lock: MockLockHandle,
}

/// A runtime wired to mock devices, clock at noon.
fn rig() -> (MockRuntime, Handles) {
    let (keypad, keypad_handle) = MockKeypad::new();
    let (sensor, sensor_handle) = MockSensor::new();
    let (display, display_handle) = PanelDisplay::new();
    let (clock, clock_handle) = MockClock::new();
    let (lock, lock_handle) = MockLock::new();

    let runtime = Runtime::new(
        ControllerConfig::default(),
        keypad,
        sensor,
        display,
        clock,
        lock,
    )
    .unwrap();

    (
        runtime,
        Handles {
            keypad: keypad_handle,
            sensor: sensor_handle,
            display: display_handle,
            clock: clock_handle,
            lock: lock_handle,
        },
    )
}

fn slot(id: u8) -> SlotId {
    SlotId::new(id).unwrap()
}

/// Run enough steps to consume every queued key (one key per step).
async fn step_times(runtime: &mut MockRuntime, n: usize) {
    for _ in 0..n {
        runtime.step().await.unwrap();
    }
}

/// Queue a key sequence and step it through the loop.
async fn press(runtime: &mut MockRuntime, handles: &Handles, keys: &str) {
    handles.keypad.press_str(keys).await.unwrap();
    step_times(runtime, keys.len()).await;
}

#[tokio::test(start_paused = true)]
async fn test_idle_screen_shows_time() {
    let (mut runtime, handles) = rig();
    handles.clock.set_time("12:34:56");

    runtime.step().await.unwrap();

    assert_eq!(handles.display.line(0), "* for Menu");
    // The panel clips at 16 columns.
    assert_eq!(handles.display.line(1), "# for Open 12:34");
}

#[tokio::test(start_paused = true)]
async fn test_matching_finger_pulses_lock() {
    let (mut runtime, handles) = rig();
    handles.sensor.seed_template(slot(5), b"alice".to_vec());
    handles.sensor.place_finger(b"alice".to_vec());

    press(&mut runtime, &handles, "#").await;

    assert_eq!(handles.lock.transitions(), vec![true, false]);
    assert!(handles.display.contains("Access Granted"));
    assert_eq!(runtime.machine().mode(), &Mode::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_finger_keeps_lock_closed() {
    let (mut runtime, handles) = rig();
    handles.sensor.seed_template(slot(5), b"alice".to_vec());
    handles.sensor.place_finger(b"mallory".to_vec());

    press(&mut runtime, &handles, "#").await;

    assert!(handles.lock.transitions().is_empty());
    assert_eq!(runtime.machine().mode(), &Mode::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_scan_times_out_without_finger() {
    let (mut runtime, handles) = rig();
    let started = tokio::time::Instant::now();

    press(&mut runtime, &handles, "#").await;

    // Scan timeout plus the timeout notice.
    assert!(started.elapsed() >= Duration::from_millis(5000 + 2000));
    assert!(handles.lock.transitions().is_empty());
    assert_eq!(runtime.machine().mode(), &Mode::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_outside_window_never_scans() {
    let (mut runtime, handles) = rig();
    handles.clock.set_hour(21);
    handles.sensor.seed_template(slot(5), b"alice".to_vec());
    let started = tokio::time::Instant::now();

    press(&mut runtime, &handles, "#").await;

    // Only the restriction notice elapsed; a scan would have taken the
    // full timeout.
    assert_eq!(started.elapsed(), Duration::from_millis(3000));
    assert!(handles.lock.transitions().is_empty());
    assert_eq!(runtime.machine().mode(), &Mode::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_master_pin_opens_menu() {
    let (mut runtime, handles) = rig();

    press(&mut runtime, &handles, "*9999#").await;

    assert_eq!(runtime.machine().mode(), &Mode::MainMenu);
    assert_eq!(handles.display.line(0), "1: Fingerprint");
    assert_eq!(handles.display.line(1), "2: Change PIN");
}

#[tokio::test(start_paused = true)]
async fn test_wrong_pin_returns_to_idle() {
    let (mut runtime, handles) = rig();

    press(&mut runtime, &handles, "*0000#").await;

    assert_eq!(runtime.machine().mode(), &Mode::Idle);
    assert_eq!(handles.display.line(0), "* for Menu");
}

#[tokio::test(start_paused = true)]
async fn test_enrollment_stores_into_lowest_free_slot() {
    let (mut runtime, handles) = rig();
    handles.sensor.seed_template(slot(0), b"a".to_vec());
    handles.sensor.seed_template(slot(1), b"b".to_vec());
    handles.sensor.seed_template(slot(2), b"c".to_vec());

    // Both enrollment samples must already be on the platen; the
    // capture loop holds the step until a finger arrives.
    handles.sensor.place_finger(b"dave".to_vec());
    handles.sensor.place_finger(b"dave".to_vec());

    press(&mut runtime, &handles, "*9999#").await;
    press(&mut runtime, &handles, "11").await;

    assert!(handles.sensor.contains(slot(3)));
    assert_eq!(handles.sensor.template_count(), 4);
    assert_eq!(runtime.machine().mode(), &Mode::FingerprintMenu);

    // The enrolled finger now unlocks the door.
    press(&mut runtime, &handles, "*").await;
    handles.sensor.place_finger(b"dave".to_vec());
    press(&mut runtime, &handles, "#").await;
    assert_eq!(handles.lock.activation_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_enrollment_store_failure_reports_and_returns() {
    let (mut runtime, handles) = rig();
    handles.sensor.place_finger(b"dave".to_vec());
    handles.sensor.place_finger(b"dave".to_vec());
    handles.sensor.fail_next_store();

    press(&mut runtime, &handles, "*9999#").await;
    press(&mut runtime, &handles, "11").await;

    assert_eq!(handles.sensor.template_count(), 0);
    assert_eq!(runtime.machine().mode(), &Mode::FingerprintMenu);
}

#[tokio::test(start_paused = true)]
async fn test_removal_deletes_selected_slot() {
    let (mut runtime, handles) = rig();
    handles.sensor.seed_template(slot(3), b"a".to_vec());
    handles.sensor.seed_template(slot(7), b"b".to_vec());
    handles.sensor.seed_template(slot(12), b"c".to_vec());

    press(&mut runtime, &handles, "*9999#").await;
    press(&mut runtime, &handles, "12").await; // fingerprint menu -> remove
    assert_eq!(handles.display.line(0), "ID: 3");

    // Navigate forward twice, confirm, delete.
    press(&mut runtime, &handles, "AA").await;
    assert_eq!(handles.display.line(0), "ID: 12");
    press(&mut runtime, &handles, "#").await;
    assert_eq!(handles.display.line(0), "Delete ID: 12");
    press(&mut runtime, &handles, "#").await;

    assert_eq!(handles.sensor.occupied_slots(), vec![slot(3), slot(7)]);
    assert_eq!(runtime.machine().mode(), &Mode::FingerprintMenu);
}

#[tokio::test(start_paused = true)]
async fn test_removal_with_empty_flash_returns_to_menu() {
    let (mut runtime, handles) = rig();

    press(&mut runtime, &handles, "*9999#").await;
    press(&mut runtime, &handles, "12").await;

    assert_eq!(runtime.machine().mode(), &Mode::FingerprintMenu);
    assert_eq!(handles.display.line(0), "1: Add Finger");
}

#[tokio::test(start_paused = true)]
async fn test_pin_change_takes_effect() {
    let (mut runtime, handles) = rig();

    press(&mut runtime, &handles, "*9999#").await;
    press(&mut runtime, &handles, "2").await;
    press(&mut runtime, &handles, "9999#").await; // old PIN
    press(&mut runtime, &handles, "1234#").await; // new PIN
    assert_eq!(runtime.machine().mode(), &Mode::Idle);

    // The old PIN no longer opens the menu; the new one does.
    press(&mut runtime, &handles, "*9999#").await;
    assert_eq!(runtime.machine().mode(), &Mode::Idle);
    press(&mut runtime, &handles, "*1234#").await;
    assert_eq!(runtime.machine().mode(), &Mode::MainMenu);
}

#[tokio::test(start_paused = true)]
async fn test_pin_change_cancel_keeps_old_pin() {
    let (mut runtime, handles) = rig();

    press(&mut runtime, &handles, "*9999#").await;
    press(&mut runtime, &handles, "2").await;
    press(&mut runtime, &handles, "9999#").await;
    press(&mut runtime, &handles, "1234*").await; // cancel before commit
    assert_eq!(runtime.machine().mode(), &Mode::Idle);

    press(&mut runtime, &handles, "*9999#").await;
    assert_eq!(runtime.machine().mode(), &Mode::MainMenu);
}

#[tokio::test(start_paused = true)]
async fn test_pin_entry_masks_digits() {
    let (mut runtime, handles) = rig();

    press(&mut runtime, &handles, "*123").await;

    assert_eq!(handles.display.line(0), "Enter PIN:");
    assert_eq!(handles.display.line(1), "***");
}

#[tokio::test(start_paused = true)]
async fn test_custom_config_window() {
    let (keypad, keypad_handle) = MockKeypad::new();
    let (sensor, _sensor_handle) = MockSensor::new();
    let (display, _display_handle) = PanelDisplay::new();
    let (clock, clock_handle) = MockClock::new();
    let (lock, lock_handle) = MockLock::new();

    let config = ControllerConfig {
        open_hour: 0,
        close_hour: 24,
        ..Default::default()
    };
    let mut runtime = Runtime::new(config, keypad, sensor, display, clock, lock).unwrap();

    // Midnight is inside a 24-hour window.
    clock_handle.set_hour(0);
    keypad_handle.press_str("#").await.unwrap();
    runtime.step().await.unwrap();

    // No finger, so the scan times out, but it did start.
    assert!(lock_handle.transitions().is_empty());
    assert_eq!(runtime.machine().mode(), &Mode::Idle);
}
