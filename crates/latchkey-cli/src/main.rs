//! Interactive controller demo.
//!
//! Runs the full access controller against mock peripherals and the
//! system clock, with stdin standing in for the keypad. Type keypad
//! characters (`0-9`, `A-D`, `*`, `#`) followed by Enter; `f` places a
//! demo finger on the sensor platen, `q` quits. The 16x2 panel is
//! echoed to the terminal whenever it changes.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use latchkey_controller::{ControllerConfig, Runtime};
use latchkey_hardware::mock::{
    MockKeypad, MockKeypadHandle, MockLock, MockLockHandle, MockSensor, MockSensorHandle,
    PanelDisplay, PanelDisplayHandle,
};
use latchkey_hardware::{Key, SystemClock};

/// Template bytes the `f` command places on the platen.
const DEMO_FINGER: &[u8] = b"demo-finger";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "latchkey=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("latchkey v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    let (keypad, keypad_handle) = MockKeypad::new();
    let (sensor, sensor_handle) = MockSensor::new();
    let (display, display_handle) = PanelDisplay::new();
    let (lock, lock_handle) = MockLock::new();

    let mut runtime = Runtime::new(config, keypad, sensor, display, SystemClock, lock)?;

    let input = tokio::spawn(read_input(keypad_handle, sensor_handle));
    let panel = tokio::spawn(echo_panel(display_handle, lock_handle));

    let controller = tokio::spawn(async move {
        if let Err(error) = runtime.run().await {
            error!(%error, "controller runtime failed");
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
        _ = input => {
            info!("input closed, shutting down");
        }
        _ = controller => {
            error!("controller exited unexpectedly");
        }
    }

    panel.abort();
    Ok(())
}

/// Load the controller configuration.
///
/// Reads the file named by `LATCHKEY_CONFIG` (default `latchkey.json`)
/// if it exists; otherwise the stock firmware defaults apply.
fn load_config() -> anyhow::Result<ControllerConfig> {
    let path = std::env::var("LATCHKEY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("latchkey.json"));

    if !path.exists() {
        info!("no config file at {}, using defaults", path.display());
        return Ok(ControllerConfig::default());
    }

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ControllerConfig =
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Bridge stdin to the keypad and sensor. Returns when stdin closes or
/// `q` is typed.
async fn read_input(keypad: MockKeypadHandle, sensor: MockSensorHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        for c in line.chars() {
            match c {
                'q' | 'Q' => return,
                'f' | 'F' => {
                    sensor.place_finger(DEMO_FINGER.to_vec());
                    info!("demo finger placed on platen");
                }
                c if c.is_whitespace() => {}
                c => match Key::from_char(c) {
                    Some(key) => {
                        if let Err(error) = keypad.press(key).await {
                            warn!(%error, "key press dropped");
                            return;
                        }
                    }
                    None => warn!(input = %c, "not a keypad character"),
                },
            }
        }
    }
}

/// Echo the panel to the terminal whenever its contents change, and
/// report lock transitions.
async fn echo_panel(display: PanelDisplayHandle, lock: MockLockHandle) {
    let mut shown: Vec<String> = Vec::new();
    let mut lock_active = false;
    loop {
        let lines = display.lines();
        if lines != shown {
            println!("+----------------+");
            for line in &lines {
                println!("|{line:<16}|");
            }
            println!("+----------------+");
            shown = lines;
        }

        let active = lock.is_active();
        if active != lock_active {
            println!("  [lock] {}", if active { "OPEN" } else { "closed" });
            lock_active = active;
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
