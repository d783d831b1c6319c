//! In-memory character panel for testing and development.
//!
//! Simulates a 16x2 LCD: a fixed character grid with positioned writes
//! and truncation at the row edge. The handle exposes the grid contents
//! so tests can assert on what the user would see.

use crate::{Result, traits::DisplayDevice};
use latchkey_core::constants::{DISPLAY_COLS, DISPLAY_ROWS};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct PanelInner {
    rows: u8,
    cols: u8,
    cells: Vec<Vec<char>>,
}

impl PanelInner {
    fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![' '; cols as usize]; rows as usize],
        }
    }

    fn line(&self, row: u8) -> String {
        self.cells
            .get(row as usize)
            .map(|cells| cells.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }
}

/// In-memory 16x2 character panel.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::PanelDisplay;
/// use latchkey_hardware::traits::DisplayDevice;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut panel, handle) = PanelDisplay::new();
///
///     panel.show_at(0, 0, "Enter PIN:").await?;
///     panel.show_at(1, 0, "****").await?;
///
///     assert_eq!(handle.line(0), "Enter PIN:");
///     assert_eq!(handle.line(1), "****");
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct PanelDisplay {
    inner: Arc<Mutex<PanelInner>>,
}

impl PanelDisplay {
    /// Create a new panel with the standard 16x2 geometry.
    pub fn new() -> (Self, PanelDisplayHandle) {
        Self::with_geometry(DISPLAY_ROWS, DISPLAY_COLS)
    }

    /// Create a new panel with a custom geometry.
    pub fn with_geometry(rows: u8, cols: u8) -> (Self, PanelDisplayHandle) {
        let inner = Arc::new(Mutex::new(PanelInner::new(rows, cols)));

        let panel = Self {
            inner: Arc::clone(&inner),
        };

        let handle = PanelDisplayHandle { inner };

        (panel, handle)
    }

    fn lock(&self) -> MutexGuard<'_, PanelInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PanelDisplay {
    fn default() -> Self {
        Self::new().0
    }
}

impl DisplayDevice for PanelDisplay {
    async fn show_at(&mut self, row: u8, col: u8, text: &str) -> Result<()> {
        let mut inner = self.lock();
        if row >= inner.rows || col >= inner.cols {
            return Err(crate::HardwareError::invalid_data(format!(
                "Position ({row},{col}) outside {}x{} panel",
                inner.rows, inner.cols
            )));
        }

        let cols = inner.cols as usize;
        let cells = &mut inner.cells[row as usize];
        for (offset, c) in text.chars().enumerate() {
            let pos = col as usize + offset;
            if pos >= cols {
                break; // truncate at the row edge
            }
            cells[pos] = c;
        }
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        let mut inner = self.lock();
        let (rows, cols) = (inner.rows, inner.cols);
        inner.cells = vec![vec![' '; cols as usize]; rows as usize];
        Ok(())
    }
}

/// Handle for reading a panel's contents.
#[derive(Debug, Clone)]
pub struct PanelDisplayHandle {
    inner: Arc<Mutex<PanelInner>>,
}

impl PanelDisplayHandle {
    fn lock(&self) -> MutexGuard<'_, PanelInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The text on a row, trailing blanks trimmed.
    pub fn line(&self, row: u8) -> String {
        self.lock().line(row)
    }

    /// Every row's text, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        let inner = self.lock();
        (0..inner.rows).map(|row| inner.line(row)).collect()
    }

    /// Whether any row contains the given text.
    pub fn contains(&self, text: &str) -> bool {
        self.lines().iter().any(|line| line.contains(text))
    }
}
