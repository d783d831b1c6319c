//! Mock lock relay for testing and development.

use crate::{Result, traits::LockActuator};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct LockInner {
    active: bool,

    /// Every state the relay was switched to, in order
    transitions: Vec<bool>,
}

/// Mock lock relay that records every switch for assertions.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockLock;
/// use latchkey_hardware::traits::LockActuator;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut lock, handle) = MockLock::new();
///
///     lock.set_active(true).await?;
///     assert!(handle.is_active());
///
///     lock.set_active(false).await?;
///     assert_eq!(handle.transitions(), vec![true, false]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockLock {
    inner: Arc<Mutex<LockInner>>,
}

impl MockLock {
    /// Create a new mock lock, initially released.
    pub fn new() -> (Self, MockLockHandle) {
        let inner = Arc::new(Mutex::new(LockInner::default()));

        let lock = Self {
            inner: Arc::clone(&inner),
        };

        let handle = MockLockHandle { inner };

        (lock, handle)
    }

    fn lock(&self) -> MutexGuard<'_, LockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockLock {
    fn default() -> Self {
        Self::new().0
    }
}

impl LockActuator for MockLock {
    async fn set_active(&mut self, active: bool) -> Result<()> {
        let mut inner = self.lock();
        inner.active = active;
        inner.transitions.push(active);
        Ok(())
    }
}

/// Handle for observing a mock lock.
#[derive(Debug, Clone)]
pub struct MockLockHandle {
    inner: Arc<Mutex<LockInner>>,
}

impl MockLockHandle {
    fn lock(&self) -> MutexGuard<'_, LockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the relay is currently energized.
    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    /// Every state the relay was switched to, in order.
    pub fn transitions(&self) -> Vec<bool> {
        self.lock().transitions.clone()
    }

    /// Number of times the relay was energized.
    pub fn activation_count(&self) -> usize {
        self.lock().transitions.iter().filter(|&&a| a).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_lock_starts_released() {
        let (_lock, handle) = MockLock::new();

        assert!(!handle.is_active());
        assert!(handle.transitions().is_empty());
    }

    #[tokio::test]
    async fn test_mock_lock_records_transitions() {
        let (mut lock, handle) = MockLock::new();

        lock.set_active(true).await.unwrap();
        lock.set_active(false).await.unwrap();
        lock.set_active(true).await.unwrap();
        lock.set_active(false).await.unwrap();

        assert_eq!(handle.transitions(), vec![true, false, true, false]);
        assert_eq!(handle.activation_count(), 2);
        assert!(!handle.is_active());
    }
}
