//! Mock fingerprint sensor implementation for testing and development.
//!
//! This module provides a simulated R307S-class sensor that can be
//! controlled programmatically for testing without requiring physical
//! hardware.

use crate::{
    Result,
    traits::FingerprintSensor,
    types::DeviceInfo,
};
use latchkey_core::{SampleSlot, SlotId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared sensor state.
///
/// Mirrors the on-module buffers of a real sensor: one image buffer,
/// two sample buffers, a model buffer, and the template flash. The
/// handle shares this state so tests can seed templates and observe
/// slot occupancy.
#[derive(Debug, Default)]
struct SensorInner {
    /// Template flash (slot -> template bytes)
    templates: HashMap<SlotId, Vec<u8>>,

    /// Fingers waiting on the sensor surface, in placement order
    fingers: VecDeque<Vec<u8>>,

    /// Image buffer, filled by capture
    image: Option<Vec<u8>>,

    /// Sample buffers, filled by conversion
    samples: [Option<Vec<u8>>; 2],

    /// Model buffer, filled by create_model
    model: Option<Vec<u8>>,

    /// One-shot failure injection flags
    fail_convert: bool,
    fail_model: bool,
    fail_store: bool,
    fail_delete: bool,
}

/// Mock fingerprint sensor for testing and development.
///
/// Finger placements are queued through a `MockSensorHandle`; each
/// successful `capture_image` consumes one placement. Templates live in
/// an in-memory flash shared with the handle.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockSensor;
/// use latchkey_hardware::traits::FingerprintSensor;
/// use latchkey_core::{SampleSlot, SlotId};
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut sensor, handle) = MockSensor::new();
///
///     let slot = SlotId::new(3).unwrap();
///     handle.seed_template(slot, vec![1, 2, 3]);
///
///     handle.place_finger(vec![1, 2, 3]);
///     assert!(sensor.capture_image().await?);
///     sensor.convert_image(SampleSlot::First).await?;
///
///     assert_eq!(sensor.search().await?, Some(slot));
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockSensor {
    inner: Arc<Mutex<SensorInner>>,

    /// Device name
    name: String,
}

impl MockSensor {
    /// Create a new mock sensor with the default name.
    ///
    /// Returns a tuple of (MockSensor, MockSensorHandle) where the handle
    /// can be used to place fingers, seed templates, and inject failures.
    pub fn new() -> (Self, MockSensorHandle) {
        Self::with_name("Mock Fingerprint Sensor".to_string())
    }

    /// Create a new mock sensor with a custom name.
    pub fn with_name(name: String) -> (Self, MockSensorHandle) {
        let inner = Arc::new(Mutex::new(SensorInner::default()));

        let sensor = Self {
            inner: Arc::clone(&inner),
            name,
        };

        let handle = MockSensorHandle { inner };

        (sensor, handle)
    }

    fn lock(&self) -> MutexGuard<'_, SensorInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockSensor {
    fn default() -> Self {
        Self::new().0
    }
}

impl FingerprintSensor for MockSensor {
    async fn capture_image(&mut self) -> Result<bool> {
        let mut inner = self.lock();
        match inner.fingers.pop_front() {
            Some(finger) => {
                inner.image = Some(finger);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn convert_image(&mut self, sample: SampleSlot) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_convert {
            inner.fail_convert = false;
            return Err(crate::HardwareError::capture("image too messy"));
        }
        let image = inner
            .image
            .take()
            .ok_or_else(|| crate::HardwareError::capture("no image in buffer"))?;
        inner.samples[sample.index()] = Some(image);
        Ok(())
    }

    async fn create_model(&mut self) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_model {
            inner.fail_model = false;
            return Err(crate::HardwareError::capture("samples do not combine"));
        }
        let (first, second) = (inner.samples[0].take(), inner.samples[1].take());
        match (first, second) {
            (Some(a), Some(b)) if a == b => {
                inner.model = Some(a);
                Ok(())
            }
            (Some(_), Some(_)) => Err(crate::HardwareError::capture("samples do not match")),
            _ => Err(crate::HardwareError::capture("missing sample")),
        }
    }

    async fn store_template(&mut self, slot: SlotId) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_store {
            inner.fail_store = false;
            return Err(crate::HardwareError::storage("flash write failed"));
        }
        let model = inner
            .model
            .take()
            .ok_or_else(|| crate::HardwareError::storage("no model in buffer"))?;
        inner.templates.insert(slot, model);
        Ok(())
    }

    async fn search(&mut self) -> Result<Option<SlotId>> {
        let mut inner = self.lock();
        let probe = match inner.samples[0].take() {
            Some(sample) => sample,
            None => return Err(crate::HardwareError::capture("no sample to search for")),
        };

        let mut slots: Vec<SlotId> = inner.templates.keys().copied().collect();
        slots.sort_by_key(SlotId::as_u8);

        for slot in slots {
            if inner.templates.get(&slot) == Some(&probe) {
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }

    async fn template_exists(&mut self, slot: SlotId) -> Result<bool> {
        Ok(self.lock().templates.contains_key(&slot))
    }

    async fn delete_template(&mut self, slot: SlotId) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_delete {
            inner.fail_delete = false;
            return Err(crate::HardwareError::storage("flash erase failed"));
        }
        inner
            .templates
            .remove(&slot)
            .map(|_| ())
            .ok_or_else(|| crate::HardwareError::storage(format!("slot {slot} is empty")))
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(
            DeviceInfo::new(self.name.clone(), "Mock Fingerprint Sensor v1.0")
                .with_firmware_version("1.0.0"),
        )
    }
}

/// Handle for controlling a mock sensor.
///
/// This handle shares the sensor's template flash, so tests can seed
/// templates, observe slot occupancy, queue finger placements, and
/// inject one-shot failures. It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockSensorHandle {
    inner: Arc<Mutex<SensorInner>>,
}

impl MockSensorHandle {
    fn lock(&self) -> MutexGuard<'_, SensorInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place a finger on the sensor.
    ///
    /// The placement is consumed by the next successful `capture_image`.
    /// Placing the same bytes twice simulates scanning the same finger
    /// for both enrollment samples.
    pub fn place_finger(&self, template: Vec<u8>) {
        self.lock().fingers.push_back(template);
    }

    /// Write a template directly into the flash, bypassing enrollment.
    pub fn seed_template(&self, slot: SlotId, template: Vec<u8>) {
        self.lock().templates.insert(slot, template);
    }

    /// Slots currently holding a template, in ascending order.
    pub fn occupied_slots(&self) -> Vec<SlotId> {
        let mut slots: Vec<SlotId> = self.lock().templates.keys().copied().collect();
        slots.sort_by_key(SlotId::as_u8);
        slots
    }

    /// Check whether a slot holds a template.
    pub fn contains(&self, slot: SlotId) -> bool {
        self.lock().templates.contains_key(&slot)
    }

    /// Number of stored templates.
    pub fn template_count(&self) -> usize {
        self.lock().templates.len()
    }

    /// Remove every stored template.
    pub fn clear_templates(&self) {
        self.lock().templates.clear();
    }

    /// Make the next `convert_image` fail.
    pub fn fail_next_convert(&self) {
        self.lock().fail_convert = true;
    }

    /// Make the next `create_model` fail.
    pub fn fail_next_model(&self) {
        self.lock().fail_model = true;
    }

    /// Make the next `store_template` fail.
    pub fn fail_next_store(&self) {
        self.lock().fail_store = true;
    }

    /// Make the next `delete_template` fail.
    pub fn fail_next_delete(&self) {
        self.lock().fail_delete = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: u8) -> SlotId {
        SlotId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_capture_without_finger() {
        let (mut sensor, _handle) = MockSensor::new();

        assert!(!sensor.capture_image().await.unwrap());
    }

    #[tokio::test]
    async fn test_capture_consumes_placement() {
        let (mut sensor, handle) = MockSensor::new();

        handle.place_finger(vec![1, 2, 3]);

        assert!(sensor.capture_image().await.unwrap());
        assert!(!sensor.capture_image().await.unwrap());
    }

    #[tokio::test]
    async fn test_convert_without_image() {
        let (mut sensor, _handle) = MockSensor::new();

        let result = sensor.convert_image(SampleSlot::First).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_enrollment_round() {
        let (mut sensor, handle) = MockSensor::new();

        let finger = vec![5, 5, 5];
        handle.place_finger(finger.clone());
        handle.place_finger(finger.clone());

        assert!(sensor.capture_image().await.unwrap());
        sensor.convert_image(SampleSlot::First).await.unwrap();
        assert!(sensor.capture_image().await.unwrap());
        sensor.convert_image(SampleSlot::Second).await.unwrap();

        sensor.create_model().await.unwrap();
        sensor.store_template(slot(0)).await.unwrap();

        assert!(sensor.template_exists(slot(0)).await.unwrap());
        assert_eq!(handle.occupied_slots(), vec![slot(0)]);
    }

    #[tokio::test]
    async fn test_create_model_mismatched_samples() {
        let (mut sensor, handle) = MockSensor::new();

        handle.place_finger(vec![1]);
        handle.place_finger(vec![2]);

        sensor.capture_image().await.unwrap();
        sensor.convert_image(SampleSlot::First).await.unwrap();
        sensor.capture_image().await.unwrap();
        sensor.convert_image(SampleSlot::Second).await.unwrap();

        assert!(sensor.create_model().await.is_err());
    }

    #[tokio::test]
    async fn test_store_without_model() {
        let (mut sensor, _handle) = MockSensor::new();

        let result = sensor.store_template(slot(0)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_search_match_and_miss() {
        let (mut sensor, handle) = MockSensor::new();

        handle.seed_template(slot(7), vec![7, 7]);

        handle.place_finger(vec![7, 7]);
        sensor.capture_image().await.unwrap();
        sensor.convert_image(SampleSlot::First).await.unwrap();
        assert_eq!(sensor.search().await.unwrap(), Some(slot(7)));

        handle.place_finger(vec![8, 8]);
        sensor.capture_image().await.unwrap();
        sensor.convert_image(SampleSlot::First).await.unwrap();
        assert_eq!(sensor.search().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_search_returns_lowest_slot() {
        let (mut sensor, handle) = MockSensor::new();

        // Same template in two slots; the lower slot wins.
        handle.seed_template(slot(9), vec![1]);
        handle.seed_template(slot(4), vec![1]);

        handle.place_finger(vec![1]);
        sensor.capture_image().await.unwrap();
        sensor.convert_image(SampleSlot::First).await.unwrap();
        assert_eq!(sensor.search().await.unwrap(), Some(slot(4)));
    }

    #[tokio::test]
    async fn test_delete_template() {
        let (mut sensor, handle) = MockSensor::new();

        handle.seed_template(slot(3), vec![3]);
        sensor.delete_template(slot(3)).await.unwrap();
        assert!(!handle.contains(slot(3)));

        // Deleting an empty slot is an error.
        assert!(sensor.delete_template(slot(3)).await.is_err());
    }

    #[tokio::test]
    async fn test_failure_injection_is_one_shot() {
        let (mut sensor, handle) = MockSensor::new();

        handle.fail_next_convert();
        handle.place_finger(vec![1]);
        sensor.capture_image().await.unwrap();
        assert!(sensor.convert_image(SampleSlot::First).await.is_err());

        // The image survives the injected failure; the retry succeeds.
        handle.place_finger(vec![1]);
        sensor.capture_image().await.unwrap();
        assert!(sensor.convert_image(SampleSlot::First).await.is_ok());
    }

    #[tokio::test]
    async fn test_fail_next_store() {
        let (mut sensor, handle) = MockSensor::new();

        handle.place_finger(vec![1]);
        handle.place_finger(vec![1]);
        sensor.capture_image().await.unwrap();
        sensor.convert_image(SampleSlot::First).await.unwrap();
        sensor.capture_image().await.unwrap();
        sensor.convert_image(SampleSlot::Second).await.unwrap();
        sensor.create_model().await.unwrap();

        handle.fail_next_store();
        assert!(sensor.store_template(slot(0)).await.is_err());
        assert_eq!(handle.template_count(), 0);
    }

    #[tokio::test]
    async fn test_fail_next_delete_keeps_template() {
        let (mut sensor, handle) = MockSensor::new();

        handle.seed_template(slot(5), vec![5]);
        handle.fail_next_delete();

        assert!(sensor.delete_template(slot(5)).await.is_err());
        assert!(handle.contains(slot(5)));

        sensor.delete_template(slot(5)).await.unwrap();
        assert!(!handle.contains(slot(5)));
    }

    #[tokio::test]
    async fn test_clear_templates() {
        let (_sensor, handle) = MockSensor::new();

        handle.seed_template(slot(1), vec![1]);
        handle.seed_template(slot(2), vec![2]);
        assert_eq!(handle.template_count(), 2);

        handle.clear_templates();
        assert_eq!(handle.template_count(), 0);
    }

    #[tokio::test]
    async fn test_get_info() {
        let (sensor, _handle) = MockSensor::with_name("Test Sensor".to_string());

        let info = sensor.get_info().await.unwrap();
        assert_eq!(info.name, "Test Sensor");
        assert_eq!(info.model, "Mock Fingerprint Sensor v1.0");
    }
}
