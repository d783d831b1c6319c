//! Controller runtime.
//!
//! The runtime is the single task that connects the pure state machine
//! to the hardware: it polls the keypad and the clock, feeds the
//! resulting events to [`AccessController`], and performs the effects
//! each transition returns. Effects that produce a result (a scan, a
//! flash operation, an elapsed notice) are fed back as events in the
//! same step, so a whole flow segment settles before the next poll.

use std::collections::VecDeque;

use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use latchkey_core::SlotId;
use latchkey_hardware::{
    ClockSource, DisplayDevice, FingerprintSensor, KeypadDevice, LockActuator, Result,
};

use crate::config::ControllerConfig;
use crate::effects::Effect;
use crate::events::{Event, ScanOutcome, SensorEvent};
use crate::machine::AccessController;

/// Drives an [`AccessController`] against a set of hardware devices.
///
/// Generic over the five device traits so the same loop runs against
/// real peripherals and the mock devices used in tests.
pub struct Runtime<K, S, D, C, L>
where
    K: KeypadDevice,
    S: FingerprintSensor,
    D: DisplayDevice,
    C: ClockSource,
    L: LockActuator,
{
    machine: AccessController,
    keypad: K,
    sensor: S,
    display: D,
    clock: C,
    lock: L,
    poll_interval: std::time::Duration,
}

impl<K, S, D, C, L> Runtime<K, S, D, C, L>
where
    K: KeypadDevice,
    S: FingerprintSensor,
    D: DisplayDevice,
    C: ClockSource,
    L: LockActuator,
{
    /// Build a runtime from a configuration and a set of devices.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: ControllerConfig,
        keypad: K,
        sensor: S,
        display: D,
        clock: C,
        lock: L,
    ) -> latchkey_core::Result<Self> {
        let poll_interval = config.poll_interval();
        let machine = AccessController::new(config)?;
        Ok(Self {
            machine,
            keypad,
            sensor,
            display,
            clock,
            lock,
            poll_interval,
        })
    }

    /// The state machine, for inspection.
    #[must_use]
    pub fn machine(&self) -> &AccessController {
        &self.machine
    }

    /// Run forever.
    ///
    /// # Errors
    /// Returns an error if the clock, panel, keypad, or lock fails;
    /// sensor failures are reported to the state machine instead.
    pub async fn run(&mut self) -> Result<()> {
        info!(mode = %self.machine.mode(), "controller runtime started");
        loop {
            self.step().await?;
            sleep(self.poll_interval).await;
        }
    }

    /// One iteration of the main loop: a clock tick, then any pending
    /// key press, each dispatched to completion.
    ///
    /// # Errors
    /// Same failure surface as [`run`](Self::run).
    pub async fn step(&mut self) -> Result<()> {
        let hour = self.clock.current_hour().await?;
        let time = self.clock.formatted_time().await?;
        self.dispatch(Event::Clock { hour, time }).await?;

        if let Some(key) = self.keypad.poll_key().await? {
            debug!(%key, mode = %self.machine.mode(), "key pressed");
            self.dispatch(Event::Key(key)).await?;
        }
        Ok(())
    }

    /// Feed one event through the machine and perform every effect,
    /// queueing follow-up events until the flow segment settles.
    async fn dispatch(&mut self, event: Event) -> Result<()> {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            for effect in self.machine.handle_event(event) {
                if let Some(follow_up) = self.perform(effect).await? {
                    pending.push_back(follow_up);
                }
            }
        }
        Ok(())
    }

    /// Perform one effect, returning the event it produced, if any.
    async fn perform(&mut self, effect: Effect) -> Result<Option<Event>> {
        match effect {
            Effect::Render(screen) => {
                let (line1, line2) = screen.lines();
                self.render(&line1, &line2).await?;
                Ok(None)
            }
            Effect::ShowNotice(notice, duration) => {
                let (line1, line2) = notice.lines();
                self.render(&line1, &line2).await?;
                sleep(duration).await;
                Ok(Some(Event::NoticeElapsed))
            }
            Effect::Pause(duration) => {
                sleep(duration).await;
                Ok(None)
            }
            Effect::StartScan { timeout } => {
                let outcome = self.scan(timeout).await;
                info!(?outcome, "verification scan finished");
                Ok(Some(Event::Scan(outcome)))
            }
            Effect::LoadSlots => {
                let occupied = self.load_slots().await;
                debug!(count = occupied.len(), "slot occupancy loaded");
                Ok(Some(Event::SlotsLoaded(occupied)))
            }
            Effect::CaptureSample(sample) => {
                let event = self.capture_sample(sample).await;
                Ok(Some(Event::Sensor(event)))
            }
            Effect::CreateModel => {
                let event = match self.sensor.create_model().await {
                    Ok(()) => SensorEvent::ModelCreated,
                    Err(error) => {
                        warn!(%error, "model creation failed");
                        SensorEvent::ModelFailed
                    }
                };
                Ok(Some(Event::Sensor(event)))
            }
            Effect::StoreTemplate(slot) => {
                let event = match self.sensor.store_template(slot).await {
                    Ok(()) => {
                        info!(%slot, "template stored");
                        SensorEvent::Stored(slot)
                    }
                    Err(error) => {
                        warn!(%slot, %error, "template store failed");
                        SensorEvent::StoreFailed
                    }
                };
                Ok(Some(Event::Sensor(event)))
            }
            Effect::DeleteTemplate(slot) => {
                let event = match self.sensor.delete_template(slot).await {
                    Ok(()) => {
                        info!(%slot, "template deleted");
                        SensorEvent::Deleted(slot)
                    }
                    Err(error) => {
                        warn!(%slot, %error, "template delete failed");
                        SensorEvent::DeleteFailed
                    }
                };
                Ok(Some(Event::Sensor(event)))
            }
            Effect::OpenLock(hold) => {
                info!(hold_ms = hold.as_millis() as u64, "opening lock");
                self.lock.set_active(true).await?;
                sleep(hold).await;
                self.lock.set_active(false).await?;
                Ok(None)
            }
        }
    }

    async fn render(&mut self, line1: &str, line2: &str) -> Result<()> {
        self.display.clear().await?;
        self.display.show_at(0, 0, line1).await?;
        self.display.show_at(1, 0, line2).await?;
        Ok(())
    }

    /// Bounded scan: wait for a finger, then identify it.
    async fn scan(&mut self, timeout: std::time::Duration) -> ScanOutcome {
        let deadline = Instant::now() + timeout;
        loop {
            match self.sensor.capture_image().await {
                Ok(true) => break,
                Ok(false) => {}
                Err(error) => {
                    warn!(%error, "image capture failed during scan");
                    return ScanOutcome::Failed;
                }
            }
            if Instant::now() >= deadline {
                return ScanOutcome::Timeout;
            }
            sleep(self.poll_interval).await;
        }

        if let Err(error) = self
            .sensor
            .convert_image(latchkey_core::SampleSlot::First)
            .await
        {
            warn!(%error, "image conversion failed during scan");
            return ScanOutcome::Failed;
        }
        match self.sensor.search().await {
            Ok(Some(slot)) => ScanOutcome::Match(slot),
            Ok(None) => ScanOutcome::NoMatch,
            Err(error) => {
                warn!(%error, "template search failed");
                ScanOutcome::Failed
            }
        }
    }

    /// Enumerate occupied slots, lowest first. A slot that cannot be
    /// queried is reported as free.
    async fn load_slots(&mut self) -> Vec<SlotId> {
        let mut occupied = Vec::new();
        for slot in SlotId::all() {
            match self.sensor.template_exists(slot).await {
                Ok(true) => occupied.push(slot),
                Ok(false) => {}
                Err(error) => warn!(%slot, %error, "slot query failed"),
            }
        }
        occupied
    }

    /// Unbounded capture for enrollment: wait for a finger, then
    /// convert it into the given sample buffer.
    async fn capture_sample(&mut self, sample: latchkey_core::SampleSlot) -> SensorEvent {
        loop {
            match self.sensor.capture_image().await {
                Ok(true) => break,
                Ok(false) => sleep(self.poll_interval).await,
                Err(error) => {
                    warn!(%error, "image capture failed during enrollment");
                    return SensorEvent::CaptureFailed;
                }
            }
        }
        match self.sensor.convert_image(sample).await {
            Ok(()) => SensorEvent::SampleCaptured(sample),
            Err(error) => {
                warn!(%error, "image conversion failed during enrollment");
                SensorEvent::CaptureFailed
            }
        }
    }
}
