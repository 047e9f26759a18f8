//! Irrigation controller — the hexagonal core.
//!
//! [`IrrigationController`] owns the hardware ports, the deferred-timer
//! queue and the alert bus. It exposes a small imperative API; every
//! delayed behaviour is a [`DeferredTask`] in the timer queue, executed
//! when the owner calls [`advance`](IrrigationController::advance).
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ AlertBus ──▶ listeners
//!                 │   IrrigationController   │
//! ActuatorPort ◀──│  pump · timers · checks  │
//!                 └──────────────────────────┘
//! ```
//!
//! ## Flow check
//!
//! `turn_on` arms a flow check `flow_check_delay` later. When it fires the
//! controller runs `check_flow_on`, which arms a moisture read
//! `moisture_verify_delay` after that. A reading below the alert threshold
//! raises exactly one alert. Checks run beside the ON state: they never
//! gate it, never switch the pump off, and are not cancelled by
//! `turn_off` (a check armed before a `turn_off` still fires).
//!
//! The handle `turn_on` returns covers the whole check: until the moisture
//! read has run, `is_pending` reports it and `cancel` stops it, whichever
//! of the two stages is currently armed.

use core::time::Duration;

use log::{debug, error, info, warn};

use crate::config::{ControllerConfig, WateringSchedule};
use crate::error::Result;
use crate::scheduler::{TimerHandle, TimerQueue};

use super::events::{AlertBus, Subscription};
use super::ports::{ActuatorPort, AlertListener, PumpState, SensorPort};

/// Work the controller defers through its timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Post-activation delay elapsed: run `check_flow_on`.
    FlowCheck,
    /// Re-read moisture and alert if the soil is still dry. `origin` is
    /// the flow check that armed it, if any.
    VerifyMoisture { origin: Option<TimerHandle> },
    /// Scheduled watering run begins.
    WateringStart,
    /// Scheduled watering run ends.
    WateringStop,
}

impl DeferredTask {
    fn is_flow_check(self) -> bool {
        matches!(self, Self::FlowCheck | Self::VerifyMoisture { .. })
    }

    /// Second stage of the flow check identified by `handle`.
    fn follows(self, handle: TimerHandle) -> bool {
        matches!(self, Self::VerifyMoisture { origin: Some(o) } if o == handle)
    }
}

// ───────────────────────────────────────────────────────────────
// IrrigationController
// ───────────────────────────────────────────────────────────────

pub struct IrrigationController<H> {
    hw: H,
    config: ControllerConfig,
    timers: TimerQueue<DeferredTask>,
    alerts: AlertBus,
    pump: PumpState,
    schedule: Option<WateringSchedule>,
    alerts_raised: u32,
}

impl<H: SensorPort + ActuatorPort> IrrigationController<H> {
    /// Take ownership of the hardware and drive the pump to a known OFF.
    ///
    /// Fails if the configuration is invalid or the pump output cannot be
    /// written; the firmware treats either as fatal.
    pub fn new(mut hw: H, config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        hw.set_pump(PumpState::Off)?;

        let mut controller = Self {
            hw,
            timers: TimerQueue::new(),
            alerts: AlertBus::new(),
            pump: PumpState::Off,
            schedule: None,
            alerts_raised: 0,
            config,
        };
        if let Some(plan) = controller.config.watering {
            controller.enable_schedule(plan)?;
        }
        info!(
            "Controller ready: flow check {}s + {}s",
            controller.config.flow_check_delay_secs,
            controller.config.moisture_verify_delay_secs
        );
        Ok(controller)
    }

    // ── Core operations ───────────────────────────────────────

    /// Accepts any configuration value and ignores it. Reserved for
    /// runtime re-parameterisation; has no side effects and cannot fail.
    pub fn init<C: ?Sized>(&mut self, _config: &C) {}

    /// Switch the pump on and arm a flow check `flow_check_delay` from now.
    ///
    /// Returns as soon as the output is written. The returned handle lets
    /// the caller observe or cancel the check; nothing cancels it by
    /// default. Repeated calls arm independent checks unless
    /// `cancel_superseded_checks` is set.
    pub fn turn_on(&mut self) -> Result<TimerHandle> {
        self.set_pump(PumpState::On)?;
        if self.config.cancel_superseded_checks {
            let dropped = self.timers.cancel_matching(|t| t.is_flow_check());
            if dropped > 0 {
                debug!("Superseded {} pending flow check(s)", dropped);
            }
        }
        let handle = self
            .timers
            .schedule(self.config.flow_check_delay(), DeferredTask::FlowCheck);
        info!("Pump ON, flow check in {}s", self.config.flow_check_delay_secs);
        Ok(handle)
    }

    /// Switch the pump off. Pending checks are left alone.
    pub fn turn_off(&mut self) -> Result<()> {
        self.set_pump(PumpState::Off)?;
        info!("Pump OFF");
        Ok(())
    }

    /// Poll the moisture probe. The value is returned untouched.
    pub fn read_moisture(&mut self) -> Result<u16> {
        Ok(self.hw.read_moisture()?)
    }

    /// Arm a moisture read `moisture_verify_delay` from now. If the reading
    /// is below the alert threshold when it fires, one alert is raised.
    pub fn check_flow_on(&mut self) -> TimerHandle {
        self.arm_verify(None)
    }

    fn arm_verify(&mut self, origin: Option<TimerHandle>) -> TimerHandle {
        debug!("Moisture verify in {}s", self.config.moisture_verify_delay_secs);
        self.timers.schedule(
            self.config.moisture_verify_delay(),
            DeferredTask::VerifyMoisture { origin },
        )
    }

    /// There is no flow sensor, so stopped flow cannot be confirmed. Does
    /// nothing: no event, no state change.
    pub fn check_flow_off(&mut self) {}

    // ── Time ──────────────────────────────────────────────────

    /// Advance virtual time by `elapsed`, running every deferred task that
    /// comes due, in due order. Tasks armed while running are measured
    /// from their parent's due time, so one long advance is equivalent to
    /// many short ones.
    pub fn advance(&mut self, elapsed: Duration) {
        let deadline = self.timers.now().saturating_add(elapsed);
        while let Some(fired) = self.timers.pop_due(deadline) {
            self.run(fired.handle, fired.task);
        }
        self.timers.advance_to(deadline);
    }

    fn run(&mut self, handle: TimerHandle, task: DeferredTask) {
        match task {
            DeferredTask::FlowCheck => {
                self.arm_verify(Some(handle));
            }
            DeferredTask::VerifyMoisture { .. } => self.verify_moisture(),
            DeferredTask::WateringStart => self.start_watering_run(),
            DeferredTask::WateringStop => {
                if let Err(e) = self.turn_off() {
                    error!("Scheduled watering stop failed: {}", e);
                }
            }
        }
    }

    fn verify_moisture(&mut self) {
        match self.hw.read_moisture() {
            Ok(value) if value < self.config.moisture_alert_threshold => {
                self.alerts_raised = self.alerts_raised.saturating_add(1);
                let notified = self.alerts.emit();
                warn!(
                    "Soil still dry after watering started (moisture={}), alert sent to {} listener(s)",
                    value, notified
                );
            }
            Ok(value) => debug!("Flow check passed (moisture={})", value),
            Err(e) => error!("Flow check skipped, moisture read failed: {}", e),
        }
    }

    // ── Watering schedule ─────────────────────────────────────

    /// Start a fixed-interval watering plan. The first run begins one
    /// interval from now. Replaces any existing plan.
    pub fn enable_schedule(&mut self, plan: WateringSchedule) -> Result<()> {
        plan.validate()?;
        self.timers
            .cancel_matching(|t| matches!(t, DeferredTask::WateringStart));
        self.timers.schedule(
            Duration::from_secs(plan.interval_secs.into()),
            DeferredTask::WateringStart,
        );
        self.schedule = Some(plan);
        info!(
            "Watering schedule: {}s every {}s",
            plan.duration_secs, plan.interval_secs
        );
        Ok(())
    }

    /// Stop scheduling new runs. A run already in progress still ends on
    /// time; flow checks are untouched.
    pub fn disable_schedule(&mut self) {
        self.timers
            .cancel_matching(|t| matches!(t, DeferredTask::WateringStart));
        if self.schedule.take().is_some() {
            info!("Watering schedule disabled");
        }
    }

    fn start_watering_run(&mut self) {
        let Some(plan) = self.schedule else {
            return;
        };
        // Re-arm first so a failed run does not end the plan.
        self.timers.schedule(
            Duration::from_secs(plan.interval_secs.into()),
            DeferredTask::WateringStart,
        );
        if let Err(e) = self.turn_on() {
            error!("Scheduled watering start failed: {}", e);
            return;
        }
        self.timers.schedule(
            Duration::from_secs(plan.duration_secs.into()),
            DeferredTask::WateringStop,
        );
    }

    // ── Alerts ────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl AlertListener + 'static) -> Result<Subscription> {
        self.alerts.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.alerts.unsubscribe(subscription)
    }

    // ── Timer handles ─────────────────────────────────────────

    /// Cancel a pending check or schedule edge. For a `turn_on` handle
    /// this also drops the moisture read the check has already armed.
    /// Returns `false` if nothing was left to cancel.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let direct = self.timers.cancel(handle);
        let followers = self.timers.cancel_matching(|t| t.follows(handle));
        direct || followers > 0
    }

    /// Whether the work behind `handle` has yet to run, including the
    /// moisture read a `turn_on` check arms after its first delay.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.is_pending(handle) || self.timers.any_matching(|t| t.follows(handle))
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    // ── Queries ───────────────────────────────────────────────

    /// Last level written to the pump output.
    pub fn pump_state(&self) -> PumpState {
        self.pump
    }

    /// Virtual time since construction.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Alerts raised so far, whether or not anyone was listening.
    pub fn alerts_raised(&self) -> u32 {
        self.alerts_raised
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn schedule(&self) -> Option<WateringSchedule> {
        self.schedule
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    fn set_pump(&mut self, state: PumpState) -> Result<()> {
        self.hw.set_pump(state)?;
        self.pump = state;
        Ok(())
    }
}
