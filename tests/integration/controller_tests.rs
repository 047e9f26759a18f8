//! Integration tests for the controller → timers → alert pipeline.
//!
//! Virtual time only: every delay is driven by `advance`, so nothing here
//! sleeps.

use core::time::Duration;

use irrigation::app::ports::PumpState;
use irrigation::config::ControllerConfig;
use irrigation::error::Error;

use super::mock_hw::{AlertCounter, HwCall, MockHardware, make_controller};

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

// ── Basic operations ──────────────────────────────────────────

#[test]
fn read_moisture_returns_sensor_value_every_time() {
    let (mut ctl, _) = make_controller(417, ControllerConfig::default());
    assert_eq!(ctl.read_moisture().unwrap(), 417);

    ctl.hardware_mut().moisture = 3;
    assert_eq!(ctl.read_moisture().unwrap(), 3);
    assert_eq!(ctl.hardware().read_count(), 2, "every call re-reads hardware");
}

#[test]
fn read_failure_propagates() {
    let (mut ctl, _) = make_controller(5, ControllerConfig::default());
    ctl.hardware_mut().fail_reads = true;
    assert!(matches!(ctl.read_moisture(), Err(Error::Sensor(_))));
}

#[test]
fn turn_on_then_off_leaves_pump_off() {
    let (mut ctl, _) = make_controller(0, ControllerConfig::default());
    let check = ctl.turn_on().unwrap();
    ctl.turn_off().unwrap();

    assert_eq!(ctl.pump_state(), PumpState::Off);
    assert_eq!(ctl.hardware().pump_level(), Some(PumpState::Off));
    assert!(ctl.is_pending(check), "turn_off does not cancel the check");
}

#[test]
fn turn_on_returns_without_reading_moisture() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    ctl.turn_on().unwrap();

    assert_eq!(ctl.pump_state(), PumpState::On);
    assert_eq!(ctl.hardware().read_count(), 0);
    assert_eq!(alerts.get(), 0);
    assert_eq!(ctl.pending_timers(), 1);
}

// ── check_flow_on ─────────────────────────────────────────────

#[test]
fn check_flow_on_dry_emits_exactly_one_alert() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    ctl.check_flow_on();

    ctl.advance(Duration::from_millis(1_999));
    assert_eq!(alerts.get(), 0);
    ctl.advance(Duration::from_millis(1));
    assert_eq!(alerts.get(), 1);

    ctl.advance(secs(600));
    assert_eq!(alerts.get(), 1, "no repeat, no retry");
}

#[test]
fn check_flow_on_wet_is_silent() {
    let (mut ctl, alerts) = make_controller(1, ControllerConfig::default());
    ctl.check_flow_on();
    ctl.advance(secs(5));

    assert_eq!(alerts.get(), 0);
    assert_eq!(ctl.alerts_raised(), 0);
    assert_eq!(ctl.hardware().read_count(), 1);
}

#[test]
fn check_reads_moisture_at_fire_time_not_arm_time() {
    let (mut ctl, alerts) = make_controller(500, ControllerConfig::default());
    ctl.check_flow_on();
    ctl.hardware_mut().moisture = 0;
    ctl.advance(secs(2));
    assert_eq!(alerts.get(), 1);
}

#[test]
fn failed_read_during_check_emits_nothing() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    ctl.check_flow_on();
    ctl.hardware_mut().fail_reads = true;
    ctl.advance(secs(2));
    assert_eq!(alerts.get(), 0);
}

// ── check_flow_off ────────────────────────────────────────────

#[test]
fn check_flow_off_touches_nothing() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    ctl.turn_on().unwrap();
    let calls_before = ctl.hardware().calls.clone();

    ctl.check_flow_off();

    assert_eq!(ctl.hardware().calls, calls_before);
    assert_eq!(ctl.pending_timers(), 1);
    assert_eq!(ctl.pump_state(), PumpState::On);
    assert_eq!(alerts.get(), 0);
}

// ── End-to-end scenarios ──────────────────────────────────────

#[test]
fn dry_scenario_alerts_at_twelve_seconds() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    ctl.init(&serde_json::json!({ "zone": "front" }));
    ctl.turn_on().unwrap();

    ctl.advance(secs(10));
    assert_eq!(ctl.hardware().read_count(), 0, "t=10 only arms the read");
    assert_eq!(ctl.pending_timers(), 1);

    ctl.advance(secs(1));
    assert_eq!(alerts.get(), 0);

    ctl.advance(secs(1));
    assert_eq!(alerts.get(), 1);
    assert_eq!(ctl.hardware().read_count(), 1);
    assert_eq!(ctl.pump_state(), PumpState::On, "alerts are advisory");
}

#[test]
fn wet_scenario_never_alerts() {
    let (mut ctl, alerts) = make_controller(3, ControllerConfig::default());
    ctl.init(&());
    ctl.turn_on().unwrap();
    ctl.advance(secs(30));

    assert_eq!(alerts.get(), 0);
    assert_eq!(ctl.hardware().read_count(), 1);
}

#[test]
fn single_large_advance_matches_small_steps() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    ctl.turn_on().unwrap();
    ctl.advance(secs(100));

    assert_eq!(alerts.get(), 1);
    assert_eq!(ctl.now(), secs(100));
    assert_eq!(ctl.pending_timers(), 0);
}

#[test]
fn turn_off_before_check_still_alerts() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    ctl.turn_on().unwrap();
    ctl.advance(secs(3));
    ctl.turn_off().unwrap();
    ctl.advance(secs(20));

    assert_eq!(alerts.get(), 1);
    assert_eq!(ctl.pump_state(), PumpState::Off);
}

#[test]
fn double_turn_on_schedules_independent_checks() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    let a = ctl.turn_on().unwrap();
    ctl.advance(secs(1));
    let b = ctl.turn_on().unwrap();
    assert_ne!(a, b);

    ctl.advance(secs(11));
    assert_eq!(alerts.get(), 1, "first check fires at t=12");
    ctl.advance(secs(1));
    assert_eq!(alerts.get(), 2, "second check fires at t=13");
}

#[test]
fn rapid_turn_on_burst_keeps_every_check() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    let checks: Vec<_> = (0..20).map(|_| ctl.turn_on().unwrap()).collect();
    assert!(checks.iter().all(|&c| ctl.is_pending(c)));

    ctl.advance(secs(60));
    assert_eq!(alerts.get(), 20);
    assert_eq!(ctl.hardware().read_count(), 20);
    assert_eq!(ctl.pending_timers(), 0);
}

#[test]
fn check_can_be_cancelled_while_moisture_read_is_armed() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    let check = ctl.turn_on().unwrap();

    ctl.advance(secs(10));
    assert!(ctl.is_pending(check), "second stage armed at t=10");
    assert!(ctl.cancel(check));

    ctl.advance(secs(5));
    assert_eq!(alerts.get(), 0);
    assert_eq!(ctl.hardware().read_count(), 0);
}

#[test]
fn superseded_checks_cancelled_when_configured() {
    let config = ControllerConfig {
        cancel_superseded_checks: true,
        ..ControllerConfig::default()
    };
    let (mut ctl, alerts) = make_controller(0, config);
    let first = ctl.turn_on().unwrap();
    ctl.advance(secs(1));
    ctl.turn_on().unwrap();

    assert!(!ctl.is_pending(first));
    ctl.advance(secs(60));
    assert_eq!(alerts.get(), 1);
}

#[test]
fn cancelled_check_never_fires() {
    let (mut ctl, alerts) = make_controller(0, ControllerConfig::default());
    let check = ctl.turn_on().unwrap();
    assert!(ctl.cancel(check));
    ctl.advance(secs(60));
    assert_eq!(alerts.get(), 0);
}

// ── Notification channel ──────────────────────────────────────

#[test]
fn alert_without_listeners_is_dropped() {
    let mut ctl = irrigation::app::controller::IrrigationController::new(
        MockHardware::new(0),
        ControllerConfig::default(),
    )
    .unwrap();
    ctl.check_flow_on();
    ctl.advance(secs(2));
    assert_eq!(ctl.alerts_raised(), 1);

    // Subscribing afterwards does not replay it.
    let late = AlertCounter::default();
    ctl.subscribe(late.listener()).unwrap();
    ctl.advance(secs(60));
    assert_eq!(late.get(), 0);
}

#[test]
fn every_listener_gets_each_alert() {
    let (mut ctl, first) = make_controller(0, ControllerConfig::default());
    let second = AlertCounter::default();
    let sub = ctl.subscribe(second.listener()).unwrap();

    ctl.check_flow_on();
    ctl.advance(secs(2));
    assert_eq!((first.get(), second.get()), (1, 1));

    assert!(ctl.unsubscribe(sub));
    ctl.check_flow_on();
    ctl.advance(secs(2));
    assert_eq!((first.get(), second.get()), (2, 1));
}

#[test]
fn construction_writes_known_off_state() {
    let (ctl, _) = make_controller(0, ControllerConfig::default());
    assert_eq!(ctl.hardware().calls, vec![HwCall::SetPump(PumpState::Off)]);
}
