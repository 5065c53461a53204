//! Integration tests for the Controller → ports → actuators pipeline.
//!
//! These run on the host and drive whole ticks through mock adapters:
//! sensor reads and reports, command polling, actuator driving, and the
//! events the loop emits along the way.

use std::time::Duration;

use irrigator::app::commands::Command;
use irrigator::app::events::{AppEvent, LinkOp};
use irrigator::app::service::Controller;
use irrigator::config::DeviceConfig;
use irrigator::drivers::flow::FlowDriver;
use irrigator::drivers::rotary::{RotaryDriver, RotaryState, sweep_profile};
use irrigator::drivers::tone::ToneDriver;
use irrigator::drivers::{ActuatorBank, ActuatorKind};
use irrigator::error::{ActuatorError, LinkError, SensorError};

use crate::mock_hw::{
    MockBank, MockController, MockDelay, MockLink, MockSensor, RecordingSignal, RecordingSink,
    RecordingSwitch, SignalCall, make_controller,
};

fn config_with_period(report_period_ticks: u32) -> DeviceConfig {
    DeviceConfig {
        report_period_ticks,
        ..DeviceConfig::default()
    }
}

fn started(sensor: MockSensor, link: MockLink) -> (MockController, RecordingSink) {
    started_with(DeviceConfig::default(), sensor, link)
}

fn started_with(
    config: DeviceConfig,
    sensor: MockSensor,
    link: MockLink,
) -> (MockController, RecordingSink) {
    let mut ctl = make_controller(config, sensor, link, MockDelay::new());
    let mut sink = RecordingSink::new();
    ctl.start(&mut sink);
    (ctl, sink)
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_drives_every_output_idle() {
    let (ctl, sink) = started(MockSensor::constant(false), MockLink::new());

    assert_eq!(sink.events.first(), Some(&AppEvent::Started));
    let bank = ctl.actuators();
    assert_eq!(bank.rotary().signal().calls, vec![SignalCall::Duty(0.0)]);
    assert_eq!(bank.tone().signal().calls, vec![SignalCall::Duty(0.0)]);
    assert_eq!(bank.flow().switch().args, vec!["off"]);
    assert!(ctl.delay().sleeps.is_empty());
    assert_eq!(ctl.link().polls, 0);
}

// ── Reporting cadence ─────────────────────────────────────────

#[test]
fn dry_soil_is_reported_once_on_the_tenth_tick() {
    let (mut ctl, mut sink) = started(MockSensor::constant(true), MockLink::new());

    for _ in 0..9 {
        ctl.tick(&mut sink);
    }
    assert!(ctl.link().reports.is_empty());
    assert_eq!(ctl.sensor().reads, 0);
    assert!(!ctl.state().water_intent);

    ctl.tick(&mut sink);
    assert_eq!(ctl.link().reports, vec![true]);
    assert_eq!(ctl.sensor().reads, 1);
    assert!(ctl.state().water_intent);
    assert_eq!(ctl.state().tick_counter, 0);
    assert_eq!(ctl.actuators().flow().switch().last(), Some("on"));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ReadingReported { dry: true })), 1);
}

#[test]
fn water_intent_only_changes_on_report_ticks() {
    let sensor = MockSensor::sequence([Ok(true), Ok(false)]);
    let (mut ctl, mut sink) = started_with(config_with_period(3), sensor, MockLink::new());

    let mut water = Vec::new();
    for _ in 0..6 {
        ctl.tick(&mut sink);
        water.push(ctl.state().water_intent);
    }
    assert_eq!(water, vec![false, false, true, true, true, false]);
    assert_eq!(ctl.link().reports, vec![true, false]);
}

#[test]
fn every_tick_polls_and_emits_status() {
    let (mut ctl, mut sink) = started(MockSensor::constant(false), MockLink::new());
    for _ in 0..4 {
        ctl.tick(&mut sink);
    }
    assert_eq!(ctl.link().polls, 4);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Status(_))), 4);
    assert!(matches!(sink.last(), Some(AppEvent::Status(s)) if s.tick == 4));
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn move_motor_sweeps_in_the_same_tick() {
    let link = MockLink::with_commands([Ok(Command::parse("Move Motor"))]);
    let (mut ctl, mut sink) = started(MockSensor::constant(false), link);

    ctl.tick(&mut sink);

    assert!(ctl.state().motor_intent);
    let rotary = ctl.actuators().rotary();
    assert_eq!(rotary.sweeps(), 1);
    assert_eq!(rotary.state(), RotaryState::Sweeping);

    let expected: Vec<f32> = sweep_profile().map(|s| s.duty_percent).collect();
    let duties = rotary.signal().duties();
    assert_eq!(duties.len(), 1 + 38);
    assert_eq!(&duties[1..], expected.as_slice());

    assert_eq!(ctl.delay().sleeps, vec![Duration::from_millis(50); 38]);
    assert!(sink.events.contains(&AppEvent::IntentSet {
        actuator: ActuatorKind::Rotary,
        on: true,
    }));
}

#[test]
fn motor_keeps_sweeping_until_stopped() {
    let link = MockLink::with_commands([
        Ok(Command::MoveMotor),
        Ok(Command::Unknown),
        Ok(Command::StopMotor),
    ]);
    let (mut ctl, mut sink) = started(MockSensor::constant(false), link);

    for _ in 0..3 {
        ctl.tick(&mut sink);
    }
    let rotary = ctl.actuators().rotary();
    assert_eq!(rotary.sweeps(), 2);
    assert_eq!(rotary.state(), RotaryState::Idle);
    assert_eq!(rotary.signal().duties().last(), Some(&0.0));
}

#[test]
fn play_sound_plays_the_melody_then_silences() {
    let link = MockLink::with_commands([Ok(Command::PlaySound)]);
    let (mut ctl, mut sink) = started(MockSensor::constant(false), link);

    ctl.tick(&mut sink);

    let tone = ctl.actuators().tone().signal();
    assert_eq!(tone.frequencies(), vec![440, 494, 523, 440]);
    assert_eq!(tone.duties(), vec![0.0, 50.0, 50.0, 50.0, 50.0, 0.0]);
    assert_eq!(ctl.delay().total(), Duration::from_secs(2));
}

#[test]
fn water_command_overrides_the_sensor_on_a_report_tick() {
    let link = MockLink::with_commands([Ok(Command::StopWater)]);
    let (mut ctl, mut sink) = started_with(config_with_period(1), MockSensor::constant(true), link);

    ctl.tick(&mut sink);

    assert_eq!(ctl.link().reports, vec![true]);
    assert!(!ctl.state().water_intent);
    assert_eq!(ctl.actuators().flow().switch().last(), Some("off"));
}

#[test]
fn repeated_command_is_idempotent() {
    let once = {
        let link = MockLink::with_commands([Ok(Command::StartWater)]);
        let (mut ctl, mut sink) = started(MockSensor::constant(false), link);
        ctl.tick(&mut sink);
        *ctl.state()
    };
    let twice = {
        let link = MockLink::with_commands([Ok(Command::StartWater), Ok(Command::StartWater)]);
        let (mut ctl, mut sink) = started(MockSensor::constant(false), link);
        ctl.tick(&mut sink);
        ctl.tick(&mut sink);
        *ctl.state()
    };
    assert_eq!(once.water_intent, twice.water_intent);
    assert_eq!(once.motor_intent, twice.motor_intent);
    assert_eq!(once.speaker_intent, twice.speaker_intent);
}

#[test]
fn unknown_command_changes_nothing() {
    let link = MockLink::with_commands([Ok(Command::PlaySound), Ok(Command::parse("dance"))]);
    let (mut ctl, mut sink) = started(MockSensor::constant(false), link);

    ctl.tick(&mut sink);
    let before = *ctl.state();
    ctl.tick(&mut sink);
    let after = *ctl.state();

    assert_eq!(before.speaker_intent, after.speaker_intent);
    assert_eq!(before.motor_intent, after.motor_intent);
    assert_eq!(before.water_intent, after.water_intent);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::IntentSet { .. })), 1);
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn poll_failure_leaves_flags_unchanged() {
    let link = MockLink::with_commands([Ok(Command::StartWater), Err(LinkError::Unreachable)]);
    let (mut ctl, mut sink) = started(MockSensor::constant(false), link);

    ctl.tick(&mut sink);
    ctl.tick(&mut sink);

    assert!(ctl.state().water_intent);
    assert!(!ctl.state().motor_intent && !ctl.state().speaker_intent);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::LinkFault {
                op: LinkOp::Poll,
                error: LinkError::Unreachable
            }
        )),
        1
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ActuatorFault { .. })), 0);
    assert_eq!(ctl.ticks(), 2);
}

#[test]
fn rejected_report_still_sets_water_intent() {
    let mut link = MockLink::new();
    link.report_result = Err(LinkError::Rejected(500));
    let (mut ctl, mut sink) = started_with(config_with_period(1), MockSensor::constant(true), link);

    ctl.tick(&mut sink);

    assert!(ctl.state().water_intent);
    assert_eq!(ctl.link().polls, 1);
    assert!(sink.events.contains(&AppEvent::LinkFault {
        op: LinkOp::Report,
        error: LinkError::Rejected(500),
    }));
}

#[test]
fn sensor_failure_keeps_previous_water_intent() {
    let sensor = MockSensor::sequence([Ok(true), Err(SensorError::GpioReadFailed)]);
    let (mut ctl, mut sink) = started_with(config_with_period(1), sensor, MockLink::new());

    ctl.tick(&mut sink);
    ctl.tick(&mut sink);

    assert!(ctl.state().water_intent);
    assert_eq!(ctl.link().reports, vec![true]);
    assert_eq!(ctl.state().tick_counter, 0);
    assert!(sink.events.contains(&AppEvent::SensorFault(SensorError::GpioReadFailed)));
}

fn controller_with_bank(bank: MockBank, link: MockLink) -> MockController {
    Controller::new(
        DeviceConfig::default(),
        MockSensor::constant(false),
        link,
        bank,
        MockDelay::new(),
    )
}

#[test]
fn failing_actuator_does_not_stop_the_others() {
    let bank = ActuatorBank::new(
        RotaryDriver::new(RecordingSignal::new()),
        ToneDriver::new(
            RecordingSignal::failing(ActuatorError::PwmWriteFailed),
            DeviceConfig::default().melody,
        ),
        FlowDriver::new(RecordingSwitch::new()),
    );
    let mut ctl = controller_with_bank(bank, MockLink::with_commands([Ok(Command::PlaySound)]));
    let mut sink = RecordingSink::new();
    ctl.start(&mut sink);
    ctl.tick(&mut sink);

    assert!(sink.events.contains(&AppEvent::ActuatorFault {
        actuator: ActuatorKind::Tone,
        error: ActuatorError::PwmWriteFailed,
    }));
    // Start plus one tick: the valve was still switched both times.
    assert_eq!(ctl.actuators().flow().switch().args, vec!["off", "off"]);
    assert!(matches!(sink.last(), Some(AppEvent::Status(_))));
}

#[test]
fn valve_exit_status_is_reported_every_tick() {
    let mut switch = RecordingSwitch::new();
    switch.result = Ok(1);
    let bank = ActuatorBank::new(
        RotaryDriver::new(RecordingSignal::new()),
        ToneDriver::new(RecordingSignal::new(), DeviceConfig::default().melody),
        FlowDriver::new(switch),
    );
    let mut ctl = controller_with_bank(bank, MockLink::new());
    let mut sink = RecordingSink::new();
    ctl.tick(&mut sink);
    ctl.tick(&mut sink);

    assert_eq!(
        sink.count(|e| *e
            == AppEvent::ActuatorFault {
                actuator: ActuatorKind::Flow,
                error: ActuatorError::SwitchExit(1),
            }),
        2
    );
}
