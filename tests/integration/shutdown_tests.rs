//! Integration tests for `Controller::run` and the shutdown path.
//!
//! The mock delay never sleeps; it raises the shutdown signal after a set
//! number of sleep requests, which lets a test stop the loop at an exact
//! point (mid-sweep, mid-idle).

use std::time::Duration;

use irrigator::adapters::shutdown::ShutdownSignal;
use irrigator::app::commands::Command;
use irrigator::app::events::AppEvent;
use irrigator::app::service::{LoopState, SLEEP_SLICE};
use irrigator::config::DeviceConfig;

use crate::mock_hw::{MockDelay, MockLink, MockSensor, RecordingSink, SignalCall, make_controller};

#[test]
fn shutdown_mid_sweep_finishes_the_tick_then_cleans_up() {
    let shutdown = ShutdownSignal::new();
    let link = MockLink::with_commands([Ok(Command::MoveMotor)]);
    let delay = MockDelay::shutdown_after(5, shutdown.clone());
    let mut ctl = make_controller(DeviceConfig::default(), MockSensor::constant(false), link, delay);
    let mut sink = RecordingSink::new();

    ctl.run(&shutdown, &mut sink);

    assert_eq!(ctl.loop_state(), LoopState::ShuttingDown);
    assert_eq!(ctl.ticks(), 1);
    // The sweep is not interruptible: all 38 dwell sleeps happened, no idle slices.
    assert_eq!(ctl.delay().sleeps.len(), 38);
    assert_eq!(ctl.actuators().rotary().sweeps(), 1);

    let bank = ctl.actuators();
    assert!(bank.is_released());
    let servo = &bank.rotary().signal().calls;
    assert_eq!(&servo[servo.len() - 2..], &[SignalCall::Duty(0.0), SignalCall::Release]);
    assert!(bank.rotary().signal().is_released());
    let buzzer = &bank.tone().signal().calls;
    assert_eq!(&buzzer[buzzer.len() - 2..], &[SignalCall::Duty(0.0), SignalCall::Release]);
    assert_eq!(bank.flow().switch().last(), Some("off"));

    assert_eq!(sink.events.first(), Some(&AppEvent::Started));
    assert_eq!(sink.last(), Some(&AppEvent::ShuttingDown));
}

#[test]
fn idle_time_is_slept_in_slices() {
    let shutdown = ShutdownSignal::new();
    let delay = MockDelay::shutdown_after(3, shutdown.clone());
    let mut ctl = make_controller(
        DeviceConfig::default(),
        MockSensor::constant(false),
        MockLink::new(),
        delay,
    );
    let mut sink = RecordingSink::new();

    ctl.run(&shutdown, &mut sink);

    assert_eq!(ctl.ticks(), 1);
    let sleeps = &ctl.delay().sleeps;
    assert_eq!(sleeps.len(), 3);
    assert!(sleeps.iter().all(|s| *s <= SLEEP_SLICE && !s.is_zero()));
}

#[test]
fn idle_sleep_fills_the_rest_of_the_interval() {
    let shutdown = ShutdownSignal::new();
    // Trip on the first sleep of the second tick's idle phase.
    let delay = MockDelay::shutdown_after(11, shutdown.clone());
    let config = DeviceConfig {
        tick_interval_ms: 1_000,
        ..DeviceConfig::default()
    };
    let mut ctl = make_controller(config, MockSensor::constant(false), MockLink::new(), delay);
    let mut sink = RecordingSink::new();

    ctl.run(&shutdown, &mut sink);

    assert_eq!(ctl.ticks(), 2);
    let first_idle: Duration = ctl.delay().sleeps[..10].iter().sum();
    assert!(first_idle <= Duration::from_secs(1));
    assert!(first_idle > Duration::from_millis(900));
}

#[test]
fn raised_signal_before_run_still_starts_and_releases() {
    let shutdown = ShutdownSignal::new();
    shutdown.request();
    let mut ctl = make_controller(
        DeviceConfig::default(),
        MockSensor::constant(true),
        MockLink::new(),
        MockDelay::new(),
    );
    let mut sink = RecordingSink::new();

    ctl.run(&shutdown, &mut sink);

    assert_eq!(ctl.ticks(), 0);
    assert_eq!(ctl.link().polls, 0);
    assert!(ctl.actuators().is_released());
    assert_eq!(sink.events, vec![AppEvent::Started, AppEvent::ShuttingDown]);
}

#[test]
fn shutdown_is_idempotent_and_stops_ticking() {
    let mut ctl = make_controller(
        DeviceConfig::default(),
        MockSensor::constant(false),
        MockLink::new(),
        MockDelay::new(),
    );
    let mut sink = RecordingSink::new();
    ctl.start(&mut sink);
    ctl.shutdown(&mut sink);
    ctl.shutdown(&mut sink);
    ctl.tick(&mut sink);

    assert_eq!(sink.count(|e| *e == AppEvent::ShuttingDown), 1);
    assert_eq!(ctl.ticks(), 0);
    assert_eq!(ctl.link().polls, 0);
    // One "off" from start, one from shutdown.
    assert_eq!(ctl.actuators().flow().switch().args, vec!["off", "off"]);
}
