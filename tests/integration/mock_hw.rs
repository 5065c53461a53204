//! Mock hardware and network adapters for integration tests.
//!
//! Every port records its calls so tests can assert on the full history
//! without touching GPIO/LEDC registers or a real coordinator.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

use irrigator::adapters::shutdown::ShutdownSignal;
use irrigator::app::commands::Command;
use irrigator::app::events::AppEvent;
use irrigator::app::ports::{EventSink, RemoteLink, SensorPort, SignalPort, SwitchPort};
use irrigator::app::service::Controller;
use irrigator::config::DeviceConfig;
use irrigator::drivers::flow::FlowDriver;
use irrigator::drivers::rotary::RotaryDriver;
use irrigator::drivers::tone::ToneDriver;
use irrigator::drivers::ActuatorBank;
use irrigator::error::{ActuatorError, LinkError, SensorError};
use irrigator::sensors::SensorReading;

// ── Signal generator ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalCall {
    Duty(f32),
    Frequency(u32),
    Release,
}

#[derive(Default)]
pub struct RecordingSignal {
    pub calls: Vec<SignalCall>,
    /// Every duty write fails with this error.
    pub fail_duty: Option<ActuatorError>,
    released: bool,
}

impl RecordingSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: ActuatorError) -> Self {
        Self {
            fail_duty: Some(error),
            ..Self::default()
        }
    }

    pub fn duties(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SignalCall::Duty(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn frequencies(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SignalCall::Frequency(hz) => Some(*hz),
                _ => None,
            })
            .collect()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl SignalPort for RecordingSignal {
    fn set_duty(&mut self, percent: f32) -> Result<(), ActuatorError> {
        if self.released {
            return Err(ActuatorError::SignalReleased);
        }
        if let Some(e) = self.fail_duty {
            return Err(e);
        }
        self.calls.push(SignalCall::Duty(percent));
        Ok(())
    }

    fn set_frequency(&mut self, hz: u32) -> Result<(), ActuatorError> {
        if self.released {
            return Err(ActuatorError::SignalReleased);
        }
        self.calls.push(SignalCall::Frequency(hz));
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            self.calls.push(SignalCall::Release);
            self.released = true;
        }
    }
}

// ── Valve switch ──────────────────────────────────────────────

pub struct RecordingSwitch {
    pub args: Vec<String>,
    pub result: Result<i32, ActuatorError>,
}

impl RecordingSwitch {
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            result: Ok(0),
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }
}

impl SwitchPort for RecordingSwitch {
    fn run(&mut self, argument: &str) -> Result<i32, ActuatorError> {
        self.args.push(argument.to_string());
        self.result
    }
}

// ── Soil sensor ───────────────────────────────────────────────

pub struct MockSensor {
    /// Served in order; once empty every read returns `fallback`.
    pub queue: VecDeque<Result<bool, SensorError>>,
    pub fallback: bool,
    pub reads: usize,
}

impl MockSensor {
    pub fn constant(dry: bool) -> Self {
        Self {
            queue: VecDeque::new(),
            fallback: dry,
            reads: 0,
        }
    }

    pub fn sequence(values: impl IntoIterator<Item = Result<bool, SensorError>>) -> Self {
        Self {
            queue: values.into_iter().collect(),
            fallback: false,
            reads: 0,
        }
    }
}

impl SensorPort for MockSensor {
    fn read_moisture(&mut self) -> Result<SensorReading, SensorError> {
        self.reads += 1;
        let dry = self.queue.pop_front().unwrap_or(Ok(self.fallback))?;
        Ok(SensorReading::now(dry))
    }
}

// ── Coordinator link ──────────────────────────────────────────

pub struct MockLink {
    /// `moisture_raw` of every report attempt.
    pub reports: Vec<bool>,
    pub report_result: Result<(), LinkError>,
    /// Served in order; once empty every poll returns `Unknown`.
    pub commands: VecDeque<Result<Command, LinkError>>,
    pub polls: usize,
}

impl MockLink {
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
            report_result: Ok(()),
            commands: VecDeque::new(),
            polls: 0,
        }
    }

    pub fn with_commands(commands: impl IntoIterator<Item = Result<Command, LinkError>>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
            ..Self::new()
        }
    }
}

impl RemoteLink for MockLink {
    fn report_reading(&mut self, reading: &SensorReading) -> Result<(), LinkError> {
        self.reports.push(reading.moisture_raw);
        self.report_result
    }

    fn poll_command(&mut self) -> Result<Command, LinkError> {
        self.polls += 1;
        self.commands.pop_front().unwrap_or(Ok(Command::Unknown))
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Records every requested sleep without sleeping.  Optionally raises a
/// shutdown signal once a given number of sleeps has been requested.
#[derive(Default)]
pub struct MockDelay {
    pub sleeps: Vec<Duration>,
    trip: Option<(usize, ShutdownSignal)>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shutdown_after(calls: usize, signal: ShutdownSignal) -> Self {
        Self {
            sleeps: Vec::new(),
            trip: Some((calls, signal)),
        }
    }

    pub fn total(&self) -> Duration {
        self.sleeps.iter().sum()
    }

    fn record(&mut self, d: Duration) {
        self.sleeps.push(d);
        if let Some((after, signal)) = &self.trip {
            if self.sleeps.len() >= *after {
                signal.request();
            }
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.record(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(Duration::from_millis(u64::from(ms)));
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn last(&self) -> Option<&AppEvent> {
        self.events.last()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Assembled controller ──────────────────────────────────────

pub type MockBank = ActuatorBank<RecordingSignal, RecordingSignal, RecordingSwitch>;
pub type MockController = Controller<MockSensor, MockLink, MockBank, MockDelay>;

pub fn mock_bank(config: &DeviceConfig) -> MockBank {
    ActuatorBank::new(
        RotaryDriver::new(RecordingSignal::new()),
        ToneDriver::new(RecordingSignal::new(), config.melody.clone()),
        FlowDriver::new(RecordingSwitch::new()),
    )
}

pub fn make_controller(
    config: DeviceConfig,
    sensor: MockSensor,
    link: MockLink,
    delay: MockDelay,
) -> MockController {
    let bank = mock_bank(&config);
    Controller::new(config, sensor, link, bank, delay)
}
