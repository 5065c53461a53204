//! Control loop service — the hexagonal core.
//!
//! [`Controller`] owns the device intent state and the ports it needs.  One
//! tick reads the soil probe (every `report_period_ticks`), polls the
//! coordinator's command mailbox, drives the actuators, and emits a status
//! snapshot.  All I/O flows through port traits, so the whole loop runs
//! against mock adapters in tests.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────┐ ──▶ EventSink
//!   RemoteLink ◀──▶│      Controller      │
//!  ActuatorSet ◀── │  DeviceState · tick  │
//!                  └──────────────────────┘
//! ```

use core::time::Duration;
use std::time::Instant;

use embedded_hal::delay::DelayNs;
use log::info;

use crate::adapters::shutdown::ShutdownSignal;
use crate::config::DeviceConfig;
use crate::drivers::ActuatorSet;

use super::events::{AppEvent, LinkOp, StatusData};
use super::ports::{EventSink, RemoteLink, SensorPort};
use super::state::DeviceState;

/// Granularity of the inter-tick sleep; bounds shutdown latency while idle.
pub const SLEEP_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Terminal: outputs released, no further ticks.
    ShuttingDown,
}

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

pub struct Controller<S, L, A, D> {
    config: DeviceConfig,
    sensor: S,
    link: L,
    actuators: A,
    delay: D,
    state: DeviceState,
    loop_state: LoopState,
    ticks: u64,
}

impl<S, L, A, D> Controller<S, L, A, D>
where
    S: SensorPort,
    L: RemoteLink,
    A: ActuatorSet,
    D: DelayNs,
{
    /// The config is expected to have passed [`DeviceConfig::validate`].
    pub fn new(config: DeviceConfig, sensor: S, link: L, actuators: A, delay: D) -> Self {
        Self {
            config,
            sensor,
            link,
            actuators,
            delay,
            state: DeviceState::new(),
            loop_state: LoopState::Running,
            ticks: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce start-up and drive every output to its idle level.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        self.drive(sink);
        info!(
            "Controller started (tick={} ms, report every {} ticks)",
            self.config.tick_interval_ms, self.config.report_period_ticks
        );
    }

    /// Run until `shutdown` is raised, then release every output.
    ///
    /// A raised signal is noticed between ticks and during the inter-tick
    /// sleep; a sweep or melody in progress always completes first.
    pub fn run(&mut self, shutdown: &ShutdownSignal, sink: &mut impl EventSink) {
        self.start(sink);
        while !shutdown.is_requested() {
            let started = Instant::now();
            self.tick(sink);
            self.idle_until_next_tick(started, shutdown);
        }
        self.shutdown(sink);
    }

    /// Release outputs and enter [`LoopState::ShuttingDown`].  Idempotent.
    pub fn shutdown(&mut self, sink: &mut impl EventSink) {
        if self.loop_state == LoopState::ShuttingDown {
            return;
        }
        info!("Controller shutting down after {} ticks", self.ticks);
        self.loop_state = LoopState::ShuttingDown;
        self.actuators.all_off();
        sink.emit(&AppEvent::ShuttingDown);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One control cycle: report (on report ticks) → poll → drive → status.
    ///
    /// The poll runs after the report, so an explicit water command wins
    /// over the sensor-derived intent in the same tick.
    pub fn tick(&mut self, sink: &mut impl EventSink) {
        if self.loop_state == LoopState::ShuttingDown {
            return;
        }
        self.ticks += 1;

        if self.state.advance_tick(self.config.report_period_ticks) {
            self.report(sink);
        }
        self.poll(sink);
        self.drive(sink);

        sink.emit(&AppEvent::Status(self.status()));
    }

    fn report(&mut self, sink: &mut impl EventSink) {
        let reading = match self.sensor.read_moisture() {
            Ok(r) => r,
            Err(e) => {
                sink.emit(&AppEvent::SensorFault(e));
                return;
            }
        };
        let dry = reading.moisture_raw;
        sink.emit(&AppEvent::SoilRead { dry });
        self.state.apply_reading(dry);

        match self.link.report_reading(&reading) {
            Ok(()) => sink.emit(&AppEvent::ReadingReported { dry }),
            Err(error) => sink.emit(&AppEvent::LinkFault {
                op: LinkOp::Report,
                error,
            }),
        }
    }

    fn poll(&mut self, sink: &mut impl EventSink) {
        match self.link.poll_command() {
            Ok(command) => {
                sink.emit(&AppEvent::CommandReceived(command));
                if let Some((actuator, on)) = self.state.apply_command(command) {
                    sink.emit(&AppEvent::IntentSet { actuator, on });
                }
            }
            Err(error) => sink.emit(&AppEvent::LinkFault {
                op: LinkOp::Poll,
                error,
            }),
        }
    }

    fn drive(&mut self, sink: &mut impl EventSink) {
        for (actuator, error) in self.actuators.drive(&self.state, &mut self.delay) {
            sink.emit(&AppEvent::ActuatorFault { actuator, error });
        }
    }

    /// Sleep out the rest of the tick in [`SLEEP_SLICE`] pieces.  A tick
    /// that overran its interval is not compensated.
    fn idle_until_next_tick(&mut self, started: Instant, shutdown: &ShutdownSignal) {
        let mut remaining = self.config.tick_interval().saturating_sub(started.elapsed());
        while !remaining.is_zero() && !shutdown.is_requested() {
            let slice = remaining.min(SLEEP_SLICE);
            self.delay.delay_us(slice.as_micros() as u32);
            remaining -= slice;
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> StatusData {
        StatusData {
            tick: self.ticks,
            motor: self.state.motor_intent,
            speaker: self.state.speaker_intent,
            water: self.state.water_intent,
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}
