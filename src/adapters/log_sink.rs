//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every application event as a single
//! log line: through `esp_idf_logger` to the serial console on the board,
//! through `tracing-subscriber` on the host.

use log::{debug, info, warn};

use crate::app::events::{AppEvent, LinkOp};
use crate::app::ports::EventSink;

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | irrigator v{}", env!("CARGO_PKG_VERSION"));
            }
            AppEvent::SoilRead { dry } => {
                debug!("SOIL  | {}", if *dry { "dry" } else { "wet" });
            }
            AppEvent::ReadingReported { dry } => {
                info!("REPORT | soil_moisture={}", u8::from(*dry));
            }
            AppEvent::SensorFault(e) => {
                warn!("FAULT | soil probe: {}", e);
            }
            AppEvent::LinkFault { op, error } => {
                let op = match op {
                    LinkOp::Report => "report",
                    LinkOp::Poll => "poll",
                };
                warn!("FAULT | coordinator {}: {}", op, error);
            }
            AppEvent::CommandReceived(cmd) => {
                debug!("CMD   | {}", cmd);
            }
            AppEvent::IntentSet { actuator, on } => {
                info!("CMD   | {} -> {}", actuator, on_off(*on));
            }
            AppEvent::ActuatorFault { actuator, error } => {
                warn!("FAULT | {}: {}", actuator, error);
            }
            AppEvent::Status(s) => {
                info!(
                    "STATUS | tick={} speaker={} motor={} water={}",
                    s.tick,
                    on_off(s.speaker),
                    on_off(s.motor),
                    on_off(s.water),
                );
            }
            AppEvent::ShuttingDown => {
                info!("STOP  | outputs released");
            }
        }
    }
}
