//! Device configuration parameters
//!
//! All tunable parameters for the irrigation controller.  Pin numbers and
//! PWM timing live in [`crate::pins`]; everything an installer may want to
//! change without reflashing lives here.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::drivers::tone::{Melody, MelodyStep};

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    // --- Coordinator ---
    /// Base URL of the coordinator, e.g. `http://10.0.0.2:5000`
    pub coordinator_url: String,
    /// Upper bound for connect, read and write on each request (milliseconds)
    pub http_timeout_ms: u32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub tick_interval_ms: u32,
    /// Report the soil reading once every N ticks
    pub report_period_ticks: u32,

    // --- Actuators ---
    /// Script that switches the valve supply (`<script> on|off`, host only)
    pub valve_script: String,
    /// Melody played while the speaker intent is set
    pub melody: Melody,

    // --- Network (ESP-IDF only) ---
    /// Station SSID; baked in from `IRRIGATOR_WIFI_SSID` at build time.
    /// Empty means the device runs without joining a network.
    pub wifi_ssid: heapless::String<32>,
    pub wifi_password: heapless::String<64>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Coordinator
            coordinator_url: option_env!("IRRIGATOR_COORDINATOR_URL")
                .unwrap_or("http://127.0.0.1:5000")
                .to_string(),
            http_timeout_ms: 5_000,

            // Timing
            tick_interval_ms: 1_000, // 1 Hz
            report_period_ticks: 10, // one report every ~10 s

            // Actuators
            valve_script: "pump.sh".to_string(),
            melody: default_melody(),

            // Network
            wifi_ssid: fixed_str(option_env!("IRRIGATOR_WIFI_SSID")),
            wifi_password: fixed_str(option_env!("IRRIGATOR_WIFI_PASSWORD")),
        }
    }
}

/// Build-time credential into fixed storage.  A value that does not fit is
/// dropped rather than truncated, so a mangled SSID never reaches the radio.
fn fixed_str<const N: usize>(value: Option<&str>) -> heapless::String<N> {
    let mut out = heapless::String::new();
    if let Some(v) = value {
        if out.push_str(v).is_err() {
            log::warn!("build-time credential longer than {} bytes ignored", N);
            out.clear();
        }
    }
    out
}

/// A4, B4, C5, A4 — half a second each.
pub fn default_melody() -> Melody {
    [(440, 0.5), (494, 0.5), (523, 0.5), (440, 0.5)]
        .into_iter()
        .map(|(frequency_hz, duration_secs)| MelodyStep {
            frequency_hz,
            duration_secs,
        })
        .collect()
}

impl DeviceConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.http_timeout_ms))
    }

    /// Reject values that would stall or spin the control loop.
    /// Invalid ranges are reported, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if CoordinatorUrl::parse(&self.coordinator_url).is_none() {
            return Err(ConfigError::ValidationFailed(
                "coordinator_url must be http://host[:port][/path]",
            ));
        }
        if self.http_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("http_timeout_ms must be > 0"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.report_period_ticks == 0 {
            return Err(ConfigError::ValidationFailed("report_period_ticks must be > 0"));
        }
        if self.melody.is_empty() {
            return Err(ConfigError::ValidationFailed("melody must have at least one step"));
        }
        if self.melody.iter().any(|s| s.frequency_hz == 0) {
            return Err(ConfigError::ValidationFailed("melody frequencies must be > 0"));
        }
        if self
            .melody
            .iter()
            .any(|s| !s.duration_secs.is_finite() || s.duration_secs <= 0.0)
        {
            return Err(ConfigError::ValidationFailed("melody durations must be > 0"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Coordinator URL
// ---------------------------------------------------------------------------

/// Parsed `http://host[:port][/base]` coordinator address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorUrl {
    pub host: String,
    pub port: u16,
    /// Path prefix without a trailing slash (`""` when absent).
    pub base_path: String,
}

impl CoordinatorUrl {
    /// Plain HTTP only; TLS to the coordinator is not supported.
    pub fn parse(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("http://")?;
        let (authority, path) = match rest.find('/') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (host, port.parse().ok()?),
            None => (authority, 80),
        };
        if host.is_empty() {
            return None;
        }
        Some(Self {
            host: host.to_string(),
            port,
            base_path: path.trim_end_matches('/').to_string(),
        })
    }

    /// Request target for an endpoint, e.g. `/api` + `/data`.
    pub fn path(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_path, endpoint)
    }

    /// Absolute URL for an endpoint.
    pub fn url(&self, endpoint: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.path(endpoint))
    }
}
