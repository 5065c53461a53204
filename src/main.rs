//! Irrigator — Main Entry Point
//!
//! Hexagonal architecture around a fixed-period control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SoilSensor    HttpLink       ScriptSwitch / RelaySwitch       │
//! │  (SensorPort)  (RemoteLink)   (SwitchPort)                     │
//! │  LedcChannel   LogEventSink   JsonFileConfig   SystemDelay     │
//! │  (SignalPort)  (EventSink)    (ConfigPort)     (DelayNs)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │        Controller (report · poll · drive · status)     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ActuatorBank: rotary sweep · tone melody · flow switch        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info, warn};

use irrigator::adapters::http_link::{HttpLink, PlatformTransport};
use irrigator::adapters::log_sink::LogEventSink;
use irrigator::adapters::shutdown::ShutdownSignal;
use irrigator::adapters::time::SystemDelay;
use irrigator::app::service::Controller;
use irrigator::config::{CoordinatorUrl, DeviceConfig};
use irrigator::drivers::flow::FlowDriver;
use irrigator::drivers::ledc::LedcChannel;
use irrigator::drivers::rotary::RotaryDriver;
use irrigator::drivers::tone::ToneDriver;
use irrigator::drivers::{ActuatorBank, hw_init};
use irrigator::pins;
use irrigator::sensors::soil::{ProbePin, SoilSensor};

// ── Platform bootstrap ────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
fn init_logging() -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logger init failed: {}", e))
}

#[cfg(target_os = "espidf")]
fn init_logging() -> Result<()> {
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn load_config() -> DeviceConfig {
    use irrigator::adapters::config_file::JsonFileConfig;
    use irrigator::app::ports::ConfigPort;

    let source = JsonFileConfig::from_env();
    match source.load() {
        Ok(cfg) => {
            info!("Config loaded from {}", source.path().display());
            cfg
        }
        Err(e) => {
            warn!("Config {} unusable ({}), using defaults", source.path().display(), e);
            DeviceConfig::default()
        }
    }
}

#[cfg(target_os = "espidf")]
fn load_config() -> DeviceConfig {
    DeviceConfig::default()
}

/// Bring up the station; the handle must stay alive for the link to work.
/// Without an SSID the loop still runs and every exchange is unreachable.
#[cfg(target_os = "espidf")]
fn connect_network(
    config: &DeviceConfig,
) -> Result<Option<esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>>> {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use irrigator::adapters::wifi::{self, StationPlan};

    match wifi::plan_station(&config.wifi_ssid, &config.wifi_password)? {
        StationPlan::Offline => {
            warn!("WiFi: no SSID configured (set IRRIGATOR_WIFI_SSID at build time), running offline");
            Ok(None)
        }
        StationPlan::Join => {
            let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
            let sysloop = EspSystemEventLoop::take()?;
            let nvs = EspDefaultNvsPartition::take().ok();
            let handle = wifi::connect(
                peripherals.modem,
                sysloop,
                nvs,
                &config.wifi_ssid,
                &config.wifi_password,
            )?;
            Ok(Some(handle))
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Irrigator v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = load_config();
    if let Err(e) = config.validate() {
        warn!("Config rejected ({}), using defaults", e);
        config = DeviceConfig::default();
    }
    let Some(url) = CoordinatorUrl::parse(&config.coordinator_url) else {
        anyhow::bail!("coordinator_url '{}' is not http://host[:port]", config.coordinator_url);
    };
    info!("Coordinator: {}", url.url(""));

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}", e);
        return Err(e.into());
    }

    #[cfg(target_os = "espidf")]
    let _wifi = connect_network(&config)?;

    // ── 4. Shutdown signal ────────────────────────────────────
    let shutdown = ShutdownSignal::new();
    #[cfg(not(target_os = "espidf"))]
    irrigator::adapters::shutdown::install_ctrl_c_handler(shutdown.clone())?;

    // ── 5. Construct adapters ─────────────────────────────────
    let sensor = SoilSensor::new(ProbePin::new(pins::SOIL_GPIO));
    let link = HttpLink::new(PlatformTransport::new(url, config.http_timeout()));

    #[cfg(not(target_os = "espidf"))]
    let switch = irrigator::adapters::switch::ScriptSwitch::new(config.valve_script.clone());
    #[cfg(target_os = "espidf")]
    let switch = irrigator::adapters::switch::RelaySwitch::new(pins::VALVE_RELAY_GPIO);

    let actuators = ActuatorBank::new(
        RotaryDriver::new(LedcChannel::servo()),
        ToneDriver::new(LedcChannel::buzzer(), config.melody.clone()),
        FlowDriver::new(switch),
    );

    // ── 6. Control loop ───────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut controller = Controller::new(config, sensor, link, actuators, SystemDelay::new());

    info!("System ready. Entering control loop.");
    controller.run(&shutdown, &mut sink);

    info!("Irrigator stopped");
    Ok(())
}
