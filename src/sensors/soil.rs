//! Digital soil moisture probe.
//!
//! The probe's comparator output is HIGH when the soil is dry and LOW when
//! it is wet.  The driver is generic over any [`InputPin`], so tests and
//! other boards can plug in their own pin type.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`ProbePin`] reads the real GPIO level via hw_init helpers.
//! On host/test: [`ProbePin`] reads a simulated level (defaults to wet).

use core::convert::Infallible;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{ErrorType, InputPin};
use log::debug;

use crate::app::ports::SensorPort;
use crate::error::SensorError;
use crate::sensors::SensorReading;

#[cfg(not(target_os = "espidf"))]
static SIM_SOIL_DRY: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_soil_dry(dry: bool) {
    SIM_SOIL_DRY.store(dry, Ordering::Relaxed);
}

// ── Probe pin ─────────────────────────────────────────────────

/// The board's soil probe input as an `embedded-hal` pin.
pub struct ProbePin {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    gpio: i32,
}

impl ProbePin {
    /// The pin must already be configured as an input by
    /// [`hw_init::init_peripherals`](crate::drivers::hw_init::init_peripherals).
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

impl ErrorType for ProbePin {
    type Error = Infallible;
}

impl InputPin for ProbePin {
    #[cfg(target_os = "espidf")]
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(crate::drivers::hw_init::gpio_read(self.gpio))
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(SIM_SOIL_DRY.load(Ordering::Relaxed))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

// ── Sensor ────────────────────────────────────────────────────

pub struct SoilSensor<P> {
    pin: P,
}

impl<P: InputPin> SoilSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Level of the comparator output.  HIGH means dry.
    pub fn is_dry(&mut self) -> Result<bool, SensorError> {
        self.pin.is_high().map_err(|_| SensorError::GpioReadFailed)
    }
}

impl<P: InputPin> SensorPort for SoilSensor<P> {
    fn read_moisture(&mut self) -> Result<SensorReading, SensorError> {
        let dry = self.is_dry()?;
        debug!("soil probe: {}", if dry { "dry" } else { "wet" });
        Ok(SensorReading::now(dry))
    }
}
