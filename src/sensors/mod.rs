//! Sensor subsystem — the soil moisture probe and the reading it produces.
//!
//! A [`SensorReading`] lives for exactly one report tick: the controller
//! derives the water intent from it and hands it to the coordinator link.

pub mod soil;

use std::time::SystemTime;

/// One soil sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    /// Wall-clock time of the pin read.
    pub timestamp: SystemTime,
    /// `true` = soil dry (watering indicated), `false` = wet.
    pub moisture_raw: bool,
}

impl SensorReading {
    pub fn now(moisture_raw: bool) -> Self {
        Self {
            timestamp: SystemTime::now(),
            moisture_raw,
        }
    }
}
