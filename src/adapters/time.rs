//! Blocking delay adapter.
//!
//! Provides the [`DelayNs`] used for sweep and melody dwell times.
//!
//! - **`target_os = "espidf"`** — `esp_idf_hal::delay::FreeRtos`, which
//!   yields to the scheduler instead of spinning.
//! - **`not(target_os = "espidf")`** — `std::thread::sleep`.

use embedded_hal::delay::DelayNs;

/// Platform delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDelay;

impl SystemDelay {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for SystemDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(core::time::Duration::from_nanos(u64::from(ns)));
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for SystemDelay {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::FreeRtos.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}
