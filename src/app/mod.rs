//! Application core — the control loop and its domain types.
//!
//! Everything here talks to hardware and the network through the **port
//! traits** in [`ports`], so the loop is fully testable without real
//! peripherals or a running coordinator.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod state;
