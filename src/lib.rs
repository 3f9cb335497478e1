//! SmartTrap firmware library.
//!
//! Exposes the control core, drivers and adapters for the binary and for
//! host-side integration tests.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module; host builds get
//! simulation stubs.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod scheduler;
pub mod sensors;
pub mod status;

mod pins;
