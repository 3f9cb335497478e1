//! Unified bring-up error type for the SmartTrap firmware.
//!
//! The control loop itself has no failure outcome; these errors only
//! surface while the binary is initialising peripherals, loading config,
//! or joining the network.  All variants are `Copy`.

use core::fmt;

use crate::adapters::wifi::ConnectivityError;
use crate::app::ports::ConfigError;
use crate::drivers::hw_init::HwInitError;

/// Every fallible bring-up step funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// The network could not be joined.
    Comms(ConnectivityError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Comms(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::StorageFull => Self::Config("storage full"),
            ConfigError::IoError => Self::Config("I/O error"),
        }
    }
}
