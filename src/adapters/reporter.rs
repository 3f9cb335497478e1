//! Status reporter adapter.
//!
//! [`CloudReporter`] implements [`StatusReporter`]: it turns each
//! [`StatusSnapshot`] into the JSON [`StatusPayload`] and hands the bytes
//! to a [`PayloadTransport`].  Delivery is fire-and-forget; failures are
//! logged and counted but never reach the control core.
//!
//! [`LogTransport`] writes the payload to the serial console.  A real
//! database client slots in behind the same trait.

use core::fmt;
use log::{info, warn};

use crate::app::ports::StatusReporter;
use crate::status::{StatusPayload, StatusSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// The payload could not be encoded.
    Serialize,
    /// The transport refused or lost the payload.
    Transport(&'static str),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize => write!(f, "status payload serialization failed"),
            Self::Transport(why) => write!(f, "status delivery failed: {}", why),
        }
    }
}

/// Byte-level delivery of an encoded status payload.
pub trait PayloadTransport {
    fn send(&mut self, payload: &[u8]) -> Result<(), ReportError>;
}

/// Prints each payload to the log.
#[derive(Debug, Default)]
pub struct LogTransport;

impl PayloadTransport for LogTransport {
    fn send(&mut self, payload: &[u8]) -> Result<(), ReportError> {
        let text = core::str::from_utf8(payload).map_err(|_| ReportError::Serialize)?;
        info!("Payload: {}", text);
        Ok(())
    }
}

pub struct CloudReporter<T> {
    transport: T,
    sent: u32,
    failed: u32,
    last_error: Option<ReportError>,
}

impl<T: PayloadTransport> CloudReporter<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sent: 0,
            failed: 0,
            last_error: None,
        }
    }

    /// Encode and deliver one payload.
    pub fn send_payload(&mut self, payload: &StatusPayload) -> Result<(), ReportError> {
        let bytes = payload.to_json().map_err(|_| ReportError::Serialize)?;
        self.transport.send(&bytes)
    }

    pub fn sent_count(&self) -> u32 {
        self.sent
    }

    pub fn failed_count(&self) -> u32 {
        self.failed
    }

    pub fn last_error(&self) -> Option<ReportError> {
        self.last_error
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: PayloadTransport> StatusReporter for CloudReporter<T> {
    fn report(&mut self, snapshot: &StatusSnapshot) {
        match self.send_payload(&snapshot.to_payload()) {
            Ok(()) => {
                self.sent = self.sent.wrapping_add(1);
                self.last_error = None;
            }
            Err(e) => {
                self.failed = self.failed.wrapping_add(1);
                self.last_error = Some(e);
                warn!("Status report dropped: {}", e);
            }
        }
    }
}
