//! Core trait for the serial transport.
//!
//! Defines the `SerialTransport` trait that allows both real serial ports
//! and mock implementations to be used interchangeably by the protocol
//! engine.

use super::error::TransportError;
use std::time::Duration;

/// Parameters used to open the serial link to the module.
///
/// HC-05/HC-06 command mode always runs 8 data bits, no parity, 1 stop bit on
/// the host side; only the baud rate and the read timeout vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSettings {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Read timeout. Bounds every read so a silent device degrades to a
    /// "no response" outcome instead of hanging the shell.
    pub timeout: Duration,
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            baud_rate: 38400,
            timeout: Duration::from_millis(100),
        }
    }
}

/// Trait for byte-level serial transport operations.
///
/// This abstracts over synchronous serial I/O, allowing both real hardware
/// ports and mock implementations for testing. The handle is exclusively
/// owned by the protocol engine for the lifetime of a session.
pub trait SerialTransport: Send + std::fmt::Debug {
    /// Write bytes to the transport.
    ///
    /// Returns the number of bytes actually written.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Read bytes from the transport into the provided buffer.
    ///
    /// Blocks for at most the configured timeout. Returns `Ok(0)` when the
    /// timeout expires with no data available; errors are reserved for real
    /// I/O failures.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, TransportError>;

    /// Get the name/path of this transport.
    fn name(&self) -> &str;

    /// Set the read timeout.
    fn set_timeout(&mut self, timeout: Duration) -> Result<(), TransportError>;
}
