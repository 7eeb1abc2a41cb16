//! Transport-specific error types.
//!
//! Defines error types for serial transport operations, separate from the
//! protocol-level errors.

use thiserror::Error;

/// Errors that can occur while opening or using the serial transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The specified serial port was not found on the system.
    #[error("serial port not found: {0}")]
    NotFound(String),

    /// The port exists but could not be opened (busy, permissions).
    #[error("serial port unavailable: {0}")]
    Unavailable(String),

    /// An I/O error occurred during transport operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialport-specific error occurred.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl TransportError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create an Unavailable error from a message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
