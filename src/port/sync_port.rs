//! Synchronous serial port implementation.
//!
//! Wraps the `serialport` crate behind the `SerialTransport` trait so the
//! protocol engine never touches the crate's types directly.

use super::error::TransportError;
use super::traits::{PortSettings, SerialTransport};
use std::io::{Read, Write};
use std::time::Duration;

/// Real serial port backed by `serialport::SerialPort`.
pub struct SyncSerialPort {
    port: Box<dyn serialport::SerialPort>,
    name: String,
}

impl SyncSerialPort {
    /// Open a serial port with the given settings.
    ///
    /// The module's command mode is 8N1 on the host side; only baud rate and
    /// timeout come from `settings`.
    ///
    /// # Arguments
    /// * `port_name` - System path to the serial port (e.g. "/dev/ttyUSB0" or "COM3")
    /// * `settings` - Baud rate and read timeout
    pub fn open(port_name: &str, settings: PortSettings) -> Result<Self, TransportError> {
        let port = serialport::new(port_name, settings.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(settings.timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => TransportError::not_found(port_name),
                serialport::ErrorKind::Io(_) => TransportError::unavailable(e.to_string()),
                _ => TransportError::Serial(e),
            })?;

        Ok(Self {
            port,
            name: port_name.to_string(),
        })
    }
}

impl SerialTransport for SyncSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        self.port.write(data).map_err(TransportError::Io)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, TransportError> {
        // Timeout expiry is a normal outcome on this half-duplex link: the
        // module simply had nothing more to say.
        match self.port.read(buffer) {
            Ok(n) => Ok(n),
            Err(e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                Ok(0)
            }
            Err(e) => Err(TransportError::Io(e)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), TransportError> {
        self.port.set_timeout(timeout).map_err(TransportError::Serial)
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate())
            .finish()
    }
}
