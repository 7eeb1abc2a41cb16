//! AT command/response protocol engine.
//!
//! Translates configuration intents into AT command strings, sends them over
//! the transport, reads back the free-form textual reply within a bounded
//! byte budget, and extracts fields by anchor substring. One request/response
//! in flight at a time; the transport handle is exclusively owned here.

pub mod commands;
pub mod types;

pub use types::{Parity, UartConfig};

use crate::error::ProtocolError;
use crate::port::SerialTransport;
use crate::validation;
use memchr::memchr;
use tracing::{debug, warn};

/// Byte budget for a single response read. HC-05 replies are short; anything
/// beyond this is echo noise.
const READ_BUDGET: usize = 200;

/// Locate `anchor` in `text` and return the maximal run of non-whitespace
/// characters immediately following it.
///
/// Successive occurrences are tried until one is followed by at least one
/// non-whitespace character, so an anchor followed only by whitespace does
/// not mask a later parseable occurrence. An empty anchor matches at every
/// position and therefore captures the first non-whitespace token anywhere
/// in the text (the PIN reply relies on this).
pub fn extract_field<'a>(text: &'a str, anchor: &str) -> Option<&'a str> {
    for (pos, _) in text.match_indices(anchor) {
        let rest = &text[pos + anchor.len()..];
        let end = rest
            .find(|c: char| c.is_whitespace())
            .unwrap_or(rest.len());
        if end > 0 {
            return Some(&rest[..end]);
        }
    }
    None
}

/// The protocol engine. Owns the transport for the session's lifetime.
#[derive(Debug)]
pub struct AtEngine {
    transport: Box<dyn SerialTransport>,
}

impl AtEngine {
    /// Create an engine over an already-open transport.
    pub fn new(transport: Box<dyn SerialTransport>) -> Self {
        Self { transport }
    }

    /// Name of the underlying transport (for banners and logs).
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Send a command string, which must already include its `\r\n`
    /// terminator.
    ///
    /// The ASCII precondition is checked before anything reaches the
    /// transport, so a rejected command leaves the device untouched.
    pub fn send(&mut self, command: &str) -> Result<(), ProtocolError> {
        if !command.is_ascii() {
            return Err(ProtocolError::NonAsciiCommand(command.to_string()));
        }
        debug!("sending {:?}", command);
        self.transport.write_bytes(command.as_bytes())?;
        Ok(())
    }

    /// Read a response from the transport.
    ///
    /// Only the first line of the reply is used; trailing lines (echoed
    /// terminators, `OK` acks) are discarded. With `field` given, the value
    /// anchored by that substring is extracted; without it the whole first
    /// line is returned.
    ///
    /// A read that yields no bytes at all is a distinct
    /// [`ProtocolError::NoResponse`] outcome, never conflated with a
    /// legitimately empty line.
    pub fn receive(&mut self, field: Option<&str>) -> Result<String, ProtocolError> {
        let raw = self.read_raw()?;
        if raw.is_empty() {
            return Err(ProtocolError::NoResponse);
        }
        if !raw.is_ascii() {
            return Err(ProtocolError::NonAsciiResponse);
        }
        let text = std::str::from_utf8(&raw).map_err(|_| ProtocolError::NonAsciiResponse)?;
        debug!("received {:?}", text);

        // Some error replies still carry usable structure, so this is a
        // diagnostic only; extraction proceeds on whatever text is present.
        if text.contains("ERROR") {
            warn!("device reported an error: {:?}", text);
        }

        let line = first_line(text);
        match field {
            None => Ok(line.to_string()),
            Some(anchor) => extract_field(line, anchor)
                .map(str::to_string)
                .ok_or_else(|| ProtocolError::unparsable(text)),
        }
    }

    /// Query the current UART triple.
    ///
    /// A reply that does not split into exactly three fields yields the
    /// all-unknown configuration; that is a degraded state the caller may
    /// display, not an error.
    pub fn get_uart_configuration(&mut self) -> Result<UartConfig, ProtocolError> {
        self.send(&commands::query_uart())?;
        let value = self.receive(Some(commands::anchors::UART))?;
        UartConfig::decode(&value)
    }

    /// Change part of the UART configuration, read-modify-write.
    ///
    /// The device has no single-field write command, so the current triple is
    /// fetched first and every field is resent. Provided fields are validated
    /// sequentially against their legal value sets; the first failure aborts
    /// the whole operation before anything is written. The stale
    /// acknowledgement is consumed to keep the transport in sync, but never
    /// validated; no verification re-read is performed.
    pub fn set_uart_configuration(
        &mut self,
        baudrate: Option<&str>,
        stopbits: Option<&str>,
        parity: Option<&str>,
    ) -> Result<(), ProtocolError> {
        let mut current = self.get_uart_configuration()?;

        if let Some(value) = baudrate {
            if !validation::BAUD_RATES.contains(&value) {
                return Err(ProtocolError::invalid_input(value, validation::BAUD_RATES));
            }
            let parsed = value
                .parse()
                .map_err(|_| ProtocolError::invalid_input(value, validation::BAUD_RATES))?;
            current = UartConfig {
                baudrate: Some(parsed),
                ..current
            };
        }
        if let Some(value) = stopbits {
            if !validation::STOP_BITS.contains(&value) {
                return Err(ProtocolError::invalid_input(value, validation::STOP_BITS));
            }
            let parsed = value
                .parse()
                .map_err(|_| ProtocolError::invalid_input(value, validation::STOP_BITS))?;
            current = UartConfig {
                stopbits: Some(parsed),
                ..current
            };
        }
        if let Some(value) = parity {
            let Some(parsed) = Parity::from_name(value) else {
                return Err(ProtocolError::invalid_input(value, validation::PARITIES));
            };
            current = UartConfig {
                parity: Some(parsed),
                ..current
            };
        }

        // A triple with unknown fields cannot be merged into the mandatory
        // full-triple write.
        let (baud, stop_wire, parity_wire) = current
            .wire_args()
            .ok_or_else(|| ProtocolError::unparsable("incomplete UART configuration"))?;

        self.send(&commands::set_uart(baud, stop_wire, parity_wire))?;
        match self.receive(None) {
            Ok(ack) => debug!("UART write acknowledged with {:?}", ack),
            Err(e) => debug!("no usable ack after UART write: {}", e),
        }
        Ok(())
    }

    /// Accumulate reply bytes until the budget is full or the device goes
    /// quiet for one timeout interval.
    fn read_raw(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let mut chunk = [0u8; READ_BUDGET];
        let mut raw = Vec::new();
        while raw.len() < READ_BUDGET {
            let n = self.transport.read_bytes(&mut chunk[..READ_BUDGET - raw.len()])?;
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
        }
        Ok(raw)
    }
}

/// First line of the reply, without its terminator.
fn first_line(text: &str) -> &str {
    let line = match memchr(b'\n', text.as_bytes()) {
        Some(newline) => &text[..newline],
        None => text,
    };
    line.strip_suffix('\r').unwrap_or(line)
}
