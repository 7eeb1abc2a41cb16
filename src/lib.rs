//! btconfig library
//!
//! Core functionality for the btconfig shell: the AT command/response
//! protocol engine, the serial transport abstraction, legal value tables,
//! and the interactive command dispatcher.
//!
//! # Modules
//!
//! - `port`: Serial transport trait, real port, and test mock
//! - `protocol`: AT protocol engine, command builders, UART triple codec
//! - `validation`: Legal value sets and completion suggestions
//! - `shell`: Command table, dispatch, and the interactive loop
//! - `discovery`: Interactive serial port selection
//! - `error`: Protocol-level error taxonomy

pub mod discovery;
pub mod error;
pub mod port;
pub mod protocol;
pub mod shell;
pub mod validation;

// Re-export commonly used types for convenience
pub use error::ProtocolError;
pub use port::{MockTransport, PortSettings, SerialTransport, SyncSerialPort, TransportError};
pub use protocol::{AtEngine, Parity, UartConfig};
pub use shell::{completions_for, Outcome, Shell, COMMANDS};
