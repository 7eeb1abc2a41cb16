//! Serial transport layer.
//!
//! Provides the [`SerialTransport`] trait plus a real implementation backed by
//! the `serialport` crate and a scripted mock, so the protocol engine can be
//! exercised without hardware.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::TransportError;
pub use mock::MockTransport;
pub use sync_port::SyncSerialPort;
pub use traits::{PortSettings, SerialTransport};
