//! Mock transport implementation for testing.
//!
//! Provides a `MockTransport` that simulates the module without requiring
//! hardware: reads are served from a scripted queue of bursts, writes are
//! logged for later inspection.

use super::error::TransportError;
use super::traits::SerialTransport;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Inner state of the mock, protected by a mutex for interior mutability.
#[derive(Debug, Default)]
struct MockState {
    /// Queue of byte bursts, one per device reply. Bursts are separated by
    /// one quiet read, like the timeout gap between two real exchanges.
    read_script: VecDeque<Vec<u8>>,
    /// Remainder of a burst that overflowed the previous read buffer.
    pending: Option<Vec<u8>>,
    /// Whether the next read is the quiet gap after a finished burst.
    gap: bool,
    /// Log of all writes, one entry per `write_bytes` call.
    write_log: Vec<Vec<u8>>,
    /// Configured timeout (recorded, not simulated).
    timeout: Duration,
}

/// Mock serial transport for testing the protocol engine.
///
/// Cloning yields a handle to the same shared state, so a test can keep one
/// clone for inspection while the engine owns the other.
///
/// # Example
/// ```
/// use btconfig::port::{MockTransport, SerialTransport};
///
/// let mut port = MockTransport::new("MOCK0");
/// let probe = port.clone();
///
/// port.push_read(b"+UART:38400,0,0\r\nOK\r\n");
///
/// let mut buffer = [0u8; 64];
/// let n = port.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"+UART:38400,0,0\r\nOK\r\n");
///
/// port.write_bytes(b"AT\r\n").unwrap();
/// assert_eq!(probe.writes(), vec![b"AT\r\n".to_vec()]);
/// ```
#[derive(Clone)]
pub struct MockTransport {
    name: String,
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a new mock transport with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockState {
                timeout: Duration::from_millis(100),
                ..Default::default()
            })),
        }
    }

    /// Script one reply burst. Each burst answers one exchange; the read
    /// after a burst is quiet, ending the engine's accumulation loop.
    pub fn push_read(&self, data: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.read_script.push_back(data.to_vec());
    }

    /// Script a read that times out without yielding any data.
    pub fn push_silence(&self) {
        let mut state = self.state.lock().unwrap();
        state.read_script.push_back(Vec::new());
    }

    /// Get a copy of everything written so far, one entry per write call.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state.write_log.clone()
    }

    /// Get the written data as one decoded string, for terse assertions.
    pub fn written_text(&self) -> String {
        let state = self.state.lock().unwrap();
        state
            .write_log
            .iter()
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect()
    }

    /// Clear the write log.
    pub fn clear_writes(&self) {
        let mut state = self.state.lock().unwrap();
        state.write_log.clear();
    }
}

impl SerialTransport for MockTransport {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.write_log.push(data.to_vec());
        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, TransportError> {
        let mut state = self.state.lock().unwrap();

        let mut chunk = if let Some(pending) = state.pending.take() {
            pending
        } else if state.gap {
            state.gap = false;
            return Ok(0);
        } else {
            match state.read_script.pop_front() {
                Some(chunk) => chunk,
                // Script exhausted: behave like a silent device.
                None => return Ok(0),
            }
        };

        let n = chunk.len().min(buffer.len());
        buffer[..n].copy_from_slice(&chunk[..n]);

        if n < chunk.len() {
            // Keep the overflow for the next read call, same burst.
            chunk.drain(..n);
            state.pending = Some(chunk);
        } else if n > 0 {
            state.gap = true;
        }

        Ok(n)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.timeout = timeout;
        Ok(())
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("name", &self.name)
            .finish()
    }
}
