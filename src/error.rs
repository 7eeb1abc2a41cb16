//! Protocol-level error types.
//!
//! Every variant is local to a single shell command invocation: errors are
//! reported to the interactive user and never terminate the session. The
//! transport has its own error type ([`crate::port::TransportError`]) which
//! converts into [`ProtocolError::Transport`].

use crate::port::TransportError;
use thiserror::Error;

/// Errors produced by the AT protocol engine.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The read timed out with zero bytes. Distinct from an empty-string
    /// response: the device said nothing at all.
    #[error("no response from device")]
    NoResponse,

    /// The response text did not contain the expected field anchor, or did
    /// not decompose into the expected shape. Carries the raw text for
    /// diagnosis.
    #[error("unparsable response: {raw:?}")]
    UnparsableResponse {
        /// First response line as received.
        raw: String,
    },

    /// A user-supplied value is not a member of the relevant validation set.
    #[error("invalid value {value:?}! Use one of {allowed:?}")]
    InvalidInput {
        /// The rejected input.
        value: String,
        /// The full set of legal values.
        allowed: &'static [&'static str],
    },

    /// A numeric field sent by the device decodes outside its enumeration
    /// domain. Indicates a protocol or firmware mismatch, not user error.
    #[error("device sent out-of-range {field} value {value}")]
    InvalidWireValue {
        /// Which field was out of range.
        field: &'static str,
        /// The offending wire value.
        value: i64,
    },

    /// Outbound text contains non-ASCII characters. Checked before any write
    /// reaches the transport.
    #[error("command contains non-ASCII characters: {0:?}")]
    NonAsciiCommand(String),

    /// Inbound bytes are not valid ASCII.
    #[error("response contains non-ASCII bytes")]
    NonAsciiResponse,

    /// The underlying transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ProtocolError {
    /// Create an UnparsableResponse from the offending text.
    pub fn unparsable(raw: impl Into<String>) -> Self {
        Self::UnparsableResponse { raw: raw.into() }
    }

    /// Create an InvalidInput from the rejected value and its legal set.
    pub fn invalid_input(value: impl Into<String>, allowed: &'static [&'static str]) -> Self {
        Self::InvalidInput {
            value: value.into(),
            allowed,
        }
    }
}
