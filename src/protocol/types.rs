//! Value types for the UART configuration triple.

use crate::error::ProtocolError;
use std::fmt;

/// UART parity of the module's serial link.
///
/// The wire encoding is the integer ordinal; the display encoding is the
/// lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl Parity {
    /// Decode a wire ordinal.
    ///
    /// Anything outside {0, 1, 2} means the firmware speaks a different
    /// dialect; that is surfaced loudly rather than mapped to a default.
    pub fn from_wire(value: i64) -> Result<Self, ProtocolError> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Odd),
            2 => Ok(Self::Even),
            other => Err(ProtocolError::InvalidWireValue {
                field: "parity",
                value: other,
            }),
        }
    }

    /// Encode as the wire ordinal.
    pub fn wire(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Odd => 1,
            Self::Even => 2,
        }
    }

    /// The lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Odd => "odd",
            Self::Even => "even",
        }
    }

    /// Look up a parity by its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "odd" => Some(Self::Odd),
            "even" => Some(Self::Even),
            _ => None,
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The (baudrate, stopbits, parity) configuration vector exchanged as a
/// single wire command.
///
/// Immutable value type: every "set" operation derives a new instance from a
/// freshly fetched current one. A `None` field means the device's answer was
/// unknown or unparsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UartConfig {
    pub baudrate: Option<u32>,
    pub stopbits: Option<u8>,
    pub parity: Option<Parity>,
}

impl UartConfig {
    /// The fully-unknown configuration.
    pub const UNKNOWN: Self = Self {
        baudrate: None,
        stopbits: None,
        parity: None,
    };

    /// Decode the comma-separated value captured after the `UART:` anchor.
    ///
    /// The wire encodes stopbits 0-based (0 means 1 stop bit), so the decoded
    /// count is incremented by one. A value that does not split into exactly
    /// three parts yields the all-unknown configuration; that is a legitimate
    /// degraded return, not an error.
    pub fn decode(value: &str) -> Result<Self, ProtocolError> {
        let parts: Vec<&str> = value.split(',').collect();
        if parts.len() != 3 {
            return Ok(Self::UNKNOWN);
        }

        let baudrate: u32 = parts[0]
            .trim()
            .parse()
            .map_err(|_| ProtocolError::unparsable(value))?;
        let stopbits: u8 = parts[1]
            .trim()
            .parse::<u8>()
            .map_err(|_| ProtocolError::unparsable(value))?
            .saturating_add(1);
        let parity_ordinal: i64 = parts[2]
            .trim()
            .parse()
            .map_err(|_| ProtocolError::unparsable(value))?;
        let parity = Parity::from_wire(parity_ordinal)?;

        Ok(Self {
            baudrate: Some(baudrate),
            stopbits: Some(stopbits),
            parity: Some(parity),
        })
    }

    /// The wire arguments (baudrate, stopbits - 1, parity ordinal), or `None`
    /// if any field is unknown. The device only accepts the full triple in a
    /// single write command.
    pub fn wire_args(&self) -> Option<(u32, u8, u8)> {
        let baudrate = self.baudrate?;
        let stopbits = self.stopbits?;
        let parity = self.parity?;
        Some((baudrate, stopbits.saturating_sub(1), parity.wire()))
    }
}

impl fmt::Display for UartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct OrUnset<T>(Option<T>);
        impl<T: fmt::Display> fmt::Display for OrUnset<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match &self.0 {
                    Some(value) => value.fmt(f),
                    None => f.write_str("<unset>"),
                }
            }
        }

        write!(
            f,
            "UartConfig(baudrate={}, stopbits={}, parity={})",
            OrUnset(self.baudrate),
            OrUnset(self.stopbits),
            OrUnset(self.parity),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parity_wire_roundtrip() {
        for parity in [Parity::None, Parity::Odd, Parity::Even] {
            assert_eq!(Parity::from_wire(parity.wire() as i64).unwrap(), parity);
        }
    }

    #[test]
    fn test_parity_out_of_range() {
        let err = Parity::from_wire(3).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidWireValue {
                field: "parity",
                value: 3
            }
        ));
    }

    #[test]
    fn test_parity_names() {
        assert_eq!(Parity::Even.to_string(), "even");
        assert_eq!(Parity::from_name("odd"), Some(Parity::Odd));
        assert_eq!(Parity::from_name("mark"), None);
    }

    #[test]
    fn test_decode_wire_triple() {
        let config = UartConfig::decode("38400,1,0").unwrap();
        assert_eq!(
            config,
            UartConfig {
                baudrate: Some(38400),
                stopbits: Some(2),
                parity: Some(Parity::None),
            }
        );
    }

    #[test]
    fn test_decode_wrong_arity_degrades_to_unknown() {
        assert_eq!(UartConfig::decode("38400,0").unwrap(), UartConfig::UNKNOWN);
        assert_eq!(UartConfig::decode("garbage").unwrap(), UartConfig::UNKNOWN);
        assert_eq!(UartConfig::decode("1,2,3,4").unwrap(), UartConfig::UNKNOWN);
    }

    #[test]
    fn test_decode_non_numeric_is_unparsable() {
        let err = UartConfig::decode("fast,0,0").unwrap_err();
        assert!(matches!(err, ProtocolError::UnparsableResponse { .. }));
    }

    #[test]
    fn test_decode_parity_out_of_domain_fails_loudly() {
        let err = UartConfig::decode("9600,0,7").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidWireValue { field: "parity", .. }
        ));
    }

    #[test]
    fn test_display_marks_unknown_fields() {
        let text = UartConfig::UNKNOWN.to_string();
        assert_eq!(
            text,
            "UartConfig(baudrate=<unset>, stopbits=<unset>, parity=<unset>)"
        );

        let config = UartConfig::decode("9600,1,2").unwrap();
        assert_eq!(
            config.to_string(),
            "UartConfig(baudrate=9600, stopbits=2, parity=even)"
        );
    }

    proptest! {
        // The +1/-1 stopbits shift and the parity ordinal mapping must cancel
        // out: decoding what we encode restores the logical triple.
        #[test]
        fn prop_decode_inverts_encode(
            baud_idx in 0..crate::validation::BAUD_RATES.len(),
            stopbits in 1u8..=2,
            parity_ordinal in 0u8..=2,
        ) {
            let config = UartConfig {
                baudrate: Some(crate::validation::BAUD_RATES[baud_idx].parse().unwrap()),
                stopbits: Some(stopbits),
                parity: Some(Parity::from_wire(parity_ordinal as i64).unwrap()),
            };

            let (baud, stop_wire, parity_wire) = config.wire_args().unwrap();
            let wire = format!("{},{},{}", baud, stop_wire, parity_wire);
            prop_assert_eq!(UartConfig::decode(&wire).unwrap(), config);
        }
    }
}
