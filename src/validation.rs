//! Legal value sets for the configurable module properties.
//!
//! These tables are fixed for the process lifetime. They back both input
//! validation (a value must be a member of its set before anything is sent to
//! the device) and completion suggestions in the shell. `role` and `cmode`
//! additionally serve as display lists: the device reports those properties
//! as ordinal indexes into these tables.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Legal parity names, ordered by wire ordinal.
pub const PARITIES: &[&str] = &["none", "odd", "even"];

/// Legal stop bit counts. Index doubles as the wire encoding (0-based).
pub const STOP_BITS: &[&str] = &["1", "2"];

/// Legal baud rates supported by HC-05/HC-06 firmware.
pub const BAUD_RATES: &[&str] = &[
    "4800", "9600", "19200", "38400", "57600", "115200", "230400", "460800", "921600", "1382400",
    "1843200", "2764800", "3686400",
];

/// Module roles, ordered by wire ordinal.
pub const ROLES: &[&str] = &["slave", "master", "master-loop"];

/// Connection modes, ordered by wire ordinal.
pub const CONNECTION_MODES: &[&str] = &["specific address", "any address", "slave-loop"];

/// Registry mapping property name to its legal value set.
pub static VALID: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut registry: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    registry.insert("parity", PARITIES);
    registry.insert("stopbits", STOP_BITS);
    registry.insert("baudrate", BAUD_RATES);
    registry.insert("role", ROLES);
    registry.insert("cmode", CONNECTION_MODES);
    registry
});

/// Suggest completions for a partial token.
///
/// Returns the members of `completions` starting with `prefix`, preserving
/// the set's defined order. An empty prefix yields the entire set.
pub fn suggest_completions(prefix: &str, completions: &'static [&'static str]) -> Vec<&'static str> {
    if prefix.is_empty() {
        return completions.to_vec();
    }
    completions
        .iter()
        .copied()
        .filter(|candidate| candidate.starts_with(prefix))
        .collect()
}
