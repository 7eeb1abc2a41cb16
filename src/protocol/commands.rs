//! AT command builders and response anchors.
//!
//! All functions are pure: they produce `\r\n`-terminated command strings
//! without performing any I/O. The engine is responsible for sending them and
//! reading back the reply.
//!
//! HC-05 firmware answers queries with `<ANCHOR><value>` lines, e.g.
//! `+UART:38400,0,0`. The anchor constants below locate the value inside the
//! free-form reply text.

/// Liveness probe. A module in command mode answers `OK`.
pub fn ping() -> String {
    "AT\r\n".to_string()
}

/// Query the firmware version.
pub fn query_version() -> String {
    "AT+VERSION?\r\n".to_string()
}

/// Query the module address.
pub fn query_address() -> String {
    "AT+ADDR?\r\n".to_string()
}

/// Query the module name.
pub fn query_name() -> String {
    "AT+NAME?\r\n".to_string()
}

/// Set the module name.
pub fn set_name(name: &str) -> String {
    format!("AT+NAME=\"{name}\"\r\n")
}

/// Query the UART triple.
pub fn query_uart() -> String {
    "AT+UART?\r\n".to_string()
}

/// Set the UART triple. `stopbits_wire` is the 0-based wire count and
/// `parity_wire` the parity ordinal.
pub fn set_uart(baudrate: u32, stopbits_wire: u8, parity_wire: u8) -> String {
    format!("AT+UART={baudrate},{stopbits_wire},{parity_wire}\r\n")
}

/// Query the pairing PIN.
pub fn query_pin() -> String {
    "AT+PSWD?\r\n".to_string()
}

/// Set the pairing PIN.
pub fn set_pin(pin: &str) -> String {
    format!("AT+PSWD=\"{pin}\"\r\n")
}

/// Query the module role (slave/master/master-loop).
pub fn query_role() -> String {
    "AT+ROLE?\r\n".to_string()
}

/// Query the connection mode.
pub fn query_cmode() -> String {
    "AT+CMODE?\r\n".to_string()
}

/// Response anchors, as printed by the firmware.
pub mod anchors {
    pub const VERSION: &str = "VERSION:";
    pub const ADDR: &str = "ADDR:";
    pub const NAME: &str = "NAME:";
    pub const UART: &str = "UART:";
    pub const ROLE: &str = "ROLE:";
    pub const CMODE: &str = "CMODE:";
    /// The PIN reply is labelled inconsistently across firmware revisions, so
    /// it is extracted with an empty anchor (first token of the reply line).
    pub const PIN: &str = "";
}
