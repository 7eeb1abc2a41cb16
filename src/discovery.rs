//! Interactive serial port discovery.
//!
//! When no device path is given on the command line, the available ports are
//! listed and the user picks one. Aborting the selection is a legitimate
//! outcome; the caller decides what it means for the process.

use serialport::{SerialPortType, UsbPortInfo};
use std::io::{self, BufRead, Write};

/// Human-readable tag for a discovered port.
fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(UsbPortInfo {
            vid, pid, product, ..
        }) => match product {
            Some(product) => format!("USB {vid:04x}:{pid:04x} {product}"),
            None => format!("USB {vid:04x}:{pid:04x}"),
        },
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::Unknown => "unknown".to_string(),
    }
}

/// Prompt the user to pick one of the system's serial ports.
///
/// Returns `None` when the user aborts (`q` or end-of-input) or when no ports
/// can be listed at all.
pub fn select_port() -> Option<String> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    select_port_from(&mut input, &mut io::stdout())
}

/// Testable body of [`select_port`]: reads choices from `input`, writes the
/// listing and prompts to `out`.
pub fn select_port_from(input: &mut dyn BufRead, out: &mut dyn Write) -> Option<String> {
    let ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(e) => {
            let _ = writeln!(out, "Could not list serial ports: {e}");
            return None;
        }
    };
    if ports.is_empty() {
        let _ = writeln!(out, "No serial ports detected.");
        return None;
    }

    let _ = writeln!(out, "Available ports:");
    for (index, port) in ports.iter().enumerate() {
        let _ = writeln!(out, "  [{index}] {} ({})", port.port_name, describe(&port.port_type));
    }

    let mut line = String::new();
    loop {
        let _ = write!(out, "Select a port [0-{}], or q to quit: ", ports.len() - 1);
        let _ = out.flush();

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            return None;
        }
        match choice.parse::<usize>() {
            Ok(index) if index < ports.len() => {
                return Some(ports[index].port_name.clone());
            }
            _ => {
                let _ = writeln!(out, "Not a valid choice: {choice}");
            }
        }
    }
}
