//! Interactive command shell.
//!
//! A thin dispatcher mapping named user commands to protocol engine calls.
//! Commands live in an explicit table built once at startup: name, help text,
//! completion-candidate source, handler. The loop itself is plain
//! line-oriented stdin; protocol failures are printed and never end the
//! session.

use crate::error::ProtocolError;
use crate::protocol::commands::{self, anchors};
use crate::protocol::AtEngine;
use crate::validation;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Prompt shown before every input line.
pub const PROMPT: &str = "(btconfig) ";

/// What the loop should do after a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

type Handler = fn(&mut AtEngine, Option<&str>, &mut dyn Write) -> io::Result<Outcome>;

/// One entry of the command table.
pub struct CommandSpec {
    pub name: &'static str,
    pub help: &'static str,
    /// Candidate source for argument completion, if the argument ranges over
    /// a fixed value set.
    pub completions: Option<&'static [&'static str]>,
    handler: Handler,
}

/// The command table. A finite, closed set; no open-ended dispatch.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "version",
        help: "Show the firmware version",
        completions: None,
        handler: cmd_version,
    },
    CommandSpec {
        name: "address",
        help: "Show the module address",
        completions: None,
        handler: cmd_address,
    },
    CommandSpec {
        name: "name",
        help: "Get or set the module name",
        completions: None,
        handler: cmd_name,
    },
    CommandSpec {
        name: "pin",
        help: "Get or set the pairing PIN",
        completions: None,
        handler: cmd_pin,
    },
    CommandSpec {
        name: "baudrate",
        help: "Get or set the serial baudrate",
        completions: Some(validation::BAUD_RATES),
        handler: cmd_baudrate,
    },
    CommandSpec {
        name: "stopbits",
        help: "Get or set the serial stopbits",
        completions: Some(validation::STOP_BITS),
        handler: cmd_stopbits,
    },
    CommandSpec {
        name: "parity",
        help: "Get or set the serial parity",
        completions: Some(validation::PARITIES),
        handler: cmd_parity,
    },
    CommandSpec {
        name: "info",
        help: "Show a full device report",
        completions: None,
        handler: cmd_info,
    },
    CommandSpec {
        name: "clear",
        help: "Clear the screen",
        completions: None,
        handler: cmd_clear,
    },
    CommandSpec {
        name: "help",
        help: "List available commands",
        completions: None,
        handler: cmd_help,
    },
    CommandSpec {
        name: "exit",
        help: "Exit the shell",
        completions: None,
        handler: cmd_exit,
    },
];

/// Completion candidates for `command` given a partial argument token.
///
/// Returns the matching subset of the command's value set in its defined
/// order; an empty token yields the whole set. Commands without a value set
/// complete to nothing.
pub fn completions_for(command: &str, prefix: &str) -> Vec<&'static str> {
    COMMANDS
        .iter()
        .find(|spec| spec.name == command)
        .and_then(|spec| spec.completions)
        .map(|set| validation::suggest_completions(prefix, set))
        .unwrap_or_default()
}

/// The interactive shell: engine plus an output sink.
///
/// Output is generic so tests can capture everything the shell prints.
pub struct Shell<W: Write> {
    engine: AtEngine,
    out: W,
}

impl Shell<io::Stdout> {
    /// Shell writing to stdout.
    pub fn new(engine: AtEngine) -> Self {
        Self::with_output(engine, io::stdout())
    }
}

impl<W: Write> Shell<W> {
    /// Shell writing to an arbitrary sink.
    pub fn with_output(engine: AtEngine, out: W) -> Self {
        Self { engine, out }
    }

    /// The output sink, for inspection in tests.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run the line loop until `exit` or end-of-input.
    pub fn run(&mut self, mut input: impl BufRead) -> io::Result<()> {
        let mut line = String::new();
        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                // End-of-input: finish the prompt line before exiting.
                writeln!(self.out)?;
                break;
            }
            match self.dispatch(&line)? {
                Outcome::Exit => break,
                Outcome::Continue => {}
            }
        }
        Ok(())
    }

    /// Dispatch one input line.
    ///
    /// An empty line is a no-op; it never repeats the previous command.
    /// Unknown commands are reported and the session continues.
    pub fn dispatch(&mut self, line: &str) -> io::Result<Outcome> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Outcome::Continue);
        }

        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim())),
            None => (trimmed, None),
        };
        let arg = arg.filter(|a| !a.is_empty());

        match COMMANDS.iter().find(|spec| spec.name == name) {
            Some(spec) => (spec.handler)(&mut self.engine, arg, &mut self.out),
            None => {
                writeln!(self.out, "Unknown command: {name}")?;
                Ok(Outcome::Continue)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Send a query and extract its anchored field.
fn query(engine: &mut AtEngine, command: &str, anchor: &str) -> Result<String, ProtocolError> {
    engine.send(command)?;
    engine.receive(Some(anchor))
}

/// Send a set command and consume the acknowledgement without validating it.
fn set_and_absorb(engine: &mut AtEngine, command: &str) -> Result<(), ProtocolError> {
    engine.send(command)?;
    match engine.receive(None) {
        Ok(_) => {}
        Err(e) => debug!("no usable ack after set: {}", e),
    }
    Ok(())
}

/// Print a query result, or the error it produced.
fn report(out: &mut dyn Write, result: Result<String, ProtocolError>) -> io::Result<()> {
    match result {
        Ok(value) => writeln!(out, "{value}"),
        Err(e) => writeln!(out, "{e}"),
    }
}

/// Decode a wire ordinal into its display name from a value table.
fn display_indexed(
    raw: &str,
    field: &'static str,
    table: &'static [&'static str],
) -> Result<String, ProtocolError> {
    let index: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ProtocolError::unparsable(raw))?;
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .map(|name| (*name).to_string())
        .ok_or(ProtocolError::InvalidWireValue {
            field,
            value: index,
        })
}

fn cmd_version(engine: &mut AtEngine, _arg: Option<&str>, out: &mut dyn Write) -> io::Result<Outcome> {
    report(out, query(engine, &commands::query_version(), anchors::VERSION))?;
    Ok(Outcome::Continue)
}

fn cmd_address(engine: &mut AtEngine, _arg: Option<&str>, out: &mut dyn Write) -> io::Result<Outcome> {
    report(out, query(engine, &commands::query_address(), anchors::ADDR))?;
    Ok(Outcome::Continue)
}

fn cmd_name(engine: &mut AtEngine, arg: Option<&str>, out: &mut dyn Write) -> io::Result<Outcome> {
    if let Some(name) = arg {
        if let Err(e) = set_and_absorb(engine, &commands::set_name(name)) {
            writeln!(out, "{e}")?;
        }
    }
    report(out, query(engine, &commands::query_name(), anchors::NAME))?;
    Ok(Outcome::Continue)
}

fn cmd_pin(engine: &mut AtEngine, arg: Option<&str>, out: &mut dyn Write) -> io::Result<Outcome> {
    if let Some(pin) = arg {
        if let Err(e) = set_and_absorb(engine, &commands::set_pin(pin)) {
            writeln!(out, "{e}")?;
        }
    }
    report(out, query(engine, &commands::query_pin(), anchors::PIN))?;
    Ok(Outcome::Continue)
}

/// Shared get-or-set flow for the three UART properties: apply the change if
/// an argument was given, then read back and print the resulting triple
/// either way.
fn get_or_set_uart(
    engine: &mut AtEngine,
    out: &mut dyn Write,
    baudrate: Option<&str>,
    stopbits: Option<&str>,
    parity: Option<&str>,
) -> io::Result<Outcome> {
    if baudrate.is_some() || stopbits.is_some() || parity.is_some() {
        if let Err(e) = engine.set_uart_configuration(baudrate, stopbits, parity) {
            writeln!(out, "{e}")?;
        }
    }
    match engine.get_uart_configuration() {
        Ok(config) => writeln!(out, "{config}")?,
        Err(e) => writeln!(out, "{e}")?,
    }
    Ok(Outcome::Continue)
}

fn cmd_baudrate(engine: &mut AtEngine, arg: Option<&str>, out: &mut dyn Write) -> io::Result<Outcome> {
    get_or_set_uart(engine, out, arg, None, None)
}

fn cmd_stopbits(engine: &mut AtEngine, arg: Option<&str>, out: &mut dyn Write) -> io::Result<Outcome> {
    get_or_set_uart(engine, out, None, arg, None)
}

fn cmd_parity(engine: &mut AtEngine, arg: Option<&str>, out: &mut dyn Write) -> io::Result<Outcome> {
    get_or_set_uart(engine, out, None, None, arg)
}

/// One line of the `info` report: value, or the per-field failure.
fn info_line(
    out: &mut dyn Write,
    label: &str,
    result: Result<String, ProtocolError>,
) -> io::Result<()> {
    match result {
        Ok(value) => writeln!(out, "{label}: {value}"),
        Err(e) => writeln!(out, "{label}: ({e})"),
    }
}

/// The UART section of the `info` report. Decodes stopbits and parity through
/// the display value tables by wire ordinal, a path deliberately distinct
/// from the numeric mapping in `get_uart_configuration`.
fn info_uart(engine: &mut AtEngine, out: &mut dyn Write) -> io::Result<()> {
    let value = match query(engine, &commands::query_uart(), anchors::UART) {
        Ok(value) => value,
        Err(e) => return info_line(out, "uart", Err(e)),
    };

    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 3 {
        return info_line(out, "uart", Err(ProtocolError::unparsable(value.as_str())));
    }
    writeln!(out, "baudrate: {}", parts[0].trim())?;
    info_line(
        out,
        "stopbits",
        display_indexed(parts[1], "stopbits", validation::STOP_BITS),
    )?;
    info_line(
        out,
        "parity",
        display_indexed(parts[2], "parity", validation::PARITIES),
    )?;
    Ok(())
}

fn cmd_info(engine: &mut AtEngine, _arg: Option<&str>, out: &mut dyn Write) -> io::Result<Outcome> {
    // Liveness gate. Without an exact OK the rest of the report would be
    // noise, so nothing else is queried.
    let alive = engine.send(&commands::ping()).is_ok()
        && matches!(engine.receive(None), Ok(reply) if reply.trim() == "OK");
    if !alive {
        writeln!(
            out,
            "No OK reply to the AT probe! Ensure the device is in command mode."
        )?;
        return Ok(Outcome::Continue);
    }

    info_line(out, "name", query(engine, &commands::query_name(), anchors::NAME))?;
    info_uart(engine, out)?;
    info_line(out, "pin", query(engine, &commands::query_pin(), anchors::PIN))?;
    info_line(out, "address", query(engine, &commands::query_address(), anchors::ADDR))?;
    info_line(out, "version", query(engine, &commands::query_version(), anchors::VERSION))?;
    info_line(
        out,
        "role",
        query(engine, &commands::query_role(), anchors::ROLE)
            .and_then(|v| display_indexed(&v, "role", validation::ROLES)),
    )?;
    info_line(
        out,
        "cmode",
        query(engine, &commands::query_cmode(), anchors::CMODE)
            .and_then(|v| display_indexed(&v, "cmode", validation::CONNECTION_MODES)),
    )?;
    Ok(Outcome::Continue)
}

fn cmd_clear(_engine: &mut AtEngine, _arg: Option<&str>, out: &mut dyn Write) -> io::Result<Outcome> {
    // ANSI clear-screen plus cursor home.
    write!(out, "\x1b[2J\x1b[1;1H")?;
    out.flush()?;
    Ok(Outcome::Continue)
}

fn cmd_help(_engine: &mut AtEngine, _arg: Option<&str>, out: &mut dyn Write) -> io::Result<Outcome> {
    for spec in COMMANDS {
        writeln!(out, "{:<10} {}", spec.name, spec.help)?;
    }
    Ok(Outcome::Continue)
}

fn cmd_exit(_engine: &mut AtEngine, _arg: Option<&str>, _out: &mut dyn Write) -> io::Result<Outcome> {
    Ok(Outcome::Exit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_are_unique() {
        let mut names: Vec<&str> = COMMANDS.iter().map(|spec| spec.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COMMANDS.len());
    }

    #[test]
    fn test_completions_for_value_commands() {
        assert_eq!(completions_for("baudrate", "96"), vec!["9600"]);
        assert_eq!(completions_for("stopbits", ""), vec!["1", "2"]);
        assert_eq!(completions_for("parity", "e"), vec!["even"]);
    }

    #[test]
    fn test_completions_for_plain_commands_are_empty() {
        assert!(completions_for("version", "").is_empty());
        assert!(completions_for("nonsense", "").is_empty());
    }

    #[test]
    fn test_display_indexed() {
        assert_eq!(
            display_indexed("1", "role", validation::ROLES).unwrap(),
            "master"
        );
        assert!(matches!(
            display_indexed("9", "role", validation::ROLES),
            Err(ProtocolError::InvalidWireValue { field: "role", value: 9 })
        ));
        assert!(matches!(
            display_indexed("x", "role", validation::ROLES),
            Err(ProtocolError::UnparsableResponse { .. })
        ));
    }
}
