use clap::Parser;
use std::io::{self, Write};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use btconfig::discovery;
use btconfig::port::{PortSettings, SyncSerialPort};
use btconfig::protocol::AtEngine;
use btconfig::shell::{Shell, PROMPT};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Configure HC-05, HC-06 and other Bluetooth serial modules over AT commands.",
    long_about = "Opens the module's serial port in command mode and starts an \
interactive shell for reading and changing its name, PIN, UART parameters and more."
)]
struct Args {
    /// Serial device path (e.g. /dev/ttyUSB0). Prompts for a port when omitted.
    device: Option<String>,

    /// Baud rate of the command-mode link.
    #[arg(short = 'b', long, default_value_t = 38400)]
    baud_rate: u32,

    /// Read timeout in milliseconds for device responses.
    #[arg(long, default_value_t = 100)]
    timeout_ms: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = PortSettings {
        baud_rate: args.baud_rate,
        timeout: Duration::from_millis(args.timeout_ms),
    };

    let Some(transport) = open_transport(args.device, settings) else {
        // Port selection abandoned before any device I/O.
        std::process::exit(1);
    };
    debug!("session transport: {:?}", transport);

    // Ctrl-C during the blocking line read re-presents the prompt instead of
    // killing the session; `exit` or end-of-input is the way out.
    if let Err(e) = ctrlc::set_handler(|| {
        let mut out = io::stdout();
        let _ = write!(out, "^C\n{PROMPT}");
        let _ = out.flush();
    }) {
        eprintln!("Could not install the interrupt handler: {e}");
    }

    let engine = AtEngine::new(Box::new(transport));
    let mut shell = Shell::new(engine);
    if let Err(e) = shell.run(io::stdin().lock()) {
        eprintln!("Terminal I/O failed: {e}");
        std::process::exit(1);
    }
}

/// Open the transport, re-prompting for a different port on failure.
///
/// A path given on the command line is tried exactly once; after it fails the
/// user is asked to pick a port interactively, so the same failing path is
/// never silently retried. Returns `None` when the user abandons selection.
fn open_transport(mut device: Option<String>, settings: PortSettings) -> Option<SyncSerialPort> {
    loop {
        let path = match device.take() {
            Some(path) => path,
            None => discovery::select_port()?,
        };
        match SyncSerialPort::open(&path, settings) {
            Ok(port) => return Some(port),
            Err(e) => eprintln!("Could not open {path}: {e}"),
        }
    }
}
