//! Integration tests for the command shell dispatch contract.
//!
//! Every test drives a `Shell` over a `MockTransport` with scripted device
//! replies and asserts on both the printed output and the bytes that reached
//! the wire.

use btconfig::port::MockTransport;
use btconfig::protocol::AtEngine;
use btconfig::shell::{completions_for, Outcome, Shell, PROMPT};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn shell_with_mock() -> (Shell<Vec<u8>>, MockTransport) {
    let mock = MockTransport::new("MOCK0");
    let probe = mock.clone();
    let engine = AtEngine::new(Box::new(mock));
    (Shell::with_output(engine, Vec::new()), probe)
}

fn output_of<W: std::io::Write + AsRef<[u8]>>(shell: &Shell<W>) -> String {
    String::from_utf8_lossy(shell.output().as_ref()).into_owned()
}

#[test]
fn empty_line_is_a_no_op() {
    let (mut shell, probe) = shell_with_mock();

    assert_eq!(shell.dispatch("").unwrap(), Outcome::Continue);
    assert_eq!(shell.dispatch("   \n").unwrap(), Outcome::Continue);

    assert!(probe.writes().is_empty(), "no command may reach the device");
    assert_eq!(output_of(&shell), "");
}

#[test]
fn unknown_command_is_reported_and_session_continues() {
    let (mut shell, probe) = shell_with_mock();

    assert_eq!(shell.dispatch("frobnicate\n").unwrap(), Outcome::Continue);

    assert_eq!(output_of(&shell), "Unknown command: frobnicate\n");
    assert!(probe.writes().is_empty());
}

#[test]
fn exit_ends_the_session() {
    let (mut shell, _probe) = shell_with_mock();
    assert_eq!(shell.dispatch("exit\n").unwrap(), Outcome::Exit);
}

#[test]
fn version_prints_extracted_field() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"+VERSION:2.0-20100601\r\nOK\r\n");

    shell.dispatch("version\n").unwrap();

    assert_eq!(output_of(&shell), "2.0-20100601\n");
    assert_eq!(probe.written_text(), "AT+VERSION?\r\n");
}

#[test]
fn address_prints_extracted_field() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"+ADDR:98:D3:51:00:12:34\r\nOK\r\n");

    shell.dispatch("address\n").unwrap();

    assert_eq!(output_of(&shell), "98:D3:51:00:12:34\n");
    assert_eq!(probe.written_text(), "AT+ADDR?\r\n");
}

#[test]
fn silent_device_yields_no_response_not_a_crash() {
    let (mut shell, probe) = shell_with_mock();
    // Nothing scripted: the device stays quiet.

    assert_eq!(shell.dispatch("version\n").unwrap(), Outcome::Continue);

    assert_eq!(output_of(&shell), "no response from device\n");
    assert_eq!(probe.written_text(), "AT+VERSION?\r\n");
}

#[test]
fn name_set_then_reads_back() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"OK\r\n"); // set ack, absorbed
    probe.push_read(b"+NAME:robot\r\nOK\r\n"); // query reply

    shell.dispatch("name robot\n").unwrap();

    assert_eq!(output_of(&shell), "robot\n");
    let writes = probe.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0], b"AT+NAME=\"robot\"\r\n");
    assert_eq!(writes[1], b"AT+NAME?\r\n");
}

#[test]
fn name_with_non_ascii_argument_is_rejected_before_the_wire() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"+NAME:old\r\nOK\r\n"); // only the query reply

    shell.dispatch("name héllo\n").unwrap();

    let output = output_of(&shell);
    assert!(output.contains("non-ASCII"), "got: {output}");
    // The set never reached the device; the query still ran.
    assert_eq!(probe.written_text(), "AT+NAME?\r\n");
}

#[test]
fn pin_query_uses_whole_line_token() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"1234\r\nOK\r\n");

    shell.dispatch("pin\n").unwrap();

    assert_eq!(output_of(&shell), "1234\n");
    assert_eq!(probe.written_text(), "AT+PSWD?\r\n");
}

#[test]
fn baudrate_get_prints_configuration() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"+UART:38400,1,0\r\nOK\r\n");

    shell.dispatch("baudrate\n").unwrap();

    assert_eq!(
        output_of(&shell),
        "UartConfig(baudrate=38400, stopbits=2, parity=none)\n"
    );
    assert_eq!(probe.written_text(), "AT+UART?\r\n");
}

#[test]
fn baudrate_set_rewrites_full_triple_and_reads_back() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"+UART:38400,0,0\r\nOK\r\n"); // current triple for the merge
    probe.push_read(b"OK\r\n"); // write ack
    probe.push_read(b"+UART:115200,0,0\r\nOK\r\n"); // final read-back

    shell.dispatch("baudrate 115200\n").unwrap();

    assert_eq!(
        output_of(&shell),
        "UartConfig(baudrate=115200, stopbits=1, parity=none)\n"
    );
    let writes = probe.writes();
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0], b"AT+UART?\r\n");
    assert_eq!(writes[1], b"AT+UART=115200,0,0\r\n");
    assert_eq!(writes[2], b"AT+UART?\r\n");
}

#[test]
fn invalid_baudrate_reports_legal_set_and_writes_nothing() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"+UART:38400,0,0\r\nOK\r\n"); // fetched for the merge
    probe.push_read(b"+UART:38400,0,0\r\nOK\r\n"); // final read-back

    shell.dispatch("baudrate 99999\n").unwrap();

    let output = output_of(&shell);
    assert!(output.contains("invalid value \"99999\""), "got: {output}");
    assert!(output.contains("4800"), "legal set must be listed: {output}");
    // Still prints the (unchanged) configuration afterwards.
    assert!(output.contains("UartConfig(baudrate=38400"), "got: {output}");
    // No AT+UART= write ever went out.
    assert!(!probe.written_text().contains("AT+UART="));
}

#[test]
fn invalid_stopbits_aborts_before_parity_validation() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"+UART:38400,0,0\r\nOK\r\n");
    probe.push_read(b"+UART:38400,0,0\r\nOK\r\n");

    shell.dispatch("stopbits 3\n").unwrap();

    let output = output_of(&shell);
    assert!(output.contains("invalid value \"3\""), "got: {output}");
    assert!(output.contains("[\"1\", \"2\"]"), "got: {output}");
    assert!(!probe.written_text().contains("AT+UART="));
}

#[test]
fn parity_set_merges_over_current_triple() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"+UART:9600,1,0\r\nOK\r\n");
    probe.push_read(b"OK\r\n");
    probe.push_read(b"+UART:9600,1,2\r\nOK\r\n");

    shell.dispatch("parity even\n").unwrap();

    assert_eq!(probe.writes()[1], b"AT+UART=9600,1,2\r\n");
    assert_eq!(
        output_of(&shell),
        "UartConfig(baudrate=9600, stopbits=2, parity=even)\n"
    );
}

#[test]
fn info_aborts_with_one_guidance_message_when_probe_fails() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"+VERSION:2.0\r\n"); // anything but OK

    shell.dispatch("info\n").unwrap();

    assert_eq!(
        output_of(&shell),
        "No OK reply to the AT probe! Ensure the device is in command mode.\n"
    );
    // Only the probe went out, no sub-queries.
    assert_eq!(probe.written_text(), "AT\r\n");
}

#[test]
fn info_aborts_on_silence_too() {
    let (mut shell, probe) = shell_with_mock();

    shell.dispatch("info\n").unwrap();

    assert_eq!(
        output_of(&shell),
        "No OK reply to the AT probe! Ensure the device is in command mode.\n"
    );
    assert_eq!(probe.written_text(), "AT\r\n");
}

#[test]
fn info_reports_every_field() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"OK\r\n"); // liveness
    probe.push_read(b"+NAME:HC-05\r\nOK\r\n");
    probe.push_read(b"+UART:38400,0,0\r\nOK\r\n");
    probe.push_read(b"1234\r\nOK\r\n"); // pin, unlabelled
    probe.push_read(b"+ADDR:98:D3:51:00:12:34\r\nOK\r\n");
    probe.push_read(b"+VERSION:2.0-20100601\r\nOK\r\n");
    probe.push_read(b"+ROLE:0\r\nOK\r\n");
    probe.push_read(b"+CMODE:1\r\nOK\r\n");

    shell.dispatch("info\n").unwrap();

    assert_eq!(
        output_of(&shell),
        "name: HC-05\n\
         baudrate: 38400\n\
         stopbits: 1\n\
         parity: none\n\
         pin: 1234\n\
         address: 98:D3:51:00:12:34\n\
         version: 2.0-20100601\n\
         role: slave\n\
         cmode: any address\n"
    );
    assert_eq!(
        probe.written_text(),
        "AT\r\nAT+NAME?\r\nAT+UART?\r\nAT+PSWD?\r\nAT+ADDR?\r\nAT+VERSION?\r\nAT+ROLE?\r\nAT+CMODE?\r\n"
    );
}

#[test]
fn info_field_failure_does_not_abort_the_rest() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"OK\r\n"); // liveness
    probe.push_read(b"garbled\r\n"); // name: anchor missing
    probe.push_read(b"+UART:38400,0,0\r\nOK\r\n");
    probe.push_read(b"1234\r\nOK\r\n");
    probe.push_read(b"+ADDR:98:D3:51:00:12:34\r\nOK\r\n");
    probe.push_read(b"+VERSION:2.0\r\nOK\r\n");
    probe.push_read(b"+ROLE:7\r\nOK\r\n"); // out-of-range role ordinal
    probe.push_read(b"+CMODE:2\r\nOK\r\n");

    shell.dispatch("info\n").unwrap();

    let output = output_of(&shell);
    assert!(output.contains("name: (unparsable response"), "got: {output}");
    assert!(output.contains("role: (device sent out-of-range role value 7"), "got: {output}");
    // Later fields were still queried and printed.
    assert!(output.contains("cmode: slave-loop"), "got: {output}");
    assert!(probe.written_text().ends_with("AT+CMODE?\r\n"));
}

#[test]
fn run_loop_prompts_dispatches_and_exits() {
    let (mut shell, probe) = shell_with_mock();
    probe.push_read(b"+VERSION:2.0\r\nOK\r\n");

    let input = Cursor::new(b"version\nexit\n".to_vec());
    shell.run(input).unwrap();

    let output = output_of(&shell);
    assert_eq!(output, format!("{PROMPT}2.0\n{PROMPT}"));
}

#[test]
fn run_loop_prints_newline_on_end_of_input() {
    let (mut shell, _probe) = shell_with_mock();

    let input = Cursor::new(Vec::new());
    shell.run(input).unwrap();

    assert_eq!(output_of(&shell), format!("{PROMPT}\n"));
}

#[test]
fn completion_filters_by_prefix_in_defined_order() {
    assert_eq!(completions_for("baudrate", "96"), vec!["9600"]);
    assert_eq!(
        completions_for("baudrate", ""),
        vec![
            "4800", "9600", "19200", "38400", "57600", "115200", "230400", "460800", "921600",
            "1382400", "1843200", "2764800", "3686400",
        ]
    );
    assert_eq!(completions_for("parity", ""), vec!["none", "odd", "even"]);
    assert_eq!(completions_for("stopbits", "2"), vec!["2"]);
}
