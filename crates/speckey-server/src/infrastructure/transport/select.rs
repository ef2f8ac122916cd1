//! Interactive serial-port selection.
//!
//! Enumerates the candidate serial ports, prints one numbered line per
//! port, and prompts until the operator enters a valid index. Entering
//! `r` re-enumerates, which covers the "plug the cable in after launch"
//! case without restarting. The prompt repeats in a loop, so arbitrarily
//! many bad entries cost nothing but patience.

use std::io::{self, BufRead, Write};

use serialport::{SerialPortInfo, SerialPortType};
use tracing::debug;

use super::TransportError;

/// One parsed line of operator input at the selection prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionInput {
    /// A valid zero-based index into the current port list.
    Index(usize),
    /// Request to re-enumerate the ports.
    Refresh,
    /// Anything else.
    Invalid,
}

/// Parses one line of operator input against a listing of `count` ports.
///
/// `r` (any case, surrounding whitespace ignored) requests a refresh. A
/// number is accepted only when it indexes into the current listing.
pub fn parse_selection(input: &str, count: usize) -> SelectionInput {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("r") {
        return SelectionInput::Refresh;
    }
    match trimmed.parse::<usize>() {
        Ok(index) if index < count => SelectionInput::Index(index),
        _ => SelectionInput::Invalid,
    }
}

/// Prompts on stdin/stdout until the operator picks a port.
///
/// # Errors
///
/// Returns [`TransportError::SelectionAborted`] if stdin reaches EOF
/// before a valid selection is made, and [`TransportError::Enumeration`]
/// if the port list cannot be read.
pub fn choose_port() -> Result<String, TransportError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    choose_port_with(serialport::available_ports, &mut input, &mut output)
}

/// Selection loop with the port lister and I/O injected, so tests can
/// drive it without hardware or a terminal.
fn choose_port_with<F, R, W>(
    mut list_ports: F,
    input: &mut R,
    output: &mut W,
) -> Result<String, TransportError>
where
    F: FnMut() -> serialport::Result<Vec<SerialPortInfo>>,
    R: BufRead,
    W: Write,
{
    loop {
        let ports = list_ports().map_err(TransportError::Enumeration)?;

        if ports.is_empty() {
            writeln!(output, "No serial ports detected. Press 'r' to scan again.")?;
        }
        for (index, port) in ports.iter().enumerate() {
            writeln!(
                output,
                "{index}: {} - {}",
                port.port_name,
                describe_port(port)
            )?;
        }
        write!(output, "Select the port index (refresh with 'r'): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF; nothing more will arrive on this input.
            return Err(TransportError::SelectionAborted);
        }

        match parse_selection(&line, ports.len()) {
            SelectionInput::Index(index) => {
                debug!("selected port {}", ports[index].port_name);
                return Ok(ports[index].port_name.clone());
            }
            SelectionInput::Refresh => continue,
            SelectionInput::Invalid => writeln!(output, "Invalid selection.")?,
        }
    }
}

/// Human-readable description of a port for the selection listing.
fn describe_port(info: &SerialPortInfo) -> String {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => usb
            .product
            .clone()
            .or_else(|| usb.manufacturer.clone())
            .unwrap_or_else(|| format!("USB {:04x}:{:04x}", usb.vid, usb.pid)),
        SerialPortType::PciPort => "PCI serial device".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth serial device".to_string(),
        SerialPortType::Unknown => "unknown device".to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
