//! Serial-port transport.
//!
//! Messages are written newline-terminated so the device firmware can read
//! them line by line. The device echoes diagnostic lines back on the same
//! port; a background reader thread collects those into complete lines that
//! the application drains with [`Transport::try_receive_line`].
//!
//! The reader thread uses the port's read timeout as its shutdown poll
//! interval, so `close()` completes within roughly one timeout period.

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serialport::SerialPort;
use speckey_core::{encode_message, KeyMessage};
use tracing::{debug, info, warn};

use super::{Transport, TransportError};
use async_trait::async_trait;

/// Buffer size for each read from the port.
const READ_BUFFER_SIZE: usize = 256;

/// Serial transport with a background echo reader.
pub struct SerialTransport {
    port_name: String,
    writer: Mutex<Box<dyn SerialPort>>,
    lines: Mutex<Receiver<String>>,
    running: Arc<AtomicBool>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl SerialTransport {
    /// Opens `port_name` at the given baud rate and starts the echo reader.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::SerialOpen`] if the port cannot be opened
    /// or cloned for the reader thread.
    pub fn open(
        port_name: &str,
        baud: u32,
        read_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let writer = serialport::new(port_name, baud)
            .timeout(read_timeout)
            .open()
            .map_err(|e| TransportError::SerialOpen {
                port: port_name.to_string(),
                source: e,
            })?;
        let reader_port = writer
            .try_clone()
            .map_err(|e| TransportError::SerialOpen {
                port: port_name.to_string(),
                source: e,
            })?;

        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let loop_running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("speckey-echo-reader".to_string())
            .spawn(move || echo_loop(reader_port, tx, loop_running))
            .expect("failed to spawn echo reader thread");

        info!("serial transport ready on {port_name} at {baud} baud");

        Ok(Self {
            port_name: port_name.to_string(),
            writer: Mutex::new(writer),
            lines: Mutex::new(rx),
            running,
            reader: Mutex::new(Some(handle)),
        })
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn send(&self, message: &KeyMessage) -> Result<(), TransportError> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }

        let mut framed = encode_message(message);
        framed.push('\n');
        {
            let mut port = self
                .writer
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "serial writer lock poisoned"))?;
            port.write_all(framed.as_bytes())?;
            port.flush()?;
        }
        debug!("sent {}", framed.trim_end());
        Ok(())
    }

    fn try_receive_line(&self) -> Option<String> {
        let lines = self.lines.lock().ok()?;
        match lines.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    fn close(&self) {
        // First close wins; later calls find the flag already cleared.
        if self.running.swap(false, Ordering::SeqCst) {
            if let Ok(mut guard) = self.reader.lock() {
                if let Some(handle) = guard.take() {
                    let _ = handle.join();
                }
            }
            info!("serial transport on {} closed", self.port_name);
        }
    }
}

/// Body of the echo reader thread.
///
/// Reads raw bytes from the port, assembles them into lines, and forwards
/// each complete line on `lines`. Exits when `running` is cleared, when the
/// receiver is dropped, or on a non-timeout read error.
fn echo_loop(mut port: Box<dyn SerialPort>, lines: Sender<String>, running: Arc<AtomicBool>) {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    let mut assembler = LineAssembler::new();

    while running.load(Ordering::Relaxed) {
        match port.read(&mut buf) {
            Ok(0) => {}
            Ok(n) => {
                for line in assembler.push(&buf[..n]) {
                    if lines.send(line).is_err() {
                        return;
                    }
                }
            }
            Err(ref e) if is_timeout_error(e) => {
                // The read timeout doubles as the shutdown poll interval.
            }
            Err(e) => {
                warn!("serial read error: {e}");
                break;
            }
        }
    }
    debug!("echo reader thread exiting");
}

/// Returns `true` for the error kinds a timed-out blocking read produces.
fn is_timeout_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// Accumulates raw bytes and yields complete lines.
///
/// Device output arrives in arbitrary chunks; a line is complete once a
/// `\n` is seen. Trailing carriage returns are stripped and blank lines
/// dropped. Bytes that are not valid UTF-8 are replaced rather than
/// discarded.
#[derive(Debug, Default)]
struct LineAssembler {
    partial: Vec<u8>,
}

impl LineAssembler {
    fn new() -> Self {
        Self {
            partial: Vec::new(),
        }
    }

    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut complete = Vec::new();
        for &byte in bytes {
            if byte == b'\n' {
                let line = String::from_utf8_lossy(&self.partial);
                let line = line.trim_end_matches('\r');
                if !line.is_empty() {
                    complete.push(line.to_string());
                }
                self.partial.clear();
            } else {
                self.partial.push(byte);
            }
        }
        complete
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
