//! Transport infrastructure for delivering key messages to the device.
//!
//! # Sub-modules
//!
//! - **`udp`** – Connectionless datagram channel. Resolves the device
//!   hostname once at startup and sends each encoded message as a single
//!   datagram. There is no return traffic.
//!
//! - **`serial`** – Serial-port channel. Sends newline-terminated messages
//!   and runs a background reader thread that collects lines the device
//!   echoes back.
//!
//! - **`select`** – Interactive serial-port selection. Enumerates candidate
//!   ports, prints them with an index, and prompts until the operator picks
//!   one or asks for a rescan.

pub mod select;
pub mod serial;
pub mod udp;

pub use select::{choose_port, parse_selection, SelectionInput};
pub use serial::SerialTransport;
pub use udp::UdpTransport;

use async_trait::async_trait;
use speckey_core::KeyMessage;
use thiserror::Error;

/// Errors that can occur in the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS resolution of the device hostname failed.
    #[error("failed to resolve device host {host}: {source}")]
    HostResolution {
        host: String,
        #[source]
        source: std::io::Error,
    },
    /// The hostname resolved but produced no usable addresses.
    #[error("device host {host} resolved to no addresses")]
    NoAddress { host: String },
    /// Opening the serial port failed.
    #[error("failed to open serial port {port}: {source}")]
    SerialOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },
    /// Enumerating serial ports failed.
    #[error("failed to enumerate serial ports: {0}")]
    Enumeration(#[source] serialport::Error),
    /// An I/O error occurred on the established channel.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The interactive port selection ended before a port was chosen.
    #[error("port selection aborted")]
    SelectionAborted,
    /// The channel was closed and cannot carry further messages.
    #[error("channel closed")]
    Closed,
}

/// Trait for delivering encoded key messages to the device.
///
/// Infrastructure implementations send over UDP or a serial port; test
/// implementations record calls.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Encodes and delivers one key message to the device.
    async fn send(&self, message: &KeyMessage) -> Result<(), TransportError>;

    /// Returns the next complete line echoed back by the device, if any.
    ///
    /// UDP carries no return traffic and always returns `None`.
    fn try_receive_line(&self) -> Option<String>;

    /// Shuts the channel down. Calling `close` more than once is a no-op.
    fn close(&self);
}
