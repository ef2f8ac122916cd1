//! UDP datagram transport.
//!
//! The device listens on a fixed UDP port and expects one encoded key
//! message per datagram, with no terminator. Delivery is fire-and-forget:
//! there is no acknowledgement and no return traffic.
//!
//! The device hostname is resolved exactly once, in [`UdpTransport::open`],
//! before any socket is created. A hostname that cannot be resolved is a
//! startup failure, not something to retry per send.

use std::sync::atomic::{AtomicBool, Ordering};

use speckey_core::{encode_message, KeyMessage};
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, info};

use super::{Transport, TransportError};
use async_trait::async_trait;

/// Connectionless transport that sends each message as a single datagram.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    closed: AtomicBool,
}

impl UdpTransport {
    /// Resolves `host`, binds an ephemeral local socket, and connects it to
    /// the device address.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::HostResolution`] if the lookup fails and
    /// [`TransportError::NoAddress`] if it yields no addresses.
    pub async fn open(host: &str, port: u16) -> Result<Self, TransportError> {
        let query = format!("{host}:{port}");
        let mut addrs =
            lookup_host(&query)
                .await
                .map_err(|e| TransportError::HostResolution {
                    host: host.to_string(),
                    source: e,
                })?;
        let addr = addrs.next().ok_or_else(|| TransportError::NoAddress {
            host: host.to_string(),
        })?;

        let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
        socket.connect(addr).await?;
        info!("udp transport ready, target {addr}");

        Ok(Self {
            socket,
            closed: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(&self, message: &KeyMessage) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }

        let encoded = encode_message(message);
        self.socket.send(encoded.as_bytes()).await?;
        debug!("sent {encoded}");
        Ok(())
    }

    fn try_receive_line(&self) -> Option<String> {
        // One-way channel
        None
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("udp transport closed");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
