//! ForwardKeysUseCase: forwards captured key events to the device.
//!
//! This use case is the live half of the bridge. It receives raw key
//! events from the capture service, resolves each against the key matrix,
//! and sends the resulting messages over the injected [`Transport`].
//!
//! # Architecture
//!
//! The use case depends only on the [`Transport`] trait and core domain
//! types. All infrastructure implementations are injected at construction
//! time, making it fully unit-testable.
//!
//! # Resilience
//!
//! A failed send is logged and forwarding continues; a dropped message is
//! better than a dead bridge mid-game. Only the escape key (or the event
//! channel closing) ends the loop.

use std::sync::Arc;

use speckey_core::{encode_message, resolve, KeyMessage, Phase, Resolution};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::infrastructure::hook::RawKeyEvent;
use crate::infrastructure::transport::Transport;

/// What happened over one forwarding session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ForwardSummary {
    /// Messages successfully handed to the transport.
    pub sent: usize,
    /// Events skipped because the key has no matrix position.
    pub unmapped: usize,
    /// Whether the session ended via the escape key.
    pub cancelled: bool,
}

/// The Forward Keys use case.
pub struct ForwardKeysUseCase {
    transport: Arc<dyn Transport>,
}

impl ForwardKeysUseCase {
    /// Creates a new use case instance.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Drains `events` until the escape key is pressed or the channel
    /// closes, forwarding every resolvable event to the device.
    ///
    /// Pressing escape sends the reserved cancel message (`down:0`) so the
    /// device releases everything, then ends the session. The release of
    /// the escape key itself is swallowed; the device never sees escape as
    /// an ordinary key.
    pub async fn run(&self, mut events: mpsc::Receiver<RawKeyEvent>) -> ForwardSummary {
        let mut summary = ForwardSummary::default();

        while let Some(event) = events.recv().await {
            match resolve(event.key) {
                Resolution::Key(key) => {
                    let message = KeyMessage::for_key(key, event.phase);
                    match self.transport.send(&message).await {
                        Ok(()) => summary.sent += 1,
                        Err(e) => {
                            warn!(
                                "failed to deliver {}, continuing: {e}",
                                encode_message(&message)
                            );
                        }
                    }
                }
                Resolution::Cancel => {
                    if event.phase == Phase::Down {
                        info!("escape pressed, ending forwarding session");
                        match self.transport.send(&KeyMessage::cancel()).await {
                            Ok(()) => summary.sent += 1,
                            Err(e) => warn!("failed to deliver cancel message: {e}"),
                        }
                        summary.cancelled = true;
                        break;
                    }
                    // Release of escape with no preceding press; nothing to do.
                }
                Resolution::Unmapped => {
                    summary.unmapped += 1;
                    debug!("ignoring key with no matrix position: {:?}", event.key);
                }
            }
        }

        summary
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
