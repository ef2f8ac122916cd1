//! TypeTextUseCase: plays a planned key sequence to the device.
//!
//! Text is first expanded into a deterministic press/release plan by
//! [`plan_text`]; this use case only paces the strokes and delivers them.
//! The device polls its key matrix at frame rate, so the two pauses are
//! what make synthesized typing land reliably.
//!
//! # Cancellation
//!
//! The injected `running` flag is checked before every stroke. When it
//! clears mid-sequence, every key the device still holds is released in
//! reverse press order before the run ends, so an interrupted session
//! never leaves a shift (or anything else) latched down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use speckey_core::{encode_message, plan_text, KeyMessage, Pause, Phase, SpecKey};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::infrastructure::transport::Transport;

/// What happened over one typing run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TypingReport {
    /// Messages successfully handed to the transport, releases included.
    pub sent: usize,
    /// Characters skipped because they have no matrix position.
    pub unmapped: usize,
    /// Whether the run was cut short by the cancellation flag.
    pub cancelled: bool,
}

/// The Type Text use case.
pub struct TypeTextUseCase {
    transport: Arc<dyn Transport>,
    key_delay: Duration,
    press_duration: Duration,
    running: Arc<AtomicBool>,
}

impl TypeTextUseCase {
    /// Creates a new use case instance.
    ///
    /// `key_delay` paces consecutive strokes, `press_duration` is how long
    /// a key stays down before its release is sent.
    pub fn new(
        transport: Arc<dyn Transport>,
        key_delay: Duration,
        press_duration: Duration,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            transport,
            key_delay,
            press_duration,
            running,
        }
    }

    /// Types `text` on the device.
    ///
    /// Characters without a matrix position are reported with their
    /// position and skipped; everything else is delivered in plan order.
    /// A failed send is logged and the run continues.
    pub async fn run(&self, text: &str) -> TypingReport {
        let plan = plan_text(text);
        let mut report = TypingReport {
            unmapped: plan.unmapped.len(),
            ..TypingReport::default()
        };

        for skipped in &plan.unmapped {
            warn!(
                "no matrix position for {:?} at index {}, skipping",
                skipped.ch, skipped.index
            );
        }

        // Keys the device currently holds, in press order.
        let mut held: Vec<u8> = Vec::new();

        for stroke in &plan.strokes {
            if !self.running.load(Ordering::Relaxed) {
                report.cancelled = true;
                break;
            }

            match self.transport.send(&stroke.message).await {
                Ok(()) => {
                    report.sent += 1;
                    track_held(&mut held, &stroke.message);
                }
                Err(e) => {
                    warn!(
                        "failed to deliver {}, continuing: {e}",
                        encode_message(&stroke.message)
                    );
                }
            }

            let pause = match stroke.pause {
                Pause::Hold => self.press_duration,
                Pause::Gap => self.key_delay,
            };
            sleep(pause).await;
        }

        if report.cancelled && !held.is_empty() {
            info!("typing cancelled, releasing {} held key(s)", held.len());
            report.sent += self.release_held(&mut held).await;
        }

        report
    }

    /// Releases still-held keys most-recent-first. Returns how many
    /// release messages were delivered.
    async fn release_held(&self, held: &mut Vec<u8>) -> usize {
        let mut released = 0;
        while let Some(code) = held.pop() {
            if let Some(key) = SpecKey::from_code(code) {
                if key.is_layer_shift() {
                    warn!("layer shift {key:?} was still held; releasing it");
                }
                match self.transport.send(&KeyMessage::up(key)).await {
                    Ok(()) => {
                        released += 1;
                        debug!("released {key:?}");
                    }
                    Err(e) => {
                        warn!("failed to release key {code}, device may still hold it: {e}");
                    }
                }
                sleep(self.key_delay).await;
            }
        }
        released
    }
}

/// Updates the held-key stack for one delivered message.
fn track_held(held: &mut Vec<u8>, message: &KeyMessage) {
    match message.phase {
        Phase::Down => held.push(message.code),
        Phase::Up => {
            if let Some(pos) = held.iter().rposition(|&code| code == message.code) {
                held.remove(pos);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
