//! Keyboard capture infrastructure.
//!
//! On Windows, this installs a low-level keyboard hook (WH_KEYBOARD_LL) on a
//! dedicated Win32 message loop thread. Raw events are pushed into a bounded
//! channel and consumed by the forwarding loop on the Tokio runtime.
//!
//! # Windows-specific constraint
//!
//! The hook callback must return within ~300ms or Windows removes the hook,
//! so the callback does nothing but translate the virtual-key code and hand
//! the event to the channel.
//!
//! # Testability
//!
//! The [`KeySource`] trait lets tests inject synthetic events without OS
//! hooks; see [`mock::MockKeySource`].

use speckey_core::{KeyInput, Phase};
use tokio::sync::mpsc;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

pub use mock::MockKeySource;

#[cfg(target_os = "windows")]
pub use windows::WindowsKeyCaptureService;

/// A raw keyboard event produced by a [`KeySource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// The key identity as the OS reported it.
    pub key: KeyInput,
    /// Press or release.
    pub phase: Phase,
    /// Milliseconds since the Unix epoch at capture time.
    pub timestamp_ms: u64,
}

impl RawKeyEvent {
    /// Builds an event stamped with the current wall-clock time.
    pub fn now(key: KeyInput, phase: Phase) -> Self {
        RawKeyEvent {
            key,
            phase,
            timestamp_ms: current_timestamp_ms(),
        }
    }
}

/// Returns the current time as milliseconds since the Unix epoch.
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Error type for keyboard capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to install keyboard hook: {0}")]
    HookInstallFailed(String),
    #[error("capture source has already been started")]
    AlreadyStarted,
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// Trait abstracting keyboard event production.
///
/// The production implementation uses the Windows hook; tests use
/// [`mock::MockKeySource`]. `stop()` closes the event channel, which is how
/// the consuming loop learns that no more events are coming.
pub trait KeySource: Send + Sync {
    /// Starts the source and returns the receiver for captured events.
    fn start(&self) -> Result<mpsc::Receiver<RawKeyEvent>, CaptureError>;
    /// Stops the source and releases all OS resources. Idempotent.
    fn stop(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use speckey_core::NamedKey;

    #[test]
    fn test_raw_key_event_now_stamps_a_real_time() {
        let event = RawKeyEvent::now(KeyInput::Char('a'), Phase::Down);
        assert!(event.timestamp_ms > 0, "timestamp must be positive");
        assert_eq!(event.key, KeyInput::Char('a'));
        assert_eq!(event.phase, Phase::Down);
    }

    #[test]
    fn test_raw_key_events_compare_by_value() {
        let a = RawKeyEvent {
            key: KeyInput::Named(NamedKey::Enter),
            phase: Phase::Up,
            timestamp_ms: 5,
        };
        let b = a;
        assert_eq!(a, b);
    }
}
