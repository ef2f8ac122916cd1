//! Mock key source for unit testing.
//!
//! Allows tests to inject synthetic [`RawKeyEvent`]s without a running
//! Win32 message loop or OS hooks.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, Sender};

use super::{CaptureError, KeySource, RawKeyEvent};

/// Capacity of the injected-event channel; matches the production hook.
const CHANNEL_CAPACITY: usize = 256;

/// A mock implementation of [`KeySource`] that lets tests inject events.
pub struct MockKeySource {
    sender: Arc<Mutex<Option<Sender<RawKeyEvent>>>>,
}

impl MockKeySource {
    /// Creates a new mock key source.
    pub fn new() -> Self {
        Self {
            sender: Arc::new(Mutex::new(None)),
        }
    }

    /// Injects a synthetic event, as if captured from hardware.
    ///
    /// Panics if `start()` has not been called or if `stop()` has been
    /// called, or if the channel is full (a test injecting more than the
    /// channel capacity without consuming is a test bug).
    pub fn inject_event(&self, event: RawKeyEvent) {
        let guard = self.sender.lock().expect("lock poisoned");
        if let Some(ref sender) = *guard {
            sender
                .try_send(event)
                .expect("channel closed or full; did the consumer go away?");
        } else {
            panic!("MockKeySource::inject_event called before start()");
        }
    }
}

impl Default for MockKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for MockKeySource {
    fn start(&self) -> Result<mpsc::Receiver<RawKeyEvent>, CaptureError> {
        let mut guard = self.sender.lock().expect("lock poisoned");
        if guard.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        *guard = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Drop the sender to close the channel
        *self.sender.lock().expect("lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speckey_core::{KeyInput, NamedKey, Phase};

    #[tokio::test]
    async fn test_mock_key_source_starts_and_receives_events() {
        // Arrange
        let source = MockKeySource::new();
        let mut rx = source.start().expect("start should succeed");

        // Act
        source.inject_event(RawKeyEvent::now(KeyInput::Char('a'), Phase::Down));

        // Assert
        let event = rx.recv().await.expect("should receive event");
        assert_eq!(event.key, KeyInput::Char('a'));
        assert_eq!(event.phase, Phase::Down);
    }

    #[tokio::test]
    async fn test_mock_key_source_stop_closes_channel() {
        // Arrange
        let source = MockKeySource::new();
        let mut rx = source.start().expect("start should succeed");

        // Act
        source.stop();

        // Assert – channel should be disconnected
        assert!(rx.recv().await.is_none(), "channel should close after stop()");
    }

    #[test]
    fn test_mock_key_source_rejects_double_start() {
        let source = MockKeySource::new();
        let _rx = source.start().expect("first start should succeed");

        let second = source.start();
        assert!(matches!(second, Err(CaptureError::AlreadyStarted)));
    }

    #[tokio::test]
    async fn test_mock_key_source_preserves_event_order() {
        // Arrange
        let source = MockKeySource::new();
        let mut rx = source.start().expect("start should succeed");

        // Act – a press/release pair followed by a named key
        source.inject_event(RawKeyEvent::now(KeyInput::Char('z'), Phase::Down));
        source.inject_event(RawKeyEvent::now(KeyInput::Char('z'), Phase::Up));
        source.inject_event(RawKeyEvent::now(
            KeyInput::Named(NamedKey::Enter),
            Phase::Down,
        ));

        // Assert
        assert_eq!(rx.recv().await.unwrap().key, KeyInput::Char('z'));
        assert_eq!(rx.recv().await.unwrap().phase, Phase::Up);
        assert_eq!(
            rx.recv().await.unwrap().key,
            KeyInput::Named(NamedKey::Enter)
        );
    }
}
