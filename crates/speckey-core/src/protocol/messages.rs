//! Wire message types for the device protocol.
//!
//! The whole protocol is one message shape: a key state transition. The
//! firmware is edge-triggered, so the bridge only ever tells it "this matrix
//! position went down" or "this matrix position went up"; there is no other
//! traffic in the PC-to-device direction.

use crate::keymap::SpecKey;

/// The out-of-band cancel signal. Sent as `down:0` when the user presses
/// Escape during live capture; never produced for an ordinary key, because
/// [`SpecKey`] has no variant with this value.
pub const CANCEL_CODE: u8 = 0;

/// Direction of a key state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Down,
    Up,
}

impl Phase {
    /// Returns the wire spelling of the phase.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Down => "down",
            Phase::Up => "up",
        }
    }
}

/// A single key state transition, ready for encoding.
///
/// `code` is either a matrix position (1–40) or [`CANCEL_CODE`]. The
/// constructors keep the two apart: the key constructors take a [`SpecKey`]
/// so they cannot produce 0, and [`KeyMessage::cancel`] is the only way to
/// build the cancel signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMessage {
    pub phase: Phase,
    pub code: u8,
}

impl KeyMessage {
    /// A press of the given device key.
    pub fn down(key: SpecKey) -> Self {
        KeyMessage {
            phase: Phase::Down,
            code: key.code(),
        }
    }

    /// A release of the given device key.
    pub fn up(key: SpecKey) -> Self {
        KeyMessage {
            phase: Phase::Up,
            code: key.code(),
        }
    }

    /// A transition of the given device key in the given phase.
    pub fn for_key(key: SpecKey, phase: Phase) -> Self {
        KeyMessage {
            phase,
            code: key.code(),
        }
    }

    /// The Escape cancel signal (`down:0`).
    pub fn cancel() -> Self {
        KeyMessage {
            phase: Phase::Down,
            code: CANCEL_CODE,
        }
    }
}
