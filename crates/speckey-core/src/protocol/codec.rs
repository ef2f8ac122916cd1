//! Encoding and decoding of the textual wire protocol.
//!
//! Messages are short ASCII strings:
//!
//! ```text
//! down:20        key 20 (the P key) was pressed
//! up:20          key 20 was released
//! down:0         out-of-band cancel signal (Escape during capture)
//! ```
//!
//! Framing belongs to the transport, not the codec: over UDP a message is
//! one unterminated datagram, over serial the transport appends a `\n`.
//! [`decode_message`] tolerates trailing `\r\n` so serial lines can be fed
//! to it as read.
//!
//! Decoding exists for the firmware-facing direction of the protocol (and
//! for asserting on captured wire bytes in tests); the bridge itself never
//! parses device output as protocol messages.

use thiserror::Error;

use crate::keymap::SpecKey;
use crate::protocol::messages::{KeyMessage, Phase, CANCEL_CODE};

/// Errors that can occur while decoding a wire message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The input was empty (after stripping line terminators).
    #[error("empty message")]
    Empty,

    /// The input has no `phase:code` separator.
    #[error("message '{0}' has no ':' separator")]
    MissingSeparator(String),

    /// The phase field was neither `down` nor `up`.
    #[error("unknown phase '{0}'")]
    UnknownPhase(String),

    /// The code field was not a decimal integer in `u8` range.
    #[error("key code '{0}' is not a decimal integer")]
    InvalidCode(String),

    /// The code is numeric but names neither a matrix position nor the
    /// cancel signal.
    #[error("key code {0} is outside the device matrix")]
    CodeOutOfRange(u8),
}

/// Encodes a [`KeyMessage`] into its wire form, without framing.
pub fn encode_message(message: &KeyMessage) -> String {
    format!("{}:{}", message.phase.as_str(), message.code)
}

/// Decodes one wire message.
///
/// Accepts an optional trailing `\n` or `\r\n` so both framings decode with
/// the same function.
pub fn decode_message(text: &str) -> Result<KeyMessage, ProtocolError> {
    let trimmed = text.trim_end_matches(['\r', '\n']);
    if trimmed.is_empty() {
        return Err(ProtocolError::Empty);
    }

    let (phase_text, code_text) = trimmed
        .split_once(':')
        .ok_or_else(|| ProtocolError::MissingSeparator(trimmed.to_string()))?;

    let phase = match phase_text {
        "down" => Phase::Down,
        "up" => Phase::Up,
        other => return Err(ProtocolError::UnknownPhase(other.to_string())),
    };

    let code: u8 = code_text
        .parse()
        .map_err(|_| ProtocolError::InvalidCode(code_text.to_string()))?;

    if code != CANCEL_CODE && SpecKey::from_code(code).is_none() {
        return Err(ProtocolError::CodeOutOfRange(code));
    }

    Ok(KeyMessage { phase, code })
}
