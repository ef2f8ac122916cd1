//! # speckey-core
//!
//! Shared library for the SpecKey bridge containing the device key table,
//! the textual wire protocol codec, and the keystroke planner used for
//! scripted typing.
//!
//! This crate is pure: it has zero dependencies on OS APIs, sockets, or
//! serial ports, so every table and every planned key sequence can be unit
//! tested on any platform.
//!
//! # Architecture overview (for beginners)
//!
//! The SpecKey bridge forwards keyboard input from a PC to an ESPectrum
//! device: a ZX Spectrum emulator whose firmware scans a 40-key matrix and
//! accepts key state changes as small integer codes over UDP or serial.
//!
//! This crate defines the three pure pieces of that pipeline:
//!
//! - **`keymap`** – Which PC key corresponds to which device key.  The table
//!   is many-to-one on purpose: `'a'`, `'A'` and the shifted digit symbols
//!   all collapse onto the matrix position that produces them.
//!
//! - **`protocol`** – How a key state change travels over the wire.  Messages
//!   are seven bytes of ASCII at most (`down:40`), encoded and decoded by
//!   `protocol::codec`.
//!
//! - **`domain`** – The keystroke planner.  Given a text string it produces
//!   the exact ordered sequence of down/up strokes (with shift and symbol
//!   layer wrapping) that reproduces the text on the device.

// Declare the three top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/protocol/mod.rs).
pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `speckey_core::SpecKey` instead of `speckey_core::keymap::speckey::SpecKey`.
pub use domain::typing::{plan_text, KeyStroke, Pause, TypingPlan, UnmappedChar};
pub use keymap::speckey::SpecKey;
pub use keymap::{resolve, KeyInput, NamedKey, Resolution};
pub use protocol::codec::{decode_message, encode_message, ProtocolError};
pub use protocol::messages::{KeyMessage, Phase, CANCEL_CODE};
