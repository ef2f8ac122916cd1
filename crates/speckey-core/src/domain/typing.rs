//! Deterministic keystroke planning for scripted typing.
//!
//! [`plan_text`] turns a text string into the exact ordered list of key
//! state transitions that reproduces the text on the device, honouring its
//! layered keyboard:
//!
//! - uppercase letters are wrapped in Caps Shift:
//!   `Down(CapsShift) Down(letter) Up(letter) Up(CapsShift)`
//! - symbol-layer punctuation (`"`, `-`) is wrapped the same way in
//!   Symbol Shift around its base key
//! - everything else with a mapping is a plain `Down(key) Up(key)`
//!
//! Each stroke carries a [`Pause`] class so playback knows how long to wait
//! after sending it. The firmware samples the matrix at a fixed rate;
//! transitions spaced too closely get merged, which is why the pauses exist
//! at all.
//!
//! Characters with no mapping are collected with their position instead of
//! being dropped; a typo in a script should be findable, unlike the
//! expected unmapped noise of live capture.
//!
//! The plan is a pure function of its input: same text, same plan, every
//! time. An interrupted run can simply be planned and played again.

use crate::keymap::{self, SpecKey};
use crate::protocol::messages::KeyMessage;

/// Pacing class of the pause that follows a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// The stroke is a press whose release follows next: hold the key for
    /// the configured press duration.
    Hold,
    /// The stroke ends a logical step: wait the configured key delay before
    /// the next one.
    Gap,
}

/// One planned key state transition plus its trailing pause class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub message: KeyMessage,
    pub pause: Pause,
}

/// A character the planner could not map, with its 0-based character
/// position in the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnmappedChar {
    pub index: usize,
    pub ch: char,
}

/// The complete plan for one text: strokes to play in order, and every
/// character that had to be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingPlan {
    pub strokes: Vec<KeyStroke>,
    pub unmapped: Vec<UnmappedChar>,
}

/// Plans the keystroke sequence for `text`.
///
/// Per character, the first matching rule wins: symbol layer, then
/// uppercase, then the plain character table. The order matters: `'A'` is
/// in the character table as an alias of `'a'`, but typing it requires the
/// Caps Shift wrap, so the uppercase rule must run first.
pub fn plan_text(text: &str) -> TypingPlan {
    let mut strokes = Vec::new();
    let mut unmapped = Vec::new();

    for (index, ch) in text.chars().enumerate() {
        if let Some(base) = keymap::symbol_layer_base(ch) {
            push_wrapped(&mut strokes, SpecKey::SymbolShift, base);
        } else if ch.is_ascii_uppercase() {
            match keymap::lookup_char(ch.to_ascii_lowercase()) {
                Some(base) => push_wrapped(&mut strokes, SpecKey::CapsShift, base),
                None => unmapped.push(UnmappedChar { index, ch }),
            }
        } else if let Some(key) = keymap::lookup_char(ch) {
            strokes.push(KeyStroke {
                message: KeyMessage::down(key),
                pause: Pause::Hold,
            });
            strokes.push(KeyStroke {
                message: KeyMessage::up(key),
                pause: Pause::Gap,
            });
        } else {
            unmapped.push(UnmappedChar { index, ch });
        }
    }

    TypingPlan { strokes, unmapped }
}

/// Emits `base` held inside a press of the `layer` key.
fn push_wrapped(strokes: &mut Vec<KeyStroke>, layer: SpecKey, base: SpecKey) {
    strokes.push(KeyStroke {
        message: KeyMessage::down(layer),
        pause: Pause::Gap,
    });
    strokes.push(KeyStroke {
        message: KeyMessage::down(base),
        pause: Pause::Hold,
    });
    strokes.push(KeyStroke {
        message: KeyMessage::up(base),
        pause: Pause::Gap,
    });
    strokes.push(KeyStroke {
        message: KeyMessage::up(layer),
        pause: Pause::Gap,
    });
}
