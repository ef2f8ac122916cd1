//! Key lookup tables mapping PC-side key identities onto device key codes.
//!
//! The PC side sees keys two ways: printable characters (whatever the OS
//! says the keystroke produced) and named control keys (enter, shift, the
//! arrows) that have no character. Both funnel through [`resolve`], which
//! tries the character table first and the named-key table second and
//! classifies Escape as the capture cancel signal.
//!
//! The tables are intentionally many-to-one. `'a'`, `'A'` and the key under
//! the left-hand pinky are all matrix position 21; `'1'` and `'!'` are both
//! position 1. The device firmware picks the produced character from its own
//! active layer, so the bridge only has to name the position.

pub mod speckey;

pub use speckey::SpecKey;

/// A control key delivered by the OS hook as a named identity rather than a
/// character.
///
/// The set covers everything the bridge assigns meaning to, plus keys that
/// show up constantly during live capture without having any device mapping
/// (tab, backspace, ctrl, alt). Keeping those as variants lets the capture
/// loop classify them as unmapped instead of failing to represent them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Space,
    /// Left shift. Mapped to the device's Caps Shift (code 31).
    LeftShift,
    /// Right shift. Mapped to the device's Symbol Shift (code 39), which is
    /// a different layer from Caps Shift.
    RightShift,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// The capture cancel signal; never a literal device key.
    Escape,
    Tab,
    Backspace,
    Control,
    Alt,
}

/// A PC-side key identity: either the character a keystroke produced or a
/// named control key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInput {
    Char(char),
    Named(NamedKey),
}

/// Outcome of resolving a [`KeyInput`] against the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The input names a device key.
    Key(SpecKey),
    /// The input is the Escape control signal: emit the cancel code and stop
    /// capturing.
    Cancel,
    /// The input has no device mapping. Expected noise during live capture.
    Unmapped,
}

/// Looks up the device key for a printable character.
///
/// Covers the digit row (including the US-layout shifted symbols, which live
/// on the same physical keys), both letter cases, and the whitespace
/// characters scripted text contains (`'\n'` is the Enter key, `' '` the
/// space bar).
pub fn lookup_char(c: char) -> Option<SpecKey> {
    match c {
        // Top row; the shifted symbol on each digit key aliases to the digit
        '1' | '!' => Some(SpecKey::Digit1),
        '2' | '@' => Some(SpecKey::Digit2),
        '3' | '#' => Some(SpecKey::Digit3),
        '4' | '$' => Some(SpecKey::Digit4),
        '5' | '%' => Some(SpecKey::Digit5),
        '6' | '^' => Some(SpecKey::Digit6),
        '7' | '&' => Some(SpecKey::Digit7),
        '8' | '*' => Some(SpecKey::Digit8),
        '9' | '(' => Some(SpecKey::Digit9),
        '0' | ')' => Some(SpecKey::Digit0),

        // Upper row
        'q' | 'Q' => Some(SpecKey::KeyQ),
        'w' | 'W' => Some(SpecKey::KeyW),
        'e' | 'E' => Some(SpecKey::KeyE),
        'r' | 'R' => Some(SpecKey::KeyR),
        't' | 'T' => Some(SpecKey::KeyT),
        'y' | 'Y' => Some(SpecKey::KeyY),
        'u' | 'U' => Some(SpecKey::KeyU),
        'i' | 'I' => Some(SpecKey::KeyI),
        'o' | 'O' => Some(SpecKey::KeyO),
        'p' | 'P' => Some(SpecKey::KeyP),

        // Home row
        'a' | 'A' => Some(SpecKey::KeyA),
        's' | 'S' => Some(SpecKey::KeyS),
        'd' | 'D' => Some(SpecKey::KeyD),
        'f' | 'F' => Some(SpecKey::KeyF),
        'g' | 'G' => Some(SpecKey::KeyG),
        'h' | 'H' => Some(SpecKey::KeyH),
        'j' | 'J' => Some(SpecKey::KeyJ),
        'k' | 'K' => Some(SpecKey::KeyK),
        'l' | 'L' => Some(SpecKey::KeyL),
        '\n' => Some(SpecKey::Enter),

        // Bottom row
        'z' | 'Z' => Some(SpecKey::KeyZ),
        'x' | 'X' => Some(SpecKey::KeyX),
        'c' | 'C' => Some(SpecKey::KeyC),
        'v' | 'V' => Some(SpecKey::KeyV),
        'b' | 'B' => Some(SpecKey::KeyB),
        'n' | 'N' => Some(SpecKey::KeyN),
        'm' | 'M' => Some(SpecKey::KeyM),
        ' ' => Some(SpecKey::Space),

        _ => None,
    }
}

/// Looks up the device key for a named control key.
///
/// The arrows are a contextual remap onto the cursor-joystick codes
/// (left 5, down 6, up 7, right 8), matching the firmware's cursor joystick
/// layer; they are not general aliases of the digits. Escape is absent on
/// purpose: it is a control signal handled by [`resolve`], never a key to
/// send.
pub fn lookup_named(key: NamedKey) -> Option<SpecKey> {
    match key {
        NamedKey::Enter => Some(SpecKey::Enter),
        NamedKey::Space => Some(SpecKey::Space),
        NamedKey::LeftShift => Some(SpecKey::CapsShift),
        NamedKey::RightShift => Some(SpecKey::SymbolShift),

        // Cursor keys drive the cursor joystick
        NamedKey::ArrowLeft => Some(SpecKey::Digit5),
        NamedKey::ArrowDown => Some(SpecKey::Digit6),
        NamedKey::ArrowUp => Some(SpecKey::Digit7),
        NamedKey::ArrowRight => Some(SpecKey::Digit8),

        NamedKey::Escape
        | NamedKey::Tab
        | NamedKey::Backspace
        | NamedKey::Control
        | NamedKey::Alt => None,
    }
}

/// Looks up the base key for punctuation that lives on the device's symbol
/// layer.
///
/// The planner wraps these in Symbol Shift presses: `"` is Sym+P and `-` is
/// Sym+J on the device keyboard.
pub fn symbol_layer_base(c: char) -> Option<SpecKey> {
    match c {
        '"' => Some(SpecKey::KeyP),
        '-' => Some(SpecKey::KeyJ),
        _ => None,
    }
}

/// Resolves a PC-side key identity to its device meaning.
///
/// One ordered pass: the character table first, then the named-key table,
/// with Escape classified as [`Resolution::Cancel`] before the named table
/// is consulted. Anything neither table knows is [`Resolution::Unmapped`];
/// this never fails.
pub fn resolve(input: KeyInput) -> Resolution {
    match input {
        KeyInput::Char(c) => match lookup_char(c) {
            Some(key) => Resolution::Key(key),
            None => Resolution::Unmapped,
        },
        KeyInput::Named(NamedKey::Escape) => Resolution::Cancel,
        KeyInput::Named(named) => match lookup_named(named) {
            Some(key) => Resolution::Key(key),
            None => Resolution::Unmapped,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Character table ───────────────────────────────────────────────────────

    #[test]
    fn test_digit_row_maps_to_codes_one_through_ten() {
        let digits = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'];
        for (i, c) in digits.into_iter().enumerate() {
            let key = lookup_char(c).expect("digit must be mapped");
            assert_eq!(key.code(), i as u8 + 1, "'{c}' should be code {}", i + 1);
        }
    }

    #[test]
    fn test_shifted_digit_symbols_alias_to_the_digit_codes() {
        let symbols = ['!', '@', '#', '$', '%', '^', '&', '*', '(', ')'];
        for (i, c) in symbols.into_iter().enumerate() {
            let key = lookup_char(c).expect("shifted digit must be mapped");
            assert_eq!(key.code(), i as u8 + 1, "'{c}' should alias to code {}", i + 1);
        }
    }

    #[test]
    fn test_letter_rows_follow_the_matrix_order() {
        for (i, c) in "qwertyuiop".chars().enumerate() {
            assert_eq!(lookup_char(c).map(SpecKey::code), Some(i as u8 + 11));
        }
        for (i, c) in "asdfghjkl".chars().enumerate() {
            assert_eq!(lookup_char(c).map(SpecKey::code), Some(i as u8 + 21));
        }
        for (i, c) in "zxcvbnm".chars().enumerate() {
            assert_eq!(lookup_char(c).map(SpecKey::code), Some(i as u8 + 32));
        }
    }

    #[test]
    fn test_uppercase_letters_alias_to_lowercase_codes() {
        for c in 'a'..='z' {
            let lower = lookup_char(c);
            let upper = lookup_char(c.to_ascii_uppercase());
            assert!(lower.is_some(), "'{c}' must be mapped");
            assert_eq!(upper, lower, "'{}' must alias to '{c}'", c.to_ascii_uppercase());
        }
    }

    #[test]
    fn test_whitespace_characters_map_to_enter_and_space() {
        assert_eq!(lookup_char('\n'), Some(SpecKey::Enter));
        assert_eq!(lookup_char(' '), Some(SpecKey::Space));
    }

    #[test]
    fn test_characters_without_a_device_key_are_unmapped() {
        for c in ['=', '[', ']', ';', '/', '?', '~', 'é', '\t'] {
            assert_eq!(lookup_char(c), None, "'{c}' has no device key");
        }
    }

    // ── Named-key table ───────────────────────────────────────────────────────

    #[test]
    fn test_named_keys_map_to_documented_codes() {
        assert_eq!(lookup_named(NamedKey::Enter), Some(SpecKey::Enter));
        assert_eq!(lookup_named(NamedKey::Space), Some(SpecKey::Space));
        assert_eq!(lookup_named(NamedKey::LeftShift), Some(SpecKey::CapsShift));
        assert_eq!(lookup_named(NamedKey::RightShift), Some(SpecKey::SymbolShift));
    }

    #[test]
    fn test_left_and_right_shift_are_different_layers() {
        // The device treats Caps Shift and Symbol Shift as different
        // modifiers; collapsing them would break the punctuation layer.
        assert_ne!(
            lookup_named(NamedKey::LeftShift),
            lookup_named(NamedKey::RightShift)
        );
    }

    #[test]
    fn test_arrows_remap_to_cursor_joystick_codes() {
        assert_eq!(lookup_named(NamedKey::ArrowLeft).map(SpecKey::code), Some(5));
        assert_eq!(lookup_named(NamedKey::ArrowDown).map(SpecKey::code), Some(6));
        assert_eq!(lookup_named(NamedKey::ArrowUp).map(SpecKey::code), Some(7));
        assert_eq!(lookup_named(NamedKey::ArrowRight).map(SpecKey::code), Some(8));
    }

    #[test]
    fn test_named_keys_without_a_device_key_are_unmapped() {
        for key in [
            NamedKey::Tab,
            NamedKey::Backspace,
            NamedKey::Control,
            NamedKey::Alt,
        ] {
            assert_eq!(lookup_named(key), None, "{key:?} has no device key");
        }
    }

    #[test]
    fn test_escape_is_not_in_the_named_table() {
        assert_eq!(lookup_named(NamedKey::Escape), None);
    }

    // ── Symbol layer ──────────────────────────────────────────────────────────

    #[test]
    fn test_symbol_layer_punctuation_bases() {
        assert_eq!(symbol_layer_base('"'), Some(SpecKey::KeyP));
        assert_eq!(symbol_layer_base('-'), Some(SpecKey::KeyJ));
    }

    #[test]
    fn test_plain_characters_are_not_on_the_symbol_layer() {
        for c in ['a', 'A', '1', ' ', '\n', '+'] {
            assert_eq!(symbol_layer_base(c), None);
        }
    }

    // ── Ordered resolution ────────────────────────────────────────────────────

    #[test]
    fn test_resolve_characters_before_named_keys() {
        assert_eq!(
            resolve(KeyInput::Char('a')),
            Resolution::Key(SpecKey::KeyA)
        );
        assert_eq!(
            resolve(KeyInput::Named(NamedKey::Enter)),
            Resolution::Key(SpecKey::Enter)
        );
    }

    #[test]
    fn test_resolve_escape_as_cancel_not_as_a_key() {
        assert_eq!(resolve(KeyInput::Named(NamedKey::Escape)), Resolution::Cancel);
    }

    #[test]
    fn test_resolve_unknown_inputs_as_unmapped() {
        assert_eq!(resolve(KeyInput::Char('=')), Resolution::Unmapped);
        assert_eq!(
            resolve(KeyInput::Named(NamedKey::Backspace)),
            Resolution::Unmapped
        );
    }

    #[test]
    fn test_resolution_never_produces_the_cancel_code_for_mapped_keys() {
        // Code 0 is reserved for the Escape cancel signal; every resolvable
        // input must land on a real matrix position.
        let mut inputs: Vec<KeyInput> = (0x20u8..0x7F)
            .map(|b| KeyInput::Char(b as char))
            .collect();
        inputs.extend(
            [
                NamedKey::Enter,
                NamedKey::Space,
                NamedKey::LeftShift,
                NamedKey::RightShift,
                NamedKey::ArrowUp,
                NamedKey::ArrowDown,
                NamedKey::ArrowLeft,
                NamedKey::ArrowRight,
                NamedKey::Tab,
                NamedKey::Backspace,
            ]
            .map(KeyInput::Named),
        );

        for input in inputs {
            if let Resolution::Key(key) = resolve(input) {
                assert_ne!(key.code(), 0, "{input:?} resolved to the cancel code");
            }
        }
    }
}
