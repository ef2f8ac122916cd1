//! Device key codes for the ESPectrum's 40-key matrix.
//!
//! This is the canonical key representation used throughout the bridge.
//! Everything the capture side or the typing planner produces is translated
//! into one of these codes before it reaches a transport.
//!
//! # Why small integers? (for beginners)
//!
//! The ZX Spectrum keyboard is a 4×10 matrix of 40 physical keys.  The
//! emulator firmware does not know about characters at all: it scans matrix
//! positions, so the wire protocol addresses keys by position number.  The
//! enumeration runs row by row across the keyboard:
//!
//! | Row            | Keys                                  | Codes |
//! |----------------|---------------------------------------|-------|
//! | Top            | 1 2 3 4 5 6 7 8 9 0                   | 1–10  |
//! | Upper          | q w e r t y u i o p                   | 11–20 |
//! | Home           | a s d f g h j k l Enter               | 21–30 |
//! | Bottom         | Caps Shift z x c v b n m Sym Space    | 31–40 |
//!
//! Which *character* a key produces depends on the layer the firmware is in:
//! Caps Shift (code 31) selects uppercase, Symbol Shift (code 39) selects the
//! punctuation layer.  That is why `'a'` and `'A'` are the same code here,
//! and why the planner in `domain::typing` wraps strokes in shift presses
//! instead of looking up different codes.
//!
//! # The reserved code 0
//!
//! Raw code 0 is an out-of-band cancel signal (`protocol::CANCEL_CODE`), not
//! a key.  It is deliberately not a variant of [`SpecKey`], so no lookup or
//! planning path can ever produce it by accident.

/// A key on the device's 40-key matrix.
///
/// The numeric value of each variant is the code the firmware expects on the
/// wire for that matrix position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SpecKey {
    // Top row (codes 1–10)
    Digit1 = 1,
    Digit2 = 2,
    Digit3 = 3,
    Digit4 = 4,
    Digit5 = 5,
    Digit6 = 6,
    Digit7 = 7,
    Digit8 = 8,
    Digit9 = 9,
    Digit0 = 10,

    // Upper row (codes 11–20)
    KeyQ = 11,
    KeyW = 12,
    KeyE = 13,
    KeyR = 14,
    KeyT = 15,
    KeyY = 16,
    KeyU = 17,
    KeyI = 18,
    KeyO = 19,
    KeyP = 20,

    // Home row (codes 21–30)
    KeyA = 21,
    KeyS = 22,
    KeyD = 23,
    KeyF = 24,
    KeyG = 25,
    KeyH = 26,
    KeyJ = 27,
    KeyK = 28,
    KeyL = 29,
    Enter = 30,

    // Bottom row (codes 31–40)
    CapsShift = 31,
    KeyZ = 32,
    KeyX = 33,
    KeyC = 34,
    KeyV = 35,
    KeyB = 36,
    KeyN = 37,
    KeyM = 38,
    SymbolShift = 39,
    Space = 40,
}

impl SpecKey {
    /// Returns the wire code for this key.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Converts a raw wire code back to a [`SpecKey`].
    ///
    /// Returns `None` for anything outside the matrix, including the
    /// reserved cancel code 0.
    pub fn from_code(value: u8) -> Option<Self> {
        match value {
            1 => Some(SpecKey::Digit1),
            2 => Some(SpecKey::Digit2),
            3 => Some(SpecKey::Digit3),
            4 => Some(SpecKey::Digit4),
            5 => Some(SpecKey::Digit5),
            6 => Some(SpecKey::Digit6),
            7 => Some(SpecKey::Digit7),
            8 => Some(SpecKey::Digit8),
            9 => Some(SpecKey::Digit9),
            10 => Some(SpecKey::Digit0),
            11 => Some(SpecKey::KeyQ),
            12 => Some(SpecKey::KeyW),
            13 => Some(SpecKey::KeyE),
            14 => Some(SpecKey::KeyR),
            15 => Some(SpecKey::KeyT),
            16 => Some(SpecKey::KeyY),
            17 => Some(SpecKey::KeyU),
            18 => Some(SpecKey::KeyI),
            19 => Some(SpecKey::KeyO),
            20 => Some(SpecKey::KeyP),
            21 => Some(SpecKey::KeyA),
            22 => Some(SpecKey::KeyS),
            23 => Some(SpecKey::KeyD),
            24 => Some(SpecKey::KeyF),
            25 => Some(SpecKey::KeyG),
            26 => Some(SpecKey::KeyH),
            27 => Some(SpecKey::KeyJ),
            28 => Some(SpecKey::KeyK),
            29 => Some(SpecKey::KeyL),
            30 => Some(SpecKey::Enter),
            31 => Some(SpecKey::CapsShift),
            32 => Some(SpecKey::KeyZ),
            33 => Some(SpecKey::KeyX),
            34 => Some(SpecKey::KeyC),
            35 => Some(SpecKey::KeyV),
            36 => Some(SpecKey::KeyB),
            37 => Some(SpecKey::KeyN),
            38 => Some(SpecKey::KeyM),
            39 => Some(SpecKey::SymbolShift),
            40 => Some(SpecKey::Space),
            _ => None,
        }
    }

    /// Returns `true` for the two layer-selecting keys (Caps Shift and
    /// Symbol Shift).
    pub fn is_layer_shift(self) -> bool {
        matches!(self, SpecKey::CapsShift | SpecKey::SymbolShift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every matrix position with its documented wire code.
    const MATRIX: &[(u8, SpecKey)] = &[
        (1, SpecKey::Digit1),
        (2, SpecKey::Digit2),
        (3, SpecKey::Digit3),
        (4, SpecKey::Digit4),
        (5, SpecKey::Digit5),
        (6, SpecKey::Digit6),
        (7, SpecKey::Digit7),
        (8, SpecKey::Digit8),
        (9, SpecKey::Digit9),
        (10, SpecKey::Digit0),
        (11, SpecKey::KeyQ),
        (12, SpecKey::KeyW),
        (13, SpecKey::KeyE),
        (14, SpecKey::KeyR),
        (15, SpecKey::KeyT),
        (16, SpecKey::KeyY),
        (17, SpecKey::KeyU),
        (18, SpecKey::KeyI),
        (19, SpecKey::KeyO),
        (20, SpecKey::KeyP),
        (21, SpecKey::KeyA),
        (22, SpecKey::KeyS),
        (23, SpecKey::KeyD),
        (24, SpecKey::KeyF),
        (25, SpecKey::KeyG),
        (26, SpecKey::KeyH),
        (27, SpecKey::KeyJ),
        (28, SpecKey::KeyK),
        (29, SpecKey::KeyL),
        (30, SpecKey::Enter),
        (31, SpecKey::CapsShift),
        (32, SpecKey::KeyZ),
        (33, SpecKey::KeyX),
        (34, SpecKey::KeyC),
        (35, SpecKey::KeyV),
        (36, SpecKey::KeyB),
        (37, SpecKey::KeyN),
        (38, SpecKey::KeyM),
        (39, SpecKey::SymbolShift),
        (40, SpecKey::Space),
    ];

    #[test]
    fn test_every_matrix_position_round_trips() {
        for &(code, key) in MATRIX {
            // Arrange / Act
            let parsed = SpecKey::from_code(code);
            let back = key.code();

            // Assert
            assert_eq!(parsed, Some(key), "code {code} should parse to {key:?}");
            assert_eq!(back, code, "{key:?} should encode as {code}");
        }
    }

    #[test]
    fn test_matrix_covers_all_forty_keys() {
        assert_eq!(MATRIX.len(), 40, "the device matrix has exactly 40 keys");
    }

    #[test]
    fn test_codes_outside_the_matrix_return_none() {
        for outside in [0u8, 41, 42, 100, 255] {
            assert_eq!(
                SpecKey::from_code(outside),
                None,
                "code {outside} is not a matrix position"
            );
        }
    }

    #[test]
    fn test_layer_shift_keys_are_identified() {
        assert!(SpecKey::CapsShift.is_layer_shift());
        assert!(SpecKey::SymbolShift.is_layer_shift());
        for key in [SpecKey::KeyA, SpecKey::Enter, SpecKey::Space, SpecKey::Digit1] {
            assert!(!key.is_layer_shift(), "{key:?} is not a layer shift");
        }
    }
}
