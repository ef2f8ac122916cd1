//! Integration tests for the speckey-core typing pipeline.
//!
//! These tests drive the public API end to end: text goes into the planner,
//! every planned stroke is encoded with the codec, and the resulting wire
//! text is asserted literally: the exact byte sequences a device would see.

use speckey_core::{decode_message, encode_message, plan_text, Phase, SpecKey};

/// Plans `text` and encodes every stroke to its wire form.
fn wire_sequence(text: &str) -> Vec<String> {
    plan_text(text)
        .strokes
        .iter()
        .map(|stroke| encode_message(&stroke.message))
        .collect()
}

#[test]
fn test_basic_listing_line_produces_exact_wire_sequence() {
    // `20p"Hi"` is a typical listing line: digits, a letter, quotes (symbol
    // layer) and an uppercase letter (caps shift).
    let wire = wire_sequence("20p\"Hi\"");

    assert_eq!(
        wire,
        vec![
            // 2
            "down:2", "up:2",
            // 0
            "down:10", "up:10",
            // p
            "down:20", "up:20",
            // " = Sym+P
            "down:39", "down:20", "up:20", "up:39",
            // H = Caps+h
            "down:31", "down:26", "up:26", "up:31",
            // i
            "down:18", "up:18",
            // " = Sym+P
            "down:39", "down:20", "up:20", "up:39",
        ]
    );
}

#[test]
fn test_dash_line_wire_sequence() {
    let wire = wire_sequence("-a");

    assert_eq!(
        wire,
        vec![
            "down:39", "down:27", "up:27", "up:39", // - = Sym+J
            "down:21", "up:21", // a
        ]
    );
}

#[test]
fn test_newline_terminated_line_ends_with_enter() {
    let wire = wire_sequence("r\n");

    assert_eq!(wire, vec!["down:14", "up:14", "down:30", "up:30"]);
}

#[test]
fn test_planned_wire_text_decodes_back_to_the_same_transitions() {
    let plan = plan_text("10 print \"A-OK\"\n");

    for stroke in &plan.strokes {
        let decoded = decode_message(&encode_message(&stroke.message))
            .expect("planned strokes must produce decodable wire text");
        assert_eq!(decoded, stroke.message);
    }
}

#[test]
fn test_repeated_planning_gives_identical_wire_output() {
    let text = "rem Determinism-\"check\"\n";
    assert_eq!(wire_sequence(text), wire_sequence(text));
}

#[test]
fn test_no_ordinary_text_ever_emits_the_cancel_wire_form() {
    let mut text: String = (0x20u8..0x7F).map(|b| b as char).collect();
    text.push('\n');

    for line in wire_sequence(&text) {
        assert_ne!(line, "down:0", "cancel signal emitted for ordinary text");
        assert_ne!(line, "up:0", "reserved code released for ordinary text");
    }
}

#[test]
fn test_caps_shift_wire_form_matches_the_documented_scenario() {
    // Text "A": down caps shift (31), down a (21), up a, up caps shift.
    assert_eq!(
        wire_sequence("A"),
        vec!["down:31", "down:21", "up:21", "up:31"]
    );
}

#[test]
fn test_phase_and_key_survive_the_full_pipeline() {
    let plan = plan_text("z");
    assert_eq!(plan.strokes.len(), 2);
    assert_eq!(plan.strokes[0].message.phase, Phase::Down);
    assert_eq!(plan.strokes[0].message.code, SpecKey::KeyZ.code());
    assert_eq!(plan.strokes[1].message.phase, Phase::Up);
}
