//! Criterion benchmarks for key resolution.
//!
//! Resolution runs once per captured key event on the hook path, so it must
//! stay in the table-lookup class: well under a microsecond.
//!
//! Run with:
//! ```bash
//! cargo bench --package speckey-core --bench keymap_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use speckey_core::keymap::{lookup_char, lookup_named, resolve, KeyInput, NamedKey};

// ── Representative inputs ─────────────────────────────────────────────────────

/// A burst of inputs shaped like real capture traffic: letters, digits,
/// shifted symbols, named keys, and unmapped noise.
const BENCH_INPUTS: &[KeyInput] = &[
    KeyInput::Char('a'),
    KeyInput::Char('A'),
    KeyInput::Char('1'),
    KeyInput::Char('!'),
    KeyInput::Char('p'),
    KeyInput::Char('='),
    KeyInput::Char(' '),
    KeyInput::Named(NamedKey::Enter),
    KeyInput::Named(NamedKey::LeftShift),
    KeyInput::Named(NamedKey::RightShift),
    KeyInput::Named(NamedKey::ArrowLeft),
    KeyInput::Named(NamedKey::ArrowRight),
    KeyInput::Named(NamedKey::Tab),
    KeyInput::Named(NamedKey::Backspace),
    KeyInput::Named(NamedKey::Escape),
];

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_resolve");

    // Single resolution (typical per-event cost)
    group.bench_function("resolve_single", |b| {
        b.iter(|| resolve(black_box(KeyInput::Char('a'))))
    });

    // Batch of 15 diverse inputs (simulates a burst of key events)
    group.bench_function("resolve_batch_15", |b| {
        b.iter(|| {
            BENCH_INPUTS
                .iter()
                .map(|&input| resolve(black_box(input)))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

fn bench_table_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_tables");

    group.bench_function("lookup_char_mapped", |b| {
        b.iter(|| lookup_char(black_box('q')))
    });

    group.bench_function("lookup_char_unmapped", |b| {
        b.iter(|| lookup_char(black_box('=')))
    });

    group.bench_function("lookup_named", |b| {
        b.iter(|| lookup_named(black_box(NamedKey::ArrowUp)))
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_table_lookups);
criterion_main!(benches);
