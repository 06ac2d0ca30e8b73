//! Literal boundary tests from spec.md §8, driven end-to-end through
//! [`vtcore::Parser`] against the [`common::TestScreen`] double.

mod common;

use common::TestScreen;
use vtcore::cell::Color;
use vtcore::context::{Context, Options};
use vtcore::palette::Palette;
use vtcore::Parser;

fn new_ctx() -> Context<TestScreen> {
    Context::new(TestScreen::default(), Palette::default(), Options::default())
}

/// Boundary test 1: `ESC [ 1 ; 2 H X` moves the cursor to row 1, col 2
/// (1-based) and writes 'X' there.
#[test]
fn boundary_1_cup_then_print() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b[1;2HX");
    assert_eq!(ctx.screen.cursor, (1, 0));
    assert_eq!(ctx.screen.printed, vec!['X']);
}

/// Boundary test 2: `ESC [ 38 ; 2 ; 10 ; 20 ; 30 m` sets fg to RGB(10,20,30).
#[test]
fn boundary_2_sgr_rgb_semicolon() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b[38;2;10;20;30m");
    assert_eq!(ctx.cell.fg, Color::Rgb(10, 20, 30));
}

/// Boundary test 3: colon-substructured SGR forms are equivalent, and the
/// optional colourspace token is ignored.
#[test]
fn boundary_3_sgr_rgb_colon() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b[38:2::10:20:30m");
    assert_eq!(ctx.cell.fg, Color::Rgb(10, 20, 30));

    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b[38:2:5:10:20:30m");
    assert_eq!(ctx.cell.fg, Color::Rgb(10, 20, 30));
}

/// Boundary test 4: `DECRQSS "m"` on a fresh cell replies `DECRPSS "0m"`.
#[test]
fn boundary_4_decrqss_sgr_fresh_cell() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1bP$qm\x1b\\");
    assert_eq!(out, b"\x1bP1$r0m\x1b\\");
}

/// Boundary test 5: `CSI c` on a VT220 context replies with the VT220 DA1.
#[test]
fn boundary_5_da1_vt220() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    ctx.emulation = vtcore::emulation::EmulationLevel::Vt220;
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b[c");
    assert_eq!(out, b"\x1b[?62;1;2;6;16;17;21;22c");
}

/// Boundary test 6: `OSC 52;c;SGVsbG8=` with `set-clipboard=external`
/// installs "Hello"; a subsequent query replies with the stored buffer.
#[test]
fn boundary_6_osc52_clipboard_round_trip() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    ctx.options.set_clipboard = vtcore::context::ClipboardPolicy::External;
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b]52;c;SGVsbG8=\x07");
    assert_eq!(ctx.clipboard, b"Hello");

    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b]52;c;?\x07");
    assert_eq!(out, b"\x1b]52;;SGVsbG8=\x07");
}

/// Boundary test 7: `CSI 1 b` directly after printing 'A' repeats it; with
/// no LAST flag (after a cursor move), REP is a no-op.
#[test]
fn boundary_7_rep_requires_last_flag() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"A\x1b[1b");
    assert_eq!(ctx.screen.printed, vec!['A', 'A']);

    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b[H\x1b[1b");
    assert!(ctx.screen.printed.is_empty());
}

/// Boundary test 8: a DCS with no terminator, after the timer fires,
/// returns the parser to ground and discards the payload.
#[test]
fn boundary_8_stuck_dcs_times_out() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1bP$qm");
    assert!(ctx.timer_armed);
    p.timer_expired(&mut ctx);
    assert!(!ctx.timer_armed);
    p.feed(&mut ctx, &mut out, b"hello");
    assert_eq!(ctx.screen.printed, "hello".chars().collect::<Vec<_>>());
    assert!(out.is_empty());
}

/// `ESC 7 ... ESC 8` round-trips cell, cursor, and ORIGIN mode exactly.
#[test]
fn decsc_decrc_round_trip() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b[31m\x1b[5;5H\x1b7");
    let saved_cell = ctx.cell.clone();
    p.feed(&mut ctx, &mut out, b"\x1b[0m\x1b[1;1H\x1b8");
    assert_eq!(ctx.cell, saved_cell);
    assert_eq!(ctx.screen.cursor, (4, 4));
}

/// `CSI > 4 ; 1 m` (MODSET) sets extended-key mode 1, gated by the
/// `extended-keys` option; `CSI > 4 n` (MODOFF) clears it again.
#[test]
fn modset_modoff_toggle_extended_keys() {
    use vtcore::context::ExtendedKeysPolicy;
    use vtcore::mode::DecModes;

    let mut p = Parser::new();
    let mut ctx = new_ctx();
    ctx.options.extended_keys = ExtendedKeysPolicy::On;
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b[>4;1m");
    assert!(ctx.screen.dec_modes.contains(DecModes::EXTENDED_KEYS));

    p.feed(&mut ctx, &mut out, b"\x1b[>4n");
    assert!(!ctx.screen.dec_modes.contains(DecModes::EXTENDED_KEYS));
}

/// With `extended-keys=off`, MODSET is ignored entirely.
#[test]
fn modset_is_ignored_when_extended_keys_disabled() {
    use vtcore::mode::DecModes;

    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b[>4;1m");
    assert!(!ctx.screen.dec_modes.contains(DecModes::EXTENDED_KEYS));
}

/// Printable-only ASCII input never leaves ground and appends exactly
/// that many cells.
#[test]
fn ascii_only_input_stays_in_ground() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    let text = b"the quick brown fox jumps over 13 lazy dogs!";
    p.feed(&mut ctx, &mut out, text);
    assert_eq!(ctx.screen.printed.len(), text.len());
}
