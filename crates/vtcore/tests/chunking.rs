//! Chunking-invariance (spec.md §8's first invariant, §4.2): feeding a
//! byte stream one byte at a time must yield the same observable output
//! and final state as feeding it in arbitrary-sized chunks.

mod common;

use common::TestScreen;
use vtcore::context::{Context, Options};
use vtcore::palette::Palette;
use vtcore::Parser;

fn new_ctx() -> Context<TestScreen> {
    Context::new(TestScreen::default(), Palette::default(), Options::default())
}

fn feed_in_chunks(input: &[u8], chunk_size: usize) -> (Context<TestScreen>, Vec<u8>) {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    for chunk in input.chunks(chunk_size.max(1)) {
        p.feed(&mut ctx, &mut out, chunk);
    }
    (ctx, out)
}

/// A representative mix of ground text, CSI with parameters, SGR colour,
/// DCS, and OSC, replayed at several chunk granularities.
const SAMPLE: &[u8] = b"hello \x1b[1;2H\x1b[38;2;10;20;30mworld\x1b]0;title\x07\x1bP$qm\x1b\\done";

#[test]
fn byte_at_a_time_matches_whole_buffer() {
    let (whole_ctx, whole_out) = feed_in_chunks(SAMPLE, SAMPLE.len());
    let (byte_ctx, byte_out) = feed_in_chunks(SAMPLE, 1);

    assert_eq!(whole_out, byte_out);
    assert_eq!(whole_ctx.screen.printed, byte_ctx.screen.printed);
    assert_eq!(whole_ctx.screen.cursor, byte_ctx.screen.cursor);
    assert_eq!(whole_ctx.cell, byte_ctx.cell);
    assert_eq!(whole_ctx.screen.last_title, byte_ctx.screen.last_title);
}

#[test]
fn arbitrary_chunk_sizes_all_agree() {
    let (reference_ctx, reference_out) = feed_in_chunks(SAMPLE, SAMPLE.len());
    for chunk_size in [2, 3, 5, 7, 11] {
        let (ctx, out) = feed_in_chunks(SAMPLE, chunk_size);
        assert_eq!(out, reference_out, "chunk_size={chunk_size}");
        assert_eq!(ctx.screen.printed, reference_ctx.screen.printed, "chunk_size={chunk_size}");
        assert_eq!(ctx.screen.cursor, reference_ctx.screen.cursor, "chunk_size={chunk_size}");
        assert_eq!(ctx.cell, reference_ctx.cell, "chunk_size={chunk_size}");
    }
}

/// A bare `ESC` landing as the very last byte of a `feed()` call must not
/// be dispatched as `EscInvalid`/ground text — it has to be carried over
/// and completed by the next call's leading byte.
#[test]
fn escape_split_across_feed_boundary_completes_correctly() {
    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, b"\x1b[1;2H");
    p.feed(&mut ctx, &mut out, b"X");
    assert_eq!(ctx.screen.cursor, (1, 0));
    assert_eq!(ctx.screen.printed, vec!['X']);

    let mut p2 = Parser::new();
    let mut ctx2 = new_ctx();
    let mut out2 = Vec::new();
    p2.feed(&mut ctx2, &mut out2, b"\x1b");
    p2.feed(&mut ctx2, &mut out2, b"[1;2HX");
    assert_eq!(ctx2.screen.cursor, ctx.screen.cursor);
    assert_eq!(ctx2.screen.printed, ctx.screen.printed);
}

/// A multi-byte UTF-8 sequence split across two feeds must still decode
/// to a single character, matching it arriving whole.
#[test]
fn utf8_sequence_split_across_feed_boundary() {
    let text = "e\u{0301}".as_bytes(); // 'e' + combining acute, 3 bytes total
    let (whole_ctx, _) = feed_in_chunks(text, text.len());

    let mut p = Parser::new();
    let mut ctx = new_ctx();
    let mut out = Vec::new();
    p.feed(&mut ctx, &mut out, &text[..2]);
    p.feed(&mut ctx, &mut out, &text[2..]);

    assert_eq!(ctx.screen.printed, whole_ctx.screen.printed);
}
