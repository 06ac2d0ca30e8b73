//! DCS Dispatch (spec.md §4.5).
//!
//! On `ST` termination of a `dcs_handler` sequence, a lookup on the
//! payload's leading bytes selects DECRQSS, DECRSPS, DECRSTS, SIXEL, or
//! (for `tmux;`-prefixed payloads, subject to `allow-passthrough`) raw
//! passthrough.

use crate::context::Context;
use crate::palette::{hls_to_rgb, rescale_100_to_255, ColorSpace};
use crate::params::ParamList;
use crate::reply::{self, Decrpss, OutputSink, SgrReconstruction};
use crate::screen::ScreenWrite;

/// `params` is the CSI-like parameter buffer of the sequence that preceded
/// the final byte (e.g. `1` in `DECRQSS`'s `ESC P 1 $ q ... ESC \`);
/// `intermediates`/`final_byte` identify which DCS command this is.
pub fn dispatch<S: ScreenWrite>(
    ctx: &mut Context<S>,
    out: &mut dyn OutputSink,
    private: Option<u8>,
    intermediates: &[u8],
    params: &ParamList,
    final_byte: u8,
    payload: &[u8],
) {
    match (final_byte, intermediates, private) {
        (b'q', [b'$'], None) => decrqss(ctx, out, payload),
        (b'p', [b'$'], None) => decrsps(ctx, payload),
        (b't', [b'$'], None) => decrsts(ctx, payload),
        (b'q', [], None) if ctx.emulation.requires_graphics() => ctx.screen.sixel_image(payload),
        _ => {
            let _ = params;
            tracing::debug!(
                final_byte,
                intermediates = ?intermediates,
                "unrecognized DCS sequence, ignored"
            );
        }
    }
}

/// `DECRQSS`: the payload is itself a CSI-like sub-sequence (intermediates
/// + a final byte, no parameters) naming which setting to report.
///
/// Parsed by hand rather than re-entering the push parser — this is a
/// single, already-whole buffer, not a streamed feed.
fn decrqss<S: ScreenWrite>(ctx: &mut Context<S>, out: &mut dyn OutputSink, payload: &[u8]) {
    let Some((&final_byte, intermediates)) = payload.split_last() else {
        reply::decrpss_reply(&Decrpss::Invalid, out);
        return;
    };

    let reply = match (final_byte, intermediates) {
        (b'q', [b'"']) => Decrpss::Decsca {
            protected: ctx.cell.protected,
        },
        (b'p', [b'"']) => Decrpss::Decscl {
            level: ctx.emulation,
        },
        (b'q', [b' ']) => Decrpss::Decscusr {
            style: ctx.cursor_style,
        },
        (b's', []) => {
            let (left, right) = ctx.screen.scroll_margin();
            Decrpss::Decslrm { left, right }
        }
        (b'r', []) => {
            let (top, bottom) = ctx.screen.scroll_region();
            Decrpss::Decstbm { top, bottom }
        }
        (b'm', []) => Decrpss::Sgr(SgrReconstruction::from_cell(&ctx.cell)),
        _ => Decrpss::Invalid,
    };
    reply::decrpss_reply(&reply, out);
}

/// DECRSPS "restore presentation state": `Ps` in the request parameter
/// (1 = DECCIR, 2 = DECTABSR) selects how `payload` is parsed.
fn decrsps<S: ScreenWrite>(ctx: &mut Context<S>, payload: &[u8]) {
    let Some((kind, rest)) = split_leading_decimal(payload) else {
        return;
    };
    match kind {
        1 => apply_deccir(ctx, rest),
        2 => apply_dectabsr(ctx, rest),
        _ => {}
    }
}

/// DECCIR: `row;col;page;sgr;sca;mode;gl;gr;size;G0;G1;G2;G3`.
fn apply_deccir<S: ScreenWrite>(ctx: &mut Context<S>, payload: &[u8]) {
    use crate::cell::{Attributes, Charset};

    let s = String::from_utf8_lossy(payload);
    let fields: Vec<&str> = s.split(';').collect();
    if fields.len() < 9 {
        return;
    }
    let Some(row) = fields[0].parse::<u32>().ok() else { return };
    let Some(col) = fields[1].parse::<u32>().ok() else { return };
    let sgr_byte = fields[3].bytes().next().unwrap_or(b'@');
    ctx.cell.attrs.set(Attributes::BOLD, sgr_byte & 0x01 != 0);
    ctx.cell.attrs.set(Attributes::UNDERLINE, sgr_byte & 0x02 != 0);
    ctx.cell.attrs.set(Attributes::BLINK, sgr_byte & 0x04 != 0);
    ctx.cell.attrs.set(Attributes::REVERSE, sgr_byte & 0x08 != 0);
    let sca_byte = fields.get(4).and_then(|f| f.bytes().next());
    ctx.cell.protected = sca_byte == Some(b'1');
    let mode_byte = fields.get(5).and_then(|f| f.bytes().next());
    ctx.origin_mode = mode_byte.map(|b| b & 0x10 != 0).unwrap_or(ctx.origin_mode);
    let designation = |f: Option<&&str>| match f {
        Some(&"0") => Charset::SpecialGraphics,
        _ => Charset::Ascii,
    };
    ctx.charset.g0 = designation(fields.get(9));
    ctx.charset.g1 = designation(fields.get(10));
    ctx.screen
        .cursor_move(Some(col.saturating_sub(1)), Some(row.saturating_sub(1)), ctx.origin_mode);
}

/// DECTABSR: `/`-delimited list of 1-based tab-stop columns.
fn apply_dectabsr<S: ScreenWrite>(ctx: &mut Context<S>, payload: &[u8]) {
    let s = String::from_utf8_lossy(payload);
    ctx.screen.clear_all_tab_stops();
    for tok in s.split('/') {
        if tok.is_empty() {
            continue;
        }
        if let Ok(col) = tok.parse::<u32>() {
            ctx.screen.set_tab_stop_at(col.saturating_sub(1));
        }
    }
}

/// DECRSTS "restore terminal state": `Ps` (1 ignored, 2 = DECCTR palette
/// restore) followed by `/`-delimited `idx;cs;x;y;z` colour tuples.
fn decrsts<S: ScreenWrite>(ctx: &mut Context<S>, payload: &[u8]) {
    let Some((kind, rest)) = split_leading_decimal(payload) else {
        return;
    };
    if kind != 2 {
        return;
    }
    let s = String::from_utf8_lossy(rest);
    for tuple in s.split('/') {
        let fields: Vec<&str> = tuple.split(';').collect();
        if fields.len() < 5 {
            continue;
        }
        let (Ok(idx), Ok(cs), Ok(x), Ok(y), Ok(z)) = (
            fields[0].parse::<u8>(),
            fields[1].parse::<i32>(),
            fields[2].parse::<f64>(),
            fields[3].parse::<f64>(),
            fields[4].parse::<f64>(),
        ) else {
            continue;
        };
        let Some(space) = ColorSpace::from_cs(cs) else {
            continue;
        };
        let rgb = match space {
            ColorSpace::Hls => hls_to_rgb(x, y, z),
            ColorSpace::Rgb100 => crate::palette::Rgb(
                rescale_100_to_255(x),
                rescale_100_to_255(y),
                rescale_100_to_255(z),
            ),
        };
        ctx.palette.set(idx, rgb);
    }
}

/// Reverse of [`apply_deccir`]: the current cursor/cell state rendered as
/// a `DECCIR` payload, used by `DECRQPSR Ps=1` (spec.md §2 component 7).
pub fn deccir_payload<S: ScreenWrite>(ctx: &Context<S>) -> String {
    use crate::cell::Attributes;

    let (x, y) = ctx.screen.cursor_position();
    let mut sgr = 0x40u8;
    if ctx.cell.attrs.contains(Attributes::BOLD) {
        sgr |= 0x01;
    }
    if ctx.cell.attrs.contains(Attributes::UNDERLINE) {
        sgr |= 0x02;
    }
    if ctx.cell.attrs.contains(Attributes::BLINK) {
        sgr |= 0x04;
    }
    if ctx.cell.attrs.contains(Attributes::REVERSE) {
        sgr |= 0x08;
    }
    let sca = if ctx.cell.protected { '1' } else { '0' };
    let mode = if ctx.origin_mode { 0x10 } else { 0x00 };
    let gl = match ctx.charset.shift {
        crate::cell::ShiftState::ShiftIn => 0,
        crate::cell::ShiftState::ShiftOut => 1,
    };
    let charset_final = |cs: crate::cell::Charset| match cs {
        crate::cell::Charset::Ascii => 'B',
        crate::cell::Charset::SpecialGraphics => '0',
    };
    // row;col;page;sgr;sca;mode;gl;gr;size;G0;G1;G2;G3 (spec.md §4.5's
    // DECCIR field list, reversed into a report instead of applied).
    format!(
        "{row};{col};1;{sgr};{sca};{mode:X};{gl};0;0;{g0};{g1};B;B",
        row = y + 1,
        col = x + 1,
        sgr = sgr as char,
        g0 = charset_final(ctx.charset.g0),
        g1 = charset_final(ctx.charset.g1),
    )
}

/// Reverse of [`apply_dectabsr`]: the current tab-stop bitmap rendered as
/// a `DECTABSR` payload, used by `DECRQPSR Ps=2`.
pub fn dectabsr_payload<S: ScreenWrite>(ctx: &Context<S>) -> String {
    ctx.screen
        .tab_stop_columns()
        .iter()
        .map(|col| (col + 1).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Reverse of [`decrsts`]'s `Ps=2` branch: the current palette rendered as
/// a `DECCTR` colour-table payload, used by `DECRQTSR`.
pub fn decctr_payload<S: ScreenWrite>(ctx: &Context<S>) -> String {
    (0u16..256)
        .filter_map(|i| {
            let idx = i as u8;
            ctx.palette.get(idx).map(|crate::palette::Rgb(r, g, b)| {
                format!(
                    "{idx};2;{};{};{}",
                    crate::palette::rescale_255_to_100(r),
                    crate::palette::rescale_255_to_100(g),
                    crate::palette::rescale_255_to_100(b),
                )
            })
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn split_leading_decimal(payload: &[u8]) -> Option<(i32, &[u8])> {
    let mut end = 0;
    while end < payload.len() && payload[end].is_ascii_digit() {
        end += 1;
    }
    if end == 0 {
        return None;
    }
    let n: i32 = std::str::from_utf8(&payload[..end]).ok()?.parse().ok()?;
    let rest = if payload.get(end) == Some(&b';') {
        &payload[end + 1..]
    } else {
        &payload[end..]
    };
    Some((n, rest))
}

/// `tmux;`-prefixed DCS passthrough (spec.md §4.5): returns `true` if the
/// payload was consumed as passthrough.
pub fn try_passthrough<S: ScreenWrite>(ctx: &mut Context<S>, payload: &[u8]) -> bool {
    use crate::context::PassthroughPolicy;
    if ctx.options.allow_passthrough == PassthroughPolicy::Off {
        return false;
    }
    let Some(rest) = payload.strip_prefix(b"tmux;") else {
        return false;
    };
    ctx.screen.raw_string(rest);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Options;
    use crate::palette::Palette;
    use crate::screen::tests::NullScreen;

    #[test]
    fn decrqss_sgr_matches_boundary_test_4() {
        let mut ctx = Context::new(NullScreen::default(), Palette::default(), Options::default());
        let mut out = Vec::new();
        decrqss(&mut ctx, &mut out, b"m");
        assert_eq!(out, b"\x1bP1$r0m\x1b\\");
    }

    #[test]
    fn decrqss_unknown_is_invalid() {
        let mut ctx = Context::new(NullScreen::default(), Palette::default(), Options::default());
        let mut out = Vec::new();
        decrqss(&mut ctx, &mut out, b"Z");
        assert_eq!(out, b"\x1bP0$r\x1b\\");
    }

    #[test]
    fn passthrough_requires_tmux_prefix_and_policy() {
        let mut ctx = Context::new(NullScreen::default(), Palette::default(), Options::default());
        ctx.options.allow_passthrough = crate::context::PassthroughPolicy::On;
        assert!(!try_passthrough(&mut ctx, b"notmux;hi"));
        assert!(try_passthrough(&mut ctx, b"tmux;hello"));
        assert_eq!(ctx.screen.printed.len(), 0);
    }

    #[test]
    fn decrsts_rgb100_rescales_into_palette() {
        let mut ctx = Context::new(NullScreen::default(), Palette::default(), Options::default());
        decrsts(&mut ctx, b"2;1;2;0;100;0");
        assert_eq!(ctx.palette.get(1), Some(crate::palette::Rgb(0, 255, 0)));
    }

    #[test]
    fn dectabsr_restore_sets_stops_at_listed_columns_not_the_cursor() {
        let mut ctx = Context::new(NullScreen::default(), Palette::default(), Options::default());
        ctx.screen.cursor = (7, 0);
        decrsps(&mut ctx, b"2;1/9/17");
        assert_eq!(ctx.screen.tab_stop_columns(), vec![0, 8, 16]);
    }

    #[test]
    fn deccir_restore_applies_sgr_and_charset_designations() {
        let mut ctx = Context::new(NullScreen::default(), Palette::default(), Options::default());
        // Ps=1 (DECCIR) then row;col;page;sgr('C'=0x43=bright|underscore);
        // sca;mode;gl;gr;size;G0;G1;G2;G3
        decrsps(&mut ctx, b"1;1;1;1;C;0;@;0;0;0;0;B;B;B");
        assert!(ctx.cell.attrs.contains(crate::cell::Attributes::BOLD));
        assert!(ctx.cell.attrs.contains(crate::cell::Attributes::UNDERLINE));
        assert_eq!(ctx.charset.g0, crate::cell::Charset::SpecialGraphics);
        assert_eq!(ctx.charset.g1, crate::cell::Charset::Ascii);
    }
}
