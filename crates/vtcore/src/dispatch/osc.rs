//! OSC / APC / Rename Dispatch (spec.md §4.6).
//!
//! OSC payloads are collected by the parser until `BEL` or `ST`; this
//! module only parses the already-whole payload. The leading decimal
//! option number selects the handler; `;`-delimited fields follow.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use xparsecolor::XColor;

use crate::context::{ClipboardPolicy, Context};
use crate::palette::Rgb;
use crate::reply::{OutputSink, StringTerminator};
use crate::screen::ScreenWrite;

pub fn dispatch<S: ScreenWrite>(
    ctx: &mut Context<S>,
    out: &mut dyn OutputSink,
    payload: &[u8],
    terminator: StringTerminator,
) {
    let Some((option, body)) = split_option(payload) else {
        return;
    };

    match option {
        0 | 2 => set_title(ctx, body),
        4 => palette_entries(ctx, out, body, terminator),
        7 => set_cwd(ctx, body),
        8 => set_hyperlink(ctx, body),
        10 => color_query_or_set(ctx, out, body, terminator, Channel::Foreground),
        11 => color_query_or_set(ctx, out, body, terminator, Channel::Background),
        12 => color_query_or_set(ctx, out, body, terminator, Channel::Cursor),
        52 => clipboard(ctx, out, body, terminator),
        104 => reset_palette(ctx, body),
        110 => ctx.palette.set_fg(None),
        111 => ctx.palette.set_bg(None),
        112 => ctx.palette.set_cursor(None),
        133 => shell_prompt_mark(ctx, body),
        _ => {
            tracing::debug!(option, "unrecognized OSC option, ignored");
        }
    }
}

/// APC string (spec.md §4.6): non-empty, UTF-8-valid payloads are treated
/// as a window title. Delivered by the byte-level capture layer in
/// [`crate::parser`] rather than `vt-push-parser`, which emits no event
/// for APC content at all.
pub fn dispatch_apc<S: ScreenWrite>(ctx: &mut Context<S>, payload: &[u8]) {
    if payload.is_empty() {
        return;
    }
    if let Ok(title) = std::str::from_utf8(payload)
        && ctx.options.allow_set_title {
            ctx.screen.set_title(title);
        }
}

/// `ESC k ... ESC \` (spec.md §4.6): empty clears the name and re-enables
/// automatic rename; otherwise sets the literal name and disables it.
pub fn dispatch_rename<S: ScreenWrite>(ctx: &mut Context<S>, payload: &[u8]) {
    if !ctx.options.allow_rename {
        return;
    }
    if payload.is_empty() {
        ctx.automatic_rename = true;
        ctx.screen.set_title("");
        return;
    }
    if let Ok(name) = std::str::from_utf8(payload) {
        ctx.automatic_rename = false;
        ctx.screen.set_title(name);
    }
}

/// Replicates each 8-bit channel into the full 16-bit X colour range
/// (`0xRR` -> `0xRRRR`), matching what real terminals echo back for
/// `rgb:RRRR/GGGG/BBBB` queries — a plain `<< 8` would report `0xff` as
/// `0xff00` instead of full intensity `0xffff`.
fn to_xcolor(r: u8, g: u8, b: u8) -> XColor {
    let widen = |c: u8| u16::from(c) * 0x0101;
    XColor::Rgb {
        red: widen(r),
        green: widen(g),
        blue: widen(b),
    }
}

fn split_option(payload: &[u8]) -> Option<(u32, &[u8])> {
    let mut end = 0;
    while end < payload.len() && payload[end].is_ascii_digit() {
        end += 1;
    }
    if end == 0 {
        return None;
    }
    let option: u32 = std::str::from_utf8(&payload[..end]).ok()?.parse().ok()?;
    let body = if payload.get(end) == Some(&b';') {
        &payload[end + 1..]
    } else {
        &payload[end..]
    };
    Some((option, body))
}

fn set_title<S: ScreenWrite>(ctx: &mut Context<S>, body: &[u8]) {
    if !ctx.options.allow_set_title {
        return;
    }
    if let Ok(title) = std::str::from_utf8(body) {
        ctx.screen.set_title(title);
    }
}

fn set_cwd<S: ScreenWrite>(ctx: &mut Context<S>, body: &[u8]) {
    if std::str::from_utf8(body).is_ok() {
        ctx.screen.raw_string(body);
    }
}

/// `OSC 8;id=...;uri`: parameters before the final `;` are `key=value`
/// pairs (only `id` is recognized); an empty URI clears the link.
fn set_hyperlink<S: ScreenWrite>(ctx: &mut Context<S>, body: &[u8]) {
    let s = String::from_utf8_lossy(body);
    let mut parts = s.splitn(2, ';');
    let params = parts.next().unwrap_or("");
    let uri = parts.next().unwrap_or("");

    let mut id = 0u32;
    for kv in params.split(':') {
        if let Some(v) = kv.strip_prefix("id=") {
            id = v.parse().unwrap_or(0);
        }
    }

    if uri.is_empty() {
        ctx.screen.set_hyperlink(id, None);
    } else {
        ctx.screen.set_hyperlink(id, Some(uri));
    }
}

/// `OSC 4;idx;spec[;idx;spec...]`: set (or, with `spec == "?"`, query)
/// palette entries.
fn palette_entries<S: ScreenWrite>(
    ctx: &mut Context<S>,
    out: &mut dyn OutputSink,
    body: &[u8],
    terminator: StringTerminator,
) {
    let s = String::from_utf8_lossy(body);
    let fields: Vec<&str> = s.split(';').collect();
    let mut i = 0;
    while i + 1 < fields.len() {
        let Ok(idx) = fields[i].parse::<u8>() else {
            i += 2;
            continue;
        };
        let spec = fields[i + 1];
        if spec == "?" {
            if let Some(Rgb(r, g, b)) = ctx.palette.get(idx) {
                let color = to_xcolor(r, g, b);
                reply_osc(out, 4, &format!("{idx};{color}"), terminator);
            }
        } else if let Ok(color) = spec.parse::<XColor>() {
            let (r, g, b) = color.to_rgb8();
            ctx.palette.set(idx, Rgb(r, g, b));
        }
        i += 2;
    }
}

fn reset_palette<S: ScreenWrite>(ctx: &mut Context<S>, body: &[u8]) {
    let s = String::from_utf8_lossy(body);
    if s.is_empty() {
        ctx.palette.reset_all();
        return;
    }
    for tok in s.split(';') {
        if let Ok(idx) = tok.parse::<u8>() {
            ctx.palette.reset(idx);
        }
    }
}

enum Channel {
    Foreground,
    Background,
    Cursor,
}

/// `OSC 10/11/12`: `?` queries the current colour via an OSC reply;
/// otherwise parses an X-style colour spec and installs it.
fn color_query_or_set<S: ScreenWrite>(
    ctx: &mut Context<S>,
    out: &mut dyn OutputSink,
    body: &[u8],
    terminator: StringTerminator,
    channel: Channel,
) {
    let s = String::from_utf8_lossy(body);
    let option = match channel {
        Channel::Foreground => 10,
        Channel::Background => 11,
        Channel::Cursor => 12,
    };
    if s.trim_end() == "?" {
        let current = match channel {
            Channel::Foreground => ctx.palette.fg(),
            Channel::Background => ctx.palette.bg(),
            Channel::Cursor => ctx.palette.cursor(),
        };
        if let Some(Rgb(r, g, b)) = current {
            let color = to_xcolor(r, g, b);
            reply_osc(out, option, &format!("{color}"), terminator);
        }
        return;
    }

    let Ok(color) = s.parse::<XColor>() else { return };
    let (r, g, b) = color.to_rgb8();
    match channel {
        Channel::Foreground => ctx.palette.set_fg(Some(Rgb(r, g, b))),
        Channel::Background => ctx.palette.set_bg(Some(Rgb(r, g, b))),
        Channel::Cursor => {
            ctx.palette.set_cursor(Some(Rgb(r, g, b)));
            ctx.screen.set_cursor_color(crate::cell::Color::Rgb(r, g, b));
        }
    }
}

/// `OSC 52;<selection-chars>;<base64|?>` (spec.md §4.6). `?` replies with
/// the current top paste buffer base64-encoded; otherwise decodes and
/// installs a new buffer, subject to `set-clipboard`.
fn clipboard<S: ScreenWrite>(
    ctx: &mut Context<S>,
    out: &mut dyn OutputSink,
    body: &[u8],
    terminator: StringTerminator,
) {
    if ctx.options.set_clipboard == ClipboardPolicy::Off {
        return;
    }
    let s = String::from_utf8_lossy(body);
    let mut parts = s.splitn(2, ';');
    let selection = parts.next().unwrap_or("");
    let payload = parts.next().unwrap_or("");

    if payload == "?" {
        let encoded = STANDARD.encode(&ctx.clipboard);
        reply_osc(out, 52, &format!(";{encoded}"), terminator);
        return;
    }

    let Ok(decoded) = STANDARD.decode(payload) else {
        return;
    };
    ctx.screen.set_selection(selection.bytes().next().unwrap_or(0), &decoded);
    ctx.clipboard = decoded;
}

/// `OSC 133;A` marks a prompt start, `OSC 133;C` an output start; other
/// sub-commands are no-ops here (spec.md's Non-goals exclude the rest of
/// shell-integration semantics).
fn shell_prompt_mark<S: ScreenWrite>(ctx: &mut Context<S>, body: &[u8]) {
    match body.first() {
        Some(b'A') | Some(b'C') => ctx.screen.raw_string(body),
        _ => {}
    }
}

fn reply_osc(out: &mut dyn OutputSink, option: u32, body: &str, terminator: StringTerminator) {
    crate::reply::osc_reply(option, body, terminator, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Options;
    use crate::palette::Palette;
    use crate::screen::tests::NullScreen;

    fn new_ctx() -> Context<NullScreen> {
        Context::new(NullScreen::default(), Palette::default(), Options::default())
    }

    #[test]
    fn osc_0_sets_title() {
        let mut ctx = new_ctx();
        let mut out = Vec::new();
        dispatch(&mut ctx, &mut out, b"0;hello", StringTerminator::St);
        assert_eq!(ctx.screen.last_title.as_deref(), Some("hello"));
    }

    #[test]
    fn osc_4_set_then_query() {
        let mut ctx = new_ctx();
        let mut out = Vec::new();
        dispatch(&mut ctx, &mut out, b"4;1;#ff0000", StringTerminator::St);
        assert_eq!(ctx.palette.get(1), Some(Rgb(255, 0, 0)));

        let mut out = Vec::new();
        dispatch(&mut ctx, &mut out, b"4;1;?", StringTerminator::St);
        assert_eq!(out, b"\x1b]4;1;rgb:ffff/0000/0000\x1b\\");
    }

    #[test]
    fn osc_8_empty_uri_clears_link() {
        let mut ctx = new_ctx();
        let mut out = Vec::new();
        dispatch(&mut ctx, &mut out, b"8;id=3;", StringTerminator::St);
    }

    #[test]
    fn osc_52_respects_clipboard_policy() {
        let mut ctx = new_ctx();
        let mut out = Vec::new();
        dispatch(&mut ctx, &mut out, b"52;c;aGVsbG8=", StringTerminator::Bel);
        assert!(ctx.clipboard.is_empty());
    }

    /// Boundary test 6 (spec.md §8): `OSC 52;c;SGVsbG8=` with
    /// `set-clipboard=external` installs "Hello", and a subsequent query
    /// replies with the stored buffer, not the selection name.
    #[test]
    fn osc_52_boundary_test_6_round_trip() {
        let mut ctx = new_ctx();
        ctx.options.set_clipboard = ClipboardPolicy::External;
        let mut out = Vec::new();
        dispatch(&mut ctx, &mut out, b"52;c;SGVsbG8=", StringTerminator::Bel);
        assert_eq!(ctx.clipboard, b"Hello");

        let mut out = Vec::new();
        dispatch(&mut ctx, &mut out, b"52;c;?", StringTerminator::Bel);
        assert_eq!(out, b"\x1b]52;;SGVsbG8=\x07");
    }

    #[test]
    fn apc_sets_title_when_allowed() {
        let mut ctx = new_ctx();
        dispatch_apc(&mut ctx, b"my title");
        assert_eq!(ctx.screen.last_title.as_deref(), Some("my title"));
    }

    #[test]
    fn rename_empty_reenables_automatic_rename() {
        let mut ctx = new_ctx();
        ctx.automatic_rename = false;
        dispatch_rename(&mut ctx, b"");
        assert!(ctx.automatic_rename);
    }

    #[test]
    fn rename_nonempty_disables_automatic_rename() {
        let mut ctx = new_ctx();
        dispatch_rename(&mut ctx, b"my-window");
        assert!(!ctx.automatic_rename);
        assert_eq!(ctx.screen.last_title.as_deref(), Some("my-window"));
    }
}
