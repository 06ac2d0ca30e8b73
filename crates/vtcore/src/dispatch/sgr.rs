//! SGR attribute/colour logic (spec.md §4.4's "Key policies").
//!
//! `SGR 0` resets everything except the hyperlink id. Colour parameters
//! (`38`/`48`/`58`) accept either semicolon-separated `5;idx` / `2;r;g;b`
//! forms or a colon-substructured `Str` parameter holding the whole
//! sub-sequence (`38:5:n`, `38:2::r:g:b`, `38:2:cs:r:g:b` — the optional
//! colourspace token is accepted and ignored).

use crate::cell::{Attributes, Color, UnderlineStyle};
use crate::context::Context;
use crate::params::{Param, ParamList};
use crate::screen::ScreenWrite;

pub fn dispatch<S: ScreenWrite>(ctx: &mut Context<S>, params: &ParamList) {
    if params.is_empty() {
        ctx.cell.sgr_reset();
        return;
    }

    let mut i = 0;
    while i < params.len() {
        match params.raw(i) {
            Some(Param::Str(s)) => {
                apply_colon_param(ctx, s);
                i += 1;
            }
            Some(Param::Missing) => {
                ctx.cell.sgr_reset();
                i += 1;
            }
            Some(Param::Number(n)) => {
                i = apply_numeric(ctx, params, i, *n);
            }
            None => break,
        }
    }
}

/// Applies one numeric SGR code at `params[i]`, returning the next index
/// to resume from (colour codes consume additional following params).
fn apply_numeric<S: ScreenWrite>(
    ctx: &mut Context<S>,
    params: &ParamList,
    i: usize,
    n: i32,
) -> usize {
    let a = &mut ctx.cell;
    match n {
        0 => a.sgr_reset(),
        1 => a.attrs.insert(Attributes::BOLD),
        2 => a.attrs.insert(Attributes::DIM),
        3 => a.attrs.insert(Attributes::ITALIC),
        4 => a.underline_style = UnderlineStyle::Single,
        5 | 6 => a.attrs.insert(Attributes::BLINK),
        7 => a.attrs.insert(Attributes::REVERSE),
        8 => a.attrs.insert(Attributes::HIDDEN),
        9 => a.attrs.insert(Attributes::STRIKETHROUGH),
        21 => a.underline_style = UnderlineStyle::Double,
        22 => {
            a.attrs.remove(Attributes::BOLD);
            a.attrs.remove(Attributes::DIM);
        }
        23 => a.attrs.remove(Attributes::ITALIC),
        24 => a.underline_style = UnderlineStyle::None,
        25 => a.attrs.remove(Attributes::BLINK),
        27 => a.attrs.remove(Attributes::REVERSE),
        28 => a.attrs.remove(Attributes::HIDDEN),
        29 => a.attrs.remove(Attributes::STRIKETHROUGH),
        30..=37 => a.fg = Color::Indexed((n - 30) as u8),
        38 => return consume_extended_color(ctx, params, i, |cell, c| cell.fg = c),
        39 => a.fg = Color::Default,
        40..=47 => a.bg = Color::Indexed((n - 40) as u8),
        48 => return consume_extended_color(ctx, params, i, |cell, c| cell.bg = c),
        49 => a.bg = Color::Default,
        53 => a.attrs.insert(Attributes::OVERLINE),
        55 => a.attrs.remove(Attributes::OVERLINE),
        58 => return consume_extended_color(ctx, params, i, |cell, c| cell.underline_color = c),
        59 => a.underline_color = Color::Default,
        90..=97 => a.fg = Color::Indexed((n - 90 + 8) as u8),
        100..=107 => a.bg = Color::Indexed((n - 100 + 8) as u8),
        _ => {}
    }
    i + 1
}

/// `38;5;n` / `38;2;r;g;b` semicolon-separated extended colour, starting
/// at `params[i] == 38/48/58`.
fn consume_extended_color<S: ScreenWrite>(
    ctx: &mut Context<S>,
    params: &ParamList,
    i: usize,
    apply: impl FnOnce(&mut crate::cell::Cell, Color),
) -> usize {
    let mode = params.get(i + 1, 0, 0);
    match mode {
        5 => {
            let idx = params.get(i + 2, 0, 0).clamp(0, 255) as u8;
            apply(&mut ctx.cell, Color::Indexed(idx));
            i + 3
        }
        2 => {
            let r = params.get(i + 2, 0, 0).clamp(0, 255) as u8;
            let g = params.get(i + 3, 0, 0).clamp(0, 255) as u8;
            let b = params.get(i + 4, 0, 0).clamp(0, 255) as u8;
            apply(&mut ctx.cell, Color::Rgb(r, g, b));
            i + 5
        }
        _ => i + 1,
    }
}

/// Colon-substructured form: `"5:n"`, `"2::r:g:b"`, `"2:cs:r:g:b"`, or a
/// bare underline-style selector `"4:{0..5}"` arriving as the sole token
/// after a prefix already consumed numerically — callers only reach here
/// when the whole field (prefix included) is one colon-joined `Str`.
fn apply_colon_param<S: ScreenWrite>(ctx: &mut Context<S>, s: &str) {
    let parts: Vec<&str> = s.split(':').collect();
    let Some(head) = parts.first().and_then(|p| p.parse::<i32>().ok()) else {
        return;
    };

    if head == 4 {
        if let Some(style) = parts.get(1).and_then(|p| p.parse::<i32>().ok())
            && let Some(style) = UnderlineStyle::from_param(style) {
                ctx.cell.underline_style = style;
            }
        return;
    }

    let apply: fn(&mut crate::cell::Cell, Color) = match head {
        38 => |cell, c| cell.fg = c,
        48 => |cell, c| cell.bg = c,
        58 => |cell, c| cell.underline_color = c,
        _ => return,
    };

    let nums: Vec<Option<i32>> = parts[1..].iter().map(|p| p.parse::<i32>().ok()).collect();
    match nums.first() {
        Some(Some(5)) => {
            if let Some(Some(idx)) = nums.get(1) {
                apply(&mut ctx.cell, Color::Indexed((*idx).clamp(0, 255) as u8));
            }
        }
        Some(Some(2)) => {
            // "2:r:g:b" or "2:cs:r:g:b" (colourspace token ignored).
            let rgb = if nums.len() >= 4 {
                (nums[nums.len() - 3], nums[nums.len() - 2], nums[nums.len() - 1])
            } else {
                (None, None, None)
            };
            if let (Some(r), Some(g), Some(b)) = rgb {
                apply(
                    &mut ctx.cell,
                    Color::Rgb(r.clamp(0, 255) as u8, g.clamp(0, 255) as u8, b.clamp(0, 255) as u8),
                );
            }
        }
        _ => {}
    }
}
