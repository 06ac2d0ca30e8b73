//! Query-Reply Emitter (spec.md §2 component 7, §4.4, §4.5, §4.6).
//!
//! Formats bit-exact reply strings and writes them to a host-supplied
//! output sink. Every format here is specified literally in spec.md; the
//! wire layout must match for conformance with real programs.

use crate::cell::{Color, UnderlineStyle};
use crate::emulation::EmulationLevel;
use crate::mode::ModeQueryResult;

/// Output sink contract (spec.md §6): `write(bytes)`.
pub trait OutputSink {
    fn write(&mut self, bytes: &[u8]);
}

impl OutputSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Whether the sequence being replied to ended with `ST` or `BEL`
/// (spec.md §3's "end-of-string kind", §4.6: replies echo it back).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringTerminator {
    St,
    Bel,
}

impl StringTerminator {
    fn write(self, out: &mut dyn OutputSink) {
        match self {
            Self::St => out.write(b"\x1b\\"),
            Self::Bel => out.write(b"\x07"),
        }
    }
}

/// Primary Device Attributes (`CSI c`). The VT220 reply listed in spec.md
/// §8's boundary test 5 is the one this core emits for any VT220+ level;
/// VT100 replies with the plain (non-private) DA1 form.
pub fn primary_device_attributes(level: EmulationLevel, out: &mut dyn OutputSink) {
    if level.at_least_vt220() {
        out.write(b"\x1b[?62;1;2;6;16;17;21;22c");
    } else {
        out.write(b"\x1b[?1;2c");
    }
}

/// Secondary Device Attributes (`CSI > c`).
pub fn secondary_device_attributes(out: &mut dyn OutputSink) {
    out.write(b"\x1b[>84;0;0c");
}

/// XDA (`CSI = c`, XTVERSION-adjacent query some hosts send).
pub fn xda(out: &mut dyn OutputSink) {
    out.write(b"\x1bP>|vtcore\x1b\\");
}

/// `DSR` (`CSI n`): device status report, `CSI 6 n` cursor position report.
pub fn device_status_ok(out: &mut dyn OutputSink) {
    out.write(b"\x1b[0n");
}

pub fn cursor_position_report(x: u32, y: u32, out: &mut dyn OutputSink) {
    let mut buf = Vec::with_capacity(16);
    let _ = crate::esc!(&mut buf; "[", y + 1, ";", x + 1, "R");
    out.write(&buf);
}

/// `DECRQM`/`DECRQM` private: `CSI Ps ; Pm $ y` reply (`CSI ? Ps ; Pm $ y`
/// for the private family). A plain CSI reply, not a DCS string — no `ST`.
pub fn decrqm_reply(mode: i32, private: bool, result: ModeQueryResult, out: &mut dyn OutputSink) {
    let mut buf = Vec::with_capacity(16);
    if private {
        let _ = crate::esc!(&mut buf; "[?", mode, ";", result as i32, "$y");
    } else {
        let _ = crate::esc!(&mut buf; "[", mode, ";", result as i32, "$y");
    }
    out.write(&buf);
}

/// DECRPSS reply kinds produced by the DECRQSS mini-reparse (spec.md §4.5).
pub enum Decrpss {
    /// Negative acknowledgement: unrecognized CSI inside the DECRQSS
    /// payload.
    Invalid,
    Decsca { protected: bool },
    Decscl { level: EmulationLevel },
    Decscusr { style: u32 },
    Decslrm { left: u32, right: u32 },
    Decstbm { top: u32, bottom: u32 },
    Sgr(SgrReconstruction),
}

/// A faithful textual reconstruction of the current cell's SGR state, used
/// by both `DECRQSS "m"` (spec.md §4.5) and general debugging.
#[derive(Debug, Clone, Default)]
pub struct SgrReconstruction {
    pub parts: Vec<String>,
}

impl SgrReconstruction {
    pub fn push(&mut self, s: impl Into<String>) {
        self.parts.push(s.into());
    }

    pub fn from_cell(cell: &crate::cell::Cell) -> Self {
        use crate::cell::Attributes as A;
        let mut r = Self::default();
        r.push("0");
        if cell.attrs.contains(A::BOLD) {
            r.push("1");
        }
        if cell.attrs.contains(A::DIM) {
            r.push("2");
        }
        if cell.attrs.contains(A::ITALIC) {
            r.push("3");
        }
        match cell.underline_style {
            UnderlineStyle::None => {}
            UnderlineStyle::Single => r.push("4"),
            UnderlineStyle::Double => r.push("4:2"),
            UnderlineStyle::Curly => r.push("4:3"),
            UnderlineStyle::Dotted => r.push("4:4"),
            UnderlineStyle::Dashed => r.push("4:5"),
        }
        if cell.attrs.contains(A::BLINK) {
            r.push("5");
        }
        if cell.attrs.contains(A::REVERSE) {
            r.push("7");
        }
        if cell.attrs.contains(A::HIDDEN) {
            r.push("8");
        }
        if cell.attrs.contains(A::STRIKETHROUGH) {
            r.push("9");
        }
        push_color(&mut r, cell.fg, 30, 38);
        push_color(&mut r, cell.bg, 40, 48);
        if cell.underline_color != Color::Default {
            push_color(&mut r, cell.underline_color, 0, 58);
        }
        r
    }

    fn to_param_string(&self) -> String {
        self.parts.join(";")
    }
}

fn push_color(r: &mut SgrReconstruction, color: Color, base: u32, ext: u32) {
    match color {
        Color::Default => {}
        Color::Indexed(n) if (0..8).contains(&n) && base > 0 => {
            r.push(format!("{}", base + n as u32));
        }
        Color::Indexed(n) if (8..16).contains(&n) && base > 0 => {
            r.push(format!("{}", base + 60 + (n as u32 - 8)));
        }
        Color::Indexed(n) => r.push(format!("{ext}:5:{n}")),
        Color::Rgb(red, green, blue) => r.push(format!("{ext}:2::{red}:{green}:{blue}")),
    }
}

pub fn decrpss_reply(reply: &Decrpss, out: &mut dyn OutputSink) {
    let mut buf = Vec::with_capacity(32);
    match reply {
        Decrpss::Invalid => {
            let _ = crate::escst!(&mut buf; "P0$r");
        }
        Decrpss::Decsca { protected } => {
            let v = if *protected { 1 } else { 2 };
            let _ = crate::escst!(&mut buf; "P1$r0;", v, "\"q");
        }
        Decrpss::Decscl { level } => {
            let _ = crate::escst!(&mut buf; "P1$r", level.decscl_reply(), "\"p");
        }
        Decrpss::Decscusr { style } => {
            let _ = crate::escst!(&mut buf; "P1$r", *style, " q");
        }
        Decrpss::Decslrm { left, right } => {
            let _ = crate::escst!(&mut buf; "P1$r", left + 1, ";", right + 1, "s");
        }
        Decrpss::Decstbm { top, bottom } => {
            let _ = crate::escst!(&mut buf; "P1$r", top + 1, ";", bottom + 1, "r");
        }
        Decrpss::Sgr(sgr) => {
            buf.extend_from_slice(b"\x1bP1$r");
            buf.extend_from_slice(sgr.to_param_string().as_bytes());
            buf.extend_from_slice(b"m\x1b\\");
        }
    }
    out.write(&buf);
}

/// `DECRQPSR` (spec.md §2 component 7, §4.4): `CSI Ps $ w` requests a
/// presentation-state report; the terminal answers with the same payload
/// shape `DECRSPS` (spec.md §4.5) accepts on the way in — `Ps=1` is a
/// `DECCIR` cursor-information report, `Ps=2` a `DECTABSR` tab-stop
/// report — wrapped as `DCS Ps $ u Pt ST` rather than reapplied.
/// Unrecognized `Ps` gets the same negative-acknowledgement shape
/// `DECRPSS` uses for an unknown query (`DCS 0 $ u ST`).
pub fn decrqpsr_reply(ps: i32, payload: &str, out: &mut dyn OutputSink) {
    let mut buf = Vec::with_capacity(32 + payload.len());
    if ps == 1 || ps == 2 {
        let _ = crate::escst!(&mut buf; "P", ps, "$u", payload);
    } else {
        let _ = crate::escst!(&mut buf; "P0$u");
    }
    out.write(&buf);
}

/// `DECRQTSR` (spec.md §2 component 7, §4.4): `CSI $ u` requests a
/// terminal-state report; this core answers with the colour-table report
/// (`DECCTR`, `Ps=2`) in the same `idx;cs;x;y;z` tuple shape `DECRSTS`
/// (spec.md §4.5) accepts on restore, wrapped as `DCS 2 $ u Pt ST`.
pub fn decrqtsr_reply(payload: &str, out: &mut dyn OutputSink) {
    let mut buf = Vec::with_capacity(32 + payload.len());
    let _ = crate::escst!(&mut buf; "P2$u", payload);
    out.write(&buf);
}

/// OSC replies echo the end-of-string kind of the incoming sequence
/// (spec.md §4.6).
pub fn osc_reply(option: u32, body: &str, terminator: StringTerminator, out: &mut dyn OutputSink) {
    let mut buf = Vec::with_capacity(16 + body.len());
    buf.extend_from_slice(b"\x1b]");
    let _ = vtenc::write_int(&mut buf, option);
    buf.push(b';');
    buf.extend_from_slice(body.as_bytes());
    out.write(&buf);
    terminator.write(out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    #[test]
    fn vt220_primary_da_matches_boundary_test_5() {
        let mut out = Vec::new();
        primary_device_attributes(EmulationLevel::Vt220, &mut out);
        assert_eq!(out, b"\x1b[?62;1;2;6;16;17;21;22c");
    }

    #[test]
    fn decrpss_invalid_matches_boundary_test_4() {
        let mut out = Vec::new();
        let cell = Cell::default();
        let sgr = SgrReconstruction::from_cell(&cell);
        decrpss_reply(&Decrpss::Sgr(sgr), &mut out);
        assert_eq!(out, b"\x1bP1$r0m\x1b\\");
    }

    #[test]
    fn decrqm_reply_wire_format() {
        let mut out = Vec::new();
        decrqm_reply(4, false, ModeQueryResult::Set, &mut out);
        assert_eq!(out, b"\x1b[4;1$y");
        let mut out = Vec::new();
        decrqm_reply(1049, true, ModeQueryResult::PermanentlyReset, &mut out);
        assert_eq!(out, b"\x1b[?1049;4$y");
    }
}
