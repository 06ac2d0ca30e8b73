//! Current graphic cell state: SGR attributes, colours, charset selection.
//!
//! Mirrors tmux's `grid_cell` (the subset the parser itself touches — the
//! storage engine owns the rest). `Cell` is the unit `ESC 7`/`ESC 8`
//! (`DECSC`/`DECRC`) save and restore operate on.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attributes: u16 {
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const REVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
        const DOUBLE_UNDERLINE = 1 << 8;
        const CURLY_UNDERLINE = 1 << 9;
        const DOTTED_UNDERLINE = 1 << 10;
        const DASHED_UNDERLINE = 1 << 11;
        const OVERLINE = 1 << 12;
    }
}

/// The five non-exclusive underline styles `4:{0..5}` selects between
/// (spec.md §4.4). Stored separately from [`Attributes::UNDERLINE`] because
/// a style and "underline is on at all" are two different bits in the wire
/// protocol but one concept visually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderlineStyle {
    #[default]
    None,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

impl UnderlineStyle {
    pub fn from_param(n: i32) -> Option<Self> {
        Some(match n {
            0 => Self::None,
            1 => Self::Single,
            2 => Self::Double,
            3 => Self::Curly,
            4 => Self::Dotted,
            5 => Self::Dashed,
            _ => return None,
        })
    }
}

/// A cell colour: default, indexed (0-255), or 24-bit RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Indexed(u8),
    Rgb(u8, u8, u8),
}

/// Character-set designation slot (`G0`/`G1`/`G2`/`G3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Ascii,
    /// DEC Special Graphics ("ACS"), selected via `SCS` with final `0`.
    SpecialGraphics,
}

/// `SO`/`SI` (`^N`/`^O`) select which designated set is currently invoked
/// into GL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftState {
    #[default]
    ShiftIn,
    ShiftOut,
}

impl Charset {
    /// Maps a GL character through this charset designation (spec.md §4.2:
    /// printable handling "applies the current G0/G1 charset bit"). Only
    /// [`Charset::SpecialGraphics`] (the VT100 "ACS" line-drawing set)
    /// remaps anything.
    pub fn translate(self, ch: char) -> char {
        if self != Self::SpecialGraphics {
            return ch;
        }
        match ch {
            '`' => '\u{25C6}',
            'a' => '\u{2592}',
            'b' => '\u{2409}',
            'c' => '\u{240C}',
            'd' => '\u{240D}',
            'e' => '\u{240A}',
            'f' => '\u{00B0}',
            'g' => '\u{00B1}',
            'h' => '\u{2424}',
            'i' => '\u{240B}',
            'j' => '\u{2518}',
            'k' => '\u{2510}',
            'l' => '\u{250C}',
            'm' => '\u{2514}',
            'n' => '\u{253C}',
            'o' => '\u{23BA}',
            'p' => '\u{23BB}',
            'q' => '\u{2500}',
            'r' => '\u{23BC}',
            's' => '\u{23BD}',
            't' => '\u{251C}',
            'u' => '\u{2524}',
            'v' => '\u{2534}',
            'w' => '\u{252C}',
            'x' => '\u{2502}',
            'y' => '\u{2264}',
            'z' => '\u{2265}',
            '{' => '\u{03C0}',
            '|' => '\u{2260}',
            '}' => '\u{00A3}',
            '~' => '\u{00B7}',
            _ => ch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharsetState {
    pub g0: Charset,
    pub g1: Charset,
    pub shift: ShiftState,
}

impl CharsetState {
    pub fn current(&self) -> Charset {
        match self.shift {
            ShiftState::ShiftIn => self.g0,
            ShiftState::ShiftOut => self.g1,
        }
    }
}

/// The current graphic cell: attributes and colours applied to newly
/// printed characters, plus the hyperlink currently in effect.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub attrs: Attributes,
    pub underline_style: UnderlineStyle,
    pub fg: Color,
    pub bg: Color,
    pub underline_color: Color,
    /// 0 means "no hyperlink". SGR 0 (full reset) leaves this untouched
    /// (spec.md §4.4: "SGR 0 resets all except the hyperlink link-id").
    pub link_id: u32,
    /// DECSCA "protected" bit: survives selective erase (`DECSED`/`DECSEL`).
    pub protected: bool,
}

impl Cell {
    /// SGR 0: reset every attribute/colour except the hyperlink id.
    pub fn sgr_reset(&mut self) {
        let link_id = self.link_id;
        *self = Self {
            link_id,
            ..Default::default()
        };
    }
}

/// Saved cursor state for `DECSC`/`DECRC` (`ESC 7`/`ESC 8`) and `CSI s`/`CSI u`
/// with left/right margins off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SavedCursor {
    pub cell: SavedCell,
    pub x: u32,
    pub y: u32,
    pub origin_mode: bool,
    pub charset: CharsetState,
}

/// Plain-data twin of [`Cell`] usable in a `Copy` struct (no heap fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SavedCell {
    pub attrs: Attributes,
    pub underline_style: UnderlineStyle,
    pub fg: Color,
    pub bg: Color,
    pub underline_color: Color,
    pub protected: bool,
}

impl From<&Cell> for SavedCell {
    fn from(c: &Cell) -> Self {
        Self {
            attrs: c.attrs,
            underline_style: c.underline_style,
            fg: c.fg,
            bg: c.bg,
            underline_color: c.underline_color,
            protected: c.protected,
        }
    }
}

impl SavedCell {
    pub fn apply_to(&self, cell: &mut Cell) {
        cell.attrs = self.attrs;
        cell.underline_style = self.underline_style;
        cell.fg = self.fg;
        cell.bg = self.bg;
        cell.underline_color = self.underline_color;
        cell.protected = self.protected;
    }
}
