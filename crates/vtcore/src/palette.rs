//! Palette storage (spec.md §9): 256 nullable colour slots plus two
//! optional defaults (foreground/background). Read-heavy, shared with a
//! renderer; mutated only through the parser's OSC 4/104/110/111/112 and
//! DECRSTS handling.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone)]
pub struct Palette {
    slots: [Option<Rgb>; 256],
    default_fg: Option<Rgb>,
    default_bg: Option<Rgb>,
    default_cursor: Option<Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            slots: [None; 256],
            default_fg: None,
            default_bg: None,
            default_cursor: None,
        }
    }
}

impl Palette {
    pub fn get(&self, index: u8) -> Option<Rgb> {
        self.slots[index as usize]
    }

    pub fn set(&mut self, index: u8, color: Rgb) {
        self.slots[index as usize] = Some(color);
    }

    pub fn reset(&mut self, index: u8) {
        self.slots[index as usize] = None;
    }

    pub fn reset_all(&mut self) {
        self.slots = [None; 256];
    }

    pub fn fg(&self) -> Option<Rgb> {
        self.default_fg
    }

    pub fn set_fg(&mut self, color: Option<Rgb>) {
        self.default_fg = color;
    }

    pub fn bg(&self) -> Option<Rgb> {
        self.default_bg
    }

    pub fn set_bg(&mut self, color: Option<Rgb>) {
        self.default_bg = color;
    }

    pub fn cursor(&self) -> Option<Rgb> {
        self.default_cursor
    }

    pub fn set_cursor(&mut self, color: Option<Rgb>) {
        self.default_cursor = color;
    }
}

/// `cs` discriminant for DECRSTS/DECCTR palette-restore tuples (spec.md
/// §4.5): `1` is HLS, `2` is RGB expressed on a 0..100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Hls,
    Rgb100,
}

impl ColorSpace {
    pub fn from_cs(cs: i32) -> Option<Self> {
        match cs {
            1 => Some(Self::Hls),
            2 => Some(Self::Rgb100),
            _ => None,
        }
    }
}

/// Convert an HLS triple (H in 0..360, L/S in 0..100) to RGB.
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> Rgb {
    let l = l / 100.0;
    let s = s / 100.0;
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb(v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = h / 360.0;
    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);
    Rgb(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Rescale a 0..100 component (DECRSTS RGB tuples) to 0..255 before joining.
pub fn rescale_100_to_255(v: f64) -> u8 {
    ((v / 100.0) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Inverse of [`rescale_100_to_255`], for `DECRQTSR`'s colour-table report.
pub fn rescale_255_to_100(v: u8) -> u32 {
    ((v as f64 / 255.0) * 100.0).round() as u32
}
