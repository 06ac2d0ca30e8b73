//! Grid-View Translator (spec.md §4.1).
//!
//! A thin, stateless coordinate mapping between visible-screen coordinates
//! (what the parser and dispatch layer work in) and absolute grid
//! coordinates (what the storage engine — out of scope, see spec.md §1 —
//! addresses), accounting for scrollback height. Grounded on
//! `original_source/grid-view.c`'s `grid_view_x`/`grid_view_y` and
//! `grid_view_clear_history`.

use crate::screen::ScreenWrite;

/// Absolute grid coordinates (`hsize` already folded in).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsolutePos {
    pub x: u32,
    pub y: u32,
}

/// Projects visible-screen coordinates onto absolute grid coordinates.
///
/// `x` is unchanged; `y` gains the scrollback height. The projection is
/// stateless beyond the scrollback height it's given — it owns no storage
/// itself, matching spec.md §2's "≈0%, leaves-first" sizing for this
/// component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridView {
    pub scrollback_height: u32,
}

impl GridView {
    pub fn new(scrollback_height: u32) -> Self {
        Self { scrollback_height }
    }

    pub fn project(&self, x: u32, y: u32) -> AbsolutePos {
        AbsolutePos {
            x,
            y: y + self.scrollback_height,
        }
    }

    /// `clear-into-history` (spec.md §4.1): scan the visible area for the
    /// last non-empty row `L`, push each of those `L` rows into scrollback
    /// (`collect-history`/`scroll-history`), then clear whatever visible
    /// rows remain and reset the horizontal-scroll offset.
    ///
    /// `last_nonempty_row` is supplied by the caller (the storage engine
    /// knows which rows are empty; this translator does not).
    pub fn clear_into_history(
        &self,
        screen: &mut dyn ScreenWrite,
        visible_rows: u32,
        last_nonempty_row: Option<u32>,
        bg: crate::cell::Color,
    ) {
        if let Some(last) = last_nonempty_row {
            for _ in 0..=last {
                screen.scroll_history(bg);
            }
        }
        screen.erase_full(bg, false);
        let _ = visible_rows;
        screen.reset_horizontal_scroll_offset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_adds_scrollback_height_to_y_only() {
        let gv = GridView::new(500);
        let pos = gv.project(12, 3);
        assert_eq!(pos, AbsolutePos { x: 12, y: 503 });
    }
}
