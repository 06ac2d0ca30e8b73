//! Screen-Write Interface (spec.md §2 component 2, §6): the contract the
//! dispatch layer drives. Specified here only — the concrete cell grid,
//! scrollback, hyperlinks table, palette, and tab bitmap are an external
//! collaborator per spec.md §1's Non-goals. Any storage backend implements
//! this trait to receive dispatched operations.

use crate::cell::{Cell, Color};
use crate::mode::{AnsiModes, DecModes};

/// Direction for insert/delete column/line/character operations and scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Line,
    Column,
}

/// Erase target for `ED`/`EL`/`DECSED`/`DECSEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseTarget {
    ToEnd,
    ToStart,
    Full,
    /// A run of `n` characters starting at the cursor (`ECH`).
    Character(u32),
}

/// The set of primitive operations the command dispatch layer invokes.
/// Cursor coordinates passed here are visible-screen coordinates; a
/// backend that also maintains scrollback should run them through
/// [`crate::grid_view::GridView`] itself.
pub trait ScreenWrite {
    // --- cursor motion ---
    /// Current cursor position, read by `DECSC`/`CSI s` to snapshot it.
    fn cursor_position(&self) -> (u32, u32);
    fn cursor_move(&mut self, x: Option<u32>, y: Option<u32>, origin_relative: bool);
    fn cursor_up(&mut self, n: u32);
    fn cursor_down(&mut self, n: u32);
    fn cursor_left(&mut self, n: u32);
    fn cursor_right(&mut self, n: u32);

    // --- scrolling ---
    fn scroll_up(&mut self, n: u32, bg: Color);
    fn scroll_down(&mut self, n: u32, bg: Color);
    fn scroll_left(&mut self, n: u32, bg: Color);
    fn scroll_right(&mut self, n: u32, bg: Color);
    /// Push the top visible row into scrollback (used by
    /// [`crate::grid_view::GridView::clear_into_history`]).
    fn scroll_history(&mut self, bg: Color);

    // --- linefeed family ---
    fn linefeed(&mut self);
    fn carriage_return(&mut self);
    fn reverse_index(&mut self);
    fn forward_index(&mut self);
    fn backward_index(&mut self);

    // --- insert/delete ---
    fn insert_lines(&mut self, n: u32, bg: Color);
    fn delete_lines(&mut self, n: u32, bg: Color);
    fn insert_characters(&mut self, n: u32, bg: Color);
    fn delete_characters(&mut self, n: u32, bg: Color);
    fn insert_columns(&mut self, n: u32, bg: Color);
    fn delete_columns(&mut self, n: u32, bg: Color);

    // --- erase ---
    fn erase(&mut self, target: EraseTarget, bg: Color, protect_only: bool);
    fn erase_full(&mut self, bg: Color, protect_only: bool) {
        self.erase(EraseTarget::Full, bg, protect_only);
    }

    // --- regions ---
    fn set_scroll_region(&mut self, top: u32, bottom: u32);
    fn set_scroll_margin(&mut self, left: u32, right: u32);
    fn reset_horizontal_scroll_offset(&mut self);

    // --- tabs ---
    fn cursor_tab_forward(&mut self, n: u32);
    fn cursor_tab_backward(&mut self, n: u32);
    fn set_tab_stop_here(&mut self);
    /// Set a tab stop at an explicit 0-based column, independent of the
    /// cursor (`DECTABSR` restore, spec.md §4.5).
    fn set_tab_stop_at(&mut self, col: u32);
    fn clear_tab_stop_here(&mut self);
    fn clear_all_tab_stops(&mut self);

    // --- alignment / indexing (ESC dispatch helpers) ---
    fn decaln(&mut self);
    fn decbi(&mut self);
    fn decfi(&mut self);

    // --- modes ---
    fn set_ansi_modes(&mut self, modes: AnsiModes);
    fn clear_ansi_modes(&mut self, modes: AnsiModes);
    fn set_dec_modes(&mut self, modes: DecModes);
    fn clear_dec_modes(&mut self, modes: DecModes);
    fn dec_modes(&self) -> DecModes;
    fn ansi_modes(&self) -> AnsiModes;
    fn alternate_screen(&mut self, on: bool, save_cursor: bool);

    // --- state readback (for query replies) ---
    /// Current scroll region, 0-based `(top, bottom)`, for `DECRQSS
    /// DECSTBM` (spec.md §4.5).
    fn scroll_region(&self) -> (u32, u32);
    /// Current left/right scroll margins, 0-based, for `DECRQSS DECSLRM`.
    fn scroll_margin(&self) -> (u32, u32);
    /// 0-based columns currently holding a tab stop, for `DECTABSR`
    /// reports (spec.md §4.5/§2 component 7).
    fn tab_stop_columns(&self) -> Vec<u32>;
    /// The last visible row (0-based) with any non-default content, if
    /// any, for [`crate::grid_view::GridView::clear_into_history`].
    fn last_nonempty_row(&self) -> Option<u32>;

    // --- cells ---
    /// Insert a single printable character at the cursor using `cell`'s
    /// current attributes, advancing the cursor. The dispatch layer may
    /// batch consecutive calls (spec.md §4.2's "screen-collect batch");
    /// implementations must not assume one call per printed character
    /// arrives synchronously with the byte that produced it.
    fn print(&mut self, ch: char, cell: &Cell);
    fn repeat_last(&mut self, ch: char, cell: &Cell, n: u32);

    // --- soft/full reset ---
    fn soft_reset(&mut self);
    fn full_redraw(&mut self);

    // --- titles, hyperlinks, misc ---
    fn set_title(&mut self, title: &str);
    fn push_title(&mut self);
    fn pop_title(&mut self);
    fn set_cursor_color(&mut self, color: Color);
    fn set_selection(&mut self, flags: u8, payload: &[u8]);
    fn set_hyperlink(&mut self, id: u32, uri: Option<&str>);
    /// Raw passthrough (tmux `tmux;` DCS passthrough, spec.md §4.5).
    fn raw_string(&mut self, bytes: &[u8]);
    /// Opaque handle to a decoded SIXEL image; the codec itself is an
    /// external collaborator (spec.md §1).
    fn sixel_image(&mut self, data: &[u8]);
}

/// A minimal [`ScreenWrite`] recording just enough state (cursor position,
/// DEC mode bits, last title) for dispatch unit tests elsewhere in this
/// crate; not part of the public API.
#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct NullScreen {
        pub cursor: (u32, u32),
        pub dec_modes: DecModes,
        pub ansi_modes: AnsiModes,
        pub last_title: Option<String>,
        pub printed: Vec<char>,
        pub scroll_region: Option<(u32, u32)>,
        pub tab_stops: Vec<u32>,
    }

    impl ScreenWrite for NullScreen {
        fn cursor_position(&self) -> (u32, u32) {
            self.cursor
        }
        fn cursor_move(&mut self, x: Option<u32>, y: Option<u32>, _origin_relative: bool) {
            if let Some(x) = x {
                self.cursor.0 = x;
            }
            if let Some(y) = y {
                self.cursor.1 = y;
            }
        }
        fn cursor_up(&mut self, n: u32) {
            self.cursor.1 = self.cursor.1.saturating_sub(n);
        }
        fn cursor_down(&mut self, n: u32) {
            self.cursor.1 += n;
        }
        fn cursor_left(&mut self, n: u32) {
            self.cursor.0 = self.cursor.0.saturating_sub(n);
        }
        fn cursor_right(&mut self, n: u32) {
            self.cursor.0 += n;
        }
        fn scroll_up(&mut self, _n: u32, _bg: Color) {}
        fn scroll_down(&mut self, _n: u32, _bg: Color) {}
        fn scroll_left(&mut self, _n: u32, _bg: Color) {}
        fn scroll_right(&mut self, _n: u32, _bg: Color) {}
        fn scroll_history(&mut self, _bg: Color) {}
        fn linefeed(&mut self) {
            self.cursor.1 += 1;
        }
        fn carriage_return(&mut self) {
            self.cursor.0 = 0;
        }
        fn reverse_index(&mut self) {
            self.cursor.1 = self.cursor.1.saturating_sub(1);
        }
        fn forward_index(&mut self) {
            self.cursor.0 += 1;
        }
        fn backward_index(&mut self) {
            self.cursor.0 = self.cursor.0.saturating_sub(1);
        }
        fn insert_lines(&mut self, _n: u32, _bg: Color) {}
        fn delete_lines(&mut self, _n: u32, _bg: Color) {}
        fn insert_characters(&mut self, _n: u32, _bg: Color) {}
        fn delete_characters(&mut self, _n: u32, _bg: Color) {}
        fn insert_columns(&mut self, _n: u32, _bg: Color) {}
        fn delete_columns(&mut self, _n: u32, _bg: Color) {}
        fn erase(&mut self, _target: EraseTarget, _bg: Color, _protect_only: bool) {}
        fn set_scroll_region(&mut self, top: u32, bottom: u32) {
            self.scroll_region = Some((top, bottom));
        }
        fn set_scroll_margin(&mut self, _left: u32, _right: u32) {}
        fn reset_horizontal_scroll_offset(&mut self) {}
        fn cursor_tab_forward(&mut self, _n: u32) {}
        fn cursor_tab_backward(&mut self, _n: u32) {}
        fn set_tab_stop_here(&mut self) {
            let col = self.cursor.0;
            if !self.tab_stops.contains(&col) {
                self.tab_stops.push(col);
            }
        }
        fn set_tab_stop_at(&mut self, col: u32) {
            if !self.tab_stops.contains(&col) {
                self.tab_stops.push(col);
            }
        }
        fn clear_tab_stop_here(&mut self) {
            self.tab_stops.retain(|&c| c != self.cursor.0);
        }
        fn clear_all_tab_stops(&mut self) {
            self.tab_stops.clear();
        }
        fn decaln(&mut self) {}
        fn decbi(&mut self) {}
        fn decfi(&mut self) {}
        fn set_ansi_modes(&mut self, modes: AnsiModes) {
            self.ansi_modes.insert(modes);
        }
        fn clear_ansi_modes(&mut self, modes: AnsiModes) {
            self.ansi_modes.remove(modes);
        }
        fn set_dec_modes(&mut self, modes: DecModes) {
            self.dec_modes.insert(modes);
        }
        fn clear_dec_modes(&mut self, modes: DecModes) {
            self.dec_modes.remove(modes);
        }
        fn dec_modes(&self) -> DecModes {
            self.dec_modes
        }
        fn ansi_modes(&self) -> AnsiModes {
            self.ansi_modes
        }
        fn alternate_screen(&mut self, _on: bool, _save_cursor: bool) {}
        fn scroll_region(&self) -> (u32, u32) {
            self.scroll_region.unwrap_or((0, 0))
        }
        fn scroll_margin(&self) -> (u32, u32) {
            (0, 0)
        }
        fn tab_stop_columns(&self) -> Vec<u32> {
            let mut cols = self.tab_stops.clone();
            cols.sort_unstable();
            cols
        }
        fn last_nonempty_row(&self) -> Option<u32> {
            if self.printed.is_empty() {
                None
            } else {
                Some(0)
            }
        }
        fn print(&mut self, ch: char, _cell: &Cell) {
            self.printed.push(ch);
        }
        fn repeat_last(&mut self, ch: char, _cell: &Cell, n: u32) {
            for _ in 0..n {
                self.printed.push(ch);
            }
        }
        fn soft_reset(&mut self) {}
        fn full_redraw(&mut self) {}
        fn set_title(&mut self, title: &str) {
            self.last_title = Some(title.to_string());
        }
        fn push_title(&mut self) {}
        fn pop_title(&mut self) {}
        fn set_cursor_color(&mut self, _color: Color) {}
        fn set_selection(&mut self, _flags: u8, _payload: &[u8]) {}
        fn set_hyperlink(&mut self, _id: u32, _uri: Option<&str>) {}
        fn raw_string(&mut self, _bytes: &[u8]) {}
        fn sixel_image(&mut self, _data: &[u8]) {}
    }
}
