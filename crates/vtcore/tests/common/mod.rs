//! Shared `ScreenWrite` test double for the integration suites in this
//! directory (spec.md §6's contract), recording just enough state to
//! assert on (cursor, modes, printed cells, titles, palette writes).

use vtcore::cell::{Cell, Color};
use vtcore::mode::{AnsiModes, DecModes};
use vtcore::screen::{EraseTarget, ScreenWrite};

#[derive(Debug, Default)]
pub struct TestScreen {
    pub cursor: (u32, u32),
    pub dec_modes: DecModes,
    pub ansi_modes: AnsiModes,
    pub scroll_region: Option<(u32, u32)>,
    pub scroll_margin: Option<(u32, u32)>,
    pub printed: Vec<char>,
    pub last_title: Option<String>,
    pub title_stack: Vec<String>,
    pub erased: Vec<EraseTarget>,
    pub alt_screen: bool,
    pub tab_stops: Vec<u32>,
}

impl ScreenWrite for TestScreen {
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
    fn erase(&mut self, target: EraseTarget, _bg: Color, _protect_only: bool) {
        self.erased.push(target);
    }
    fn set_scroll_region(&mut self, top: u32, bottom: u32) {
        self.scroll_region = Some((top, bottom));
    }
    fn set_scroll_margin(&mut self, left: u32, right: u32) {
        self.scroll_margin = Some((left, right));
    }
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
    fn alternate_screen(&mut self, on: bool, _save_cursor: bool) {
        self.alt_screen = on;
    }
    fn scroll_region(&self) -> (u32, u32) {
        self.scroll_region.unwrap_or((0, 0))
    }
    fn scroll_margin(&self) -> (u32, u32) {
        self.scroll_margin.unwrap_or((0, 0))
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
    fn push_title(&mut self) {
        self.title_stack.push(self.last_title.clone().unwrap_or_default());
    }
    fn pop_title(&mut self) {
        if let Some(t) = self.title_stack.pop() {
            self.last_title = Some(t);
        }
    }
    fn set_cursor_color(&mut self, _color: Color) {}
    fn set_selection(&mut self, _flags: u8, _payload: &[u8]) {}
    fn set_hyperlink(&mut self, _id: u32, _uri: Option<&str>) {}
    fn raw_string(&mut self, _bytes: &[u8]) {}
    fn sixel_image(&mut self, _data: &[u8]) {}
}
