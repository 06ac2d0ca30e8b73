//! Parser Context (spec.md §3): the per-pane state a byte feed mutates.
//!
//! Holds the screen/output/palette back-references plus everything the
//! dispatch layer reads or writes between bytes: the current graphic cell,
//! the saved cursor, charset state, emulation level, the `since_ground`
//! replay buffer, and the handful of flags (`DISCARD`, `LAST`) spec.md's
//! invariants are stated in terms of.

use smallvec::SmallVec;

use crate::cell::{Cell, CharsetState, SavedCursor};
use crate::emulation::{EmulationCap, EmulationLevel};
use crate::grid_view::GridView;
use crate::palette::Palette;
use crate::params::ParamList;
use crate::reply::{OutputSink, StringTerminator};
use crate::screen::ScreenWrite;
use crate::utf8::Utf8Assembler;

/// Host-configured options (spec.md §6's CLI surface): read from
/// string→value maps provided by the pane and the global options.
#[derive(Debug, Clone)]
pub struct Options {
    pub default_emulation_level: EmulationLevel,
    pub extended_keys: ExtendedKeysPolicy,
    pub set_clipboard: ClipboardPolicy,
    pub allow_set_title: bool,
    pub allow_rename: bool,
    pub allow_passthrough: PassthroughPolicy,
    /// Process-wide cap on the growable input/string buffer (spec.md §3,
    /// `set_global_input_buffer_size`). Default matches tmux's own
    /// default of a large-but-bounded limit.
    pub global_input_buffer_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default_emulation_level: EmulationLevel::Vt220,
            extended_keys: ExtendedKeysPolicy::default(),
            set_clipboard: ClipboardPolicy::default(),
            allow_set_title: true,
            allow_rename: true,
            allow_passthrough: PassthroughPolicy::Off,
            global_input_buffer_size: 1 << 20,
        }
    }
}

/// `extended-keys` option (spec.md §6; `CSI > 4 ; Pv m`/`n` MODSET/MODOFF,
/// `original_source/input.c`'s `INPUT_CSI_MODSET`/`INPUT_CSI_MODOFF`): `Off`
/// ignores the client's request entirely, `On` honors it, `Always` forces
/// extended-key mode 1 back on even when the client asks MODOFF to clear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtendedKeysPolicy {
    #[default]
    Off,
    On,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipboardPolicy {
    #[default]
    Off,
    External,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassthroughPolicy {
    #[default]
    Off,
    On,
    /// "2" setting (spec.md §4.5): also flushes immediately.
    Flush,
}

/// Maximum growable string/input buffer size before the default cap
/// applies (spec.md §3: "initial 32 bytes").
pub const INITIAL_STRING_BUFFER: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    pub discard: bool,
    pub last: bool,
}

/// What's currently being captured outside `vt-push-parser`'s own state
/// machine (spec.md §4.6): it emits no event at all for APC payloads and
/// only a one-shot event for `ESC k`, so both need a byte-level capture
/// layer above it. See [`crate::parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    Rename,
    Apc,
}

pub struct Context<S: ScreenWrite> {
    pub screen: S,
    pub options: Options,
    pub palette: Palette,
    pub grid_view: GridView,

    pub cell: Cell,
    pub saved: Option<SavedCursor>,
    pub charset: CharsetState,
    pub origin_mode: bool,
    /// DECLRMM: when set, `CSI s` sets left/right margins instead of
    /// saving the cursor (spec.md §8's `s;u` idempotence invariant holds
    /// only while this is off).
    pub left_right_margin_mode: bool,

    pub emulation: EmulationLevel,
    pub emulation_cap: EmulationCap,
    pub keypad_application: bool,
    pub cursor_style: u32,

    pub utf8: Utf8Assembler,
    pub last_printed: Option<char>,
    pub flags: Flags,

    /// Everything consumed since the parser last entered ground
    /// (spec.md §4.2); reset on ground-entry, read by `pending()`.
    pub since_ground: Vec<u8>,

    pub title_stack: Vec<String>,
    pub automatic_rename: bool,

    /// End-of-string kind of the sequence currently being processed
    /// (spec.md §3), read by the reply emitter to pick BEL vs ST.
    pub end_kind: StringTerminator,

    /// True while a string-collecting state's 5s termination timer
    /// would be armed (spec.md §4.2); the host drives the actual timer
    /// and calls [`Context::timer_expired`] (spec.md §1: "assumes an
    /// external scheduler ... drives a single reset-timer").
    pub timer_armed: bool,

    /// Top paste buffer installed by `OSC 52` (spec.md §4.6), stored here
    /// rather than behind [`ScreenWrite`] because the query side (`OSC 52;
    /// ...;?`) must echo back exactly what was last set, independent of
    /// whatever the backend does with `set_selection`.
    pub clipboard: Vec<u8>,
}

impl<S: ScreenWrite> Context<S> {
    pub fn new(screen: S, palette: Palette, options: Options) -> Self {
        let emulation = options.default_emulation_level;
        Self {
            screen,
            emulation_cap: EmulationCap { max: emulation },
            options,
            palette,
            grid_view: GridView::new(0),
            cell: Cell::default(),
            saved: None,
            charset: CharsetState::default(),
            origin_mode: false,
            left_right_margin_mode: false,
            emulation,
            keypad_application: false,
            cursor_style: 0,
            utf8: Utf8Assembler::new(),
            last_printed: None,
            flags: Flags::default(),
            since_ground: Vec::new(),
            title_stack: Vec::new(),
            automatic_rename: true,
            end_kind: StringTerminator::St,
            timer_armed: false,
            clipboard: Vec::new(),
        }
    }

    pub fn reply(&mut self, out: &mut dyn OutputSink, bytes: &[u8]) {
        out.write(bytes);
    }

    /// `reset(context, clear_screen?)` (spec.md §6). The clearing variant
    /// does not discard visible content outright: it runs the grid-view
    /// "clear into history" path (spec.md §4.1's secondary operation, the
    /// Supplemented-features note in SPEC_FULL.md) so scrollback retains
    /// what was on screen, matching `input_reset`'s pairing with
    /// `window_pane_reset_mode` in `original_source/input.c`.
    pub fn reset(&mut self, clear_screen: bool) {
        self.since_ground.clear();
        self.flags = Flags::default();
        self.timer_armed = false;
        if clear_screen {
            let last_nonempty = self.screen.last_nonempty_row();
            self.grid_view
                .clear_into_history(&mut self.screen, 0, last_nonempty, crate::cell::Color::Default);
        }
    }

    /// `ESC c` (RIS): full terminal reset.
    pub fn ris(&mut self) {
        self.cell = Cell::default();
        self.saved = None;
        self.charset = CharsetState::default();
        self.origin_mode = false;
        self.emulation = self.options.default_emulation_level;
        self.keypad_application = false;
        self.cursor_style = 0;
        self.last_printed = None;
        self.flags = Flags::default();
        self.title_stack.clear();
        self.automatic_rename = true;
        self.palette.reset_all();
        self.screen.full_redraw();
        self.screen.soft_reset();
    }

    /// `DECSTR` (soft reset, spec.md's Supplemented features: scope is the
    /// cursor/cell/margins/mode subset, not palette or title state).
    pub fn soft_reset(&mut self) {
        self.cell = Cell::default();
        self.saved = None;
        self.origin_mode = false;
        self.cursor_style = 0;
        self.screen.soft_reset();
    }

    /// `ESC 7` / `DECSC`.
    pub fn decsc(&mut self) {
        let (x, y) = self.screen.cursor_position();
        self.saved = Some(SavedCursor {
            cell: (&self.cell).into(),
            x,
            y,
            origin_mode: self.origin_mode,
            charset: self.charset,
        });
    }

    /// `ESC 8` / `DECRC`.
    pub fn decrc(&mut self) {
        if let Some(saved) = self.saved {
            saved.cell.apply_to(&mut self.cell);
            self.origin_mode = saved.origin_mode;
            self.charset = saved.charset;
            self.screen
                .cursor_move(Some(saved.x), Some(saved.y), self.origin_mode);
        }
    }

    pub fn split_params(&self, buf: vt_push_parser::event::ParamBuf<'_>) -> Option<ParamList> {
        ParamList::split(buf).ok()
    }
}

/// Growable `since_ground`-style byte buffer capped at a configurable
/// limit (spec.md §3); overflow sets DISCARD rather than growing further.
pub fn push_bounded(buf: &mut Vec<u8>, bytes: &[u8], cap: usize, discard: &mut bool) {
    if buf.len() + bytes.len() > cap {
        *discard = true;
        return;
    }
    buf.extend_from_slice(bytes);
}

pub type SmallParamCache = SmallVec<[u8; 8]>;
