//! Terminal mode flags.
//!
//! Covers both ANSI modes (`CSI Pm h`/`l`) and DEC private modes
//! (`CSI ? Pm h`/`l`). Mode bits are opaque to the core beyond the
//! exclusivity/gating rules spec.md §4.4 calls out (mouse tracking modes,
//! alternate-screen variants); everything else is a flag the Screen-Write
//! interface's `set_mode`/`clear_mode` primitive passes straight through.

use bitflags::bitflags;

bitflags! {
    /// ANSI (non-private) modes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AnsiModes: u32 {
        /// IRM — Insert/Replace Mode.
        const INSERT = 1 << 0;
        /// KAM — Keyboard Action Mode (locked).
        const KEYBOARD_LOCKED = 1 << 1;
        /// SRM — Send/Receive (local echo suppressed when set).
        const LOCAL_ECHO_OFF = 1 << 2;
        /// LNM — Linefeed/New Line.
        const LINEFEED_NEWLINE = 1 << 3;
    }
}

bitflags! {
    /// DEC private modes (`CSI ?`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DecModes: u64 {
        /// DECCKM — cursor keys send application sequences.
        const APP_CURSOR_KEYS = 1 << 0;
        /// DECANM — ANSI/VT52 mode (VT52 compatibility is a Non-goal; tracked
        /// only so DECRQM can answer "permanently reset").
        const ANSI = 1 << 1;
        /// DECCOLM — 132 column mode.
        const COLUMN_132 = 1 << 2;
        /// DECSCLM — smooth scroll.
        const SMOOTH_SCROLL = 1 << 3;
        /// DECSCNM — reverse video.
        const REVERSE_VIDEO = 1 << 4;
        /// DECOM — origin mode.
        const ORIGIN = 1 << 5;
        /// DECAWM — autowrap.
        const AUTOWRAP = 1 << 6;
        /// DECARM — autorepeat.
        const AUTOREPEAT = 1 << 7;
        /// Mouse tracking: X10 compatibility (1000).
        const MOUSE_X10 = 1 << 8;
        /// Mouse tracking: button-event (1002).
        const MOUSE_BUTTON_EVENT = 1 << 9;
        /// Mouse tracking: any-event (1003).
        const MOUSE_ANY_EVENT = 1 << 10;
        /// Focus in/out reporting (1004).
        const FOCUS_EVENT = 1 << 11;
        /// UTF-8 mouse encoding (1005).
        const MOUSE_UTF8 = 1 << 12;
        /// SGR mouse encoding (1006).
        const MOUSE_SGR = 1 << 13;
        /// Alternate screen, xterm-style (1047/1049 share this bit; 1049 also
        /// saves/restores cursor, see `AppliedPrivateMode`).
        const ALT_SCREEN = 1 << 14;
        /// Bracketed paste (2004).
        const BRACKETED_PASTE = 1 << 15;
        /// Theme-update notifications (2031).
        const THEME_UPDATES = 1 << 16;
        /// DECTCEM — cursor visible.
        const CURSOR_VISIBLE = 1 << 17;
        /// `CSI > 4 ; 1 m` (MODSET): extended key reporting, mode 1.
        const EXTENDED_KEYS = 1 << 18;
        /// `CSI > 4 ; 2 m` (MODSET): extended key reporting, mode 2.
        const EXTENDED_KEYS_2 = 1 << 19;
    }
}

/// The two mutually exclusive extended-key-reporting bits MODSET/MODOFF
/// (spec.md §4.4) toggle (`original_source/input.c`'s `EXTENDED_KEY_MODES`).
pub const EXTENDED_KEY_MODES: DecModes = DecModes::EXTENDED_KEYS.union(DecModes::EXTENDED_KEYS_2);

/// The three mutually exclusive mouse-tracking private modes (spec.md
/// §4.4: "entering one clears the others").
pub const MOUSE_EXCLUSIVE: DecModes = DecModes::MOUSE_X10
    .union(DecModes::MOUSE_BUTTON_EVENT)
    .union(DecModes::MOUSE_ANY_EVENT);

/// DEC private mode numbers this core recognizes, and whether setting them
/// is otherwise a no-op beyond the bit itself (some numbers are "reported
/// as not supported" per spec.md §1's Non-goals).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateMode {
    AppCursorKeys,
    Ansi,
    Column132,
    SmoothScroll,
    ReverseVideo,
    Origin,
    Autowrap,
    Autorepeat,
    MouseX10,
    MouseButtonEvent,
    MouseAnyEvent,
    FocusEvent,
    MouseUtf8,
    MouseSgr,
    AltScreen47,
    AltScreen1047,
    AltScreen1049,
    BracketedPaste,
    ThemeUpdates,
    CursorVisible,
    Unsupported,
}

impl PrivateMode {
    pub fn from_number(n: i32) -> Self {
        match n {
            1 => Self::AppCursorKeys,
            2 => Self::Ansi,
            3 => Self::Column132,
            4 => Self::SmoothScroll,
            5 => Self::ReverseVideo,
            6 => Self::Origin,
            7 => Self::Autowrap,
            8 => Self::Autorepeat,
            1000 => Self::MouseX10,
            1002 => Self::MouseButtonEvent,
            1003 => Self::MouseAnyEvent,
            1004 => Self::FocusEvent,
            1005 => Self::MouseUtf8,
            1006 => Self::MouseSgr,
            47 => Self::AltScreen47,
            1047 => Self::AltScreen1047,
            1049 => Self::AltScreen1049,
            2004 => Self::BracketedPaste,
            2031 => Self::ThemeUpdates,
            25 => Self::CursorVisible,
            _ => Self::Unsupported,
        }
    }

    pub fn bit(self) -> Option<DecModes> {
        Some(match self {
            Self::AppCursorKeys => DecModes::APP_CURSOR_KEYS,
            Self::Ansi => DecModes::ANSI,
            Self::Column132 => DecModes::COLUMN_132,
            Self::SmoothScroll => DecModes::SMOOTH_SCROLL,
            Self::ReverseVideo => DecModes::REVERSE_VIDEO,
            Self::Origin => DecModes::ORIGIN,
            Self::Autowrap => DecModes::AUTOWRAP,
            Self::Autorepeat => DecModes::AUTOREPEAT,
            Self::MouseX10 => DecModes::MOUSE_X10,
            Self::MouseButtonEvent => DecModes::MOUSE_BUTTON_EVENT,
            Self::MouseAnyEvent => DecModes::MOUSE_ANY_EVENT,
            Self::FocusEvent => DecModes::FOCUS_EVENT,
            Self::MouseUtf8 => DecModes::MOUSE_UTF8,
            Self::MouseSgr => DecModes::MOUSE_SGR,
            Self::AltScreen47 | Self::AltScreen1047 | Self::AltScreen1049 => DecModes::ALT_SCREEN,
            Self::BracketedPaste => DecModes::BRACKETED_PASTE,
            Self::ThemeUpdates => DecModes::THEME_UPDATES,
            Self::CursorVisible => DecModes::CURSOR_VISIBLE,
            Self::Unsupported => return None,
        })
    }

    pub fn is_mouse_exclusive(self) -> bool {
        matches!(
            self,
            Self::MouseX10 | Self::MouseButtonEvent | Self::MouseAnyEvent
        )
    }
}

/// Result of a DECRQM query, per VT510 semantics (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeQueryResult {
    NotRecognized = 0,
    Set = 1,
    Reset = 2,
    PermanentlySet = 3,
    PermanentlyReset = 4,
}
