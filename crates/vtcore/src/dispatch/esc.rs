//! Escape Dispatch (spec.md §4.3).
//!
//! On a final byte in `0x30..=0x7E` reached from `esc_enter`/
//! `esc_intermediate`, a lookup on `(final, intermediates)` selects one of
//! a small fixed set of single-shot operations. Unknown combinations are
//! logged and ignored; `DECBI`/`DECFI` are gated to VT220+.

use crate::cell::{Charset, ShiftState};
use crate::context::Context;
use crate::screen::ScreenWrite;

pub fn dispatch<S: ScreenWrite>(ctx: &mut Context<S>, intermediates: &[u8], final_byte: u8) {
    match (final_byte, intermediates) {
        (b'c', []) => {
            ctx.ris();
        }
        (b'D', []) => ctx.screen.linefeed(),
        (b'M', []) => ctx.screen.reverse_index(),
        (b'E', []) => {
            ctx.screen.carriage_return();
            ctx.screen.linefeed();
        }
        (b'H', []) => ctx.screen.set_tab_stop_here(),
        (b'7', []) => ctx.decsc(),
        (b'8', []) => ctx.decrc(),
        (b'8', [b'#']) => ctx.screen.decaln(),
        (b'=', []) => ctx.keypad_application = true,
        (b'>', []) => ctx.keypad_application = false,
        (b'6', []) if ctx.emulation.at_least_vt220() => ctx.screen.decbi(),
        (b'9', []) if ctx.emulation.at_least_vt220() => ctx.screen.decfi(),
        (b'0', [b'(']) => ctx.charset.g0 = Charset::SpecialGraphics,
        (b'B', [b'(']) => ctx.charset.g0 = Charset::Ascii,
        (b'0', [b')']) => ctx.charset.g1 = Charset::SpecialGraphics,
        (b'B', [b')']) => ctx.charset.g1 = Charset::Ascii,
        (b'N', []) => {}
        (b'O', []) => {}
        (b'\\', []) => {}
        (0x0E, []) => ctx.charset.shift = ShiftState::ShiftOut,
        (0x0F, []) => ctx.charset.shift = ShiftState::ShiftIn,
        _ => {
            tracing::debug!(
                final_byte,
                intermediates = ?intermediates,
                "unrecognized ESC sequence, ignored"
            );
        }
    }
}
