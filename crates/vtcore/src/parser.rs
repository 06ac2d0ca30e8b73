//! Parser Context driver (spec.md §2 component 6, §3, §4.2, §6).
//!
//! Wraps [`vt_push_parser::VTPushParser`] and adds the one layer it cannot
//! provide on its own: a byte-level capture for the two sequence families
//! it emits no usable event for. `SOS`/`PM`/`APC` content is discarded
//! unconditionally by its state machine (every byte in `SosPmApcString` and
//! `SpaEsc` maps to `VTAction::None`), and tmux window-rename (`ESC k ...
//! ESC \`) falls through its generic one-shot `Esc` final-byte handling
//! with no payload at all. Both need their bytes before they ever reach
//! `vt_push_parser`, so [`Parser::feed`] pre-scans for the two trigger
//! sequences and hands everything else to the push parser unchanged.

use vt_push_parser::event::{ParamBufOwned, VTEvent, VTIntermediate};
use vt_push_parser::VTPushParser;

use crate::context::{push_bounded, CaptureKind, Context};
use crate::dispatch;
use crate::params::ParamList;
use crate::reply::{OutputSink, StringTerminator};
use crate::screen::ScreenWrite;

/// Header fields of a DCS sequence currently being collected, captured at
/// `DcsStart` and consumed at `DcsEnd`/`DcsCancel`.
struct DcsHeader {
    private: Option<u8>,
    intermediates: VTIntermediate,
    params: ParamBufOwned,
    final_byte: u8,
}

/// Outcome of feeding bytes into an active byte-level capture.
enum CaptureOutcome {
    /// `ESC \` seen: the capture is complete.
    Done,
    /// `CAN`/`SUB` seen: the capture is abandoned with no dispatch.
    Cancelled,
    /// Ran out of input; still collecting.
    Pending,
}

/// Drives a single pane's byte feed (spec.md §5: "parser driven by one
/// byte-feed source plus one timer"). Not [`Clone`] — holds the live
/// `vt_push_parser` automaton plus whatever is mid-capture above it.
pub struct Parser {
    vt: VTPushParser,
    capture: Option<CaptureKind>,
    dcs_header: Option<DcsHeader>,
    /// A bare `ESC` that landed as the very last byte of a `feed()` call,
    /// re-prepended to the next call's input (spec.md §4.2's
    /// chunking-invariance: one logical sequence split across two feeds
    /// must parse identically to it arriving whole).
    pending_esc: Option<u8>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            vt: VTPushParser::new(),
            capture: None,
            dcs_header: None,
            pending_esc: None,
        }
    }

    /// Feed a chunk of host bytes, dispatching every complete command as
    /// it is recognized (spec.md §6's `feed(context, bytes)`).
    #[allow(unused_assignments)]
    pub fn feed<S: ScreenWrite>(&mut self, ctx: &mut Context<S>, out: &mut dyn OutputSink, input: &[u8]) {
        let prefixed;
        let bytes: &[u8] = if let Some(b) = self.pending_esc.take() {
            let mut v = Vec::with_capacity(input.len() + 1);
            v.push(b);
            v.extend_from_slice(input);
            prefixed = v;
            &prefixed
        } else {
            input
        };

        let mut pos = 0usize;
        while pos < bytes.len() {
            if let Some(kind) = self.capture {
                match feed_capture(ctx, bytes, &mut pos) {
                    CaptureOutcome::Done => {
                        self.capture = None;
                        dispatch_capture(ctx, kind);
                    }
                    CaptureOutcome::Cancelled => {
                        self.capture = None;
                        ctx.since_ground.clear();
                        ctx.flags.discard = false;
                        ctx.timer_armed = false;
                    }
                    CaptureOutcome::Pending => {
                        if pos < bytes.len() {
                            self.pending_esc = Some(bytes[pos]);
                            pos += 1;
                        }
                        break;
                    }
                }
                continue;
            }

            match bytes[pos..].iter().position(|&b| b == 0x1b) {
                None => {
                    self.feed_plain(ctx, out, &bytes[pos..]);
                    pos = bytes.len();
                }
                Some(rel) => {
                    let esc_abs = pos + rel;
                    if esc_abs > pos {
                        self.feed_plain(ctx, out, &bytes[pos..esc_abs]);
                    }
                    if esc_abs + 1 >= bytes.len() {
                        self.pending_esc = Some(0x1b);
                        pos = bytes.len();
                        break;
                    }
                    let trigger = bytes[esc_abs + 1];
                    if self.vt.is_ground() && (trigger == b'_' || trigger == b'k') {
                        self.capture = Some(if trigger == b'_' {
                            CaptureKind::Apc
                        } else {
                            CaptureKind::Rename
                        });
                        ctx.since_ground.clear();
                        ctx.flags.discard = false;
                        ctx.timer_armed = true;
                        pos = esc_abs + 2;
                    } else {
                        self.feed_plain(ctx, out, &bytes[esc_abs..=esc_abs]);
                        pos = esc_abs + 1;
                    }
                }
            }
        }
    }

    fn feed_plain<S: ScreenWrite>(&mut self, ctx: &mut Context<S>, out: &mut dyn OutputSink, input: &[u8]) {
        if input.is_empty() {
            return;
        }
        let dcs_header = &mut self.dcs_header;
        self.vt.feed_with(input, |event: VTEvent| {
            handle_event(ctx, out, dcs_header, event);
        });
    }

    /// `timer_expired(context)` (spec.md §5's externally-driven "single
    /// reset-timer"): forces a full reset to ground, abandoning whatever
    /// partial sequence (string-collecting state, DCS, or byte-level
    /// capture) was in progress.
    pub fn timer_expired<S: ScreenWrite>(&mut self, ctx: &mut Context<S>) {
        if !ctx.timer_armed {
            return;
        }
        self.vt = VTPushParser::new();
        self.capture = None;
        self.dcs_header = None;
        self.pending_esc = None;
        ctx.since_ground.clear();
        ctx.flags.discard = false;
        ctx.timer_armed = false;
    }

    /// `reset(context, clear_screen?)` (spec.md §6): full parser reset,
    /// independent of (but usually paired with) [`Context::reset`].
    pub fn reset<S: ScreenWrite>(&mut self, ctx: &mut Context<S>, clear_screen: bool) {
        self.vt = VTPushParser::new();
        self.capture = None;
        self.dcs_header = None;
        self.pending_esc = None;
        ctx.reset(clear_screen);
    }

    /// `pending(context)` (spec.md §6): the bytes consumed since the
    /// parser last sat in ground state, for host-side diagnostics.
    pub fn pending<'a, S: ScreenWrite>(&self, ctx: &'a Context<S>) -> &'a [u8] {
        &ctx.since_ground
    }
}

/// Advances a byte-level capture (rename or APC) from `bytes[*pos..]`,
/// mirroring `vt_push_parser`'s own verified `OscString`/`OscEsc`
/// transition logic: a bare `ESC` holds; `ESC` followed by anything other
/// than the string terminator folds both bytes back into the payload as
/// literal data and resumes capturing, rather than aborting.
fn feed_capture<S: ScreenWrite>(ctx: &mut Context<S>, bytes: &[u8], pos: &mut usize) -> CaptureOutcome {
    let cap = ctx.options.global_input_buffer_size;
    while *pos < bytes.len() {
        let b = bytes[*pos];
        match b {
            0x18 | 0x1a => {
                *pos += 1;
                return CaptureOutcome::Cancelled;
            }
            0x1b => {
                if *pos + 1 >= bytes.len() {
                    return CaptureOutcome::Pending;
                }
                match bytes[*pos + 1] {
                    b'\\' => {
                        *pos += 2;
                        return CaptureOutcome::Done;
                    }
                    0x1b => {
                        // Run of ESCs: only the last one before a
                        // non-terminator byte matters.
                        *pos += 1;
                    }
                    other => {
                        push_bounded(&mut ctx.since_ground, &[0x1b, other], cap, &mut ctx.flags.discard);
                        *pos += 2;
                    }
                }
            }
            0x7f => {
                *pos += 1;
            }
            _ => {
                push_bounded(&mut ctx.since_ground, &bytes[*pos..*pos + 1], cap, &mut ctx.flags.discard);
                *pos += 1;
            }
        }
    }
    CaptureOutcome::Pending
}

fn dispatch_capture<S: ScreenWrite>(ctx: &mut Context<S>, kind: CaptureKind) {
    let discard = ctx.flags.discard;
    ctx.flags.discard = false;
    ctx.timer_armed = false;
    if discard {
        ctx.since_ground.clear();
        return;
    }
    let payload = std::mem::take(&mut ctx.since_ground);
    match kind {
        CaptureKind::Apc => dispatch::osc::dispatch_apc(ctx, &payload),
        CaptureKind::Rename => dispatch::osc::dispatch_rename(ctx, &payload),
    }
}

fn handle_event<S: ScreenWrite>(
    ctx: &mut Context<S>,
    out: &mut dyn OutputSink,
    dcs_header: &mut Option<DcsHeader>,
    event: VTEvent<'_>,
) {
    let cap = ctx.options.global_input_buffer_size;
    match event {
        VTEvent::Raw(bytes) => handle_raw(ctx, bytes),
        VTEvent::C0(b) => handle_c0(ctx, b),
        VTEvent::Esc(esc) => {
            ctx.flags.last = false;
            dispatch::esc::dispatch(ctx, esc.intermediates.as_ref(), esc.final_byte);
        }
        VTEvent::EscInvalid(_) => {
            ctx.flags.last = false;
            tracing::debug!("invalid escape sequence, ignored");
        }
        VTEvent::Ss2(_) | VTEvent::Ss3(_) => {
            ctx.flags.last = false;
        }
        VTEvent::Csi(csi) => {
            // REP (`b`) consumes the LAST flag itself, so it must still see
            // whatever print set; every other CSI final byte clears it first.
            let is_rep = csi.final_byte == b'b' && csi.intermediates.as_ref().is_empty() && csi.private.is_none();
            if !is_rep {
                ctx.flags.last = false;
            }
            if let Ok(params) = ParamList::split(csi.params) {
                dispatch::csi::dispatch(ctx, out, csi.private, csi.intermediates.as_ref(), &params, csi.final_byte);
            }
            if is_rep {
                ctx.flags.last = false;
            }
        }
        VTEvent::DcsStart(dcs) => {
            ctx.flags.last = false;
            ctx.since_ground.clear();
            ctx.flags.discard = false;
            ctx.timer_armed = true;
            *dcs_header = Some(DcsHeader {
                private: dcs.private,
                intermediates: dcs.intermediates,
                params: dcs.params.to_owned(),
                final_byte: dcs.final_byte,
            });
        }
        VTEvent::DcsData(data) => {
            push_bounded(&mut ctx.since_ground, data, cap, &mut ctx.flags.discard);
        }
        VTEvent::DcsEnd(data) => {
            push_bounded(&mut ctx.since_ground, data, cap, &mut ctx.flags.discard);
            ctx.timer_armed = false;
            if let Some(header) = dcs_header.take() {
                finish_dcs(ctx, out, header);
            }
        }
        VTEvent::DcsCancel => {
            *dcs_header = None;
            ctx.since_ground.clear();
            ctx.flags.discard = false;
            ctx.timer_armed = false;
        }
        VTEvent::OscStart => {
            ctx.since_ground.clear();
            ctx.flags.discard = false;
            ctx.timer_armed = true;
        }
        VTEvent::OscData(data) => {
            push_bounded(&mut ctx.since_ground, data, cap, &mut ctx.flags.discard);
        }
        VTEvent::OscEnd { data, used_bel } => {
            push_bounded(&mut ctx.since_ground, data, cap, &mut ctx.flags.discard);
            ctx.timer_armed = false;
            let terminator = if used_bel { StringTerminator::Bel } else { StringTerminator::St };
            ctx.end_kind = terminator;
            let discard = ctx.flags.discard;
            ctx.flags.discard = false;
            if !discard {
                let payload = std::mem::take(&mut ctx.since_ground);
                dispatch::osc::dispatch(ctx, out, &payload, terminator);
            } else {
                ctx.since_ground.clear();
            }
        }
        VTEvent::OscCancel => {
            ctx.since_ground.clear();
            ctx.flags.discard = false;
            ctx.timer_armed = false;
        }
    }
}

/// Finishes a DCS sequence: either as `tmux;`-prefixed passthrough (the
/// leading `t` of `"tmux;"` is consumed as the DCS header's final byte by
/// `vt_push_parser`'s own header grammar, leaving `"mux;..."` as payload)
/// or as a structured DECRQSS/DECRSPS/DECRSTS/SIXEL command.
fn finish_dcs<S: ScreenWrite>(ctx: &mut Context<S>, out: &mut dyn OutputSink, header: DcsHeader) {
    let discard = ctx.flags.discard;
    ctx.flags.discard = false;
    if discard {
        ctx.since_ground.clear();
        return;
    }
    let payload = std::mem::take(&mut ctx.since_ground);
    ctx.end_kind = StringTerminator::St;

    if header.private.is_none() && header.intermediates.is_empty() && header.final_byte == b't'
        && let Some(rest) = payload.strip_prefix(b"mux;") {
            let mut full = Vec::with_capacity(5 + rest.len());
            full.extend_from_slice(b"tmux;");
            full.extend_from_slice(rest);
            if dispatch::dcs::try_passthrough(ctx, &full) {
                return;
            }
        }

    let params = ParamList::split(header.params.borrow()).unwrap_or_default();
    dispatch::dcs::dispatch(
        ctx,
        out,
        header.private,
        header.intermediates.as_ref(),
        &params,
        header.final_byte,
        &payload,
    );
}

fn handle_raw<S: ScreenWrite>(ctx: &mut Context<S>, bytes: &[u8]) {
    for &b in bytes {
        if b < 0x80 {
            if let Some(replacement) = ctx.utf8.abandon() {
                print_char(ctx, replacement);
            }
            print_char(ctx, b as char);
        } else {
            match ctx.utf8.push(b) {
                crate::utf8::Step::More => {}
                crate::utf8::Step::Error => print_char(ctx, '\u{FFFD}'),
                crate::utf8::Step::Done { ch, .. } => print_char(ctx, ch),
            }
        }
    }
}

fn print_char<S: ScreenWrite>(ctx: &mut Context<S>, ch: char) {
    let mapped = ctx.charset.current().translate(ch);
    let cell = ctx.cell.clone();
    ctx.screen.print(mapped, &cell);
    ctx.last_printed = Some(mapped);
    ctx.flags.last = true;
}

fn handle_c0<S: ScreenWrite>(ctx: &mut Context<S>, b: u8) {
    ctx.flags.last = false;
    match b {
        0x08 => ctx.screen.cursor_left(1),
        0x09 => ctx.screen.cursor_tab_forward(1),
        0x0a..=0x0c => ctx.screen.linefeed(),
        0x0d => ctx.screen.carriage_return(),
        0x0e => ctx.charset.shift = crate::cell::ShiftState::ShiftOut,
        0x0f => ctx.charset.shift = crate::cell::ShiftState::ShiftIn,
        _ => {}
    }
}
