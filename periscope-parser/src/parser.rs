//! The escape-sequence state machine.
//!
//! Loosely follows the VT500-series parser model: a ground state feeding a
//! draw-run accumulator, an escape state with buffered intermediates, a CSI
//! argument state, and string states for OSC/DCS/APC/PM/SOS payloads. The
//! machine is byte-driven and re-entrant: partial sequences survive chunk
//! boundaries. On any unexpected byte it resets to ground without
//! dispatching and picks up classification at the next byte.

use crate::action::{Action, CsiAction, EscAction, OscAction};
use crate::decode::{ByteDecoder, Coding, Decoded, REPLACEMENT};
use crate::params::Params;

/// Upper bound on buffered string payloads; exceeding it aborts the string.
const MAX_STRING_LEN: usize = 65536;
/// Upper bound on buffered intermediate bytes.
const MAX_INTERMEDIATES: usize = 4;
/// Length of the linux `ESC ] P nrrggbb` set-palette payload.
const OSC_PALETTE_LEN: u8 = 7;

/// Parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Plain text; printables accumulate into a draw run.
    Ground,
    /// After ESC.
    Escape,
    /// After ESC plus one or more intermediate bytes (charset designation,
    /// `#`, `%`).
    EscapeIntermediate,
    /// CSI argument accumulation.
    Csi,
    /// OSC payload accumulation.
    OscString,
    /// Consuming the fixed-length linux set-palette payload.
    OscPalette,
    /// Consuming an xterm `ESC ] … $ <letter>` sequence up to its final
    /// alphabetic byte.
    OscSkip,
    /// DCS payload, consumed and discarded.
    DcsString,
    /// APC payload, consumed and discarded.
    ApcString,
    /// PM payload, consumed and discarded.
    PmString,
    /// SOS payload, consumed and discarded.
    SosString,
}

/// The terminal parser.
#[derive(Debug, Clone)]
pub struct Parser {
    state: ParserState,
    decoder: ByteDecoder,
    /// Pending draw run; flushed before any non-print dispatch.
    text: String,
    params: Params,
    current: u16,
    has_current: bool,
    intermediates: Vec<u8>,
    marker: u8,
    esc_intermediates: Vec<u8>,
    osc_data: Vec<u8>,
    palette_left: u8,
    discard_len: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Ground,
            decoder: ByteDecoder::new(),
            text: String::with_capacity(128),
            params: Params::new(),
            current: 0,
            has_current: false,
            intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            marker: 0,
            esc_intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            osc_data: Vec::with_capacity(256),
            palette_left: 0,
            discard_len: 0,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Active byte-layer coding system (DOCS).
    pub fn coding(&self) -> Coding {
        self.decoder.coding()
    }

    /// Reset to ground, discarding all transient state. The coding system
    /// selected via DOCS is kept.
    pub fn reset(&mut self) {
        self.state = ParserState::Ground;
        self.decoder.reset();
        self.text.clear();
        self.clear_csi();
        self.esc_intermediates.clear();
        self.osc_data.clear();
        self.palette_left = 0;
        self.discard_len = 0;
    }

    /// Feed a chunk of bytes, invoking `callback` for each completed action.
    /// Any draw run still pending at the end of the chunk is flushed so that
    /// the screen is current after every call.
    pub fn feed<F>(&mut self, bytes: &[u8], mut callback: F)
    where
        F: FnMut(Action),
    {
        for &byte in bytes {
            self.advance(byte, &mut callback);
        }
        self.flush_text(&mut callback);
    }

    /// Feed a chunk and collect the actions into a vector.
    pub fn feed_collect(&mut self, bytes: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        self.feed(bytes, |action| actions.push(action));
        actions
    }

    fn advance<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match self.state {
            ParserState::OscString
            | ParserState::DcsString
            | ParserState::ApcString
            | ParserState::PmString
            | ParserState::SosString => return self.advance_string(byte, callback),
            ParserState::OscPalette => return self.advance_palette(byte),
            ParserState::OscSkip => return self.advance_osc_skip(byte),
            _ => {}
        }

        // C0 controls and DEL act in any non-string state without disturbing
        // an in-progress sequence (apart from ESC/CAN/SUB).
        if byte < 0x20 || byte == 0x7F {
            match byte {
                0x1B => {
                    self.flush_text(callback);
                    self.enter_escape();
                }
                0x18 | 0x1A => {
                    // CAN, SUB: abort whatever is in progress.
                    self.state = ParserState::Ground;
                }
                0x07..=0x0D => {
                    self.flush_text(callback);
                    callback(Action::Control(byte));
                }
                0x0E | 0x0F => {
                    // SO/SI switch charsets only outside UTF-8 mode.
                    if self.decoder.coding() == Coding::Latin1 {
                        self.flush_text(callback);
                        callback(Action::Control(byte));
                    }
                }
                _ => {}
            }
            return;
        }

        // 8-bit C1 introducers, unless we are inside a UTF-8 sequence where
        // these bytes are continuations.
        if (0x80..=0x9F).contains(&byte) && !self.decoder.is_pending() {
            match byte {
                0x90 => {
                    self.flush_text(callback);
                    self.enter_string(ParserState::DcsString);
                }
                0x9B => {
                    self.flush_text(callback);
                    self.enter_csi();
                }
                0x9D => {
                    self.flush_text(callback);
                    self.enter_osc();
                }
                0x9E => {
                    self.flush_text(callback);
                    self.enter_string(ParserState::PmString);
                }
                0x9F => {
                    self.flush_text(callback);
                    self.enter_string(ParserState::ApcString);
                }
                _ => {}
            }
            return;
        }

        match self.state {
            ParserState::Ground => match self.decoder.feed(byte) {
                Decoded::Char(c) => self.text.push(c),
                Decoded::Invalid => self.text.push(REPLACEMENT),
                Decoded::Pending => {}
            },
            ParserState::Escape => self.advance_escape(byte, callback),
            ParserState::EscapeIntermediate => self.advance_escape_intermediate(byte, callback),
            ParserState::Csi => self.advance_csi(byte, callback),
            _ => unreachable!("string states handled above"),
        }
    }

    fn advance_escape<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            b'[' => self.enter_csi(),
            b']' => self.enter_osc(),
            b'P' => self.enter_string(ParserState::DcsString),
            b'_' => self.enter_string(ParserState::ApcString),
            b'^' => self.enter_string(ParserState::PmString),
            b'X' => self.enter_string(ParserState::SosString),
            b'\\' => {
                // ST with no open string.
                self.state = ParserState::Ground;
            }
            b'7' => self.emit_esc(EscAction::SaveCursor, callback),
            b'8' => self.emit_esc(EscAction::RestoreCursor, callback),
            b'D' => self.emit_esc(EscAction::Index, callback),
            b'M' => self.emit_esc(EscAction::ReverseIndex, callback),
            b'E' => self.emit_esc(EscAction::NextLine, callback),
            b'H' => self.emit_esc(EscAction::SetTabStop, callback),
            b'c' => self.emit_esc(EscAction::Reset, callback),
            // Intermediates, including the charset designators ( ) * + and
            // the # / % families; the final byte arrives next.
            0x20..=0x2F => {
                self.esc_intermediates.clear();
                self.esc_intermediates.push(byte);
                self.state = ParserState::EscapeIntermediate;
            }
            0x30..=0x7E => {
                callback(Action::Esc(EscAction::Unknown(vec![byte])));
                self.state = ParserState::Ground;
            }
            _ => self.state = ParserState::Ground,
        }
    }

    fn advance_escape_intermediate<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            0x20..=0x2F => {
                if self.esc_intermediates.len() < MAX_INTERMEDIATES {
                    self.esc_intermediates.push(byte);
                } else {
                    self.state = ParserState::Ground;
                }
            }
            0x30..=0x7E => {
                self.dispatch_esc(byte, callback);
                self.state = ParserState::Ground;
            }
            _ => self.state = ParserState::Ground,
        }
    }

    fn dispatch_esc<F>(&mut self, final_byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let action = match (self.esc_intermediates.as_slice(), final_byte) {
            ([b'('], c) => self.designate(0, c),
            ([b')'], c) => self.designate(1, c),
            ([b'*'], c) => self.designate(2, c),
            ([b'+'], c) => self.designate(3, c),
            ([b'#'], b'8') => Some(EscAction::AlignmentTest),
            ([b'%'], c) => {
                match c {
                    b'G' | b'8' => self.decoder.set_coding(Coding::Utf8),
                    b'@' => self.decoder.set_coding(Coding::Latin1),
                    _ => {}
                }
                Some(EscAction::SelectCoding(c as char))
            }
            _ => {
                let mut data = self.esc_intermediates.clone();
                data.push(final_byte);
                Some(EscAction::Unknown(data))
            }
        };
        if let Some(action) = action {
            callback(Action::Esc(action));
        }
    }

    /// Charset designation consumes its argument byte even in UTF-8 mode,
    /// where its effect is suppressed.
    fn designate(&self, slot: u8, code: u8) -> Option<EscAction> {
        if self.decoder.coding() == Coding::Utf8 {
            None
        } else {
            Some(EscAction::DesignateCharset {
                slot,
                code: code as char,
            })
        }
    }

    fn enter_escape(&mut self) {
        self.state = ParserState::Escape;
        self.esc_intermediates.clear();
    }

    fn enter_csi(&mut self) {
        self.state = ParserState::Csi;
        self.clear_csi();
    }

    fn clear_csi(&mut self) {
        self.params = Params::new();
        self.current = 0;
        self.has_current = false;
        self.intermediates.clear();
        self.marker = 0;
    }

    fn advance_csi<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            b'0'..=b'9' => {
                if !self.intermediates.is_empty() {
                    return self.abort();
                }
                self.current = self
                    .current
                    .saturating_mul(10)
                    .saturating_add(u16::from(byte - b'0'));
                self.has_current = true;
            }
            b';' => {
                if !self.intermediates.is_empty() {
                    return self.abort();
                }
                self.params.push(self.current);
                self.current = 0;
                self.has_current = false;
            }
            b'?' | b'>' | b'<' | b'=' => {
                // Private markers are only valid as the very first byte.
                if self.marker != 0
                    || self.has_current
                    || !self.params.is_empty()
                    || !self.intermediates.is_empty()
                {
                    return self.abort();
                }
                self.marker = byte;
            }
            0x20..=0x2F => {
                if self.intermediates.len() < MAX_INTERMEDIATES {
                    self.intermediates.push(byte);
                } else {
                    return self.abort();
                }
            }
            0x40..=0x7E => {
                self.dispatch_csi(byte, callback);
                self.state = ParserState::Ground;
            }
            _ => return self.abort(),
        }
    }

    fn dispatch_csi<F>(&mut self, final_byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        if self.has_current || !self.params.is_empty() {
            self.params.push(self.current);
        }
        let action = CsiAction {
            params: std::mem::take(&mut self.params),
            intermediates: std::mem::take(&mut self.intermediates),
            final_byte,
            private: self.marker == b'?',
            marker: self.marker,
        };
        callback(Action::Csi(action));
    }

    fn enter_osc(&mut self) {
        self.state = ParserState::OscString;
        self.osc_data.clear();
    }

    fn enter_string(&mut self, state: ParserState) {
        self.state = state;
        self.discard_len = 0;
    }

    fn advance_string<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            0x1B => {
                // Probably the first half of ESC \ (ST): dispatch the string
                // and let the escape state swallow the backslash.
                if self.state == ParserState::OscString {
                    self.dispatch_osc(callback);
                }
                self.enter_escape();
            }
            0x07 if self.state == ParserState::OscString => {
                // BEL terminates OSC (xterm).
                self.dispatch_osc(callback);
                self.state = ParserState::Ground;
            }
            0x9C if self.decoder.coding() == Coding::Latin1 => {
                // 8-bit ST; in UTF-8 mode 0x9C can be a continuation byte.
                if self.state == ParserState::OscString {
                    self.dispatch_osc(callback);
                }
                self.state = ParserState::Ground;
            }
            0x18 | 0x1A => {
                self.osc_data.clear();
                self.state = ParserState::Ground;
            }
            _ if self.state == ParserState::OscString => {
                if self.osc_data.is_empty() && byte == b'R' {
                    // linux palette reset; self-terminating.
                    callback(Action::Osc(OscAction::ResetPalette));
                    self.state = ParserState::Ground;
                } else if self.osc_data.is_empty() && byte == b'P' {
                    // linux set-palette carries a fixed 7-byte payload and no
                    // terminator.
                    self.palette_left = OSC_PALETTE_LEN;
                    self.state = ParserState::OscPalette;
                } else if byte == b'$' {
                    self.osc_data.clear();
                    self.state = ParserState::OscSkip;
                } else if self.osc_data.len() < MAX_STRING_LEN {
                    self.osc_data.push(byte);
                } else {
                    self.osc_data.clear();
                    self.state = ParserState::Ground;
                }
            }
            _ => {
                // DCS/APC/PM/SOS payload: discarded, but bounded.
                self.discard_len += 1;
                if self.discard_len > MAX_STRING_LEN {
                    self.state = ParserState::Ground;
                }
            }
        }
    }

    fn advance_palette(&mut self, byte: u8) {
        match byte {
            0x1B => self.enter_escape(),
            0x18 | 0x1A => self.state = ParserState::Ground,
            _ => {
                self.palette_left -= 1;
                if self.palette_left == 0 {
                    self.state = ParserState::Ground;
                }
            }
        }
    }

    fn advance_osc_skip(&mut self, byte: u8) {
        match byte {
            0x1B => self.enter_escape(),
            0x18 | 0x1A => self.state = ParserState::Ground,
            _ if byte.is_ascii_alphabetic() => self.state = ParserState::Ground,
            _ => {}
        }
    }

    fn dispatch_osc<F>(&mut self, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let data = String::from_utf8_lossy(&self.osc_data).into_owned();
        self.osc_data.clear();

        let (command, payload) = match data.find(';') {
            Some(i) => (&data[..i], &data[i + 1..]),
            None => (data.as_str(), ""),
        };

        let action = match command.parse::<u16>() {
            Ok(0) => OscAction::SetIconAndTitle(payload.to_string()),
            Ok(1) => OscAction::SetIconName(payload.to_string()),
            Ok(2) => OscAction::SetTitle(payload.to_string()),
            Ok(n) => OscAction::Unknown {
                command: n,
                data: payload.to_string(),
            },
            Err(_) => OscAction::Unknown {
                command: 0,
                data,
            },
        };
        callback(Action::Osc(action));
    }

    fn emit_esc<F>(&mut self, action: EscAction, callback: &mut F)
    where
        F: FnMut(Action),
    {
        callback(Action::Esc(action));
        self.state = ParserState::Ground;
    }

    fn flush_text<F>(&mut self, callback: &mut F)
    where
        F: FnMut(Action),
    {
        if !self.text.is_empty() {
            callback(Action::Draw(std::mem::take(&mut self.text)));
        }
    }

    /// Recoverable fault: drop the sequence, consume the offending byte.
    fn abort(&mut self) {
        self.state = ParserState::Ground;
        self.clear_csi();
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
