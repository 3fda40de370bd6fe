//! Escape-sequence parser for the periscope terminal emulator.
//!
//! The parser consumes a raw byte stream and emits typed [`Action`]s: runs of
//! printable text, C0 controls, and completed ESC / CSI / OSC sequences.
//! DCS, APC, PM and SOS strings are consumed and discarded. The parser is
//! re-entrant across arbitrary chunk boundaries and never panics on input.

mod action;
mod decode;
mod params;
mod parser;

pub use action::{Action, CsiAction, EscAction, OscAction};
pub use decode::{ByteDecoder, Coding, Decoded};
pub use params::Params;
pub use parser::{Parser, ParserState};
