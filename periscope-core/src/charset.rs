//! Character-set translation tables.
//!
//! A VT terminal holds two designated sets, G0 and G1, selected into use by
//! SI/SO. Each set is one of the static single-byte tables below; incoming
//! printables are remapped through the active one. UTF-8 mode bypasses
//! translation entirely (the parser suppresses designations there as well).

use serde::{Deserialize, Serialize};

/// A designatable character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Charset {
    /// Latin-1 passthrough; the power-on G0 set.
    #[default]
    Latin1,
    /// US-ASCII (designation `B`); identity over the printable range.
    UsAscii,
    /// United Kingdom (designation `A`); `#` becomes `£`.
    Uk,
    /// DEC Special Graphics (designation `0`); line-drawing glyphs.
    DecSpecialGraphics,
    /// VAX42 console set (designation `V`); the line-drawing subset.
    Vax42,
}

/// G0/G1 slots plus the active selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharsetState {
    pub g0: Charset,
    pub g1: Charset,
    /// 0 selects G0, 1 selects G1.
    pub active: u8,
}

impl Default for CharsetState {
    fn default() -> Self {
        Self {
            g0: Charset::Latin1,
            g1: Charset::DecSpecialGraphics,
            active: 0,
        }
    }
}

impl CharsetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// SI: select G0.
    pub fn shift_in(&mut self) {
        self.active = 0;
    }

    /// SO: select G1.
    pub fn shift_out(&mut self) {
        self.active = 1;
    }

    /// Designate a table into a slot. Slots other than G0/G1 are accepted
    /// from the wire but have no storage here.
    pub fn designate(&mut self, slot: u8, code: char) {
        let Some(charset) = charset_for_designation(code) else {
            return;
        };
        match slot {
            0 => self.g0 = charset,
            1 => self.g1 = charset,
            _ => {}
        }
    }

    pub fn current(&self) -> Charset {
        if self.active == 1 {
            self.g1
        } else {
            self.g0
        }
    }

    /// Remap one printable through the active set.
    pub fn translate(&self, c: char) -> char {
        translate_char(c, self.current())
    }
}

/// Map a designation byte to its table; unknown codes are ignored.
pub fn charset_for_designation(code: char) -> Option<Charset> {
    match code {
        'B' => Some(Charset::UsAscii),
        'A' => Some(Charset::Uk),
        '0' | '2' => Some(Charset::DecSpecialGraphics),
        'V' => Some(Charset::Vax42),
        _ => None,
    }
}

/// Translate a character through a specific table.
pub fn translate_char(c: char, charset: Charset) -> char {
    match charset {
        Charset::Latin1 | Charset::UsAscii => c,
        Charset::Uk => match c {
            '#' => '£',
            _ => c,
        },
        Charset::DecSpecialGraphics => dec_special_graphics(c),
        Charset::Vax42 => vax42(c),
    }
}

/// DEC Special Graphics: ASCII 0x5F-0x7E become line-drawing and technical
/// glyphs.
fn dec_special_graphics(c: char) -> char {
    match c {
        '_' => ' ',
        '`' => '◆',
        'a' => '▒',
        'b' => '␉',
        'c' => '␌',
        'd' => '␍',
        'e' => '␊',
        'f' => '°',
        'g' => '±',
        'h' => '␤',
        'i' => '␋',
        'j' => '┘',
        'k' => '┐',
        'l' => '┌',
        'm' => '└',
        'n' => '┼',
        'o' => '⎺',
        'p' => '⎻',
        'q' => '─',
        'r' => '⎼',
        's' => '⎽',
        't' => '├',
        'u' => '┤',
        'v' => '┴',
        'w' => '┬',
        'x' => '│',
        'y' => '≤',
        'z' => '≥',
        '{' => 'π',
        '|' => '≠',
        '}' => '£',
        '~' => '·',
        _ => c,
    }
}

/// VAX console variant: the line-drawing subset of the DEC graphics table,
/// identity elsewhere.
fn vax42(c: char) -> char {
    match c {
        'j'..='x' => dec_special_graphics(c),
        _ => c,
    }
}
