//! Cell colours.
//!
//! Supports the default colour, the 256-entry indexed palette (0-15 named,
//! 16-231 colour cube, 232-255 grayscale) and 24-bit RGB.

use serde::{Deserialize, Serialize};

/// A foreground or background colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    /// The terminal's default foreground or background.
    #[default]
    Default,
    /// Palette index: 0-7 named, 8-15 bright, 16-231 cube, 232-255 grayscale.
    Indexed(u8),
    /// 24-bit colour.
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    pub const BLACK: u8 = 0;
    pub const RED: u8 = 1;
    pub const GREEN: u8 = 2;
    pub const YELLOW: u8 = 3;
    pub const BLUE: u8 = 4;
    pub const MAGENTA: u8 = 5;
    pub const CYAN: u8 = 6;
    pub const WHITE: u8 = 7;

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Resolve an indexed colour against the standard xterm palette. The
    /// default colour resolves to white; embedders with themes should match
    /// on the variant instead.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Default => (255, 255, 255),
            Color::Indexed(i) => index_to_rgb(i),
            Color::Rgb { r, g, b } => (r, g, b),
        }
    }
}

fn index_to_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0 => (0x00, 0x00, 0x00),
        1 => (0xcd, 0x00, 0x00),
        2 => (0x00, 0xcd, 0x00),
        3 => (0xcd, 0xcd, 0x00),
        4 => (0x00, 0x00, 0xee),
        5 => (0xcd, 0x00, 0xcd),
        6 => (0x00, 0xcd, 0xcd),
        7 => (0xe5, 0xe5, 0xe5),
        8 => (0x7f, 0x7f, 0x7f),
        9 => (0xff, 0x00, 0x00),
        10 => (0x00, 0xff, 0x00),
        11 => (0xff, 0xff, 0x00),
        12 => (0x5c, 0x5c, 0xff),
        13 => (0xff, 0x00, 0xff),
        14 => (0x00, 0xff, 0xff),
        15 => (0xff, 0xff, 0xff),
        16..=231 => {
            let i = index - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            (level(i / 36), level((i % 36) / 6), level(i % 6))
        }
        232..=255 => {
            let gray = 8 + (index - 232) * 10;
            (gray, gray, gray)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors() {
        assert_eq!(Color::Indexed(Color::RED).to_rgb(), (0xcd, 0, 0));
        assert_eq!(Color::Indexed(7).to_rgb(), (0xe5, 0xe5, 0xe5));
        assert_eq!(Color::Indexed(15).to_rgb(), (255, 255, 255));
    }

    #[test]
    fn color_cube() {
        assert_eq!(Color::Indexed(16).to_rgb(), (0, 0, 0));
        assert_eq!(Color::Indexed(196).to_rgb(), (255, 0, 0));
        assert_eq!(Color::Indexed(231).to_rgb(), (255, 255, 255));
    }

    #[test]
    fn grayscale_ramp() {
        assert_eq!(Color::Indexed(232).to_rgb(), (8, 8, 8));
        assert_eq!(Color::Indexed(255).to_rgb(), (238, 238, 238));
    }

    #[test]
    fn rgb_passthrough() {
        assert_eq!(Color::rgb(1, 2, 3).to_rgb(), (1, 2, 3));
    }
}
