//! Cursor state and DECSC/DECRC savepoints.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::charset::Charset;

/// The screen cursor.
///
/// `x` may transiently equal the column count after drawing in the last
/// column with autowrap enabled; the wrap is resolved by the next glyph.
/// `attrs` is a [`Cell`] prototype supplying the style for subsequent
/// writes; its `data` stays a single space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    pub attrs: Cell,
    pub hidden: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            attrs: Cell::blank(),
            hidden: false,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot pushed by DECSC and popped by DECRC: cursor, charset selection,
/// and the origin/autowrap mode bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Savepoint {
    pub cursor: Cursor,
    pub g0: Charset,
    pub g1: Charset,
    pub active: u8,
    pub origin: bool,
    pub wrap: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cursor_is_home_and_visible() {
        let cursor = Cursor::new();
        assert_eq!((cursor.x, cursor.y), (0, 0));
        assert!(!cursor.hidden);
        assert_eq!(cursor.attrs, Cell::blank());
    }
}
