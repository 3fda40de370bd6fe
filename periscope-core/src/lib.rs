//! Screen model for the periscope terminal emulator.
//!
//! This crate holds the state a physical VT terminal would display: a grid
//! of styled cells, the cursor, tab stops, scrolling margins, charset
//! translation tables and the mode registry. It is deterministic — the same
//! sequence of operations always yields the same screen — and knows nothing
//! about bytes or escape sequences; the companion parser crate drives it
//! through typed operations.

mod cell;
mod charset;
mod color;
mod cursor;
mod grid;
pub mod modes;
mod screen;

pub use cell::Cell;
pub use charset::{charset_for_designation, translate_char, Charset, CharsetState};
pub use color::Color;
pub use cursor::{Cursor, Savepoint};
pub use grid::Grid;
pub use modes::Modes;
pub use screen::{Margins, Screen};
