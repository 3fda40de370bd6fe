//! Headless emulator of the DEC VT-series terminals (VT100 through VT520,
//! with xterm/linux-console extensions).
//!
//! Bytes produced by a child process go in through [`Terminal::feed`]; the
//! resulting grid of styled cells, the cursor, title and damage set are read
//! back from [`Screen`]. There is no rendering, no transport and no
//! scrollback here — just a faithful model of what the terminal would show,
//! for screen-scraping, front-end rendering or session replay.
//!
//! ```
//! use periscope::Terminal;
//!
//! let mut term = Terminal::new(80, 24);
//! term.feed(b"\x1b[1;31mhello\x1b[0m world");
//! assert_eq!(term.screen().display()[0].trim_end(), "hello world");
//! ```

mod performer;
mod terminal;

pub use periscope_core::{
    modes, Cell, Charset, CharsetState, Color, Cursor, Margins, Modes, Savepoint, Screen,
};
pub use periscope_parser::{Action, Coding, CsiAction, EscAction, OscAction, Params, Parser};
pub use terminal::{ResponseSink, Terminal};
