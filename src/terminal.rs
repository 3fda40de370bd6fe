//! The terminal session: one parser driving one screen.

use periscope_core::Screen;
use periscope_parser::Parser;

use crate::performer::perform;

/// Callback receiving byte sequences the terminal generates in response to
/// queries (cursor-position reports, device attributes). Responses use the
/// two-byte `ESC [` CSI form, never 8-bit 0x9B.
pub type ResponseSink = Box<dyn FnMut(&[u8]) + Send>;

/// A headless terminal: feed bytes from the child process, read the grid.
///
/// `feed` is the sole input entry point; it runs synchronously to
/// completion, dispatching events in byte order. The session is single
/// threaded by design — wrap it in a lock if it must be shared.
pub struct Terminal {
    parser: Parser,
    screen: Screen,
    sink: Option<ResponseSink>,
}

impl Terminal {
    pub fn new(columns: usize, lines: usize) -> Self {
        Self {
            parser: Parser::new(),
            screen: Screen::new(columns, lines),
            sink: None,
        }
    }

    /// Parse a chunk of process output and apply it to the screen. Chunks
    /// may split sequences anywhere; partial state persists between calls.
    pub fn feed(&mut self, bytes: &[u8]) {
        let Self { parser, screen, .. } = self;
        parser.feed(bytes, |action| perform(screen, action));
        self.pump_responses();
    }

    /// Register the sink for terminal-generated responses. Without one,
    /// responses are discarded.
    pub fn set_response_sink(&mut self, sink: impl FnMut(&[u8]) + Send + 'static) {
        self.sink = Some(Box::new(sink));
    }

    fn pump_responses(&mut self) {
        let responses = self.screen.take_responses();
        if let Some(sink) = self.sink.as_mut() {
            for response in &responses {
                sink(response);
            }
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Resize the screen, keeping its top-left corner.
    pub fn resize(&mut self, columns: usize, lines: usize) {
        self.screen.resize(columns, lines);
    }

    /// Full reset: screen to power-on state, parser back to ground with the
    /// default UTF-8 coding restored on both sides.
    pub fn reset(&mut self) {
        self.parser = Parser::new();
        self.screen.reset();
        self.screen.select_coding('G');
    }
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("parser", &self.parser)
            .field("screen", &self.screen)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn lines(term: &Terminal) -> Vec<String> {
        term.screen()
            .display()
            .iter()
            .map(|l| l.trim_end().to_string())
            .collect()
    }

    #[test]
    fn feed_text_and_controls() {
        let mut term = Terminal::new(20, 4);
        term.feed(b"one\r\ntwo");
        assert_eq!(lines(&term), vec!["one", "two", "", ""]);
        assert_eq!(term.screen().cursor().x, 3);
    }

    #[test]
    fn feed_is_chunk_agnostic() {
        let mut whole = Terminal::new(20, 4);
        whole.feed(b"ab\x1b[1;31mcd\x1b[H!");

        let mut split = Terminal::new(20, 4);
        for chunk in [&b"ab\x1b["[..], &b"1;3"[..], &b"1mc"[..], &b"d\x1b[H!"[..]] {
            split.feed(chunk);
        }

        assert_eq!(whole.screen().display(), split.screen().display());
        assert_eq!(whole.screen().cursor(), split.screen().cursor());
    }

    #[test]
    fn responses_reach_the_sink() {
        let mut term = Terminal::new(20, 4);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        term.set_response_sink(move |bytes| sink_seen.lock().unwrap().extend_from_slice(bytes));

        term.feed(b"\x1b[6n");
        assert_eq!(seen.lock().unwrap().as_slice(), b"\x1b[1;1R");
    }

    #[test]
    fn responses_without_sink_are_discarded() {
        let mut term = Terminal::new(20, 4);
        term.feed(b"\x1b[6n");
        term.feed(b"x");
        assert!(term.screen().display()[0].starts_with('x'));
    }

    #[test]
    fn reset_matches_fresh_terminal() {
        let mut used = Terminal::new(20, 4);
        used.feed(b"garbage\x1b[2;3r\x1b]2;t\x07\x1b[1m");
        used.reset();
        used.feed(b"same input");

        let mut fresh = Terminal::new(20, 4);
        fresh.feed(b"same input");

        assert_eq!(used.screen().display(), fresh.screen().display());
        assert_eq!(used.screen().cursor(), fresh.screen().cursor());
        assert_eq!(used.screen().title(), fresh.screen().title());
    }
}
