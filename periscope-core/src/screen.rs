//! The terminal screen.
//!
//! Owns the grid and implements every operation the parser can dispatch:
//! drawing with autowrap, the cursor family, erasure, line and character
//! insertion/deletion, scrolling regions, tab stops, charset selection,
//! mode set/reset, SGR, and device reports. Consumers read the grid through
//! [`Screen::display`] and [`Screen::row_cells`], and may use the dirty-row
//! set for minimal redraws.

use std::collections::BTreeSet;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::cell::Cell;
use crate::charset::CharsetState;
use crate::color::Color;
use crate::cursor::{Cursor, Savepoint};
use crate::grid::Grid;
use crate::modes::{self, Modes};

/// Vertical scrolling region; both rows are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Margins {
    pub top: usize,
    pub bottom: usize,
}

/// Maximum stored title/icon-name length.
const MAX_TITLE_LEN: usize = 4096;

/// The complete terminal screen state.
#[derive(Debug, Clone)]
pub struct Screen {
    columns: usize,
    lines: usize,
    grid: Grid,
    cursor: Cursor,
    savepoints: Vec<Savepoint>,
    margins: Option<Margins>,
    mode: Modes,
    tabstops: BTreeSet<usize>,
    charsets: CharsetState,
    /// Byte-layer coding selected via DOCS; true disables charset
    /// translation entirely.
    use_utf8: bool,
    title: String,
    icon_name: String,
    /// Rows changed since the consumer last cleared the set.
    dirty: BTreeSet<usize>,
    /// Column count in force before DECCOLM was last set.
    saved_columns: Option<usize>,
    /// Queued device reports, drained by the session.
    responses: Vec<Vec<u8>>,
}

impl Screen {
    /// Create a screen of `columns x lines`. Zero dimensions are a
    /// programmer error, not a stream error.
    pub fn new(columns: usize, lines: usize) -> Self {
        assert!(columns > 0 && lines > 0, "screen dimensions must be positive");
        let mut dirty = BTreeSet::new();
        dirty.extend(0..lines);
        Self {
            columns,
            lines,
            grid: Grid::new(),
            cursor: Cursor::new(),
            savepoints: Vec::new(),
            margins: None,
            mode: Modes::new(),
            tabstops: default_tabstops(columns),
            charsets: CharsetState::new(),
            use_utf8: true,
            title: String::new(),
            icon_name: String::new(),
            dirty,
            saved_columns: None,
            responses: Vec::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn margins(&self) -> Option<Margins> {
        self.margins
    }

    pub fn mode(&self) -> &Modes {
        &self.mode
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    pub fn charsets(&self) -> &CharsetState {
        &self.charsets
    }

    /// Rows touched since the last [`Screen::clear_dirty`].
    pub fn dirty(&self) -> &BTreeSet<usize> {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Drain queued device reports.
    pub fn take_responses(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.responses)
    }

    /// An empty cell with default colours, reverse-videoed under DECSCNM.
    pub fn default_cell(&self) -> Cell {
        let mut cell = Cell::blank();
        cell.reverse = self.mode.contains(modes::DECSCNM);
        cell
    }

    /// The underlying sparse grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The cell at `(y, x)`; absent grid entries read as the default cell.
    pub fn cell(&self, y: usize, x: usize) -> Cell {
        self.grid
            .cell(y, x)
            .cloned()
            .unwrap_or_else(|| self.default_cell())
    }

    /// Screen lines as strings; a double-width glyph contributes one string
    /// spanning two columns.
    pub fn display(&self) -> Vec<String> {
        (0..self.lines).map(|y| self.render_row(y)).collect()
    }

    fn render_row(&self, y: usize) -> String {
        let mut line = String::with_capacity(self.columns);
        let mut covered = false;
        for x in 0..self.columns {
            if covered {
                covered = false;
                continue;
            }
            match self.grid.cell(y, x) {
                Some(cell) => {
                    if cell.data.is_empty() {
                        line.push(' ');
                    } else {
                        line.push_str(&cell.data);
                    }
                    covered = cell.width == 2;
                }
                None => line.push(' '),
            }
        }
        line
    }

    /// Per-column strings for one row. A wide glyph yields its cluster
    /// followed by an empty string for the column it covers.
    pub fn row_cells(&self, y: usize) -> Vec<String> {
        let mut out = Vec::with_capacity(self.columns);
        let mut covered = false;
        for x in 0..self.columns {
            if covered {
                covered = false;
                out.push(String::new());
                continue;
            }
            match self.grid.cell(y, x) {
                Some(cell) => {
                    covered = cell.width == 2;
                    out.push(cell.data.clone());
                }
                None => out.push(" ".to_string()),
            }
        }
        out
    }

    fn extents(&self) -> (usize, usize) {
        match self.margins {
            Some(m) => (m.top, m.bottom),
            None => (0, self.lines - 1),
        }
    }

    fn mark_dirty(&mut self, from: usize, to_inclusive: usize) {
        self.dirty.extend(from..=to_inclusive);
    }

    fn respond(&mut self, data: String) {
        self.responses.push(data.into_bytes());
    }

    // ----- drawing ------------------------------------------------------

    /// Display decoded text at the cursor, advancing it per glyph width.
    /// This is the hot path; the parser hands over maximal printable runs.
    pub fn draw(&mut self, input: &str) {
        for cluster in input.graphemes(true) {
            let mut buf = [0u8; 4];
            let data: &str = if self.use_utf8 {
                cluster
            } else {
                let mut chars = cluster.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        let translated = self.charsets.translate(c);
                        if translated == c {
                            cluster
                        } else {
                            translated.encode_utf8(&mut buf)
                        }
                    }
                    _ => cluster,
                }
            };

            let width = data.width().min(2);

            // Zero-width continuations (combining marks, variation
            // selectors) join the previous cell, as does either half of a
            // ZWJ join that a chunk boundary split apart.
            if width == 0 || data.starts_with('\u{200d}') || self.previous_ends_with_joiner() {
                self.combine_with_previous(data);
                continue;
            }

            if self.cursor.x + width > self.columns {
                if self.mode.contains(modes::DECAWM) {
                    self.dirty.insert(self.cursor.y);
                    self.carriage_return();
                    self.linefeed();
                } else {
                    self.cursor.x = self.columns.saturating_sub(width);
                }
            }

            if self.mode.contains(modes::IRM) {
                self.insert_characters(width);
            }

            let cell = self.cursor.attrs.with_data(data, width as u8);
            self.grid.put(self.cursor.y, self.cursor.x, cell);
            if width == 2 && self.cursor.x + 1 < self.columns {
                self.grid
                    .put(self.cursor.y, self.cursor.x + 1, self.cursor.attrs.stub());
            }

            self.cursor.x += width;
            if self.cursor.x >= self.columns {
                // The past-right-edge sentinel defers the wrap decision to
                // the next glyph; without autowrap the cursor just sticks.
                self.cursor.x = if self.mode.contains(modes::DECAWM) {
                    self.columns
                } else {
                    self.columns - 1
                };
            }
            self.dirty.insert(self.cursor.y);
        }
    }

    /// Cell immediately left of the cursor, stepping over a wide glyph's
    /// stub; the last cell of the previous row when at column 0.
    fn left_cell_position(&self) -> Option<(usize, usize)> {
        let (y, mut x) = if self.cursor.x > 0 {
            (self.cursor.y, self.cursor.x.min(self.columns) - 1)
        } else if self.cursor.y > 0 {
            (self.cursor.y - 1, self.columns - 1)
        } else {
            return None;
        };
        if x > 0 && self.grid.cell(y, x).is_some_and(Cell::is_stub) {
            x -= 1;
        }
        Some((y, x))
    }

    fn previous_ends_with_joiner(&self) -> bool {
        self.left_cell_position()
            .and_then(|(y, x)| self.grid.cell(y, x))
            .is_some_and(|cell| cell.data.ends_with('\u{200d}'))
    }

    fn combine_with_previous(&mut self, tail: &str) {
        let Some((y, x)) = self.left_cell_position() else {
            return;
        };
        let mut cell = self.cell(y, x);
        cell.append_cluster(tail);
        self.grid.put(y, x, cell);
        self.dirty.insert(y);
    }

    // ----- cursor -------------------------------------------------------

    pub fn carriage_return(&mut self) {
        self.cursor.x = 0;
    }

    /// Move down one line; at the bottom of the scrolling region the region
    /// scrolls up instead.
    pub fn index(&mut self) {
        let (top, bottom) = self.extents();
        if self.cursor.y == bottom {
            self.grid.shift_rows_up(top, bottom);
            self.mark_dirty(top, bottom);
        } else {
            self.cursor_down(1);
        }
    }

    /// Move up one line; at the top of the scrolling region the region
    /// scrolls down instead.
    pub fn reverse_index(&mut self) {
        let (top, bottom) = self.extents();
        if self.cursor.y == top {
            self.grid.shift_rows_down(top, bottom);
            self.mark_dirty(top, bottom);
        } else {
            self.cursor_up(1);
        }
    }

    /// Index, plus a carriage return when LNM is set.
    pub fn linefeed(&mut self) {
        self.index();
        if self.mode.contains(modes::LNM) {
            self.carriage_return();
        }
    }

    pub fn backspace(&mut self) {
        self.cursor_back(1);
    }

    /// Advance to the next tab stop, or the last column when none remain.
    pub fn tab(&mut self) {
        let next = self
            .tabstops
            .range(self.cursor.x + 1..)
            .next()
            .copied()
            .unwrap_or(self.columns - 1);
        self.cursor.x = next.min(self.columns - 1);
    }

    /// Vertical motion clamps to the scrolling region only when the cursor
    /// is already inside it; outside, it clamps to the screen.
    pub fn cursor_up(&mut self, count: usize) {
        let (top, _) = self.extents();
        let floor = if self.cursor.y >= top { top } else { 0 };
        self.cursor.y = self.cursor.y.saturating_sub(count.max(1)).max(floor);
    }

    pub fn cursor_down(&mut self, count: usize) {
        let (_, bottom) = self.extents();
        let ceiling = if self.cursor.y <= bottom {
            bottom
        } else {
            self.lines - 1
        };
        self.cursor.y = (self.cursor.y + count.max(1)).min(ceiling);
    }

    pub fn cursor_up1(&mut self, count: usize) {
        self.cursor_up(count);
        self.carriage_return();
    }

    pub fn cursor_down1(&mut self, count: usize) {
        self.cursor_down(count);
        self.carriage_return();
    }

    /// Move left. A cursor parked past the right edge first collapses onto
    /// the last column, then moves.
    pub fn cursor_back(&mut self, count: usize) {
        if self.cursor.x == self.columns {
            self.cursor.x -= 1;
        }
        self.cursor.x = self.cursor.x.saturating_sub(count.max(1));
    }

    pub fn cursor_forward(&mut self, count: usize) {
        self.cursor.x = (self.cursor.x + count.max(1)).min(self.columns - 1);
    }

    /// CUP/HVP. Arguments are 1-based; 0 means 1. Under DECOM the line is
    /// region-relative and the cursor may not leave the region.
    pub fn cursor_position(&mut self, line: usize, column: usize) {
        let mut y = line.max(1) - 1;
        let x = column.max(1) - 1;

        if self.mode.contains(modes::DECOM) {
            if let Some(m) = self.margins {
                y += m.top;
                if y > m.bottom {
                    return;
                }
            }
        }

        self.cursor.x = x.min(self.columns - 1);
        self.cursor.y = y.min(self.lines - 1);
    }

    /// CHA/HPA: 1-based column in the current line.
    pub fn cursor_to_column(&mut self, column: usize) {
        self.cursor.x = (column.max(1) - 1).min(self.columns - 1);
    }

    /// VPA: 1-based line in the current column, region-relative under DECOM.
    pub fn cursor_to_line(&mut self, line: usize) {
        let y = line.max(1) - 1;
        if self.mode.contains(modes::DECOM) {
            let (top, bottom) = self.extents();
            self.cursor.y = (y + top).clamp(top, bottom);
        } else {
            self.cursor.y = y.min(self.lines - 1);
        }
    }

    // ----- savepoints ---------------------------------------------------

    /// DECSC: push cursor, charset selection, DECOM and DECAWM.
    pub fn save_cursor(&mut self) {
        self.savepoints.push(Savepoint {
            cursor: self.cursor.clone(),
            g0: self.charsets.g0,
            g1: self.charsets.g1,
            active: self.charsets.active,
            origin: self.mode.contains(modes::DECOM),
            wrap: self.mode.contains(modes::DECAWM),
        });
    }

    /// DECRC: pop the newest savepoint; with none saved, home the cursor
    /// and reset origin mode.
    pub fn restore_cursor(&mut self) {
        match self.savepoints.pop() {
            Some(savepoint) => {
                self.charsets.g0 = savepoint.g0;
                self.charsets.g1 = savepoint.g1;
                self.charsets.active = savepoint.active;
                if savepoint.origin {
                    self.mode.insert(modes::DECOM);
                }
                if savepoint.wrap {
                    self.mode.insert(modes::DECAWM);
                }
                self.cursor = savepoint.cursor;
                self.cursor.x = self.cursor.x.min(self.columns - 1);
                let (top, bottom) = self.extents();
                self.cursor.y = self.cursor.y.clamp(top, bottom);
            }
            None => {
                self.reset_mode(&[6], true);
                self.cursor_position(1, 1);
            }
        }
    }

    // ----- erasure, insertion, deletion ---------------------------------

    /// IL: insert blank lines at the cursor row, pushing lines towards the
    /// bottom margin. A cursor outside the region makes this a no-op.
    pub fn insert_lines(&mut self, count: usize) {
        let (top, bottom) = self.extents();
        if self.cursor.y >= top && self.cursor.y <= bottom {
            self.grid.insert_rows(self.cursor.y, count.max(1), bottom);
            self.mark_dirty(self.cursor.y, self.lines - 1);
            self.carriage_return();
        }
    }

    /// DL: delete lines at the cursor row, pulling lines up from the bottom
    /// margin.
    pub fn delete_lines(&mut self, count: usize) {
        let (top, bottom) = self.extents();
        if self.cursor.y >= top && self.cursor.y <= bottom {
            self.grid.delete_rows(self.cursor.y, count.max(1), bottom);
            self.mark_dirty(self.cursor.y, self.lines - 1);
            self.carriage_return();
        }
    }

    /// ICH: shift the line tail right; the count is clamped to the room
    /// left of the margin.
    pub fn insert_characters(&mut self, count: usize) {
        let x = self.cursor.x.min(self.columns - 1);
        let count = count.max(1).min(self.columns - x);
        self.grid.insert_cells(self.cursor.y, x, count, self.columns);
        self.dirty.insert(self.cursor.y);
    }

    /// DCH: shift the line tail left.
    pub fn delete_characters(&mut self, count: usize) {
        let x = self.cursor.x.min(self.columns - 1);
        let count = count.max(1).min(self.columns - x);
        self.grid.delete_cells(self.cursor.y, x, count, self.columns);
        self.dirty.insert(self.cursor.y);
    }

    /// ECH: blank cells in place; the cursor stays put.
    pub fn erase_characters(&mut self, count: usize) {
        let x = self.cursor.x.min(self.columns - 1);
        let end = (x + count.max(1)).min(self.columns);
        for col in x..end {
            self.grid.remove(self.cursor.y, col);
        }
        self.dirty.insert(self.cursor.y);
    }

    /// EL: erase within the current line. 0 = cursor to end, 1 = start to
    /// cursor, 2 = whole line.
    pub fn erase_in_line(&mut self, how: usize) {
        let y = self.cursor.y;
        let x = self.cursor.x.min(self.columns - 1);
        match how {
            0 => self.grid.clear_row_from(y, x),
            1 => self.grid.clear_row_to(y, x),
            2 => self.grid.clear_row(y),
            _ => return,
        }
        self.dirty.insert(y);
    }

    /// ED: erase within the display. 0 = cursor to end, 1 = start to
    /// cursor, 2 = everything; 3 additionally covers scrollback, which this
    /// core does not keep, so it behaves as 2.
    pub fn erase_in_display(&mut self, how: usize) {
        match how {
            0 => {
                self.grid.clear_rows_below(self.cursor.y);
                self.erase_in_line(0);
                self.mark_dirty(self.cursor.y, self.lines - 1);
            }
            1 => {
                self.grid.clear_rows_above(self.cursor.y);
                self.erase_in_line(1);
                self.mark_dirty(0, self.cursor.y);
            }
            2 | 3 => {
                self.grid.clear();
                self.mark_dirty(0, self.lines - 1);
            }
            _ => {}
        }
    }

    // ----- scrolling and margins ----------------------------------------

    /// SU: scroll the region up without moving the cursor.
    pub fn scroll_up(&mut self, count: usize) {
        let (top, bottom) = self.extents();
        for _ in 0..count.max(1).min(bottom - top + 1) {
            self.grid.shift_rows_up(top, bottom);
        }
        self.mark_dirty(top, bottom);
    }

    /// SD: scroll the region down without moving the cursor.
    pub fn scroll_down(&mut self, count: usize) {
        let (top, bottom) = self.extents();
        for _ in 0..count.max(1).min(bottom - top + 1) {
            self.grid.shift_rows_down(top, bottom);
        }
        self.mark_dirty(top, bottom);
    }

    /// DECSTBM. Arguments are 1-based; 0 selects the current value, and a
    /// request with both arguments absent resets the margins. A region
    /// narrower than two lines is ignored. Setting margins homes the
    /// cursor.
    pub fn set_margins(&mut self, top: usize, bottom: usize) {
        if top == 0 && bottom == 0 {
            self.margins = None;
            return;
        }
        let current = self.margins.unwrap_or(Margins {
            top: 0,
            bottom: self.lines - 1,
        });
        let top = if top == 0 {
            current.top
        } else {
            (top - 1).min(self.lines - 1)
        };
        let bottom = if bottom == 0 {
            current.bottom
        } else {
            (bottom - 1).min(self.lines - 1)
        };

        if bottom > top {
            self.margins = Some(Margins { top, bottom });
            self.cursor_position(1, 1);
        }
    }

    // ----- tabs ---------------------------------------------------------

    /// HTS: set a tab stop at the cursor column.
    pub fn set_tab_stop(&mut self) {
        self.tabstops.insert(self.cursor.x.min(self.columns - 1));
    }

    /// TBC: 0 clears the stop at the cursor column, 3 clears them all.
    pub fn clear_tab_stop(&mut self, how: usize) {
        match how {
            0 => {
                self.tabstops.remove(&self.cursor.x);
            }
            3 => self.tabstops.clear(),
            _ => {}
        }
    }

    // ----- charsets and coding ------------------------------------------

    /// SI: select G0.
    pub fn shift_in(&mut self) {
        self.charsets.shift_in();
    }

    /// SO: select G1.
    pub fn shift_out(&mut self) {
        self.charsets.shift_out();
    }

    pub fn define_charset(&mut self, slot: u8, code: char) {
        self.charsets.designate(slot, code);
    }

    /// DOCS: `@` selects the single-byte fallback, `G`/`8` select UTF-8,
    /// which disables charset translation entirely.
    pub fn select_coding(&mut self, code: char) {
        match code {
            '@' => self.use_utf8 = false,
            'G' | '8' => self.use_utf8 = true,
            _ => log::debug!("ignoring unknown coding system {:?}", code),
        }
    }

    // ----- modes --------------------------------------------------------

    /// SM / DECSET.
    pub fn set_mode(&mut self, params: &[u16], private: bool) {
        for &param in params {
            self.mode.insert(Modes::encode(u32::from(param), private));
        }
        if !private {
            return;
        }
        for &param in params {
            match param {
                3 => {
                    // DECCOLM: remember the width, go to 132 columns, clear.
                    self.saved_columns = Some(self.columns);
                    self.resize(132, self.lines);
                    self.margins = None;
                    self.erase_in_display(2);
                    self.cursor_position(1, 1);
                }
                5 => {
                    // DECSCNM applies to cells already on screen as well.
                    self.grid.for_each_cell_mut(|cell| cell.reverse = true);
                    self.cursor.attrs.reverse = true;
                    self.mark_dirty(0, self.lines - 1);
                }
                6 => self.cursor_position(1, 1),
                25 => self.cursor.hidden = false,
                _ => {}
            }
        }
    }

    /// RM / DECRST.
    pub fn reset_mode(&mut self, params: &[u16], private: bool) {
        for &param in params {
            self.mode.remove(Modes::encode(u32::from(param), private));
        }
        if !private {
            return;
        }
        for &param in params {
            match param {
                3 => {
                    if self.columns == 132 {
                        if let Some(saved) = self.saved_columns.take() {
                            self.resize(saved, self.lines);
                        }
                    }
                    self.margins = None;
                    self.erase_in_display(2);
                    self.cursor_position(1, 1);
                }
                5 => {
                    self.grid.for_each_cell_mut(|cell| cell.reverse = false);
                    self.cursor.attrs.reverse = false;
                    self.mark_dirty(0, self.lines - 1);
                }
                6 => self.cursor_position(1, 1),
                25 => self.cursor.hidden = true,
                _ => {}
            }
        }
    }

    // ----- SGR ----------------------------------------------------------

    /// Select graphic rendition. Updates apply to the cursor's pending
    /// attributes only, never to cells already drawn. A `0` resets when it
    /// is alone or the final parameter; mixed in elsewhere it is dropped.
    pub fn select_graphic_rendition(&mut self, params: &[u16]) {
        if params.is_empty() || params.iter().all(|&p| p == 0) {
            self.cursor.attrs = self.default_cell();
            return;
        }

        let last = params.len() - 1;
        let mut i = 0;
        while i < params.len() {
            let param = params[i];
            match param {
                0 => {
                    if i == last {
                        self.cursor.attrs = self.default_cell();
                    }
                }
                1 => self.cursor.attrs.bold = true,
                3 => self.cursor.attrs.italics = true,
                4 => self.cursor.attrs.underscore = true,
                5 => self.cursor.attrs.blink = true,
                7 => self.cursor.attrs.reverse = true,
                9 => self.cursor.attrs.strikethrough = true,
                21 | 22 => self.cursor.attrs.bold = false,
                23 => self.cursor.attrs.italics = false,
                24 => self.cursor.attrs.underscore = false,
                25 => self.cursor.attrs.blink = false,
                27 => self.cursor.attrs.reverse = false,
                29 => self.cursor.attrs.strikethrough = false,
                30..=37 => self.cursor.attrs.fg = Color::Indexed((param - 30) as u8),
                39 => self.cursor.attrs.fg = Color::Default,
                40..=47 => self.cursor.attrs.bg = Color::Indexed((param - 40) as u8),
                49 => self.cursor.attrs.bg = Color::Default,
                90..=97 => self.cursor.attrs.fg = Color::Indexed((param - 90 + 8) as u8),
                100..=107 => self.cursor.attrs.bg = Color::Indexed((param - 100 + 8) as u8),
                38 | 48 => {
                    let (color, consumed) = parse_extended_color(&params[i..]);
                    if let Some(color) = color {
                        if param == 38 {
                            self.cursor.attrs.fg = color;
                        } else {
                            self.cursor.attrs.bg = color;
                        }
                    }
                    i += consumed;
                    continue;
                }
                _ => log::trace!("ignoring SGR parameter {}", param),
            }
            i += 1;
        }
    }

    // ----- reports ------------------------------------------------------

    /// Primary DA. A private-marker request is ignored outright; answering
    /// it is what sends full-screen editors into a response loop.
    pub fn report_device_attributes(&mut self, param: usize, private: bool) {
        if private {
            log::debug!("ignoring private device-attributes request");
            return;
        }
        if param == 0 {
            self.respond("\x1b[?6c".to_string());
        }
    }

    /// DSR: 5 answers "OK", 6 answers the cursor position, honouring DECOM.
    pub fn report_device_status(&mut self, param: usize) {
        match param {
            5 => self.respond("\x1b[0n".to_string()),
            6 => {
                let mut line = self.cursor.y + 1;
                if self.mode.contains(modes::DECOM) {
                    if let Some(m) = self.margins {
                        line = line.saturating_sub(m.top);
                    }
                }
                let column = self.cursor.x + 1;
                self.respond(format!("\x1b[{};{}R", line, column));
            }
            _ => {}
        }
    }

    // ----- titles -------------------------------------------------------

    pub fn set_title(&mut self, title: &str) {
        self.title = title.chars().take(MAX_TITLE_LEN).collect();
    }

    pub fn set_icon_name(&mut self, icon_name: &str) {
        self.icon_name = icon_name.chars().take(MAX_TITLE_LEN).collect();
    }

    // ----- whole-screen operations --------------------------------------

    /// DECALN: fill the screen with `E` for alignment checks.
    pub fn alignment_display(&mut self) {
        for y in 0..self.lines {
            for x in 0..self.columns {
                let mut cell = self.cell(y, x);
                cell.data = "E".to_string();
                cell.width = 1;
                self.grid.put(y, x, cell);
            }
        }
        self.mark_dirty(0, self.lines - 1);
    }

    /// Resize, keeping the top-left corner intact. Growth pads with default
    /// cells; shrinking truncates bottom rows and right columns. Margins
    /// are reset, the cursor is clamped, and identical dimensions are a
    /// no-op.
    pub fn resize(&mut self, columns: usize, lines: usize) {
        assert!(columns > 0 && lines > 0, "screen dimensions must be positive");
        if columns == self.columns && lines == self.lines {
            return;
        }
        self.grid.truncate(lines, columns);
        self.columns = columns;
        self.lines = lines;
        self.margins = None;
        self.cursor.x = self.cursor.x.min(columns - 1);
        self.cursor.y = self.cursor.y.min(lines - 1);
        self.dirty.extend(0..lines);
    }

    /// RIS: back to the power-on state, keeping only the dimensions and the
    /// origin-mode bit.
    pub fn reset(&mut self) {
        let origin = self.mode.contains(modes::DECOM);
        self.grid.clear();
        self.cursor = Cursor::new();
        self.savepoints.clear();
        self.margins = None;
        self.mode.reset();
        if origin {
            self.mode.insert(modes::DECOM);
        }
        self.tabstops = default_tabstops(self.columns);
        self.charsets.reset();
        self.title.clear();
        self.icon_name.clear();
        self.saved_columns = None;
        self.responses.clear();
        self.dirty.extend(0..self.lines);
    }
}

fn default_tabstops(columns: usize) -> BTreeSet<usize> {
    (8..columns).step_by(8).collect()
}

/// Decode `38;5;n` / `38;2;r;g;b` starting at the introducer. Returns the
/// colour (None when malformed or out of range) and how many parameters the
/// form occupies, so the caller can resume after it.
fn parse_extended_color(params: &[u16]) -> (Option<Color>, usize) {
    match params.get(1).copied() {
        Some(5) => match params.get(2).copied() {
            Some(index) if index <= 255 => (Some(Color::Indexed(index as u8)), 3),
            Some(_) => (None, 3),
            None => (None, 2),
        },
        Some(2) => {
            if params.len() < 5 {
                return (None, params.len());
            }
            let (r, g, b) = (params[2], params[3], params[4]);
            if r <= 255 && g <= 255 && b <= 255 {
                (
                    Some(Color::Rgb {
                        r: r as u8,
                        g: g as u8,
                        b: b as u8,
                    }),
                    5,
                )
            } else {
                (None, 5)
            }
        }
        Some(_) => (None, 2),
        None => (None, 1),
    }
}
