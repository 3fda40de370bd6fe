//! Sparse cell storage.
//!
//! The grid maps row index to a sparse row, and a row maps column index to
//! [`Cell`]. Absent entries read as the screen's default cell. Terminal
//! workloads touch few cells per line, and keeping rows keyed by index lets
//! scrolling renumber keys instead of moving cell contents.
//!
//! The grid knows nothing about margins, attributes or the default cell;
//! the screen drives it with already-resolved coordinates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

type Row = HashMap<usize, Cell>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: HashMap<usize, Row>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, y: usize, x: usize) -> Option<&Cell> {
        self.rows.get(&y).and_then(|row| row.get(&x))
    }

    pub fn put(&mut self, y: usize, x: usize, cell: Cell) {
        self.rows.entry(y).or_default().insert(x, cell);
    }

    /// Remove a cell, reverting it to the default.
    pub fn remove(&mut self, y: usize, x: usize) {
        if let Some(row) = self.rows.get_mut(&y) {
            row.remove(&x);
            if row.is_empty() {
                self.rows.remove(&y);
            }
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn clear_row(&mut self, y: usize) {
        self.rows.remove(&y);
    }

    /// Clear columns `x..` of a row.
    pub fn clear_row_from(&mut self, y: usize, x: usize) {
        if let Some(row) = self.rows.get_mut(&y) {
            row.retain(|&col, _| col < x);
            if row.is_empty() {
                self.rows.remove(&y);
            }
        }
    }

    /// Clear columns `..=x` of a row.
    pub fn clear_row_to(&mut self, y: usize, x: usize) {
        if let Some(row) = self.rows.get_mut(&y) {
            row.retain(|&col, _| col > x);
            if row.is_empty() {
                self.rows.remove(&y);
            }
        }
    }

    /// Clear every row strictly below `y`.
    pub fn clear_rows_below(&mut self, y: usize) {
        self.rows.retain(|&row_y, _| row_y <= y);
    }

    /// Clear every row strictly above `y`.
    pub fn clear_rows_above(&mut self, y: usize) {
        self.rows.retain(|&row_y, _| row_y >= y);
    }

    /// Scroll the region `top..=bottom` up one line: the top row drops out,
    /// remaining rows are renumbered, the bottom row becomes default.
    pub fn shift_rows_up(&mut self, top: usize, bottom: usize) {
        for y in top..bottom {
            match self.rows.remove(&(y + 1)) {
                Some(row) => {
                    self.rows.insert(y, row);
                }
                None => {
                    self.rows.remove(&y);
                }
            }
        }
        self.rows.remove(&bottom);
    }

    /// Scroll the region `top..=bottom` down one line.
    pub fn shift_rows_down(&mut self, top: usize, bottom: usize) {
        for y in ((top + 1)..=bottom).rev() {
            match self.rows.remove(&(y - 1)) {
                Some(row) => {
                    self.rows.insert(y, row);
                }
                None => {
                    self.rows.remove(&y);
                }
            }
        }
        self.rows.remove(&top);
    }

    /// Insert `count` default rows at `y`, pushing rows towards `bottom`;
    /// rows shifted past `bottom` are lost.
    pub fn insert_rows(&mut self, y: usize, count: usize, bottom: usize) {
        for row_y in (y..=bottom).rev() {
            match self.rows.remove(&row_y) {
                Some(row) if row_y + count <= bottom => {
                    self.rows.insert(row_y + count, row);
                }
                _ => {}
            }
        }
    }

    /// Delete `count` rows at `y`, pulling rows up from `bottom`; freed rows
    /// at the bottom of the region become default.
    pub fn delete_rows(&mut self, y: usize, count: usize, bottom: usize) {
        for row_y in y..=bottom {
            if row_y + count <= bottom {
                match self.rows.remove(&(row_y + count)) {
                    Some(row) => {
                        self.rows.insert(row_y, row);
                    }
                    None => {
                        self.rows.remove(&row_y);
                    }
                }
            } else {
                self.rows.remove(&row_y);
            }
        }
    }

    /// Insert `count` default cells at `(y, x)`, shifting the tail right;
    /// cells pushed past `columns - 1` are lost.
    pub fn insert_cells(&mut self, y: usize, x: usize, count: usize, columns: usize) {
        let Some(row) = self.rows.get_mut(&y) else {
            return;
        };
        for col in (x..columns).rev() {
            match row.remove(&col) {
                Some(cell) if col + count < columns => {
                    row.insert(col + count, cell);
                }
                _ => {}
            }
        }
        if row.is_empty() {
            self.rows.remove(&y);
        }
    }

    /// Delete `count` cells at `(y, x)`, shifting the tail left; vacated
    /// cells at the line end become default.
    pub fn delete_cells(&mut self, y: usize, x: usize, count: usize, columns: usize) {
        let Some(row) = self.rows.get_mut(&y) else {
            return;
        };
        for col in x..columns {
            if col + count < columns {
                match row.remove(&(col + count)) {
                    Some(cell) => {
                        row.insert(col, cell);
                    }
                    None => {
                        row.remove(&col);
                    }
                }
            } else {
                row.remove(&col);
            }
        }
        if row.is_empty() {
            self.rows.remove(&y);
        }
    }

    /// Drop everything outside `lines x columns`; used by resize, which
    /// keeps the top-left corner.
    pub fn truncate(&mut self, lines: usize, columns: usize) {
        self.rows.retain(|&y, _| y < lines);
        for row in self.rows.values_mut() {
            row.retain(|&x, _| x < columns);
        }
        self.rows.retain(|_, row| !row.is_empty());
    }

    pub fn for_each_cell_mut(&mut self, mut f: impl FnMut(&mut Cell)) {
        for row in self.rows.values_mut() {
            for cell in row.values_mut() {
                f(cell);
            }
        }
    }

    /// Iterate occupied cells as `(y, x, cell)`.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.rows
            .iter()
            .flat_map(|(&y, row)| row.iter().map(move |(&x, cell)| (y, x, cell)))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(data: &str) -> Cell {
        Cell::blank().with_data(data, 1)
    }

    fn grid_with_column(texts: &[&str]) -> Grid {
        let mut grid = Grid::new();
        for (y, text) in texts.iter().enumerate() {
            grid.put(y, 0, tagged(text));
        }
        grid
    }

    fn column(grid: &Grid, lines: usize) -> Vec<String> {
        (0..lines)
            .map(|y| {
                grid.cell(y, 0)
                    .map(|c| c.data.clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn shift_rows_up_renumbers() {
        let mut grid = grid_with_column(&["a", "b", "c", "d", "e"]);
        grid.shift_rows_up(0, 4);
        assert_eq!(column(&grid, 5), ["b", "c", "d", "e", ""]);
    }

    #[test]
    fn shift_rows_up_respects_region() {
        let mut grid = grid_with_column(&["a", "b", "c", "d", "e"]);
        grid.shift_rows_up(1, 3);
        assert_eq!(column(&grid, 5), ["a", "c", "d", "", "e"]);
    }

    #[test]
    fn shift_rows_down_respects_region() {
        let mut grid = grid_with_column(&["a", "b", "c", "d", "e"]);
        grid.shift_rows_down(1, 3);
        assert_eq!(column(&grid, 5), ["a", "", "b", "c", "e"]);
    }

    #[test]
    fn shift_handles_sparse_holes() {
        let mut grid = Grid::new();
        grid.put(0, 0, tagged("a"));
        grid.put(2, 0, tagged("c"));
        grid.shift_rows_up(0, 2);
        assert_eq!(column(&grid, 3), ["", "c", ""]);
    }

    #[test]
    fn insert_rows_pushes_and_drops() {
        let mut grid = grid_with_column(&["a", "b", "c", "d", "e"]);
        grid.insert_rows(1, 2, 4);
        assert_eq!(column(&grid, 5), ["a", "", "", "b", "c"]);
    }

    #[test]
    fn delete_rows_pulls_up() {
        let mut grid = grid_with_column(&["a", "b", "c", "d", "e"]);
        grid.delete_rows(1, 2, 4);
        assert_eq!(column(&grid, 5), ["a", "d", "e", "", ""]);
    }

    #[test]
    fn delete_rows_with_holes() {
        let mut grid = Grid::new();
        grid.put(0, 0, tagged("a"));
        grid.put(2, 0, tagged("c"));
        grid.delete_rows(0, 1, 2);
        assert_eq!(column(&grid, 3), ["", "c", ""]);
    }

    #[test]
    fn insert_cells_shifts_right() {
        let mut grid = Grid::new();
        for (x, text) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            grid.put(0, x, tagged(text));
        }
        grid.insert_cells(0, 2, 2, 5);

        let row: Vec<String> = (0..5)
            .map(|x| grid.cell(0, x).map(|c| c.data.clone()).unwrap_or_default())
            .collect();
        assert_eq!(row, ["a", "b", "", "", "c"]);
    }

    #[test]
    fn delete_cells_shifts_left() {
        let mut grid = Grid::new();
        for (x, text) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            grid.put(0, x, tagged(text));
        }
        grid.delete_cells(0, 1, 2, 5);

        let row: Vec<String> = (0..5)
            .map(|x| grid.cell(0, x).map(|c| c.data.clone()).unwrap_or_default())
            .collect();
        assert_eq!(row, ["a", "d", "e", "", ""]);
    }

    #[test]
    fn truncate_keeps_top_left() {
        let mut grid = Grid::new();
        grid.put(0, 0, tagged("a"));
        grid.put(0, 9, tagged("x"));
        grid.put(5, 0, tagged("y"));
        grid.truncate(3, 5);

        assert!(grid.cell(0, 0).is_some());
        assert!(grid.cell(0, 9).is_none());
        assert!(grid.cell(5, 0).is_none());
    }

    #[test]
    fn remove_prunes_empty_rows() {
        let mut grid = Grid::new();
        grid.put(1, 1, tagged("a"));
        grid.remove(1, 1);
        assert!(grid.is_empty());
    }
}
