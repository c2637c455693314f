use super::Margins;
use crate::rect::Rect;

/// A fixed grid of equally sized cells placed inside a page's margins.
///
/// Cell sizes are the printable area floor-divided by the column and row counts;
/// any remainder is left as extra whitespace on the right and bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Top-left corner of the first cell
    pub origin: (u32, u32),
}

/// A cell's position within the grid and on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub column: u32,
    pub rect: Rect,
}

impl GridLayout {
    pub fn new(page: (u32, u32), margins: Margins, columns: u32, rows: u32) -> GridLayout {
        let columns = columns.max(1);
        let rows = rows.max(1);
        GridLayout {
            columns,
            rows,
            cell_width: margins.inner_width(page.0) / columns,
            cell_height: margins.inner_height(page.1) / rows,
            origin: (margins.left, margins.top),
        }
    }

    /// Number of cells on one page
    pub fn capacity(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// The cell at a given row and column
    pub fn cell_at(&self, row: u32, column: u32) -> Cell {
        Cell {
            row,
            column,
            rect: Rect::from_origin(
                self.origin.0 + column * self.cell_width,
                self.origin.1 + row * self.cell_height,
                self.cell_width,
                self.cell_height,
            ),
        }
    }

    /// The cell holding the `index`th entry of a page, filled row by row. Returns [None]
    /// if the page has no such cell.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        if index >= self.capacity() {
            return None;
        }
        let index = index as u32;
        Some(self.cell_at(index / self.columns, index % self.columns))
    }
}
