//! Dense row-major grid of [`Arc`] cells.
//!
//! The distilled spec's Design Notes call numpy object arrays of Arcs "an
//! implementation accident" and recommend a dense array of Arc structs
//! instead (see DESIGN.md, `DD-ARENA`). [`Grid`] is that array; it backs
//! both the canonical price matrix (amounts always zero, only price and
//! capacity meaningful) and a working plan (the basic or optimal solution
//! in progress).

use crate::arc::Arc;

#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Vec<Arc>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, price: f64) -> Self {
        Grid {
            cells: vec![vec![Arc::new(price); cols]; rows],
        }
    }

    pub fn from_cells(cells: Vec<Vec<Arc>>) -> Self {
        Grid { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn get(&self, row: usize, col: usize) -> &Arc {
        &self.cells[row][col]
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut Arc {
        &mut self.cells[row][col]
    }

    pub fn row(&self, row: usize) -> &[Arc] {
        &self.cells[row]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [Arc] {
        &mut self.cells[row]
    }

    pub fn col(&self, col: usize) -> Vec<Arc> {
        self.cells.iter().map(|row| row[col]).collect()
    }

    /// All `(row, col)` positions whose cell is currently basic.
    pub fn basic_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (i, row) in self.cells.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                if cell.is_basic() {
                    out.push((i, j));
                }
            }
        }
        out
    }

    pub fn basic_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_basic()).count()
    }

    pub fn total_cost(&self) -> f64 {
        self.cells
            .iter()
            .flatten()
            .map(|c| c.price * c.amount)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Arc)> {
        self.cells.iter().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, cell)| ((i, j), cell))
        })
    }

    pub fn push_col(&mut self, new_col: Vec<Arc>) {
        for (row, cell) in self.cells.iter_mut().zip(new_col) {
            row.push(cell);
        }
    }

    pub fn push_row(&mut self, new_row: Vec<Arc>) {
        self.cells.push(new_row);
    }

    pub fn pop_col(&mut self) {
        for row in self.cells.iter_mut() {
            row.pop();
        }
    }

    pub fn pop_row(&mut self) {
        self.cells.pop();
    }
}
