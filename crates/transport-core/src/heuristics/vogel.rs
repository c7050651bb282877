//! Vogel's Approximation Method: fill the cheapest cell in whichever row or
//! column currently has the largest "penalty" (the gap between its two
//! cheapest available cells), recomputing penalties after every fill.

use super::{apply_fill, fill_amount};
use crate::grid::Grid;
use crate::participant::Participant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Row(usize),
    Col(usize),
}

pub fn fill(grid: &mut Grid, suppliers: &mut [Participant], consumers: &mut [Participant]) {
    loop {
        let active_rows: Vec<usize> = (0..suppliers.len())
            .filter(|&i| !suppliers[i].stock.is_zero())
            .collect();
        let active_cols: Vec<usize> = (0..consumers.len())
            .filter(|&j| !consumers[j].stock.is_zero())
            .collect();
        if active_rows.is_empty() || active_cols.is_empty() {
            break;
        }

        let Some(line) = max_penalty_line(grid, suppliers, consumers, &active_rows, &active_cols)
        else {
            break;
        };

        let Some((row, col)) = cheapest_in_line(grid, suppliers, consumers, line, &active_rows, &active_cols)
        else {
            break;
        };

        let amount = fill_amount(grid, suppliers, consumers, row, col);
        apply_fill(grid, suppliers, consumers, row, col, amount);
    }
}

fn is_available(suppliers: &[Participant], consumers: &[Participant], row: usize, col: usize) -> bool {
    let s = suppliers[row].stock;
    let c = consumers[col].stock;
    (s.real > 0.0 && c.real > 0.0)
        || (s.eps > 0 && c.eps > 0)
        || (s.real > 0.0 && c.eps > 0)
        || (s.eps > 0 && c.real > 0.0)
}

/// Difference between the two cheapest available prices along a line, or
/// the single available price if only one cell remains. `None` if the line
/// has no available cell left at all.
fn penalty(prices: &mut Vec<f64>) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    prices.sort_by(|a, b| a.partial_cmp(b).unwrap());
    if prices.len() == 1 {
        Some(prices[0])
    } else {
        Some(prices[1] - prices[0])
    }
}

fn row_prices(
    grid: &Grid,
    suppliers: &[Participant],
    consumers: &[Participant],
    row: usize,
    active_cols: &[usize],
) -> Vec<f64> {
    active_cols
        .iter()
        .copied()
        .filter(|&j| grid.get(row, j).room() > 0.0 && is_available(suppliers, consumers, row, j))
        .map(|j| grid.get(row, j).price)
        .collect()
}

fn col_prices(
    grid: &Grid,
    suppliers: &[Participant],
    consumers: &[Participant],
    col: usize,
    active_rows: &[usize],
) -> Vec<f64> {
    active_rows
        .iter()
        .copied()
        .filter(|&i| grid.get(i, col).room() > 0.0 && is_available(suppliers, consumers, i, col))
        .map(|i| grid.get(i, col).price)
        .collect()
}

/// The row or column with the largest penalty. Rows win ties with columns:
/// rows are scored first and a column only replaces the running best when
/// it is strictly larger.
fn max_penalty_line(
    grid: &Grid,
    suppliers: &[Participant],
    consumers: &[Participant],
    active_rows: &[usize],
    active_cols: &[usize],
) -> Option<Line> {
    let mut best: Option<(f64, Line)> = None;

    for &row in active_rows {
        let mut prices = row_prices(grid, suppliers, consumers, row, active_cols);
        if let Some(p) = penalty(&mut prices) {
            if best.map_or(true, |(b, _)| p > b) {
                best = Some((p, Line::Row(row)));
            }
        }
    }
    for &col in active_cols {
        let mut prices = col_prices(grid, suppliers, consumers, col, active_rows);
        if let Some(p) = penalty(&mut prices) {
            if best.map_or(true, |(b, _)| p > b) {
                best = Some((p, Line::Col(col)));
            }
        }
    }

    best.map(|(_, line)| line)
}

fn cheapest_in_line(
    grid: &Grid,
    suppliers: &[Participant],
    consumers: &[Participant],
    line: Line,
    active_rows: &[usize],
    active_cols: &[usize],
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    match line {
        Line::Row(row) => {
            for &col in active_cols {
                let cell = grid.get(row, col);
                if cell.room() <= 0.0 || !is_available(suppliers, consumers, row, col) {
                    continue;
                }
                if best.map_or(true, |(_, _, p)| cell.price < p) {
                    best = Some((row, col, cell.price));
                }
            }
        }
        Line::Col(col) => {
            for &row in active_rows {
                let cell = grid.get(row, col);
                if cell.room() <= 0.0 || !is_available(suppliers, consumers, row, col) {
                    continue;
                }
                if best.map_or(true, |(_, _, p)| cell.price < p) {
                    best = Some((row, col, cell.price));
                }
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::Arc;
    use crate::participant::Role;

    #[test]
    fn exhausts_all_supply_and_demand() {
        let mut grid = Grid::from_cells(vec![
            vec![Arc::new(8.0), Arc::new(8.0), Arc::new(1.0), Arc::new(2.0)],
            vec![Arc::new(4.0), Arc::new(1.0), Arc::new(9.0), Arc::new(4.0)],
            vec![Arc::new(1.0), Arc::new(4.0), Arc::new(3.0), Arc::new(5.0)],
        ]);
        let mut suppliers = vec![
            Participant::new(0, Role::Supplier, 20.0),
            Participant::new(1, Role::Supplier, 30.0),
            Participant::new(2, Role::Supplier, 25.0),
        ];
        let mut consumers = vec![
            Participant::new(0, Role::Consumer, 10.0),
            Participant::new(1, Role::Consumer, 25.0),
            Participant::new(2, Role::Consumer, 20.0),
            Participant::new(3, Role::Consumer, 20.0),
        ];
        fill(&mut grid, &mut suppliers, &mut consumers);
        let total: f64 = grid.iter().map(|(_, c)| c.amount).sum();
        assert!((total - 75.0).abs() < 1e-9);
        for s in &suppliers {
            assert!(s.stock.real.abs() < 1e-9);
        }
        for c in &consumers {
            assert!(c.stock.real.abs() < 1e-9);
        }
    }
}
