//! Loop redistribution: shift the entering cell's loop by the minimal
//! leaving amount.
//!
//! The loop is signed `+, -, +, -, …` starting at the entering cell (index
//! 0 of the path returned by [`crate::cycle::find_loop`]). The leaving
//! quantity is the lexicographic (epsilon-ordered) minimum over the `-`
//! cells; adding it to every `+` cell and subtracting it from every `-`
//! cell empties exactly one `-` cell, which leaves the basis as `e` enters.

use crate::epsilon::Epsilon;
use crate::grid::Grid;

/// Apply one pivot along `loop_cells` (as returned by
/// [`crate::cycle::find_loop`]) and return the leaving quantity.
pub fn redistribute(grid: &mut Grid, loop_cells: &[(usize, usize)]) -> Epsilon {
    let minus_cells: Vec<(usize, usize)> = loop_cells
        .iter()
        .enumerate()
        .filter(|(idx, _)| idx % 2 == 1)
        .map(|(_, &cell)| cell)
        .collect();

    let leaving = minus_cells
        .iter()
        .map(|&(i, j)| grid.get(i, j).value())
        .fold(None, |acc: Option<Epsilon>, v| {
            Some(match acc {
                Some(a) if a <= v => a,
                _ => v,
            })
        })
        .expect("a loop always has at least one '-' cell");

    for (idx, &(i, j)) in loop_cells.iter().enumerate() {
        let cell = grid.get_mut(i, j);
        if idx % 2 == 0 {
            cell.amount += leaving.real;
            cell.eps += leaving.eps;
        } else {
            cell.amount -= leaving.real;
            cell.eps -= leaving.eps;
            if cell.amount.abs() < 1e-9 {
                cell.amount = 0.0;
            }
        }
    }

    leaving
}
