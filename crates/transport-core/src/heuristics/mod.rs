//! Initial basic-feasible-solution heuristics.
//!
//! Each heuristic consumes a fresh copy of the supplier/consumer stocks and
//! fills a [`Grid`] of the same shape as the price matrix. If the result is
//! degenerate (fewer than `rows + cols - 1` basic cells), the driver
//! perturbs every stock with an epsilon and retries, mirroring the
//! original's restart-with-epsilon behavior rather than tolerating a basis
//! too small for the pivot loop to operate on.

mod min_cost;
mod north_west;
mod vogel;

use crate::epsilon::Epsilon;
use crate::grid::Grid;
use crate::participant::Participant;
use crate::table::TransportTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    NorthWest,
    MinCost,
    Vogel,
}

/// Number of times the driver will retry after perturbing stocks with
/// epsilon before giving up and returning whatever basis it last built.
/// In practice a single perturbation resolves degeneracy; the small cap
/// guards against a pathological tie the perturbation doesn't break.
const MAX_DEGENERACY_RESTARTS: usize = 4;

pub fn build(table: &mut TransportTable, mode: Mode) -> Grid {
    let rows = table.suppliers.len();
    let cols = table.consumers.len();
    let required_basic = rows + cols - 1;

    let mut grid = run_once(table, mode);
    let mut attempt = 0;
    while grid.basic_count() < required_basic && attempt < MAX_DEGENERACY_RESTARTS {
        perturb(&mut table.suppliers, &mut table.consumers);
        grid = run_once(table, mode);
        attempt += 1;
    }
    grid
}

fn run_once(table: &mut TransportTable, mode: Mode) -> Grid {
    for supplier in table.suppliers.iter_mut() {
        supplier.reset();
    }
    for consumer in table.consumers.iter_mut() {
        consumer.reset();
    }
    let mut grid = table.price_matrix.clone();
    match mode {
        Mode::NorthWest => north_west::fill(&mut grid, &mut table.suppliers, &mut table.consumers),
        Mode::MinCost => min_cost::fill(&mut grid, &mut table.suppliers, &mut table.consumers),
        Mode::Vogel => vogel::fill(&mut grid, &mut table.suppliers, &mut table.consumers),
    }
    grid
}

/// Seed a plan with the Minimum-Cost method only, with no degeneracy-escape
/// wrapper. Used by the capacitated driver (§4.I step 1), which handles
/// basis selection itself rather than requiring exactly `m + n - 1` basic
/// cells straight out of the heuristic.
pub(crate) fn seed_min_cost(table: &mut TransportTable) -> Grid {
    for supplier in table.suppliers.iter_mut() {
        supplier.reset();
    }
    for consumer in table.consumers.iter_mut() {
        consumer.reset();
    }
    let mut grid = table.price_matrix.clone();
    min_cost::fill(&mut grid, &mut table.suppliers, &mut table.consumers);
    grid
}

/// Give every supplier one extra epsilon of stock and hand the last
/// consumer enough epsilon to absorb it, preserving the epsilon balance
/// while breaking any tie that produced a degenerate basis.
///
/// Must write `real_stock.eps` as well as `stock.eps`: `run_once` resets
/// `stock` from `real_stock` before every attempt, so a perturbation that
/// only touched `stock` would be wiped out by the very reset that precedes
/// the next attempt, making every restart reproduce the same degenerate
/// basis. The original's `__epsilon_modify_table` sets both `epsilon` and
/// `real_epsilon` for exactly this reason.
fn perturb(suppliers: &mut [Participant], consumers: &mut [Participant]) {
    for supplier in suppliers.iter_mut() {
        supplier.real_stock.eps += 1;
        supplier.stock.eps += 1;
    }
    if let Some(last) = consumers.last_mut() {
        last.real_stock.eps += suppliers.len() as i64;
        last.stock.eps += suppliers.len() as i64;
    }
}

fn fill_amount(
    grid: &Grid,
    suppliers: &[Participant],
    consumers: &[Participant],
    row: usize,
    col: usize,
) -> Epsilon {
    let room = Epsilon::from_real(grid.get(row, col).room());
    suppliers[row].stock.min(consumers[col].stock).min(room)
}

fn apply_fill(
    grid: &mut Grid,
    suppliers: &mut [Participant],
    consumers: &mut [Participant],
    row: usize,
    col: usize,
    amount: Epsilon,
) {
    let cell = grid.get_mut(row, col);
    cell.amount += amount.real;
    cell.eps += amount.eps;
    suppliers[row].stock = suppliers[row].stock - amount;
    consumers[col].stock = consumers[col].stock - amount;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TransportTable;

    #[test]
    fn each_mode_exhausts_supply_and_demand() {
        for mode in [Mode::NorthWest, Mode::MinCost, Mode::Vogel] {
            let mut table = TransportTable::new(
                vec![10.0, 15.0],
                vec![12.0, 13.0],
                vec![vec![4.0, 6.0], vec![5.0, 3.0]],
                None,
            )
            .unwrap();
            let grid = build(&mut table, mode);
            let total: f64 = grid.iter().map(|(_, c)| c.amount).sum();
            assert!((total - 25.0).abs() < 1e-6, "mode {mode:?} total {total}");
        }
    }

    #[test]
    fn basis_size_matches_rows_plus_cols_minus_one() {
        let mut table = TransportTable::new(
            vec![10.0, 15.0, 5.0],
            vec![12.0, 13.0, 5.0],
            vec![
                vec![4.0, 6.0, 8.0],
                vec![5.0, 3.0, 2.0],
                vec![9.0, 1.0, 7.0],
            ],
            None,
        )
        .unwrap();
        let grid = build(&mut table, Mode::MinCost);
        assert_eq!(grid.basic_count(), 3 + 3 - 1);
    }
}
