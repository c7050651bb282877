//! Acyclic basis sampling, extend/collapse of the dummy row and column for
//! residual capacity surplus, and the capacitated pivot loop.

use super::acyclic::{col_node, row_node, UnionFind};
use crate::arc::{Arc, M};
use crate::cycle;
use crate::error::{SolveError, SolveResult};
use crate::grid::Grid;
use crate::heuristics;
use crate::potentials::{self, Potentials};
use crate::table::TransportTable;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Cap on how many times the basis sampler will reshuffle before giving up
/// (distilled spec's own Open Question: cap attempts rather than retry
/// forever).
const MAX_BASIS_ATTEMPTS: usize = 10_000;
const MAX_PIVOTS: usize = 10_000;
const TOLERANCE: f64 = 1e-9;

pub fn solve(table: &mut TransportTable) -> SolveResult<Grid> {
    let mut grid = heuristics::seed_min_cost(table);
    let real_rows = grid.rows();
    let real_cols = grid.cols();

    let residual_supply: Vec<f64> = table.suppliers.iter().map(|s| s.stock.real.max(0.0)).collect();
    let residual_demand: Vec<f64> = table.consumers.iter().map(|c| c.stock.real.max(0.0)).collect();
    let has_residual = residual_supply.iter().any(|&v| v > TOLERANCE)
        || residual_demand.iter().any(|&v| v > TOLERANCE);

    if has_residual {
        extend(&mut grid, &residual_supply, &residual_demand);
    }

    let mut rng = StdRng::seed_from_u64(table_seed(table));
    let mut used_plans: HashSet<Vec<(usize, usize)>> = HashSet::new();
    let mut pivots = 0;

    loop {
        let basis = sample_basis(&grid, &mut rng, &mut used_plans)
            .ok_or(SolveError::NumericFailure { row: 0, col: 0 })?;
        let grid_with_basis = mark_basis(&grid, &basis);
        let potentials = potentials::solve(&grid_with_basis);

        match most_violating_capacity_cell(&grid_with_basis, &potentials) {
            None => {
                grid = grid_with_basis;
                break;
            }
            Some(entering) => {
                let Some(loop_cells) = cycle::find_loop(&grid_with_basis, entering) else {
                    return Err(SolveError::NumericFailure {
                        row: entering.0,
                        col: entering.1,
                    });
                };
                grid = grid_with_basis;
                capacitated_pivot(&mut grid, &loop_cells);
                pivots += 1;
                if pivots > MAX_PIVOTS {
                    return Err(SolveError::NumericFailure {
                        row: entering.0,
                        col: entering.1,
                    });
                }
            }
        }
    }

    if has_residual {
        collapse(&mut grid, real_rows, real_cols);
    }

    Ok(grid)
}

fn table_seed(table: &TransportTable) -> u64 {
    table.seed()
}

/// Extend `grid` with a dummy consumer column and dummy supplier row that
/// absorb the capacity-blocked residual on each side, pre-seeded so the
/// extended matrix starts feasible (distilled spec §4.I step 2).
fn extend(grid: &mut Grid, residual_supply: &[f64], residual_demand: &[f64]) {
    let dummy_col: Vec<Arc> = residual_supply
        .iter()
        .map(|&amount| {
            let mut arc = Arc::with_capacity(M, M);
            arc.amount = amount;
            arc
        })
        .collect();
    grid.push_col(dummy_col);

    let cols = grid.cols();
    let mut dummy_row: Vec<Arc> = (0..cols)
        .map(|j| {
            if j < cols - 1 {
                let mut arc = Arc::with_capacity(M, M);
                arc.amount = residual_demand[j];
                arc
            } else {
                // Corner cell: free to move, absorbs whatever the
                // residual supply/demand split leaves over.
                Arc::with_capacity(0.0, M)
            }
        })
        .collect();
    // The corner's amount balances the dummy row: total of the row must
    // equal total residual demand, and the new column already carries
    // total residual supply. Balance guarantees the two totals match.
    let demand_total: f64 = residual_demand.iter().sum();
    let supply_total: f64 = residual_supply.iter().sum();
    if let Some(corner) = dummy_row.last_mut() {
        corner.amount = (supply_total - demand_total).max(0.0);
    }
    grid.push_row(dummy_row);
}

/// Remove the dummy row/column added by [`extend`], after clamping any
/// stray `M`-priced flow to zero (Open Question OQ-2: a forbidden-arc leak
/// must never reach the reported plan).
fn collapse(grid: &mut Grid, real_rows: usize, real_cols: usize) {
    for i in 0..real_rows {
        let cell = grid.get_mut(i, real_cols);
        if cell.price >= M {
            cell.clear();
        }
    }
    for j in 0..real_cols {
        let cell = grid.get_mut(real_rows, j);
        if cell.price >= M {
            cell.clear();
        }
    }
    grid.pop_col();
    grid.pop_row();
}

/// Sample an acyclic basis of exactly `rows + cols - 1` cells: every
/// interior cell (`0 < amount < capacity`) plus a union-find-selected
/// subset of boundary cells (`amount` at `0` or at capacity).
fn sample_basis(
    grid: &Grid,
    rng: &mut StdRng,
    used_plans: &mut HashSet<Vec<(usize, usize)>>,
) -> Option<Vec<(usize, usize)>> {
    let rows = grid.rows();
    let cols = grid.cols();
    let target = rows + cols - 1;

    for _ in 0..MAX_BASIS_ATTEMPTS {
        let mut uf = UnionFind::new(rows + cols);
        let mut basis = Vec::with_capacity(target);

        let mut interior = Vec::new();
        let mut boundary = Vec::new();
        for (pos, cell) in grid.iter() {
            let is_interior = cell.amount > TOLERANCE && cell.room() > TOLERANCE;
            if is_interior {
                interior.push(pos);
            } else {
                boundary.push(pos);
            }
        }

        for &(i, j) in &interior {
            uf.union(row_node(i), col_node(rows, j));
            basis.push((i, j));
        }

        shuffle(&mut boundary, rng);
        for (i, j) in boundary {
            if basis.len() == target {
                break;
            }
            if uf.union(row_node(i), col_node(rows, j)) {
                basis.push((i, j));
            }
        }

        if basis.len() != target {
            continue;
        }

        let mut sorted = basis.clone();
        sorted.sort_unstable();
        if used_plans.insert(sorted) {
            return Some(basis);
        }
    }
    None
}

fn shuffle(items: &mut [(usize, usize)], rng: &mut StdRng) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Clone `grid` with exactly the cells in `basis` marked basic (forcing
/// zero-amount boundary cells to carry an epsilon so potentials treats
/// them as basic) and every other cell cleared to non-basic.
fn mark_basis(grid: &Grid, basis: &[(usize, usize)]) -> Grid {
    let mut marked = grid.clone();
    let basic: HashSet<(usize, usize)> = basis.iter().copied().collect();
    for (pos, _) in grid.iter() {
        let cell = marked.get_mut(pos.0, pos.1);
        if basic.contains(&pos) {
            if !cell.is_basic() {
                cell.eps = 1;
            }
        } else {
            cell.eps = 0;
        }
    }
    marked
}

/// The non-basic cell that most violates the split dual test: a `c`-cell
/// (at zero) needs reduced cost `>= 0`; a `d`-cell (at capacity) needs
/// reduced cost `<= 0`. Returns the worst offender, if any.
fn most_violating_capacity_cell(grid: &Grid, potentials: &Potentials) -> Option<(usize, usize)> {
    let mut best: Option<((usize, usize), f64)> = None;
    for (pos, cell) in grid.iter() {
        if cell.is_basic() {
            continue;
        }
        let rc = potentials::reduced_cost(grid, potentials, pos.0, pos.1);
        let violation = if cell.is_at_capacity() {
            rc // should be <= 0; positive is a violation
        } else {
            -rc // should be >= 0; negative rc (positive here) is a violation
        };
        if violation > TOLERANCE && best.map_or(true, |(_, b)| violation > b) {
            best = Some((pos, violation));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Shift the loop by `min(capacity - amount` over `+` cells, `amount` over
/// `-` cells`) — the capacitated pivot rule (distilled spec §4.I step 3),
/// distinct from the unbounded `pivot::redistribute` because a `+` cell
/// may itself be capacity-limited.
fn capacitated_pivot(grid: &mut Grid, loop_cells: &[(usize, usize)]) {
    let mut theta = f64::INFINITY;
    for (idx, &(i, j)) in loop_cells.iter().enumerate() {
        let cell = grid.get(i, j);
        let room = if idx % 2 == 0 {
            cell.room()
        } else {
            cell.amount
        };
        theta = theta.min(room);
    }
    if !theta.is_finite() {
        theta = 0.0;
    }

    for (idx, &(i, j)) in loop_cells.iter().enumerate() {
        let cell = grid.get_mut(i, j);
        if idx % 2 == 0 {
            cell.amount += theta;
            if cell.is_at_capacity() {
                cell.eps = 0;
            }
        } else {
            cell.amount -= theta;
            if cell.amount.abs() < TOLERANCE {
                cell.amount = 0.0;
                cell.eps = 0;
            }
        }
    }
    // The entering cell always becomes basic.
    let (ei, ej) = loop_cells[0];
    let entering = grid.get_mut(ei, ej);
    if !entering.is_basic() {
        entering.eps = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::Arc;

    #[test]
    fn sample_basis_hits_required_size() {
        let grid = Grid::from_cells(vec![
            vec![Arc::with_capacity(4.0, 10.0), Arc::with_capacity(6.0, 10.0)],
            vec![Arc::with_capacity(5.0, 10.0), Arc::with_capacity(3.0, 10.0)],
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut used = HashSet::new();
        let basis = sample_basis(&grid, &mut rng, &mut used).expect("basis should be found");
        assert_eq!(basis.len(), grid.rows() + grid.cols() - 1);
    }

    #[test]
    fn capacitated_pivot_respects_capacity_headroom() {
        let mut grid = Grid::from_cells(vec![
            vec![Arc::with_capacity(1.0, 5.0), Arc::with_capacity(2.0, 5.0)],
            vec![Arc::with_capacity(3.0, 5.0), Arc::with_capacity(4.0, 5.0)],
        ]);
        grid.get_mut(0, 0).amount = 5.0; // at capacity
        grid.get_mut(1, 0).amount = 0.0;
        grid.get_mut(1, 1).amount = 5.0; // at capacity

        // Loop entering (0,1)+, (1,1)-, (1,0)+, (0,0)-
        let loop_cells = vec![(0, 1), (1, 1), (1, 0), (0, 0)];
        capacitated_pivot(&mut grid, &loop_cells);
        assert!(grid.get(0, 1).amount <= 5.0 + 1e-9);
        assert!(grid.get(1, 0).amount <= 5.0 + 1e-9);
        assert!(grid.get(0, 0).amount >= -1e-9);
        assert!(grid.get(1, 1).amount >= -1e-9);
    }
}
