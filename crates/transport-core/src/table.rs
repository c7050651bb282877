//! `TransportTable`: the public contract. Owns every participant, the
//! price matrix, the current plan, and the optional restriction/capacity
//! grids; orchestrates validation, balancing, the three initial-plan
//! heuristics, the MODI pivot loop, and the capacitated driver.

use crate::arc::Arc;
use crate::balance;
use crate::capacity;
use crate::cycle;
use crate::error::{SolveError, SolveResult, ValidationError, ValidationResult};
use crate::grid::Grid;
use crate::heuristics::{self, Mode};
use crate::participant::{Participant, Role};
use crate::pivot;
use crate::potentials;
use crate::restriction::{self, RestrictionMap};
use crate::solution::{Cell, Solution};
use crate::validate;

/// Default seed for the capacitated driver's basis sampling, used when a
/// caller doesn't request a specific one via [`TransportTable::with_seed`].
/// A fixed default (rather than a time-derived one) keeps solves
/// reproducible out of the box, per the distilled spec's own note that
/// the random choice there "must be seedable for reproducibility".
const DEFAULT_SEED: u64 = 0x7261_6E64; // "rand" in ASCII hex, arbitrarily.

const MAX_PIVOTS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct TransportTable {
    pub(crate) suppliers: Vec<Participant>,
    pub(crate) consumers: Vec<Participant>,
    pub(crate) price_matrix: Grid,
    pub(crate) restrictions: Option<RestrictionMap>,
    pub(crate) capacities: Option<Vec<Vec<f64>>>,
    latest_basic_plan: Option<(Grid, f64)>,
    latest_optimal_plan: Option<Solution>,
    seed: u64,
}

impl TransportTable {
    /// Construct and validate a new table. `capacities`, when present,
    /// must be `suppliers.len() x consumers.len()` with enough headroom
    /// per row and column to carry the stated supply/demand (§4.B).
    pub fn new(
        suppliers: Vec<f64>,
        consumers: Vec<f64>,
        prices: Vec<Vec<f64>>,
        capacities: Option<Vec<Vec<f64>>>,
    ) -> ValidationResult<Self> {
        validate::validate(&suppliers, &consumers, &prices, capacities.as_deref(), None)?;

        let cells: Vec<Vec<Arc>> = prices
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, &price)| match &capacities {
                        Some(caps) => Arc::with_capacity(price, caps[i][j]),
                        None => Arc::new(price),
                    })
                    .collect()
            })
            .collect();

        let supplier_participants = suppliers
            .iter()
            .enumerate()
            .map(|(i, &stock)| Participant::new(i, Role::Supplier, stock))
            .collect();
        let consumer_participants = consumers
            .iter()
            .enumerate()
            .map(|(j, &stock)| Participant::new(j, Role::Consumer, stock))
            .collect();

        Ok(TransportTable {
            suppliers: supplier_participants,
            consumers: consumer_participants,
            price_matrix: Grid::from_cells(cells),
            restrictions: None,
            capacities,
            latest_basic_plan: None,
            latest_optimal_plan: None,
            seed: DEFAULT_SEED,
        })
    }

    /// Attach restrictions after construction, validated against the
    /// table's current shape and stocks.
    pub fn with_restrictions(mut self, restrictions: RestrictionMap) -> ValidationResult<Self> {
        let suppliers: Vec<f64> = self.suppliers.iter().map(|p| p.real_stock.real).collect();
        let consumers: Vec<f64> = self.consumers.iter().map(|p| p.real_stock.real).collect();
        let rows = self.price_matrix.rows();
        let prices: Vec<Vec<f64>> = (0..rows)
            .map(|i| self.price_matrix.row(i).iter().map(|a| a.price).collect())
            .collect();
        validate::validate(
            &suppliers,
            &consumers,
            &prices,
            self.capacities.as_deref(),
            Some(&restrictions),
        )?;
        self.restrictions = Some(restrictions);
        Ok(self)
    }

    /// Override the capacitated driver's basis-sampling seed (default is
    /// fixed, for reproducible tests and CLI runs).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    // ---- Inspectors -----------------------------------------------------

    pub fn price_matrix(&self) -> &Grid {
        &self.price_matrix
    }

    pub fn suppliers(&self) -> &[Participant] {
        &self.suppliers
    }

    pub fn consumers(&self) -> &[Participant] {
        &self.consumers
    }

    pub fn latest_basic_plan(&self) -> Option<&Grid> {
        self.latest_basic_plan.as_ref().map(|(grid, _)| grid)
    }

    pub fn latest_optimal_plan(&self) -> Option<&Solution> {
        self.latest_optimal_plan.as_ref()
    }

    pub fn has_capacities(&self) -> bool {
        self.capacities.is_some()
    }

    // ---- Solve entry points ----------------------------------------------

    /// Run one of the three initial-basic-feasible-solution heuristics and
    /// record it as the latest basic plan.
    pub fn create_basic_plan(&mut self, mode: Mode) -> (Vec<Cell>, f64) {
        balance::balance(self);
        let grid = heuristics::build(self, mode);
        let cost = grid.total_cost();
        let cells = to_cells(&grid, &self.suppliers, &self.consumers);
        self.latest_basic_plan = Some((grid, cost));
        (cells, cost)
    }

    /// Run the full pipeline: balance, apply restrictions, seed a basic
    /// plan if none exists, iterate potentials/cycle/pivot until optimal,
    /// then reverse the restrictions.
    pub fn create_optimal_plan(&mut self) -> SolveResult<Solution> {
        tracing::debug!(has_restrictions = self.restrictions.is_some(), "solving optimal plan");
        balance::balance(self);
        let undo = restriction::apply(self);

        // Restrictions may have shifted stocks since any previously
        // cached basic plan was built; always reseed against the
        // (possibly restricted) table before optimizing.
        self.create_basic_plan(Mode::MinCost);
        let (mut grid, _) = self
            .latest_basic_plan
            .clone()
            .expect("create_basic_plan just populated this");

        let mut pivots = 0;
        let result = loop {
            let potentials = potentials::solve(&grid);
            if !potentials.is_fully_determined() {
                // The basis isn't a spanning tree over every row and
                // column, so at least one reduced cost can't be computed.
                // This should only happen if the degeneracy-escape in
                // `heuristics::build` exhausted its restarts without
                // recovering a full `rows + cols - 1` basis; report it
                // rather than panicking on a `None` potential.
                break Err(SolveError::NumericFailure { row: 0, col: 0 });
            }
            match potentials::most_violating_entering_cell(&grid, &potentials) {
                None => break Ok(()),
                Some(entering) => {
                    let Some(loop_cells) = cycle::find_loop(&grid, entering) else {
                        break Err(SolveError::NumericFailure {
                            row: entering.0,
                            col: entering.1,
                        });
                    };
                    pivot::redistribute(&mut grid, &loop_cells);
                    pivots += 1;
                    if pivots > MAX_PIVOTS {
                        break Err(SolveError::NumericFailure {
                            row: entering.0,
                            col: entering.1,
                        });
                    }
                }
            }
        };

        undo.revert(self, &mut grid);
        result?;

        let solution = self.to_solution(&grid, true)?;
        self.latest_optimal_plan = Some(solution.clone());
        self.latest_basic_plan = Some((grid, solution.price));
        Ok(solution)
    }

    /// Solve via the capacitated driver (§4.I). Requires capacities to
    /// have been supplied at construction.
    pub fn solve_capacity_plan(&mut self) -> SolveResult<Solution> {
        tracing::debug!("solving capacitated plan");
        balance::balance(self);
        let grid = capacity::solve(self)?;
        let solution = self.to_solution(&grid, true)?;
        self.latest_optimal_plan = Some(solution.clone());
        self.latest_basic_plan = Some((grid, solution.price));
        Ok(solution)
    }

    fn to_solution(&self, grid: &Grid, is_optimal: bool) -> SolveResult<Solution> {
        for (pos, cell) in grid.iter() {
            if cell.is_forbidden() && cell.is_basic() {
                return Err(SolveError::Infeasible {
                    supplier: pos.0,
                    consumer: pos.1,
                });
            }
        }
        let cells = to_cells(grid, &self.suppliers, &self.consumers);
        Ok(Solution {
            price: grid.total_cost(),
            is_optimal,
            cells,
            suppliers: self.suppliers.iter().map(|p| p.real_stock.real).collect(),
            consumers: self.consumers.iter().map(|p| p.real_stock.real).collect(),
        })
    }
}

fn to_cells(grid: &Grid, suppliers: &[Participant], consumers: &[Participant]) -> Vec<Cell> {
    let mut cells = Vec::new();
    for (pos, cell) in grid.iter() {
        if cell.is_basic() {
            cells.push(Cell {
                supplier_id: suppliers[pos.0].id,
                consumer_id: consumers[pos.1].id,
                amount: cell.amount,
                epsilon: cell.eps,
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restriction::{Op, Restriction};
    use std::collections::HashMap;

    #[test]
    fn rejects_malformed_construction() {
        let err = TransportTable::new(vec![1.0], vec![1.0, 1.0], vec![vec![1.0]], None).unwrap_err();
        assert!(matches!(err, ValidationError::DimensionMismatch { .. }));
    }

    #[test]
    fn trivial_single_cell_plan() {
        let mut table = TransportTable::new(vec![5.0], vec![5.0], vec![vec![7.0]], None).unwrap();
        let solution = table.create_optimal_plan().unwrap();
        assert_eq!(solution.price, 35.0);
        assert_eq!(solution.cells.len(), 1);
        assert_eq!(solution.cells[0].amount, 5.0);
    }

    #[test]
    fn balanced_example_matches_known_optimum() {
        let mut table = TransportTable::new(
            vec![20.0, 30.0, 25.0],
            vec![10.0, 25.0, 20.0, 20.0],
            vec![
                vec![8.0, 8.0, 1.0, 2.0],
                vec![4.0, 1.0, 9.0, 4.0],
                vec![1.0, 4.0, 3.0, 5.0],
            ],
            None,
        )
        .unwrap();
        let solution = table.create_optimal_plan().unwrap();
        assert!((solution.price - 185.0).abs() < 1e-6, "got {}", solution.price);
    }

    #[test]
    fn degenerate_example_still_reaches_known_optimum() {
        let mut table = TransportTable::new(
            vec![3.0, 3.0, 3.0],
            vec![3.0, 3.0, 3.0],
            vec![vec![1.0; 3]; 3],
            None,
        )
        .unwrap();
        let solution = table.create_optimal_plan().unwrap();
        assert!((solution.price - 9.0).abs() < 1e-6, "got {}", solution.price);
    }

    #[test]
    fn unbalanced_example_is_balanced_then_solved() {
        let mut table = TransportTable::new(
            vec![100.0, 80.0],
            vec![60.0, 50.0, 40.0],
            vec![vec![2.0, 3.0, 4.0], vec![3.0, 1.0, 5.0]],
            None,
        )
        .unwrap();
        let solution = table.create_optimal_plan().unwrap();
        let shipped_supply: f64 = solution
            .cells
            .iter()
            .filter(|c| c.supplier_id < 2)
            .map(|c| c.amount)
            .sum();
        assert!(shipped_supply <= 180.0 + 1e-6);
        assert!(solution.price >= 0.0);
    }

    #[test]
    fn restriction_forces_minimum_flow_on_target_arc() {
        let mut restrictions = HashMap::new();
        restrictions.insert(
            (0, 1),
            Restriction {
                op: Op::AtLeast,
                threshold: 10.0,
            },
        );
        let mut table = TransportTable::new(
            vec![50.0, 40.0, 30.0],
            vec![30.0, 40.0, 30.0, 20.0],
            vec![
                vec![6.0, 8.0, 4.0, 3.0],
                vec![5.0, 1.0, 9.0, 2.0],
                vec![3.0, 6.0, 2.0, 1.0],
            ],
            None,
        )
        .unwrap()
        .with_restrictions(restrictions)
        .unwrap();

        let solution = table.create_optimal_plan().unwrap();
        let flow_0_1: f64 = solution
            .cells
            .iter()
            .filter(|c| c.supplier_id == 0 && c.consumer_id == 1)
            .map(|c| c.amount)
            .sum();
        assert!(flow_0_1 >= 10.0 - 1e-6, "flow on (0,1) was {flow_0_1}");
    }

    #[test]
    fn capacity_plan_respects_every_arc_limit() {
        let caps = vec![vec![10.0, 10.0, 10.0], vec![10.0, 10.0, 10.0]];
        let mut table = TransportTable::new(
            vec![20.0, 30.0],
            vec![15.0, 20.0, 15.0],
            vec![vec![4.0, 6.0, 8.0], vec![5.0, 3.0, 7.0]],
            Some(caps),
        )
        .unwrap();
        let solution = table.solve_capacity_plan().unwrap();
        for cell in &solution.cells {
            assert!(cell.amount <= 10.0 + 1e-6, "cell exceeded capacity: {cell:?}");
        }
    }

    #[test]
    fn reoptimizing_an_optimal_plan_is_idempotent() {
        let mut table =
            TransportTable::new(vec![5.0], vec![5.0], vec![vec![7.0]], None).unwrap();
        let first = table.create_optimal_plan().unwrap();
        let second = table.create_optimal_plan().unwrap();
        assert_eq!(first.price, second.price);
    }
}
