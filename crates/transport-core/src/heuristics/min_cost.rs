//! Minimum-Cost method: repeatedly fill the cheapest still-available cell.
//!
//! "Available" follows the four-way rule from the distilled spec exactly —
//! a cell qualifies if either endpoint still has real stock matched against
//! real stock or epsilon on the other side, which lets a degenerate,
//! epsilon-only residual still participate. Ties on price are broken by
//! scan order (row-major), matching a stable sort over the cells.

use super::{apply_fill, fill_amount};
use crate::grid::Grid;
use crate::participant::Participant;

pub fn fill(grid: &mut Grid, suppliers: &mut [Participant], consumers: &mut [Participant]) {
    loop {
        let Some((row, col)) = pick_cheapest_available(grid, suppliers, consumers) else {
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

fn pick_cheapest_available(
    grid: &Grid,
    suppliers: &[Participant],
    consumers: &[Participant],
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for i in 0..suppliers.len() {
        for j in 0..consumers.len() {
            let cell = grid.get(i, j);
            if cell.room() <= 0.0 {
                continue;
            }
            if !is_available(suppliers, consumers, i, j) {
                continue;
            }
            if best.map_or(true, |(_, _, price)| cell.price < price) {
                best = Some((i, j, cell.price));
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
    fn fills_cheapest_cells_first() {
        let mut grid = Grid::from_cells(vec![
            vec![Arc::new(8.0), Arc::new(1.0)],
            vec![Arc::new(2.0), Arc::new(9.0)],
        ]);
        let mut suppliers = vec![
            Participant::new(0, Role::Supplier, 5.0),
            Participant::new(1, Role::Supplier, 5.0),
        ];
        let mut consumers = vec![
            Participant::new(0, Role::Consumer, 5.0),
            Participant::new(1, Role::Consumer, 5.0),
        ];
        fill(&mut grid, &mut suppliers, &mut consumers);
        // cheapest cells are (0,1)=1 and (1,0)=2, each can take 5 units
        // before the other side of the cheaper cell is exhausted.
        assert_eq!(grid.get(0, 1).amount, 5.0);
        assert_eq!(grid.get(1, 0).amount, 5.0);
        assert_eq!(grid.get(0, 0).amount, 0.0);
        assert_eq!(grid.get(1, 1).amount, 0.0);
    }

    #[test]
    fn respects_capacity_room() {
        let mut grid = Grid::from_cells(vec![vec![
            Arc::with_capacity(1.0, 3.0),
            Arc::new(5.0),
        ]]);
        let mut suppliers = vec![Participant::new(0, Role::Supplier, 10.0)];
        let mut consumers = vec![
            Participant::new(0, Role::Consumer, 3.0),
            Participant::new(1, Role::Consumer, 7.0),
        ];
        fill(&mut grid, &mut suppliers, &mut consumers);
        assert_eq!(grid.get(0, 0).amount, 3.0);
        assert_eq!(grid.get(0, 1).amount, 7.0);
    }
}
