//! North-West Corner method: the cheapest-to-compute, most degenerate-prone
//! heuristic. Walks the grid from (0, 0), always filling the current cell
//! to the limit of whichever of supplier, consumer or capacity runs out
//! first, and stepping to the next row and/or column accordingly.

use super::{apply_fill, fill_amount};
use crate::grid::Grid;
use crate::participant::Participant;

pub fn fill(grid: &mut Grid, suppliers: &mut [Participant], consumers: &mut [Participant]) {
    let rows = suppliers.len();
    let cols = consumers.len();
    let (mut i, mut j) = (0, 0);

    while i < rows && j < cols {
        let amount = fill_amount(grid, suppliers, consumers, i, j);
        apply_fill(grid, suppliers, consumers, i, j, amount);

        let supplier_done = suppliers[i].stock.is_zero();
        let consumer_done = consumers[j].stock.is_zero();
        match (supplier_done, consumer_done) {
            (true, true) => {
                i += 1;
                j += 1;
            }
            (true, false) => i += 1,
            (false, true) => j += 1,
            (false, false) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::Arc;

    #[test]
    fn walks_diagonally_to_the_corner() {
        let mut grid = Grid::from_cells(vec![
            vec![Arc::new(1.0), Arc::new(2.0)],
            vec![Arc::new(3.0), Arc::new(4.0)],
        ]);
        let mut suppliers = vec![
            Participant::new(0, crate::participant::Role::Supplier, 5.0),
            Participant::new(1, crate::participant::Role::Supplier, 5.0),
        ];
        let mut consumers = vec![
            Participant::new(0, crate::participant::Role::Consumer, 5.0),
            Participant::new(1, crate::participant::Role::Consumer, 5.0),
        ];
        fill(&mut grid, &mut suppliers, &mut consumers);
        assert_eq!(grid.get(0, 0).amount, 5.0);
        assert_eq!(grid.get(1, 1).amount, 5.0);
        assert_eq!(grid.get(0, 1).amount, 0.0);
    }
}
