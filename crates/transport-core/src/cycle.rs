//! Alternating loop search over the current basis.
//!
//! Given a candidate entering (non-basic) cell, finds the unique closed
//! loop that passes through it and otherwise only touches basic cells,
//! alternating between moves along a shared row and moves along a shared
//! column. A proper `m + n - 1`-cell basis is a spanning tree over the
//! bipartite row/column graph; adding the entering cell creates exactly
//! one cycle, which this BFS finds deterministically.

use crate::grid::Grid;
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Dir {
    Row,
    Col,
}

/// Find the alternating loop through `entering`. The returned path starts
/// with `entering` and lists the rest of the loop's basic cells in
/// traversal order; the loop is closed implicitly (the last cell shares a
/// row or column with `entering`). `None` if no loop exists, which on a
/// valid spanning basis should not happen.
pub fn find_loop(grid: &Grid, entering: (usize, usize)) -> Option<Vec<(usize, usize)>> {
    let mut cells: Vec<(usize, usize)> = grid.basic_cells();
    cells.push(entering);

    let mut by_row: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
    let mut by_col: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
    for &(i, j) in &cells {
        by_row.entry(i).or_default().push((i, j));
        by_col.entry(j).or_default().push((i, j));
    }
    for neighbors in by_row.values_mut() {
        neighbors.sort_unstable();
    }
    for neighbors in by_col.values_mut() {
        neighbors.sort_unstable();
    }

    let mut queue: VecDeque<((usize, usize), Dir)> = VecDeque::new();
    let mut visited: HashSet<((usize, usize), Dir)> = HashSet::new();
    let mut parent: HashMap<((usize, usize), Dir), ((usize, usize), Dir)> = HashMap::new();

    // Two starting branches: the first move out of `entering` may go
    // either along its row or along its column.
    for dir in [Dir::Row, Dir::Col] {
        let state = (entering, dir);
        visited.insert(state);
        queue.push_back(state);
    }

    let mut goal = None;
    'bfs: while let Some((cell, arrived_via)) = queue.pop_front() {
        let next_dir = match arrived_via {
            Dir::Row => Dir::Col,
            Dir::Col => Dir::Row,
        };
        let neighbors = match next_dir {
            Dir::Row => by_row.get(&cell.0),
            Dir::Col => by_col.get(&cell.1),
        };
        let Some(neighbors) = neighbors else { continue };
        for &next in neighbors {
            if next == cell {
                continue;
            }
            if next == entering {
                if path_len(&parent, (cell, arrived_via)) >= 3 {
                    goal = Some((cell, arrived_via));
                    break 'bfs;
                }
                continue;
            }
            let state = (next, next_dir);
            if visited.insert(state) {
                parent.insert(state, (cell, arrived_via));
                queue.push_back(state);
            }
        }
    }

    let goal = goal?;
    let mut path = vec![goal.0];
    let mut current = goal;
    while let Some(&prev) = parent.get(&current) {
        path.push(prev.0);
        current = prev;
    }
    path.reverse();
    Some(path)
}

/// Number of cells in the chain from `state` back to (and including) the
/// initial frontier at `entering`, used to reject closures shorter than a
/// genuine loop.
fn path_len(
    parent: &HashMap<((usize, usize), Dir), ((usize, usize), Dir)>,
    mut state: ((usize, usize), Dir),
) -> usize {
    let mut len = 1;
    while let Some(&prev) = parent.get(&state) {
        len += 1;
        state = prev;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc::Arc;

    #[test]
    fn finds_the_rectangle_loop() {
        // Basic cells form an L: (0,0), (1,0), (1,1). Entering (0,1)
        // closes the rectangle.
        let mut grid = Grid::from_cells(vec![
            vec![Arc::new(1.0), Arc::new(2.0)],
            vec![Arc::new(3.0), Arc::new(4.0)],
        ]);
        grid.get_mut(0, 0).amount = 5.0;
        grid.get_mut(1, 0).amount = 3.0;
        grid.get_mut(1, 1).amount = 2.0;

        let loop_cells = find_loop(&grid, (0, 1)).expect("loop should exist");
        assert_eq!(loop_cells[0], (0, 1));
        assert_eq!(loop_cells.len(), 4);
        let set: HashSet<_> = loop_cells.iter().copied().collect();
        assert!(set.contains(&(0, 0)));
        assert!(set.contains(&(1, 0)));
        assert!(set.contains(&(1, 1)));
    }

    #[test]
    fn no_loop_when_basis_is_disconnected() {
        let mut grid = Grid::from_cells(vec![
            vec![Arc::new(1.0), Arc::new(2.0)],
            vec![Arc::new(3.0), Arc::new(4.0)],
        ]);
        grid.get_mut(0, 0).amount = 5.0;
        // No other basic cells: entering (1,1) shares neither row nor
        // column with any basic cell.
        assert!(find_loop(&grid, (1, 1)).is_none());
    }
}
