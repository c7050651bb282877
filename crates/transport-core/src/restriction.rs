//! Forced (`>k`) and forbidden (`<k`) arc restrictions.
//!
//! The original mutates supplier/consumer stocks in place to apply a
//! restriction and carries ad-hoc bookkeeping to undo it later. The
//! distilled spec's redesign notes call for a reversible transform instead;
//! [`apply`] returns an [`Undo`] token that knows how to put the table back
//! exactly as it was, rather than leaving the caller to remember which
//! fields changed.

use crate::arc::{Arc, M};
use crate::grid::Grid;
use crate::participant::{Participant, Role};
use crate::table::TransportTable;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `>k`: at least `k` units must flow on this arc.
    AtLeast,
    /// `<k`: at most `k` units may flow on this arc.
    AtMost,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restriction {
    pub op: Op,
    pub threshold: f64,
}

pub type RestrictionMap = HashMap<(usize, usize), Restriction>;

/// One reversible step taken while applying restrictions.
enum Step {
    /// An `>k` restriction: the supplier's and consumer's stock were both
    /// reduced by `k` up front, and the stock carved out re-added on
    /// arc (row, col) once a plan is final.
    Shrunk {
        row: usize,
        col: usize,
        threshold: f64,
    },
    /// A `<k` restriction: a dummy supplier row was appended, splitting
    /// row `row`'s stock between the real row (capped at `k`) and the
    /// dummy row (forbidden to reach `col`, the restricted column, but
    /// free to reach every other column).
    Split {
        row: usize,
        dummy_row: usize,
        col: usize,
    },
}

/// Records what [`apply`] did so it can be undone once a plan is final.
pub struct Undo {
    steps: Vec<Step>,
}

/// Apply every restriction in `table.restrictions` to the working tables.
/// Must be called before the first basic-plan heuristic runs.
pub fn apply(table: &mut TransportTable) -> Undo {
    let mut steps = Vec::new();
    let Some(restrictions) = table.restrictions.clone() else {
        return Undo { steps };
    };

    for (&(row, col), restriction) in restrictions.iter() {
        match restriction.op {
            Op::AtLeast => {
                table.suppliers[row].stock.real -= restriction.threshold;
                table.suppliers[row].real_stock.real -= restriction.threshold;
                table.consumers[col].stock.real -= restriction.threshold;
                table.consumers[col].real_stock.real -= restriction.threshold;
                steps.push(Step::Shrunk {
                    row,
                    col,
                    threshold: restriction.threshold,
                });
            }
            Op::AtMost => {
                let dummy_row = split_supplier(table, row, col, restriction.threshold);
                steps.push(Step::Split { row, dummy_row, col });
            }
        }
    }

    Undo { steps }
}

/// Split supplier `row`'s stock so at most `threshold` units can reach
/// consumer `col`: the original row is capped, and a dummy row absorbs the
/// remainder with the restricted column forbidden to it (so the overflow
/// can only flow to the *other* columns, never push the capped route past
/// `threshold`).
fn split_supplier(table: &mut TransportTable, row: usize, col: usize, threshold: f64) -> usize {
    let cols = table.price_matrix.cols();
    let original_stock = table.suppliers[row].real_stock.real;
    let overflow = (original_stock - threshold).max(0.0);

    table.suppliers[row].stock.real = threshold.min(original_stock);
    table.suppliers[row].real_stock.real = threshold.min(original_stock);

    let dummy_id = table.suppliers.len();
    table
        .suppliers
        .push(Participant::new(dummy_id, Role::Supplier, overflow));

    let mut new_row = Vec::with_capacity(cols);
    for c in 0..cols {
        if c == col {
            new_row.push(Arc::new(M));
        } else {
            new_row.push(Arc::new(0.0));
        }
    }
    table.price_matrix.push_row(new_row);
    dummy_id
}

impl Undo {
    /// Reverse every step against both the table's permanent structures and
    /// the final `plan`, in the order that undoes splits before restoring
    /// shrunk stocks (splits appended rows after shrinks may have already
    /// run; undoing in reverse order keeps indices valid).
    ///
    /// For an `>k` restriction this adds the `k` units carved out of the
    /// arc's stock back onto the reported amount (distilled spec §4.H).
    /// For a `<k` restriction this merges the dummy row's arcs back into
    /// row `i`'s corresponding columns before dropping the dummy, clamping
    /// the restricted column first so a forbidden-arc leak can never reach
    /// the reported plan (Open Question OQ-2 in SPEC_FULL.md). The clamp
    /// is keyed on the restricted column itself, not on the arc's price,
    /// so it can't drift out of sync with which column `split_supplier`
    /// actually forbids.
    pub fn revert(self, table: &mut TransportTable, plan: &mut Grid) {
        for step in self.steps.into_iter().rev() {
            match step {
                Step::Shrunk { row, col, threshold } => {
                    table.suppliers[row].stock.real += threshold;
                    table.suppliers[row].real_stock.real += threshold;
                    table.consumers[col].stock.real += threshold;
                    table.consumers[col].real_stock.real += threshold;
                    plan.get_mut(row, col).amount += threshold;
                }
                Step::Split { row, dummy_row, col } => {
                    let recovered = table.suppliers[dummy_row].real_stock.real;
                    table.suppliers[row].stock.real += recovered;
                    table.suppliers[row].real_stock.real += recovered;
                    table.suppliers.pop();
                    table.price_matrix.pop_row();
                    debug_assert_eq!(table.suppliers.len(), dummy_row);

                    for c in 0..plan.cols() {
                        if c == col {
                            // Restricted column: any flow here would be a
                            // leak of the sentinel arc into the reported
                            // plan. Drop it rather than merge it.
                            continue;
                        }
                        let dummy_cell = *plan.get(dummy_row, c);
                        let target = plan.get_mut(row, c);
                        target.amount += dummy_cell.amount;
                        target.eps += dummy_cell.eps;
                    }
                    plan.pop_row();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TransportTable;

    fn small_table() -> TransportTable {
        TransportTable::new(
            vec![10.0, 10.0],
            vec![10.0, 10.0],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            None,
        )
        .unwrap()
    }

    #[test]
    fn at_least_shrinks_then_restores_both_stocks() {
        let mut table = small_table();
        table.restrictions = Some(HashMap::from([(
            (0, 0),
            Restriction {
                op: Op::AtLeast,
                threshold: 3.0,
            },
        )]));
        let before_supplier = table.suppliers[0].real_stock.real;
        let before_consumer = table.consumers[0].real_stock.real;
        let undo = apply(&mut table);
        assert_eq!(table.suppliers[0].real_stock.real, before_supplier - 3.0);
        let mut plan = table.price_matrix.clone();
        undo.revert(&mut table, &mut plan);
        assert_eq!(table.suppliers[0].real_stock.real, before_supplier);
        assert_eq!(table.consumers[0].real_stock.real, before_consumer);
        assert_eq!(plan.get(0, 0).amount, 3.0);
    }

    #[test]
    fn at_most_splits_row_and_merges_back() {
        let mut table = small_table();
        table.restrictions = Some(HashMap::from([(
            (0, 0),
            Restriction {
                op: Op::AtMost,
                threshold: 4.0,
            },
        )]));
        let rows_before = table.suppliers.len();
        let undo = apply(&mut table);
        assert_eq!(table.suppliers.len(), rows_before + 1);
        assert_eq!(table.price_matrix.rows(), rows_before + 1);
        let mut plan = table.price_matrix.clone();
        undo.revert(&mut table, &mut plan);
        assert_eq!(table.suppliers.len(), rows_before);
        assert_eq!(table.price_matrix.rows(), rows_before);
        assert_eq!(plan.rows(), rows_before);
    }
}
