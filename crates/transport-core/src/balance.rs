//! Supply/demand balancing.
//!
//! A transportation problem is only directly solvable when total supply
//! equals total demand. When it doesn't, the original appends a dummy
//! participant on the deficit side with zero-priced arcs to every real
//! participant on the other side, absorbing the difference. `balance`
//! does the same and is idempotent: a table that is already balanced is
//! left untouched.

use crate::arc::Arc;
use crate::participant::{Participant, Role};
use crate::table::TransportTable;

/// Balance `table` in place, appending a dummy supplier or consumer row/column
/// if total supply and total demand differ. No-op if already balanced.
pub fn balance(table: &mut TransportTable) {
    let total_supply: f64 = table.suppliers.iter().map(|s| s.real_stock.real).sum();
    let total_demand: f64 = table.consumers.iter().map(|c| c.real_stock.real).sum();
    let diff = total_supply - total_demand;

    if diff.abs() < f64::EPSILON {
        return;
    }

    if diff > 0.0 {
        // Supply exceeds demand: add a dummy consumer absorbing the excess.
        let dummy_id = table.consumers.len();
        table
            .consumers
            .push(Participant::new(dummy_id, Role::Consumer, diff));
        let column: Vec<Arc> = (0..table.suppliers.len()).map(|_| Arc::new(0.0)).collect();
        table.price_matrix.push_col(column);
    } else {
        // Demand exceeds supply: add a dummy supplier absorbing the deficit.
        let dummy_id = table.suppliers.len();
        table
            .suppliers
            .push(Participant::new(dummy_id, Role::Supplier, -diff));
        let row: Vec<Arc> = (0..table.consumers.len()).map(|_| Arc::new(0.0)).collect();
        table.price_matrix.push_row(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TransportTable;

    #[test]
    fn leaves_balanced_table_untouched() {
        let mut table =
            TransportTable::new(vec![5.0], vec![5.0], vec![vec![1.0]], None).unwrap();
        balance(&mut table);
        assert_eq!(table.suppliers.len(), 1);
        assert_eq!(table.consumers.len(), 1);
    }

    #[test]
    fn adds_dummy_consumer_when_supply_exceeds_demand() {
        let mut table =
            TransportTable::new(vec![10.0], vec![4.0], vec![vec![1.0]], None).unwrap();
        balance(&mut table);
        assert_eq!(table.consumers.len(), 2);
        assert_eq!(table.consumers[1].real_stock.real, 6.0);
        assert_eq!(table.price_matrix.cols(), 2);
    }

    #[test]
    fn adds_dummy_supplier_when_demand_exceeds_supply() {
        let mut table =
            TransportTable::new(vec![4.0], vec![10.0], vec![vec![1.0]], None).unwrap();
        balance(&mut table);
        assert_eq!(table.suppliers.len(), 2);
        assert_eq!(table.suppliers[1].real_stock.real, 6.0);
        assert_eq!(table.price_matrix.rows(), 2);
    }
}
