//! Supply and demand points.
//!
//! The original design has an abstract `Participant` base with empty
//! `Supplier`/`Consumer` subclasses that differ only in role; here that
//! collapses into a single struct carrying a [`Role`] tag.

use crate::epsilon::Epsilon;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Supplier,
    Consumer,
}

/// Unique index of a participant within its row (suppliers) or column
/// (consumers) of the price matrix.
pub type ParticipantId = usize;

/// A supply or demand point.
///
/// `stock` is the mutable residual consumed as arcs are filled; `real_stock`
/// is the immutable snapshot taken at construction, used for conservation
/// checks and reset between heuristic attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub role: Role,
    pub stock: Epsilon,
    pub real_stock: Epsilon,
}

impl Participant {
    pub fn new(id: ParticipantId, role: Role, stock: f64) -> Self {
        let stock = Epsilon::from_real(stock);
        Participant {
            id,
            role,
            stock,
            real_stock: stock,
        }
    }

    /// Reset the mutable residual back to the original snapshot, clearing
    /// any epsilon perturbation picked up by a previous heuristic attempt.
    pub fn reset(&mut self) {
        self.stock = self.real_stock;
    }

    /// Total ordering by current residual stock (real part first, then
    /// epsilon), mirroring the original's rich comparisons on
    /// `goods_amount`.
    pub fn cmp_stock(&self, other: &Participant) -> std::cmp::Ordering {
        self.stock
            .partial_cmp(&other.stock)
            .expect("Epsilon values are always comparable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_original_stock() {
        let mut p = Participant::new(0, Role::Supplier, 10.0);
        p.stock = Epsilon::new(3.0, -2);
        p.reset();
        assert_eq!(p.stock, Epsilon::from_real(10.0));
    }

    #[test]
    fn cmp_stock_is_lexicographic() {
        let a = Participant::new(0, Role::Supplier, 5.0);
        let mut b = Participant::new(1, Role::Supplier, 5.0);
        b.stock = Epsilon::new(5.0, 1);
        assert_eq!(a.cmp_stock(&b), std::cmp::Ordering::Less);
    }
}
