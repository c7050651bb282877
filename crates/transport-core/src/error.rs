//! Error taxonomy for `transport-core`.
//!
//! Construction-time problems surface as [`ValidationError`]; anything that
//! can go wrong once a [`crate::table::TransportTable`] is actually being
//! solved surfaces as [`SolveError`]. Degenerate bases and unbalanced
//! supply/demand are never errors — they are handled internally (ε-restart,
//! balancing) and never reach the caller.

use thiserror::Error;

/// What kind of line was found capacity-infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Row,
    Column,
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineKind::Row => write!(f, "row"),
            LineKind::Column => write!(f, "column"),
        }
    }
}

/// Errors raised while constructing a [`crate::table::TransportTable`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("price matrix row {row} has {actual_cols} columns, expected {expected_cols}")]
    DimensionMismatch {
        row: usize,
        expected_cols: usize,
        actual_cols: usize,
    },

    #[error("supplier {index} has non-positive stock {value}")]
    NonPositiveSupply { index: usize, value: f64 },

    #[error("consumer {index} has non-positive stock {value}")]
    NonPositiveDemand { index: usize, value: f64 },

    #[error("price at ({row}, {col}) is negative: {value}")]
    NegativePrice { row: usize, col: usize, value: f64 },

    #[error("restriction index ({row}, {col}) out of range for a {rows}x{cols} matrix")]
    RestrictionIndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("restriction symbol '{symbol}' is invalid, expected '>' or '<'")]
    RestrictionSymbolInvalid { symbol: char },

    #[error("restriction threshold {value} out of range [0, {max}]")]
    RestrictionValueOutOfRange { value: i64, max: f64 },

    #[error("capacity grid is {actual_rows}x{actual_cols}, expected {expected_rows}x{expected_cols}")]
    CapacityShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("{kind} {index} has capacity sum {capacity_sum} below required {requirement}")]
    CapacityInfeasible {
        kind: LineKind,
        index: usize,
        capacity_sum: f64,
        requirement: f64,
    },
}

/// Errors raised while solving an already-validated table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    /// The potentials loop could not find a pivot cycle for a candidate
    /// entering cell. Theoretically unreachable on a valid, non-degenerate
    /// basis; in practice this also covers the capacitated driver running
    /// out of basis-sampling attempts.
    #[error("no pivot cycle found for entering cell ({row}, {col})")]
    NumericFailure { row: usize, col: usize },

    /// The optimal plan still routes flow across a forbidden (`M`-priced)
    /// arc, meaning the underlying problem has no feasible solution.
    #[error("problem is infeasible: arc ({supplier}, {consumer}) is forbidden but carries flow")]
    Infeasible { supplier: usize, consumer: usize },
}

pub type ValidationResult<T> = Result<T, ValidationError>;
pub type SolveResult<T> = Result<T, SolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_messages_are_descriptive() {
        let err = ValidationError::NonPositiveSupply { index: 2, value: -1.0 };
        assert!(err.to_string().contains("supplier 2"));
    }

    #[test]
    fn solve_error_messages_are_descriptive() {
        let err = SolveError::Infeasible { supplier: 1, consumer: 3 };
        assert!(err.to_string().contains("infeasible"));
    }
}
