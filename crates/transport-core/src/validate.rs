//! Input validation for a prospective [`crate::table::TransportTable`].
//!
//! Mirrors the original's `__validate_table` and `__validate_capacities`,
//! translated into one check per [`ValidationError`] variant rather than a
//! single function raising whichever exception class fits.

use crate::error::{LineKind, ValidationError, ValidationResult};
use crate::restriction::RestrictionMap;

pub fn validate(
    suppliers: &[f64],
    consumers: &[f64],
    prices: &[Vec<f64>],
    capacities: Option<&[Vec<f64>]>,
    restrictions: Option<&RestrictionMap>,
) -> ValidationResult<()> {
    check_dimensions(suppliers.len(), consumers.len(), prices)?;
    check_stocks(suppliers, consumers)?;
    check_prices(prices)?;
    if let Some(restrictions) = restrictions {
        check_restrictions(restrictions, suppliers, consumers)?;
    }
    if let Some(capacities) = capacities {
        check_capacities(capacities, suppliers, consumers)?;
    }
    Ok(())
}

fn check_dimensions(rows: usize, cols: usize, prices: &[Vec<f64>]) -> ValidationResult<()> {
    if prices.len() != rows {
        return Err(ValidationError::DimensionMismatch {
            row: prices.len(),
            expected_cols: rows,
            actual_cols: prices.len(),
        });
    }
    for (row, line) in prices.iter().enumerate() {
        if line.len() != cols {
            return Err(ValidationError::DimensionMismatch {
                row,
                expected_cols: cols,
                actual_cols: line.len(),
            });
        }
    }
    Ok(())
}

fn check_stocks(suppliers: &[f64], consumers: &[f64]) -> ValidationResult<()> {
    for (index, &value) in suppliers.iter().enumerate() {
        if value <= 0.0 {
            return Err(ValidationError::NonPositiveSupply { index, value });
        }
    }
    for (index, &value) in consumers.iter().enumerate() {
        if value <= 0.0 {
            return Err(ValidationError::NonPositiveDemand { index, value });
        }
    }
    Ok(())
}

fn check_prices(prices: &[Vec<f64>]) -> ValidationResult<()> {
    for (row, line) in prices.iter().enumerate() {
        for (col, &value) in line.iter().enumerate() {
            if value < 0.0 {
                return Err(ValidationError::NegativePrice { row, col, value });
            }
        }
    }
    Ok(())
}

fn check_restrictions(
    restrictions: &RestrictionMap,
    suppliers: &[f64],
    consumers: &[f64],
) -> ValidationResult<()> {
    let rows = suppliers.len();
    let cols = consumers.len();
    for (&(row, col), restriction) in restrictions.iter() {
        if row >= rows || col >= cols {
            return Err(ValidationError::RestrictionIndexOutOfRange {
                row,
                col,
                rows,
                cols,
            });
        }
        let max = suppliers[row].min(consumers[col]);
        if restriction.threshold < 0.0 || restriction.threshold > max {
            return Err(ValidationError::RestrictionValueOutOfRange {
                value: restriction.threshold as i64,
                max,
            });
        }
    }
    Ok(())
}

fn check_capacities(
    capacities: &[Vec<f64>],
    suppliers: &[f64],
    consumers: &[f64],
) -> ValidationResult<()> {
    let rows = suppliers.len();
    let cols = consumers.len();
    if capacities.len() != rows || capacities.iter().any(|line| line.len() != cols) {
        return Err(ValidationError::CapacityShapeMismatch {
            expected_rows: rows,
            expected_cols: cols,
            actual_rows: capacities.len(),
            actual_cols: capacities.first().map(|l| l.len()).unwrap_or(0),
        });
    }

    for (index, &requirement) in suppliers.iter().enumerate() {
        let capacity_sum: f64 = capacities[index].iter().sum();
        if capacity_sum < requirement {
            return Err(ValidationError::CapacityInfeasible {
                kind: LineKind::Row,
                index,
                capacity_sum,
                requirement,
            });
        }
    }
    for (index, &requirement) in consumers.iter().enumerate() {
        let capacity_sum: f64 = capacities.iter().map(|line| line[index]).sum();
        if capacity_sum < requirement {
            return Err(ValidationError::CapacityInfeasible {
                kind: LineKind::Column,
                index,
                capacity_sum,
                requirement,
            });
        }
    }
    Ok(())
}
