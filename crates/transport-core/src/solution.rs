//! Serialization-facing records: the wire shape a solved plan is handed
//! back in, and the text codec collaborators use to transport restrictions.

use crate::error::ValidationError;
use crate::restriction::{Op, Restriction};
use serde::{Deserialize, Serialize};

/// One nonzero-flow cell of a solved plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub supplier_id: usize,
    pub consumer_id: usize,
    pub amount: f64,
    pub epsilon: i64,
}

/// A solved transportation plan, matching distilled spec §6's wire shape
/// exactly (`roots` on the wire, `cells` in Rust-facing code).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub price: f64,
    pub is_optimal: bool,
    #[serde(rename = "roots")]
    pub cells: Vec<Cell>,
    pub suppliers: Vec<f64>,
    pub consumers: Vec<f64>,
}

impl Restriction {
    /// Parse the wire key `"i,j"` into a `(row, col)` pair.
    pub fn parse_key(key: &str) -> Result<(usize, usize), ValidationError> {
        let (row_str, col_str) = key.split_once(',').ok_or(ValidationError::RestrictionSymbolInvalid {
            symbol: key.chars().next().unwrap_or(' '),
        })?;
        let row = row_str.trim().parse::<usize>().map_err(|_| ValidationError::RestrictionSymbolInvalid {
            symbol: row_str.chars().next().unwrap_or(' '),
        })?;
        let col = col_str.trim().parse::<usize>().map_err(|_| ValidationError::RestrictionSymbolInvalid {
            symbol: col_str.chars().next().unwrap_or(' '),
        })?;
        Ok((row, col))
    }

    /// Render the wire key `"i,j"` for `(row, col)`.
    pub fn key(row: usize, col: usize) -> String {
        format!("{row},{col}")
    }

    /// Parse the wire value `"<op><threshold>"`, e.g. `">3"` or `"<10"`.
    pub fn parse_value(value: &str) -> Result<Restriction, ValidationError> {
        let mut chars = value.chars();
        let symbol = chars.next().ok_or(ValidationError::RestrictionSymbolInvalid { symbol: ' ' })?;
        let op = match symbol {
            '>' => Op::AtLeast,
            '<' => Op::AtMost,
            other => return Err(ValidationError::RestrictionSymbolInvalid { symbol: other }),
        };
        let rest = chars.as_str();
        let threshold: i64 = rest
            .trim()
            .parse()
            .map_err(|_| ValidationError::RestrictionSymbolInvalid { symbol })?;
        if threshold < 0 {
            return Err(ValidationError::RestrictionValueOutOfRange {
                value: threshold,
                max: f64::INFINITY,
            });
        }
        Ok(Restriction {
            op,
            threshold: threshold as f64,
        })
    }

    /// Render the wire value `"<op><threshold>"` for this restriction.
    pub fn value(&self) -> String {
        let symbol = match self.op {
            Op::AtLeast => '>',
            Op::AtMost => '<',
        };
        format!("{symbol}{}", self.threshold as i64)
    }
}
