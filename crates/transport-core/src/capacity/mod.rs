//! The capacitated driver (distilled spec §4.I).
//!
//! Ordinary MODI assumes a basic cell is either empty or free to move;
//! with capacities a non-basic cell can also sit pinned at its upper
//! bound, which the classic `m + n - 1`-cell basis and single-sided dual
//! test don't distinguish. This module extends the matrix for any
//! capacity surplus left over after a capacitated Minimum-Cost seed, then
//! iterates: sample an acyclic basis of interior-plus-boundary cells,
//! solve potentials on it, and pivot the worst violator under the split
//! "at zero" / "at capacity" optimality test.

mod acyclic;
mod driver;

pub use driver::solve;
