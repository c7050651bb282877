//! Symbolic infinitesimal arithmetic used to break ties on a degenerate basis.
//!
//! An [`Epsilon`] represents `real + eps * ε` where `ε` is an unspecified
//! positive quantity smaller than any positive real the solver will ever see.
//! Only its order relative to other `Epsilon` values and to zero matters;
//! the solver never needs its magnitude.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A value of the form `real + eps * ε`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Epsilon {
    pub real: f64,
    pub eps: i64,
}

impl Epsilon {
    pub const ZERO: Epsilon = Epsilon { real: 0.0, eps: 0 };

    pub fn new(real: f64, eps: i64) -> Self {
        Epsilon { real, eps }
    }

    pub fn from_real(real: f64) -> Self {
        Epsilon { real, eps: 0 }
    }

    pub fn is_zero(&self) -> bool {
        self.real == 0.0 && self.eps == 0
    }

    pub fn min(self, other: Epsilon) -> Epsilon {
        if self <= other {
            self
        } else {
            other
        }
    }
}

impl From<f64> for Epsilon {
    fn from(real: f64) -> Self {
        Epsilon::from_real(real)
    }
}

impl Add for Epsilon {
    type Output = Epsilon;
    fn add(self, other: Epsilon) -> Epsilon {
        Epsilon::new(self.real + other.real, self.eps + other.eps)
    }
}

impl Sub for Epsilon {
    type Output = Epsilon;
    fn sub(self, other: Epsilon) -> Epsilon {
        Epsilon::new(self.real - other.real, self.eps - other.eps)
    }
}

impl Neg for Epsilon {
    type Output = Epsilon;
    fn neg(self) -> Epsilon {
        Epsilon::new(-self.real, -self.eps)
    }
}

// Lexicographic: compare the real part first, the epsilon multiplier only
// to break ties. `PartialEq` above is derived field-wise so it stays
// consistent with this ordering.
impl PartialOrd for Epsilon {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.real.partial_cmp(&other.real) {
            Some(Ordering::Equal) => self.eps.partial_cmp(&other.eps),
            other => other,
        }
    }
}

impl fmt::Display for Epsilon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.eps == 0 {
            return write!(f, "{}", format_real(self.real));
        }
        if self.real == 0.0 {
            let sign = if self.eps < 0 { "-" } else { "" };
            let mag = self.eps.abs();
            return if mag == 1 {
                write!(f, "{sign}ε")
            } else {
                write!(f, "{sign}{mag}ε")
            };
        }
        let sign = if self.eps < 0 { "-" } else { "+" };
        let mag = self.eps.abs();
        if mag == 1 {
            write!(f, "{}{sign}ε", format_real(self.real))
        } else {
            write!(f, "{}{sign}{mag}ε", format_real(self.real))
        }
    }
}

fn format_real(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_plain_zero() {
        assert_eq!(Epsilon::ZERO.to_string(), "0");
    }

    #[test]
    fn displays_real_only() {
        assert_eq!(Epsilon::from_real(12.0).to_string(), "12");
    }

    #[test]
    fn displays_single_epsilon() {
        assert_eq!(Epsilon::new(0.0, 1).to_string(), "ε");
        assert_eq!(Epsilon::new(0.0, -1).to_string(), "-ε");
    }

    #[test]
    fn displays_multiple_epsilon() {
        assert_eq!(Epsilon::new(0.0, 3).to_string(), "3ε");
    }

    #[test]
    fn displays_mixed() {
        assert_eq!(Epsilon::new(5.0, 2).to_string(), "5+2ε");
        assert_eq!(Epsilon::new(5.0, -1).to_string(), "5-ε");
    }

    #[test]
    fn orders_by_real_then_eps() {
        assert!(Epsilon::new(1.0, 5) < Epsilon::new(2.0, 0));
        assert!(Epsilon::new(1.0, 0) < Epsilon::new(1.0, 1));
        assert!(Epsilon::new(1.0, -1) < Epsilon::new(1.0, 0));
    }

    #[test]
    fn min_picks_the_lexicographically_smaller_value() {
        assert_eq!(
            Epsilon::new(1.0, 5).min(Epsilon::new(2.0, 0)),
            Epsilon::new(1.0, 5)
        );
    }

    #[test]
    fn add_and_sub_are_componentwise() {
        let a = Epsilon::new(3.0, 2);
        let b = Epsilon::new(1.0, 1);
        assert_eq!(a + b, Epsilon::new(4.0, 3));
        assert_eq!(a - b, Epsilon::new(2.0, 1));
    }
}
