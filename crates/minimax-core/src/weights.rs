//! Positional scoring rule weights.

use std::fmt;

use crate::error::{ElicitationError, Result};

/// Absolute tolerance used when validating weight vectors.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Weights of a positional scoring rule.
///
/// `weight_at_rank(r)` is the score an alternative receives from a voter who
/// ranks it at position `r` (1-based). The first weight is 1, the last is 0,
/// weights never increase and the gaps between consecutive weights never
/// increase either (convexity). With a single rank the vector is `[1]`.
///
/// # Examples
///
/// ```
/// use minimax_core::PsrWeights;
///
/// let weights = PsrWeights::new(vec![1.0, 0.5, 0.2, 0.0]).unwrap();
/// assert_eq!(weights.len(), 4);
/// assert_eq!(weights.weight_at_rank(2), 0.5);
/// assert!((weights.difference(2) - 0.3).abs() < 1e-12);
///
/// assert!(PsrWeights::new(vec![1.0, 0.9, 0.0]).is_err()); // not convex
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PsrWeights {
    weights: Vec<f64>,
}

impl PsrWeights {
    /// Creates validated weights.
    ///
    /// # Errors
    ///
    /// Returns [`ElicitationError::InvalidWeights`] if the vector is empty,
    /// does not start at 1, does not end at 0, increases somewhere or has an
    /// increasing gap.
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(ElicitationError::InvalidWeights("no weights".into()));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(ElicitationError::InvalidWeights(format!(
                "non finite weight in {weights:?}"
            )));
        }
        if (weights[0] - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ElicitationError::InvalidWeights(format!(
                "first weight must be 1, got {}",
                weights[0]
            )));
        }
        let m = weights.len();
        if m >= 2 && weights[m - 1].abs() > WEIGHT_TOLERANCE {
            return Err(ElicitationError::InvalidWeights(format!(
                "last weight must be 0, got {}",
                weights[m - 1]
            )));
        }
        for i in 0..m.saturating_sub(1) {
            if weights[i + 1] > weights[i] + WEIGHT_TOLERANCE {
                return Err(ElicitationError::InvalidWeights(format!(
                    "weights increase at rank {}",
                    i + 2
                )));
            }
        }
        for i in 0..m.saturating_sub(2) {
            let gap = weights[i] - weights[i + 1];
            let next_gap = weights[i + 1] - weights[i + 2];
            if next_gap > gap + WEIGHT_TOLERANCE {
                return Err(ElicitationError::InvalidWeights(format!(
                    "gap after rank {} exceeds gap after rank {}",
                    i + 2,
                    i + 1
                )));
            }
        }
        Ok(PsrWeights { weights })
    }

    /// Borda weights: `w_r = (m - r) / (m - 1)`.
    pub fn borda(m: usize) -> Result<Self> {
        match m {
            0 => Err(ElicitationError::InvalidWeights("no weights".into())),
            1 => Self::new(vec![1.0]),
            _ => {
                let top = (m - 1) as f64;
                Self::new((1..=m).map(|r| (m - r) as f64 / top).collect())
            }
        }
    }

    /// Builds weights from a point returned by the LP layer.
    ///
    /// Solver output carries rounding noise, so instead of validating this
    /// clamps every weight into `[0, 1]`, pins the endpoints and forces the
    /// sequence to be non-increasing. Convexity is not repaired: a witness
    /// taken from an LP optimum satisfies it only up to the solver's
    /// tolerance, and [`PsrWeights::new`] accepts it within
    /// [`WEIGHT_TOLERANCE`].
    pub fn from_solver_point(point: &[f64]) -> Self {
        let m = point.len();
        let mut weights: Vec<f64> = point.iter().map(|w| w.clamp(0.0, 1.0)).collect();
        if let Some(first) = weights.first_mut() {
            *first = 1.0;
        }
        if m >= 2 {
            weights[m - 1] = 0.0;
        }
        for i in 1..m {
            if weights[i] > weights[i - 1] {
                weights[i] = weights[i - 1];
            }
        }
        PsrWeights { weights }
    }

    /// Number of ranks.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight at the given 1-based rank.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is 0 or greater than [`len`](Self::len).
    #[inline]
    pub fn weight_at_rank(&self, rank: usize) -> f64 {
        assert!(rank >= 1, "ranks start at 1");
        self.weights[rank - 1]
    }

    /// Gap `w_rank - w_{rank+1}`.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is 0 or not smaller than [`len`](Self::len).
    pub fn difference(&self, rank: usize) -> f64 {
        self.weight_at_rank(rank) - self.weight_at_rank(rank + 1)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }
}

impl fmt::Display for PsrWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, w) in self.weights.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{w:.4}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_rank() {
        let weights = PsrWeights::new(vec![1.0]).unwrap();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights.weight_at_rank(1), 1.0);
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        assert!(PsrWeights::new(vec![]).is_err());
        assert!(PsrWeights::new(vec![0.9, 0.0]).is_err());
        assert!(PsrWeights::new(vec![1.0, 0.1]).is_err());
    }

    #[test]
    fn test_rejects_increase() {
        assert!(PsrWeights::new(vec![1.0, 1.2, 0.5, 0.0]).is_err());
    }

    #[test]
    fn test_borda() {
        let weights = PsrWeights::borda(5).unwrap();
        assert_eq!(weights.as_slice(), &[1.0, 0.75, 0.5, 0.25, 0.0]);
        assert_eq!(PsrWeights::borda(1).unwrap().as_slice(), &[1.0]);
    }

    #[test]
    fn test_from_solver_point_normalizes_noise() {
        let weights = PsrWeights::from_solver_point(&[1.0000001, 0.5, 0.50000002, -1e-9]);
        assert_eq!(weights.as_slice(), &[1.0, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_solver_witness_is_valid_within_tolerance() {
        // Convexity off by solver noise is kept as is.
        let weights = PsrWeights::from_solver_point(&[1.0, 0.6, 0.1999999999, 0.0]);
        assert!(weights.difference(2) > weights.difference(1));
        assert!(weights.difference(2) - weights.difference(1) < 1e-8);
        assert!(PsrWeights::new(weights.as_slice().to_vec()).is_ok());
    }

    #[test]
    fn test_display() {
        let weights = PsrWeights::new(vec![1.0, 0.0]).unwrap();
        assert_eq!(weights.to_string(), "[1.0000, 0.0000]");
    }
}
