//! Pairwise max regret records.

use std::collections::BTreeMap;
use std::fmt;

use minimax_core::{Alternative, PsrWeights, Voter};

/// Maximal regret of choosing `x` when the adversary picks `y`.
///
/// Stores the ranks the adversary gives to `x` (worst) and `y` (best) for
/// every voter, the weights witnessing the maximum and its value, which is
/// never negative.
#[derive(Clone, Debug, PartialEq)]
pub struct PairwiseMaxRegret {
    x: Alternative,
    y: Alternative,
    ranks_of_x: BTreeMap<Voter, usize>,
    ranks_of_y: BTreeMap<Voter, usize>,
    weights: PsrWeights,
    value: f64,
}

impl PairwiseMaxRegret {
    /// Negative values are floored at 0.
    pub fn new(
        x: Alternative,
        y: Alternative,
        ranks_of_x: BTreeMap<Voter, usize>,
        ranks_of_y: BTreeMap<Voter, usize>,
        weights: PsrWeights,
        value: f64,
    ) -> Self {
        PairwiseMaxRegret {
            x,
            y,
            ranks_of_x,
            ranks_of_y,
            weights,
            value: value.max(0.0),
        }
    }

    /// The regret of `x` against itself, which is always 0.
    pub fn zero(x: Alternative, ranks_of_x: BTreeMap<Voter, usize>, weights: PsrWeights) -> Self {
        Self::new(x, x, ranks_of_x.clone(), ranks_of_x, weights, 0.0)
    }

    #[inline]
    pub fn x(&self) -> Alternative {
        self.x
    }

    #[inline]
    pub fn y(&self) -> Alternative {
        self.y
    }

    pub fn ranks_of_x(&self) -> &BTreeMap<Voter, usize> {
        &self.ranks_of_x
    }

    pub fn ranks_of_y(&self) -> &BTreeMap<Voter, usize> {
        &self.ranks_of_y
    }

    pub fn weights(&self) -> &PsrWeights {
        &self.weights
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for PairwiseMaxRegret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PMR({}, {}) = {:.4} at {}",
            self.x, self.y, self.value, self.weights
        )
    }
}
