//! Max regrets and the minimal max regret selection.

use std::collections::BTreeMap;

use tracing::debug;

use minimax_core::{Alternative, ElicitationError, Result};

use crate::pmr::PairwiseMaxRegret;

/// PMR records grouped by `x`, each group sorted by decreasing value.
///
/// The max regret of `x` is the value of the first record of its group.
#[derive(Clone, Debug, PartialEq)]
pub struct Regrets {
    by_alternative: BTreeMap<Alternative, Vec<PairwiseMaxRegret>>,
}

impl Regrets {
    pub fn new(pmrs: impl IntoIterator<Item = PairwiseMaxRegret>) -> Self {
        let mut by_alternative: BTreeMap<Alternative, Vec<PairwiseMaxRegret>> = BTreeMap::new();
        for pmr in pmrs {
            by_alternative.entry(pmr.x()).or_default().push(pmr);
        }
        for group in by_alternative.values_mut() {
            group.sort_by(|a, b| b.value().total_cmp(&a.value()).then(a.y().cmp(&b.y())));
        }
        Regrets { by_alternative }
    }

    /// Alternatives having at least one PMR, in id order.
    pub fn alternatives(&self) -> impl Iterator<Item = Alternative> + '_ {
        self.by_alternative.keys().copied()
    }

    /// PMRs of `x`, largest first.
    pub fn pmrs_of(&self, x: Alternative) -> &[PairwiseMaxRegret] {
        self.by_alternative.get(&x).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every PMR, grouped by `x`.
    pub fn all_regrets(&self) -> impl Iterator<Item = &PairwiseMaxRegret> + '_ {
        self.by_alternative.values().flatten()
    }

    /// Largest PMR value of `x`.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidArgument`] if `x` has no PMR.
    pub fn max_regret_of(&self, x: Alternative) -> Result<f64> {
        self.pmrs_of(x)
            .first()
            .map(PairwiseMaxRegret::value)
            .ok_or_else(|| ElicitationError::InvalidArgument(format!("no regret for {x}")))
    }

    /// `(alternative, max regret)` sorted by increasing max regret, then id.
    pub fn regrets_sorted(&self) -> Vec<(Alternative, f64)> {
        let mut sorted: Vec<(Alternative, f64)> = self
            .by_alternative
            .iter()
            .filter_map(|(&x, group)| group.first().map(|pmr| (x, pmr.value())))
            .collect();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        sorted
    }

    /// The minimal max regret, up to `epsilon`.
    ///
    /// With `m` the smallest max regret, returns the largest max regret not
    /// above `m + epsilon`. No max regret may fall strictly between the
    /// result and `result + epsilon`: values that close cannot be told apart
    /// consistently.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidArgument`] for a negative or non finite
    /// epsilon or when there is no regret at all,
    /// [`ElicitationError::InconsistentRegrets`] when a max regret falls in
    /// the band above the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use minimax_core::{Alternative, PsrWeights};
    /// use minimax_regret::{PairwiseMaxRegret, Regrets};
    /// use std::collections::BTreeMap;
    ///
    /// let weights = PsrWeights::new(vec![1.0, 0.0]).unwrap();
    /// let pmr = |x, value| {
    ///     PairwiseMaxRegret::new(
    ///         Alternative::new(x), Alternative::new(1),
    ///         BTreeMap::new(), BTreeMap::new(), weights.clone(), value,
    ///     )
    /// };
    /// let regrets = Regrets::new([pmr(1, 1.0), pmr(2, 1.125), pmr(3, 2.0)]);
    ///
    /// assert_eq!(regrets.minimal_max_regret(0.0).unwrap(), 1.0);
    /// assert_eq!(regrets.minimal_max_regret(0.25).unwrap(), 1.125);
    /// ```
    pub fn minimal_max_regret(&self, epsilon: f64) -> Result<f64> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(ElicitationError::InvalidArgument(format!(
                "epsilon must be finite and non negative, got {epsilon}"
            )));
        }
        let sorted = self.regrets_sorted();
        let Some(&(_, minimum)) = sorted.first() else {
            return Err(ElicitationError::InvalidArgument("no regrets".into()));
        };
        let result = sorted
            .iter()
            .map(|&(_, value)| value)
            .filter(|&value| value <= minimum + epsilon)
            .fold(minimum, f64::max);
        if let Some(&(x, value)) = sorted
            .iter()
            .find(|&&(_, value)| value > result && value < result + epsilon)
        {
            return Err(ElicitationError::InconsistentRegrets(format!(
                "max regret {value} of {x} lies within {epsilon} above the minimal max regret {result}"
            )));
        }
        Ok(result)
    }

    /// Alternatives reaching the minimal max regret, each with its PMRs
    /// whose value lies in `[value - epsilon, value]`.
    pub fn minimal_max_regrets(&self, epsilon: f64) -> Result<MinimalMaxRegrets> {
        let value = self.minimal_max_regret(epsilon)?;
        let map: BTreeMap<Alternative, Vec<PairwiseMaxRegret>> = self
            .by_alternative
            .iter()
            .filter(|(_, group)| group.first().is_some_and(|pmr| pmr.value() <= value))
            .map(|(&x, group)| {
                let near: Vec<PairwiseMaxRegret> = group
                    .iter()
                    .filter(|pmr| pmr.value() >= value - epsilon && pmr.value() <= value)
                    .cloned()
                    .collect();
                (x, near)
            })
            .collect();
        debug!(
            event = "mmr",
            value,
            epsilon,
            alternatives = map.len(),
        );
        Ok(MinimalMaxRegrets { value, map })
    }
}

/// MMR value with the competitive alternatives and their worst PMRs.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimalMaxRegrets {
    value: f64,
    map: BTreeMap<Alternative, Vec<PairwiseMaxRegret>>,
}

impl MinimalMaxRegrets {
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Competitive alternatives in id order.
    pub fn alternatives(&self) -> impl Iterator<Item = Alternative> + '_ {
        self.map.keys().copied()
    }

    pub fn pmrs_of(&self, x: Alternative) -> &[PairwiseMaxRegret] {
        self.map.get(&x).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Alternative, &[PairwiseMaxRegret])> + '_ {
        self.map.iter().map(|(&x, pmrs)| (x, pmrs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests;
