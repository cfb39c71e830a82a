//! Partial strict preference of a single voter.

use crate::error::{ElicitationError, Result};
use crate::ids::Alternative;

/// What is known about one voter's strict preference over a fixed set of
/// alternatives.
///
/// Alternatives live in an arena indexed by position in the sorted
/// alternative table; the relation is stored as a dense, transitively closed
/// matrix, so `prefers(a, b)` means "a is known to be ranked above b". Every
/// mutation keeps the relation irreflexive and acyclic.
///
/// # Examples
///
/// ```
/// use minimax_core::{Alternative, VoterPartialPreference};
///
/// let alts = Alternative::range(3);
/// let mut pref = VoterPartialPreference::new(&alts);
/// pref.add_preference(alts[0], alts[1]).unwrap();
/// pref.add_preference(alts[1], alts[2]).unwrap();
///
/// // Transitivity is maintained on every insertion.
/// assert!(pref.prefers(alts[0], alts[2]));
/// assert!(pref.is_complete());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoterPartialPreference {
    alternatives: Vec<Alternative>,
    /// Row-major `n * n` closure: `above[i * n + j]` iff `i` is above `j`.
    above: Vec<bool>,
}

impl VoterPartialPreference {
    /// Creates an empty preference over the given alternatives.
    ///
    /// Duplicates are ignored; the table is sorted by alternative id.
    pub fn new(alternatives: &[Alternative]) -> Self {
        let mut table = alternatives.to_vec();
        table.sort_unstable();
        table.dedup();
        let n = table.len();
        VoterPartialPreference {
            alternatives: table,
            above: vec![false; n * n],
        }
    }

    /// Creates the complete preference given by a ranking, best first.
    pub fn from_ranking(ranking: &[Alternative]) -> Result<Self> {
        let mut pref = Self::new(ranking);
        if pref.alternatives.len() != ranking.len() {
            return Err(ElicitationError::InvalidArgument(
                "ranking lists an alternative twice".into(),
            ));
        }
        for pair in ranking.windows(2) {
            pref.add_preference(pair[0], pair[1])?;
        }
        Ok(pref)
    }

    fn index_of(&self, alternative: Alternative) -> Result<usize> {
        self.alternatives.binary_search(&alternative).map_err(|_| {
            ElicitationError::InvalidQuestion(format!("unknown alternative {alternative}"))
        })
    }

    #[inline]
    fn size(&self) -> usize {
        self.alternatives.len()
    }

    #[inline]
    fn is_above(&self, i: usize, j: usize) -> bool {
        self.above[i * self.size() + j]
    }

    /// Records that `winner` is strictly preferred to `loser`, together with
    /// every consequence by transitivity.
    ///
    /// Returns `Ok(false)` when the preference was already implied.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidQuestion`] if both alternatives are equal,
    /// unknown, or already ordered the other way.
    pub fn add_preference(&mut self, winner: Alternative, loser: Alternative) -> Result<bool> {
        if winner == loser {
            return Err(ElicitationError::InvalidQuestion(format!(
                "{winner} cannot be preferred to itself"
            )));
        }
        let w = self.index_of(winner)?;
        let l = self.index_of(loser)?;
        if self.is_above(l, w) {
            return Err(ElicitationError::InvalidQuestion(format!(
                "{loser} is already known to be preferred to {winner}"
            )));
        }
        if self.is_above(w, l) {
            return Ok(false);
        }

        let n = self.size();
        let uppers: Vec<usize> = (0..n).filter(|&i| i == w || self.is_above(i, w)).collect();
        let lowers: Vec<usize> = (0..n).filter(|&j| j == l || self.is_above(l, j)).collect();
        for &i in &uppers {
            for &j in &lowers {
                self.above[i * n + j] = true;
            }
        }
        Ok(true)
    }

    /// Returns true if `a` is known to be ranked above `b`.
    ///
    /// Unknown alternatives are never ordered.
    pub fn prefers(&self, a: Alternative, b: Alternative) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Ok(i), Ok(j)) => self.is_above(i, j),
            _ => false,
        }
    }

    /// Returns true if the relative order of `a` and `b` is known.
    pub fn are_comparable(&self, a: Alternative, b: Alternative) -> bool {
        self.prefers(a, b) || self.prefers(b, a)
    }

    /// Alternatives known to be ranked above `x`.
    pub fn better_than(&self, x: Alternative) -> Vec<Alternative> {
        let Ok(ix) = self.index_of(x) else {
            return Vec::new();
        };
        (0..self.size())
            .filter(|&i| self.is_above(i, ix))
            .map(|i| self.alternatives[i])
            .collect()
    }

    /// Alternatives known to be ranked below `x`.
    pub fn worse_than(&self, x: Alternative) -> Vec<Alternative> {
        let Ok(ix) = self.index_of(x) else {
            return Vec::new();
        };
        (0..self.size())
            .filter(|&j| self.is_above(ix, j))
            .map(|j| self.alternatives[j])
            .collect()
    }

    /// Alternatives other than `x` whose order relative to `x` is unknown.
    pub fn incomparable_to(&self, x: Alternative) -> Vec<Alternative> {
        let Ok(ix) = self.index_of(x) else {
            return Vec::new();
        };
        (0..self.size())
            .filter(|&k| k != ix && !self.is_above(ix, k) && !self.is_above(k, ix))
            .map(|k| self.alternatives[k])
            .collect()
    }

    /// Number of alternatives known to be above `x`.
    pub fn count_better_than(&self, x: Alternative) -> usize {
        self.index_of(x)
            .map(|ix| (0..self.size()).filter(|&i| self.is_above(i, ix)).count())
            .unwrap_or(0)
    }

    /// Number of alternatives known to be below `x`.
    pub fn count_worse_than(&self, x: Alternative) -> usize {
        self.index_of(x)
            .map(|ix| (0..self.size()).filter(|&j| self.is_above(ix, j)).count())
            .unwrap_or(0)
    }

    /// Number of alternatives both below `upper` and above `lower`.
    pub fn count_between(&self, upper: Alternative, lower: Alternative) -> usize {
        match (self.index_of(upper), self.index_of(lower)) {
            (Ok(u), Ok(l)) => (0..self.size())
                .filter(|&k| self.is_above(u, k) && self.is_above(k, l))
                .count(),
            _ => 0,
        }
    }

    /// Incomparable pairs `(a, b)` with `a < b`.
    pub fn incomparable_pairs(&self) -> Vec<(Alternative, Alternative)> {
        let n = self.size();
        let mut pairs = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if !self.is_above(i, j) && !self.is_above(j, i) {
                    pairs.push((self.alternatives[i], self.alternatives[j]));
                }
            }
        }
        pairs
    }

    /// Number of ordered pairs in the closed relation.
    pub fn relation_size(&self) -> usize {
        self.above.iter().filter(|&&b| b).count()
    }

    /// Returns true if the preference is a total order.
    pub fn is_complete(&self) -> bool {
        let n = self.size();
        self.relation_size() == n * n.saturating_sub(1) / 2
    }

    /// Alternatives in id order.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }
}
