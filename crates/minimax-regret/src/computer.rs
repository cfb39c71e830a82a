//! Pairwise max regret computation.
//!
//! For a pair `(x, y)` the adversary completes every voter's partial order so
//! as to push `x` as low and `y` as high as possible, then picks the feasible
//! weights maximizing `Σ_v w(rank_v(y)) - w(rank_v(x))`. The rank bounds are
//! purely combinatorial; the weight choice is one LP over the polytope.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace};

use minimax_core::{
    Alternative, ElicitationError, PrefKnowledge, Result, Voter, VoterPartialPreference,
};

use crate::pmr::PairwiseMaxRegret;
use crate::regrets::Regrets;

/// How the independent LP solves of one regret pass are scheduled.
#[derive(Clone, Default)]
pub enum Parallelism {
    /// One solve after the other on the calling thread.
    Sequential,
    /// Rayon's global pool.
    #[default]
    Global,
    /// A dedicated pool.
    Pool(Arc<rayon::ThreadPool>),
}

impl Parallelism {
    /// A dedicated pool of `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("minimax-regret-{i}"))
            .build()
            .map_err(|e| ElicitationError::InvalidArgument(format!("thread pool: {e}")))?;
        Ok(Parallelism::Pool(Arc::new(pool)))
    }
}

impl fmt::Debug for Parallelism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parallelism::Sequential => write!(f, "Sequential"),
            Parallelism::Global => write!(f, "Global"),
            Parallelism::Pool(pool) => write!(f, "Pool({})", pool.current_num_threads()),
        }
    }
}

/// Computes regrets for a snapshot of the knowledge.
///
/// # Examples
///
/// ```
/// use minimax_core::{Alternative, PrefKnowledge, Voter};
/// use minimax_regret::RegretComputer;
///
/// let alts = Alternative::range(2);
/// let knowledge = PrefKnowledge::new(&alts, &Voter::range(1)).unwrap();
/// let computer = RegretComputer::new(&knowledge);
///
/// // Without any answer, b may be ranked first and a last.
/// let pmr = computer.pmr(alts[0], alts[1]).unwrap();
/// assert!((pmr.value() - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct RegretComputer<'a> {
    knowledge: &'a PrefKnowledge,
    parallelism: Parallelism,
}

impl<'a> RegretComputer<'a> {
    pub fn new(knowledge: &'a PrefKnowledge) -> Self {
        RegretComputer {
            knowledge,
            parallelism: Parallelism::default(),
        }
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn knowledge(&self) -> &PrefKnowledge {
        self.knowledge
    }

    /// Lowest position `x` can take in a completion of `pref`: every
    /// alternative not known to be below `x` is placed above it.
    pub fn worst_rank_of(x: Alternative, pref: &VoterPartialPreference) -> usize {
        pref.alternatives().len() - pref.count_worse_than(x)
    }

    /// Highest position `y` can take in a completion of `pref` that puts `x`
    /// at its worst rank.
    ///
    /// When `x` is known above `y`, `y` sits right below `x` after the
    /// alternatives forced between them. Otherwise `y` sits right below its
    /// own known betters. Unrelated pairs take the second branch, the
    /// pessimistic reading where `y` may be placed above `x`.
    pub fn best_rank_of(x: Alternative, y: Alternative, pref: &VoterPartialPreference) -> usize {
        let worst_x = Self::worst_rank_of(x, pref);
        if x == y {
            worst_x
        } else if pref.prefers(x, y) {
            worst_x + 1 + pref.count_between(x, y)
        } else {
            1 + pref.count_better_than(y)
        }
    }

    /// Worst rank of `x` for every voter.
    pub fn worst_ranks_of(&self, x: Alternative) -> BTreeMap<Voter, usize> {
        self.knowledge
            .partial_preferences()
            .map(|(v, pref)| (v, Self::worst_rank_of(x, pref)))
            .collect()
    }

    /// Best rank of `y` for every voter, given `x` at its worst rank.
    pub fn best_ranks_of(&self, x: Alternative, y: Alternative) -> BTreeMap<Voter, usize> {
        self.knowledge
            .partial_preferences()
            .map(|(v, pref)| (v, Self::best_rank_of(x, y, pref)))
            .collect()
    }

    fn check_known(&self, alternative: Alternative) -> Result<()> {
        if self.knowledge.alternatives().binary_search(&alternative).is_ok() {
            Ok(())
        } else {
            Err(ElicitationError::InvalidArgument(format!(
                "unknown alternative {alternative}"
            )))
        }
    }

    /// Pairwise max regret of `x` against `y`.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidArgument`] for an unknown alternative, or
    /// any LP failure reported by the polytope.
    pub fn pmr(&self, x: Alternative, y: Alternative) -> Result<PairwiseMaxRegret> {
        self.check_known(x)?;
        self.check_known(y)?;
        let polytope = self.knowledge.polytope();
        let solver = self.knowledge.solver();
        let ranks_of_x = self.worst_ranks_of(x);

        if x == y {
            let weights = polytope.feasible_point(solver)?;
            return Ok(PairwiseMaxRegret::zero(x, ranks_of_x, weights));
        }

        let ranks_of_y = self.best_ranks_of(x, y);
        let mut objective = vec![0.0; self.knowledge.alternative_count()];
        for (voter, &rank_x) in &ranks_of_x {
            if let Some(&rank_y) = ranks_of_y.get(voter) {
                objective[rank_y - 1] += 1.0;
                objective[rank_x - 1] -= 1.0;
            }
        }
        let (value, weights) = polytope.maximize(solver, &objective)?;
        trace!(event = "pmr", x = x.id(), y = y.id(), value);
        Ok(PairwiseMaxRegret::new(
            x, y, ranks_of_x, ranks_of_y, weights, value,
        ))
    }

    /// PMR of every ordered pair, including `(x, x)`, ordered by `(x, y)`.
    pub fn all_pairwise_max_regrets(&self) -> Result<Vec<PairwiseMaxRegret>> {
        let alternatives = self.knowledge.alternatives();
        let pairs: Vec<(Alternative, Alternative)> = alternatives
            .iter()
            .flat_map(|&x| alternatives.iter().map(move |&y| (x, y)))
            .collect();

        let solve = |&(x, y): &(Alternative, Alternative)| self.pmr(x, y);
        let pmrs = match &self.parallelism {
            Parallelism::Sequential => pairs.iter().map(solve).collect::<Result<Vec<_>>>(),
            Parallelism::Global => pairs.par_iter().map(solve).collect::<Result<Vec<_>>>(),
            Parallelism::Pool(pool) => {
                pool.install(|| pairs.par_iter().map(solve).collect::<Result<Vec<_>>>())
            }
        }?;
        debug!(
            event = "pmrs_computed",
            pairs = pmrs.len(),
            parallelism = ?self.parallelism,
        );
        Ok(pmrs)
    }

    /// Regrets of every alternative.
    pub fn regrets(&self) -> Result<Regrets> {
        Ok(Regrets::new(self.all_pairwise_max_regrets()?))
    }
}

#[cfg(test)]
mod tests;
