//! Oracles over hand-written profiles.

use std::collections::BTreeMap;

use minimax_core::{Alternative, Oracle, PsrWeights, Voter};

/// Oracle where voter `i + 1` ranks alternatives as `rankings[i]` (ids, best
/// first) and the committee uses `weights`.
///
/// # Panics
///
/// Panics if the profile or the weights are invalid.
pub fn oracle(rankings: &[&[u32]], weights: &[f64]) -> Oracle {
    let profile: BTreeMap<Voter, Vec<Alternative>> = rankings
        .iter()
        .enumerate()
        .map(|(i, ranking)| {
            (
                Voter::new(i as u32 + 1),
                ranking.iter().copied().map(Alternative::new).collect(),
            )
        })
        .collect();
    let weights = PsrWeights::new(weights.to_vec()).expect("valid fixture weights");
    Oracle::new(profile, weights).expect("valid fixture profile")
}
