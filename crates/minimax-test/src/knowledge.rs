//! Knowledge builders.

use minimax_core::{Alternative, PrefKnowledge, Voter};

/// Shorthand for `Alternative::new(id)`.
pub fn alt(id: u32) -> Alternative {
    Alternative::new(id)
}

/// Shorthand for `Voter::new(id)`.
pub fn voter(id: u32) -> Voter {
    Voter::new(id)
}

/// Knowledge over alternatives `a1..=am` and voters `v1..=vn`, nothing known.
pub fn empty_knowledge(m: u32, n: u32) -> PrefKnowledge {
    PrefKnowledge::new(&Alternative::range(m), &Voter::range(n)).expect("valid fixture")
}

/// Knowledge with the given `(voter, winner, loser)` facts, all ids.
///
/// # Panics
///
/// Panics if a fact is invalid or contradicts an earlier one.
pub fn with_edges(m: u32, n: u32, edges: &[(u32, u32, u32)]) -> PrefKnowledge {
    let mut knowledge = empty_knowledge(m, n);
    for &(v, winner, loser) in edges {
        knowledge
            .add_voter_preference(voter(v), alt(winner), alt(loser))
            .expect("consistent fixture");
    }
    knowledge
}

/// Knowledge where voter `i + 1` ranks alternatives as `rankings[i]`, best
/// first.
pub fn complete_knowledge(rankings: &[&[u32]]) -> PrefKnowledge {
    let m = rankings.first().map_or(0, |r| r.len()) as u32;
    let edges: Vec<(u32, u32, u32)> = rankings
        .iter()
        .enumerate()
        .flat_map(|(i, ranking)| {
            ranking
                .windows(2)
                .map(move |pair| (i as u32 + 1, pair[0], pair[1]))
        })
        .collect();
    with_edges(m, rankings.len() as u32, &edges)
}
