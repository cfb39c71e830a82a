//! Questions worth asking given the current knowledge.

use minimax_core::polytope::LAMBDA_RANGE_TOLERANCE;
use minimax_core::{PrefKnowledge, QuestionCommittee, QuestionVoter, Result};
use minimax_regret::MinimalMaxRegrets;

/// Voter questions that may lower the current MMR.
///
/// For each competitive `x`, each opponent `y` among its worst PMRs and each
/// voter: `(x, y)` when the voter has not ordered them yet; otherwise `x`
/// against the first alternative incomparable to it, and `y` against the
/// first alternative other than `x` incomparable to it. Duplicates are
/// dropped, first occurrence kept.
pub fn voter_candidates(
    knowledge: &PrefKnowledge,
    mmr: &MinimalMaxRegrets,
) -> Result<Vec<QuestionVoter>> {
    let mut candidates: Vec<QuestionVoter> = Vec::new();
    let mut push = |q: QuestionVoter| {
        if !candidates.contains(&q) {
            candidates.push(q);
        }
    };

    for (x, pmrs) in mmr.iter() {
        for y in pmrs.iter().map(|pmr| pmr.y()).filter(|&y| y != x) {
            for (voter, pref) in knowledge.partial_preferences() {
                if !pref.are_comparable(x, y) {
                    push(QuestionVoter::new(voter, x, y)?);
                    continue;
                }
                if let Some(&z) = pref.incomparable_to(x).first() {
                    push(QuestionVoter::new(voter, x, z)?);
                }
                if let Some(&z) = pref.incomparable_to(y).iter().find(|&&z| z != x) {
                    push(QuestionVoter::new(voter, y, z)?);
                }
            }
        }
    }
    Ok(candidates)
}

/// One committee question per rank whose ratio `d_rank / d_{rank+1}` is not
/// settled yet, splitting the feasible range in two.
pub fn committee_candidates(knowledge: &PrefKnowledge) -> Result<Vec<QuestionCommittee>> {
    let polytope = knowledge.polytope();
    let mut candidates = Vec::new();
    for rank in 1..=polytope.rank_count().saturating_sub(2) {
        let Some(range) = polytope.lambda_range(knowledge.solver(), rank)? else {
            continue;
        };
        if !range.is_settled(LAMBDA_RANGE_TOLERANCE) {
            candidates.push(QuestionCommittee::new(rank, range.split_point())?);
        }
    }
    Ok(candidates)
}

/// Every voter question whose answer is not known yet.
pub fn open_voter_questions(knowledge: &PrefKnowledge) -> Result<Vec<QuestionVoter>> {
    let mut questions = Vec::new();
    for (voter, pref) in knowledge.partial_preferences() {
        for (a, b) in pref.incomparable_pairs() {
            questions.push(QuestionVoter::new(voter, a, b)?);
        }
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimax_core::{Alternative, CommitteeConstraint, ComparisonOp, Voter};
    use minimax_regret::RegretComputer;
    use minimax_test::{alt, empty_knowledge, voter, with_edges};

    fn mmr_of(knowledge: &PrefKnowledge) -> MinimalMaxRegrets {
        RegretComputer::new(knowledge)
            .regrets()
            .unwrap()
            .minimal_max_regrets(1e-6)
            .unwrap()
    }

    #[test]
    fn test_voter_candidates_without_knowledge_are_direct_pairs() {
        let k = empty_knowledge(3, 2);
        let candidates = voter_candidates(&k, &mmr_of(&k)).unwrap();
        // Every alternative is competitive against every other, for both voters.
        assert_eq!(candidates.len(), 6);
        assert!(candidates.iter().all(|q| {
            let pref = k.partial_preference(q.voter()).unwrap();
            !pref.are_comparable(q.first(), q.second())
        }));
    }

    #[test]
    fn test_voter_candidates_are_open_questions() {
        let k = with_edges(4, 2, &[(1, 2, 1), (1, 3, 4), (2, 1, 3)]);
        for q in voter_candidates(&k, &mmr_of(&k)).unwrap() {
            let pref = k.partial_preference(q.voter()).unwrap();
            assert!(!pref.are_comparable(q.first(), q.second()), "{q}");
        }
    }

    #[test]
    fn test_no_voter_candidates_when_everything_is_known() {
        let k = with_edges(3, 1, &[(1, 1, 2), (1, 2, 3)]);
        assert!(voter_candidates(&k, &mmr_of(&k)).unwrap().is_empty());
        assert!(open_voter_questions(&k).unwrap().is_empty());
    }

    #[test]
    fn test_open_voter_questions() {
        let k = with_edges(3, 2, &[(1, 1, 2)]);
        let open = open_voter_questions(&k).unwrap();
        assert_eq!(open.len(), 2 + 3);
        assert!(!open.contains(&QuestionVoter::new(voter(1), alt(1), alt(2)).unwrap()));
    }

    #[test]
    fn test_committee_candidates() {
        let k = empty_knowledge(4, 1);
        let candidates = committee_candidates(&k).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].rank(), 1);
        assert!((candidates[0].lambda() - 2.0).abs() < 1e-6);

        assert!(committee_candidates(&empty_knowledge(2, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_settled_rank_has_no_candidate() {
        let mut k = PrefKnowledge::new(&Alternative::range(4), &[Voter::new(1)]).unwrap();
        k.add_weight_constraint(CommitteeConstraint::new(2, ComparisonOp::Eq, 1.5).unwrap())
            .unwrap();
        let candidates = committee_candidates(&k).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].rank(), 1);
    }
}
