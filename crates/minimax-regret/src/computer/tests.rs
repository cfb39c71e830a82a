//! Tests for the regret computer.

use super::*;
use minimax_core::{CommitteeConstraint, ComparisonOp, PsrWeights};
use minimax_test::ranks;
use minimax_test::{alt, complete_knowledge, empty_knowledge, voter, with_edges};

#[test]
fn test_rank_fixtures() {
    for fixture in ranks::all() {
        let pref = fixture.knowledge.partial_preference(fixture.voter).unwrap();
        assert_eq!(
            RegretComputer::worst_rank_of(fixture.x, pref),
            fixture.worst_x
        );
        assert_eq!(
            RegretComputer::best_rank_of(fixture.x, fixture.y, pref),
            fixture.best_y
        );
        assert_eq!(
            RegretComputer::best_rank_of(fixture.x, fixture.x, pref),
            fixture.worst_x
        );
    }
}

#[test]
fn test_unrelated_pair_is_treated_as_y_above_x() {
    // c only known above y, nothing about x versus y.
    let k = with_edges(4, 1, &[(1, 3, 2)]);
    let pref = k.partial_preference(voter(1)).unwrap();
    assert_eq!(RegretComputer::worst_rank_of(alt(1), pref), 4);
    assert_eq!(RegretComputer::best_rank_of(alt(1), alt(2), pref), 2);
}

#[test]
fn test_worst_rank_with_no_knowledge_is_last() {
    let k = empty_knowledge(5, 3);
    let computer = RegretComputer::new(&k);
    let ranks = computer.worst_ranks_of(alt(2));
    assert_eq!(ranks.len(), 3);
    assert!(ranks.values().all(|&r| r == 5));
    assert!(computer.best_ranks_of(alt(2), alt(4)).values().all(|&r| r == 1));
}

#[test]
fn test_two_alternatives_without_knowledge() {
    let k = empty_knowledge(2, 1);
    let computer = RegretComputer::new(&k);
    let ab = computer.pmr(alt(1), alt(2)).unwrap();
    let ba = computer.pmr(alt(2), alt(1)).unwrap();
    assert!((ab.value() - 1.0).abs() < 1e-9);
    assert!((ba.value() - 1.0).abs() < 1e-9);
    assert_eq!(ab.ranks_of_x()[&voter(1)], 2);
    assert_eq!(ab.ranks_of_y()[&voter(1)], 1);
    assert_eq!(ab.weights(), &PsrWeights::new(vec![1.0, 0.0]).unwrap());

    let regrets = computer.regrets().unwrap();
    assert!((regrets.minimal_max_regret(0.0).unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn test_single_alternative() {
    let k = empty_knowledge(1, 1);
    let computer = RegretComputer::new(&k);
    let pmrs = computer.all_pairwise_max_regrets().unwrap();
    assert_eq!(pmrs.len(), 1);
    assert_eq!(pmrs[0].value(), 0.0);
    assert_eq!(pmrs[0].ranks_of_x()[&voter(1)], 1);
    assert_eq!(pmrs[0].weights().as_slice(), &[1.0]);
}

#[test]
fn test_pmr_against_itself_is_zero() {
    let k = with_edges(4, 2, &[(1, 1, 2), (2, 3, 4)]);
    let computer = RegretComputer::new(&k);
    for pmr in computer.all_pairwise_max_regrets().unwrap() {
        assert!(pmr.value() >= 0.0);
        if pmr.x() == pmr.y() {
            assert_eq!(pmr.value(), 0.0);
            assert!(k.polytope().contains(pmr.weights(), 1e-6));
        }
    }
}

#[test]
fn test_chain_reaches_zero_regret() {
    let k = with_edges(3, 1, &[(1, 1, 2), (1, 2, 3)]);
    let regrets = RegretComputer::new(&k).regrets().unwrap();
    assert_eq!(regrets.minimal_max_regret(0.0).unwrap(), 0.0);
    let mmr = regrets.minimal_max_regrets(0.0).unwrap();
    assert_eq!(mmr.alternatives().collect::<Vec<_>>(), vec![alt(1)]);
}

#[test]
fn test_complete_profile_selects_single_alternative() {
    let k = complete_knowledge(&[&[1, 2, 3, 4], &[4, 1, 2, 3], &[3, 1, 2, 4]]);
    let regrets = RegretComputer::new(&k).regrets().unwrap();
    let mmr = regrets.minimal_max_regrets(1e-6).unwrap();
    assert_eq!(mmr.alternatives().collect::<Vec<_>>(), vec![alt(1)]);
    assert!(mmr.value().abs() < 1e-6);

    // a1 beats a2 for every voter, so that regret is floored at 0 as well.
    let mut ys: Vec<Alternative> = mmr.pmrs_of(alt(1)).iter().map(|p| p.y()).collect();
    ys.sort();
    assert_eq!(ys, Alternative::range(4));
    for other in 2..=4 {
        assert!(regrets.max_regret_of(alt(other)).unwrap() > 0.1);
    }
}

#[test]
fn test_mmr_does_not_increase_with_knowledge() {
    let facts = [(1, 1, 2), (2, 3, 1), (1, 3, 4), (2, 2, 4), (1, 2, 3)];
    let mut k = empty_knowledge(4, 2);
    let mut previous = RegretComputer::new(&k)
        .regrets()
        .unwrap()
        .minimal_max_regret(0.0)
        .unwrap();
    for &(v, w, l) in &facts {
        k.add_voter_preference(voter(v), alt(w), alt(l)).unwrap();
        let current = RegretComputer::new(&k)
            .regrets()
            .unwrap()
            .minimal_max_regret(0.0)
            .unwrap();
        assert!(current <= previous + 1e-9, "{current} > {previous}");
        previous = current;
    }

    k.add_weight_constraint(CommitteeConstraint::new(1, ComparisonOp::Ge, 2.0).unwrap())
        .unwrap();
    let current = RegretComputer::new(&k)
        .regrets()
        .unwrap()
        .minimal_max_regret(0.0)
        .unwrap();
    assert!(current <= previous + 1e-9);
}

#[test]
fn test_parallelism_does_not_change_results() {
    let k = with_edges(4, 3, &[(1, 1, 2), (2, 4, 3), (3, 2, 1)]);
    let sequential = RegretComputer::new(&k)
        .with_parallelism(Parallelism::Sequential)
        .all_pairwise_max_regrets()
        .unwrap();
    let global = RegretComputer::new(&k).all_pairwise_max_regrets().unwrap();
    let pool = RegretComputer::new(&k)
        .with_parallelism(Parallelism::with_threads(2).unwrap())
        .all_pairwise_max_regrets()
        .unwrap();
    assert_eq!(sequential.len(), 16);
    let values = |pmrs: &[PairwiseMaxRegret]| -> Vec<(Alternative, Alternative, f64)> {
        pmrs.iter().map(|p| (p.x(), p.y(), p.value())).collect()
    };
    assert_eq!(values(&sequential), values(&global));
    assert_eq!(values(&sequential), values(&pool));
}

#[test]
fn test_unknown_alternative_is_rejected() {
    let k = empty_knowledge(2, 1);
    let computer = RegretComputer::new(&k);
    assert!(matches!(
        computer.pmr(alt(1), alt(7)),
        Err(ElicitationError::InvalidArgument(_))
    ));
}
