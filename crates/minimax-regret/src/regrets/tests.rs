//! Tests for MMR selection.

use super::*;
use minimax_core::PsrWeights;

fn pmr(x: u32, y: u32, value: f64) -> PairwiseMaxRegret {
    PairwiseMaxRegret::new(
        Alternative::new(x),
        Alternative::new(y),
        BTreeMap::new(),
        BTreeMap::new(),
        PsrWeights::new(vec![1.0, 0.5, 0.0]).unwrap(),
        value,
    )
}

fn regrets() -> Regrets {
    Regrets::new([
        pmr(1, 1, 0.0),
        pmr(1, 2, 1.0),
        pmr(1, 3, 0.875),
        pmr(2, 2, 0.0),
        pmr(2, 1, 1.125),
        pmr(3, 3, 0.0),
        pmr(3, 1, 1.375),
    ])
}

#[test]
fn test_groups_are_sorted_by_decreasing_value() {
    let r = regrets();
    let values: Vec<f64> = r.pmrs_of(Alternative::new(1)).iter().map(|p| p.value()).collect();
    assert_eq!(values, vec![1.0, 0.875, 0.0]);
    assert_eq!(r.max_regret_of(Alternative::new(3)).unwrap(), 1.375);
    assert!(r.max_regret_of(Alternative::new(9)).is_err());
    assert_eq!(r.all_regrets().count(), 7);
}

#[test]
fn test_regrets_sorted() {
    let sorted = regrets().regrets_sorted();
    let ids: Vec<u32> = sorted.iter().map(|(a, _)| a.id()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_minimal_max_regret_without_epsilon() {
    let r = regrets();
    assert_eq!(r.minimal_max_regret(0.0).unwrap(), 1.0);
    let mmr = r.minimal_max_regrets(0.0).unwrap();
    assert_eq!(mmr.len(), 1);
    let pmrs = mmr.pmrs_of(Alternative::new(1));
    assert_eq!(pmrs.len(), 1);
    assert_eq!(pmrs[0].y(), Alternative::new(2));
    assert!(pmrs.iter().all(|p| p.value() == mmr.value()));
}

#[test]
fn test_minimal_max_regret_with_epsilon() {
    let r = regrets();
    assert_eq!(r.minimal_max_regret(0.25).unwrap(), 1.125);
    let mmr = r.minimal_max_regrets(0.25).unwrap();
    assert_eq!(
        mmr.alternatives().collect::<Vec<_>>(),
        vec![Alternative::new(1), Alternative::new(2)]
    );
    // PMRs of a1 within [0.875, 1.125].
    let ys: Vec<u32> = mmr.pmrs_of(Alternative::new(1)).iter().map(|p| p.y().id()).collect();
    assert_eq!(ys, vec![2, 3]);
}

#[test]
fn test_dead_zone_is_reported() {
    let r = Regrets::new([pmr(1, 2, 1.0), pmr(2, 1, 1.125), pmr(3, 1, 1.3)]);
    // 1.3 lies in (1.125, 1.375).
    assert!(matches!(
        r.minimal_max_regret(0.25),
        Err(ElicitationError::InconsistentRegrets(_))
    ));
    assert_eq!(r.minimal_max_regret(0.5).unwrap(), 1.3);
}

#[test]
fn test_invalid_epsilon() {
    let r = regrets();
    assert!(r.minimal_max_regret(-1.0).is_err());
    assert!(r.minimal_max_regret(f64::NAN).is_err());
    assert!(Regrets::new(Vec::new()).minimal_max_regret(0.0).is_err());
}
