//! Tests for the weight polytope.

use super::*;
use crate::lp::MinilpSolver;

fn weight_of_rank(m: usize, rank: usize) -> Vec<f64> {
    let mut objective = vec![0.0; m];
    objective[rank - 1] = 1.0;
    objective
}

#[test]
fn test_base_polytope_bounds() {
    let polytope = WeightPolytope::new(4);
    // Convexity caps w_2 at (m - 2) / (m - 1) (Borda).
    let (value, weights) = polytope.maximize(&MinilpSolver, &weight_of_rank(4, 2)).unwrap();
    assert!((value - 2.0 / 3.0).abs() < 1e-6);
    assert!(polytope.contains(&weights, 1e-6));

    // w_2 can drop to 0 (plurality).
    let (value, _) = polytope
        .maximize(&MinilpSolver, &[0.0, -1.0, 0.0, 0.0])
        .unwrap();
    assert!(value.abs() < 1e-6);
}

#[test]
fn test_two_ranks_is_a_single_point() {
    let polytope = WeightPolytope::new(2);
    let weights = polytope.feasible_point(&MinilpSolver).unwrap();
    assert_eq!(weights.as_slice(), &[1.0, 0.0]);
}

#[test]
fn test_single_rank() {
    let polytope = WeightPolytope::new(1);
    let (value, weights) = polytope.maximize(&MinilpSolver, &[1.0]).unwrap();
    assert!((value - 1.0).abs() < 1e-9);
    assert_eq!(weights.as_slice(), &[1.0]);
}

#[test]
fn test_with_constraint_is_append_only() {
    let polytope = WeightPolytope::new(4);
    let c = CommitteeConstraint::new(2, ComparisonOp::Le, 1.5).unwrap();
    let tightened = polytope.with_constraint(c).unwrap();
    assert!(polytope.committee_constraints().is_empty());
    assert_eq!(tightened.committee_constraints(), &[c]);
}

#[test]
fn test_constraint_on_missing_gap_is_rejected() {
    let polytope = WeightPolytope::new(3);
    let c = CommitteeConstraint::new(2, ComparisonOp::Ge, 2.0).unwrap();
    assert!(matches!(
        polytope.with_constraint(c),
        Err(ElicitationError::InvalidQuestion(_))
    ));
    assert!(CommitteeConstraint::new(0, ComparisonOp::Ge, 2.0).is_err());
    assert!(CommitteeConstraint::new(1, ComparisonOp::Ge, f64::NAN).is_err());
    assert!(CommitteeConstraint::new(1, ComparisonOp::Ge, 0.0).is_err());
}

#[test]
fn test_contradiction_is_infeasible() {
    // Convexity already forces d1 >= d2, so d1 <= 0.5 d2 leaves only d1 = d2 = 0,
    // which contradicts w_1 = 1.
    let polytope = WeightPolytope::new(3)
        .with_constraint(CommitteeConstraint::new(1, ComparisonOp::Le, 0.5).unwrap())
        .unwrap();
    assert!(matches!(
        polytope.check_feasible(&MinilpSolver),
        Err(ElicitationError::InfeasibleConstraint(_))
    ));
}

#[test]
fn test_lambda_range_base_is_unbounded() {
    let polytope = WeightPolytope::new(4);
    let range = polytope.lambda_range(&MinilpSolver, 1).unwrap().unwrap();
    assert!((range.lower - 1.0).abs() < 1e-6);
    assert_eq!(range.upper, None);
    assert!((range.split_point() - 2.0).abs() < 1e-6);
    assert!(!range.is_settled(LAMBDA_RANGE_TOLERANCE));
}

#[test]
fn test_lambda_range_narrows() {
    let polytope = WeightPolytope::new(4)
        .with_constraint(CommitteeConstraint::new(1, ComparisonOp::Le, 3.0).unwrap())
        .unwrap();
    let range = polytope.lambda_range(&MinilpSolver, 1).unwrap().unwrap();
    assert!((range.lower - 1.0).abs() < 1e-6);
    assert!((range.upper.unwrap() - 3.0).abs() < 1e-6);
    assert!((range.split_point() - 2.0).abs() < 1e-6);

    let settled = polytope
        .with_constraint(CommitteeConstraint::new(1, ComparisonOp::Eq, 3.0).unwrap())
        .unwrap();
    let range = settled.lambda_range(&MinilpSolver, 1).unwrap().unwrap();
    assert!(range.is_settled(LAMBDA_RANGE_TOLERANCE));
}

#[test]
fn test_equal_and_zero_gaps_are_feasible() {
    let polytope = WeightPolytope::new(4);
    assert!(polytope.contains(&PsrWeights::borda(4).unwrap(), 1e-9));
    assert!(polytope.contains(&PsrWeights::new(vec![1.0, 0.0, 0.0, 0.0]).unwrap(), 1e-9));
    assert!(polytope.contains(&PsrWeights::new(vec![1.0, 0.5, 0.0, 0.0]).unwrap(), 1e-9));
}

#[test]
fn test_ratio_is_undefined_once_gaps_are_forced_flat() {
    // 3 d3 <= d2 <= 2 d3 only holds with d2 = d3 = 0.
    let polytope = WeightPolytope::new(4)
        .with_constraint(CommitteeConstraint::new(2, ComparisonOp::Ge, 3.0).unwrap())
        .unwrap()
        .with_constraint(CommitteeConstraint::new(2, ComparisonOp::Le, 2.0).unwrap())
        .unwrap();
    let weights = polytope.feasible_point(&MinilpSolver).unwrap();
    assert!((weights.weight_at_rank(2)).abs() < 1e-6);

    assert_eq!(polytope.lambda_range(&MinilpSolver, 2).unwrap(), None);
    assert_eq!(polytope.lambda_range(&MinilpSolver, 1).unwrap(), None);
}

#[test]
fn test_lambda_range_out_of_bounds() {
    let polytope = WeightPolytope::new(3);
    assert!(polytope.lambda_range(&MinilpSolver, 2).is_err());
    assert!(polytope.lambda_range(&MinilpSolver, 0).is_err());
}

#[test]
fn test_committee_constraint_satisfaction() {
    let weights = PsrWeights::new(vec![1.0, 0.5, 0.2, 0.0]).unwrap();
    // d1 = 0.5, d2 = 0.3
    let ge = CommitteeConstraint::new(1, ComparisonOp::Ge, 1.5).unwrap();
    let le = CommitteeConstraint::new(1, ComparisonOp::Le, 1.5).unwrap();
    assert!(ge.is_satisfied_by(&weights, 1e-9));
    assert!(!le.is_satisfied_by(&weights, 1e-9));
    assert_eq!(ge.to_string(), "d1 ≥ 1.5 × d2");
}
