use super::*;
use minimax_config::{LotteryPolicy, QuestioningConstraint};
use minimax_core::{ElicitationError, Oracle, QuestionKind};
use minimax_test::{complete_knowledge, empty_knowledge, oracle};

const EPS: f64 = 1e-6;

/// Asks `count` questions, answering them with `oracle`.
fn ask(strategy: &mut dyn Strategy, oracle: &Oracle, count: usize) -> Vec<Question> {
    let mut knowledge = empty_knowledge(
        oracle.alternatives().len() as u32,
        oracle.voters().len() as u32,
    );
    (0..count)
        .map(|_| {
            let question = strategy.next_question(&knowledge).unwrap();
            let answer = oracle.answer(&question).unwrap();
            knowledge.update(&question, answer).unwrap();
            question
        })
        .collect()
}

fn borda_oracle() -> Oracle {
    oracle(
        &[&[1, 2, 3, 4], &[3, 4, 1, 2]],
        &[1.0, 2.0 / 3.0, 1.0 / 3.0, 0.0],
    )
}

#[test]
fn test_same_seed_same_questions() {
    let oracle = borda_oracle();
    let first = ask(&mut StrategyByMmr::pessimistic(LotteryPolicy::Max, EPS, 9), &oracle, 4);
    let second = ask(&mut StrategyByMmr::pessimistic(LotteryPolicy::Max, EPS, 9), &oracle, 4);
    assert_eq!(first, second);

    let first = ask(&mut StrategyRandom::new(9), &oracle, 4);
    let second = ask(&mut StrategyRandom::new(9), &oracle, 4);
    assert_eq!(first, second);
}

#[test]
fn test_committee_then_voters() {
    let mut strategy = StrategyByMmr::limited(
        LotteryPolicy::Max,
        vec![
            QuestioningConstraint::of(QuestionKind::Committee, 2),
            QuestioningConstraint::unbounded(QuestionKind::Voter),
        ],
        EPS,
        3,
    );
    let kinds: Vec<QuestionKind> = ask(&mut strategy, &borda_oracle(), 3)
        .iter()
        .map(Question::kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            QuestionKind::Committee,
            QuestionKind::Committee,
            QuestionKind::Voter
        ]
    );
    assert_eq!(strategy.quota().asked(), &[2, 1]);
    assert_eq!(strategy.describe(), "Limited, constrained to [2c, ∞v]");
}

#[test]
fn test_voters_then_committee() {
    let mut strategy = StrategyByMmr::limited(
        LotteryPolicy::Mean,
        vec![
            QuestioningConstraint::of(QuestionKind::Voter, 1),
            QuestioningConstraint::unbounded(QuestionKind::Committee),
        ],
        EPS,
        3,
    );
    let questions = ask(&mut strategy, &borda_oracle(), 2);
    assert_eq!(questions[0].kind(), QuestionKind::Voter);
    assert_eq!(questions[1].kind(), QuestionKind::Committee);
    assert_eq!(
        strategy.describe(),
        "Limited Mean, constrained to [1v, ∞c]"
    );
}

#[test]
fn test_pessimistic_reaches_zero_regret() {
    let oracle = oracle(&[&[1, 2, 3]], &[1.0, 0.4, 0.0]);
    for policy in [LotteryPolicy::Max, LotteryPolicy::Min, LotteryPolicy::Mean] {
        let mut strategy = StrategyByMmr::pessimistic(policy, EPS, 1);
        let mut knowledge = empty_knowledge(3, 1);
        let mut asked = 0;
        loop {
            let mmr = minimax_regret::RegretComputer::new(&knowledge)
                .regrets()
                .unwrap()
                .minimal_max_regret(EPS)
                .unwrap();
            if mmr <= EPS {
                break;
            }
            assert!(asked < 10, "{policy} still at {mmr} after {asked} questions");
            let question = strategy.next_question(&knowledge).unwrap();
            knowledge
                .update(&question, oracle.answer(&question).unwrap())
                .unwrap();
            asked += 1;
        }
    }
}

#[test]
fn test_limited_committee_only_with_two_alternatives_is_exhausted() {
    let mut strategy = StrategyByMmr::limited(
        LotteryPolicy::Max,
        vec![QuestioningConstraint::of(QuestionKind::Committee, 1)],
        EPS,
        0,
    );
    assert!(matches!(
        strategy.next_question(&empty_knowledge(2, 1)),
        Err(ElicitationError::ExhaustedStrategy(_))
    ));
    assert_eq!(strategy.quota().asked(), &[0]);
}

#[test]
fn test_random_on_complete_knowledge_is_exhausted() {
    let knowledge = complete_knowledge(&[&[2, 1], &[1, 2]]);
    assert!(matches!(
        StrategyRandom::new(0).next_question(&knowledge),
        Err(ElicitationError::ExhaustedStrategy(_))
    ));
}

#[test]
fn test_random_asks_open_questions_only() {
    let knowledge = minimax_test::with_edges(3, 1, &[(1, 1, 2)]);
    let mut strategy = StrategyRandom::new(4);
    for _ in 0..20 {
        match strategy.next_question(&knowledge).unwrap() {
            Question::Voter(q) => {
                let pref = knowledge.partial_preference(q.voter()).unwrap();
                assert!(!pref.are_comparable(q.first(), q.second()));
            }
            Question::Committee(q) => assert_eq!(q.rank(), 1),
        }
    }
    assert_eq!(strategy.describe(), "Random");
}
