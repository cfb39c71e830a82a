//! Questions asked during elicitation and their answers.

use std::fmt;

use crate::error::{ElicitationError, Result};
use crate::ids::{Alternative, Voter};
use crate::lp::ComparisonOp;
use crate::polytope::CommitteeConstraint;

/// Kind of question, used by sequencing constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuestionKind {
    /// Ask a voter to compare two alternatives.
    Voter,
    /// Ask the committee about the scoring weights.
    Committee,
}

impl QuestionKind {
    /// One-letter tag: `v` or `c`.
    pub fn tag(&self) -> char {
        match self {
            QuestionKind::Voter => 'v',
            QuestionKind::Committee => 'c',
        }
    }
}

/// Answer to a question.
///
/// For a voter question, `Greater` means the first alternative (the one with
/// the smaller id) is preferred and `Lower` that the second one is. For a
/// committee question the answer is the operator of the resulting
/// constraint `d_rank op lambda * d_{rank+1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Answer {
    Greater,
    Equal,
    Lower,
}

impl Answer {
    pub fn comparison_op(&self) -> ComparisonOp {
        match self {
            Answer::Greater => ComparisonOp::Ge,
            Answer::Equal => ComparisonOp::Eq,
            Answer::Lower => ComparisonOp::Le,
        }
    }
}

/// Question to a voter: which of two distinct alternatives do you prefer?
///
/// The pair is unordered: `QuestionVoter::new(v, a, b)` and
/// `QuestionVoter::new(v, b, a)` are equal and hash alike.
///
/// # Examples
///
/// ```
/// use minimax_core::{Alternative, QuestionVoter, Voter};
///
/// let v = Voter::new(1);
/// let (a, b) = (Alternative::new(1), Alternative::new(2));
/// assert_eq!(QuestionVoter::new(v, b, a).unwrap(), QuestionVoter::new(v, a, b).unwrap());
/// assert!(QuestionVoter::new(v, a, a).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestionVoter {
    voter: Voter,
    first: Alternative,
    second: Alternative,
}

impl QuestionVoter {
    pub fn new(voter: Voter, a: Alternative, b: Alternative) -> Result<Self> {
        if a == b {
            return Err(ElicitationError::InvalidQuestion(format!(
                "{voter} cannot be asked to compare {a} with itself"
            )));
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(QuestionVoter {
            voter,
            first,
            second,
        })
    }

    #[inline]
    pub fn voter(&self) -> Voter {
        self.voter
    }

    /// The alternative with the smaller id.
    #[inline]
    pub fn first(&self) -> Alternative {
        self.first
    }

    #[inline]
    pub fn second(&self) -> Alternative {
        self.second
    }

    /// `(winner, loser)` according to `answer`.
    pub fn ordered_by(&self, answer: Answer) -> Result<(Alternative, Alternative)> {
        match answer {
            Answer::Greater => Ok((self.first, self.second)),
            Answer::Lower => Ok((self.second, self.first)),
            Answer::Equal => Err(ElicitationError::InvalidQuestion(format!(
                "{} cannot be indifferent between {} and {}",
                self.voter, self.first, self.second
            ))),
        }
    }
}

impl fmt::Display for QuestionVoter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} vs {}", self.voter, self.first, self.second)
    }
}

/// Question to the committee: is `d_rank >= lambda * d_{rank+1}`?
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestionCommittee {
    rank: usize,
    lambda: f64,
}

impl QuestionCommittee {
    pub fn new(rank: usize, lambda: f64) -> Result<Self> {
        CommitteeConstraint::new(rank, ComparisonOp::Ge, lambda)?;
        Ok(QuestionCommittee { rank, lambda })
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// The constraint learned from `answer`.
    pub fn constraint_for(&self, answer: Answer) -> CommitteeConstraint {
        CommitteeConstraint::from_parts(self.rank, answer.comparison_op(), self.lambda)
    }
}

impl fmt::Display for QuestionCommittee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "committee: d{} vs {} × d{}",
            self.rank,
            self.lambda,
            self.rank + 1
        )
    }
}

/// A question for the voters or for the committee.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Question {
    Voter(QuestionVoter),
    Committee(QuestionCommittee),
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::Voter(_) => QuestionKind::Voter,
            Question::Committee(_) => QuestionKind::Committee,
        }
    }

    pub fn as_voter(&self) -> Option<&QuestionVoter> {
        match self {
            Question::Voter(q) => Some(q),
            Question::Committee(_) => None,
        }
    }

    pub fn as_committee(&self) -> Option<&QuestionCommittee> {
        match self {
            Question::Committee(q) => Some(q),
            Question::Voter(_) => None,
        }
    }

    /// The two answers a strategy plans for: `Greater` and `Lower`.
    pub fn binary_answers() -> [Answer; 2] {
        [Answer::Greater, Answer::Lower]
    }
}

impl From<QuestionVoter> for Question {
    fn from(q: QuestionVoter) -> Self {
        Question::Voter(q)
    }
}

impl From<QuestionCommittee> for Question {
    fn from(q: QuestionCommittee) -> Self {
        Question::Committee(q)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Question::Voter(q) => q.fmt(f),
            Question::Committee(q) => q.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_voter_question_is_symmetric() {
        let v = Voter::new(3);
        let a = Alternative::new(5);
        let b = Alternative::new(2);
        let q1 = QuestionVoter::new(v, a, b).unwrap();
        let q2 = QuestionVoter::new(v, b, a).unwrap();

        let mut set = HashSet::new();
        set.insert(q1);
        assert!(set.contains(&q2));
        assert_eq!(q1.first(), b);
        assert_eq!(q1.second(), a);
    }

    #[test]
    fn test_voter_answer_orders_pair() {
        let q = QuestionVoter::new(Voter::new(1), Alternative::new(1), Alternative::new(2)).unwrap();
        assert_eq!(
            q.ordered_by(Answer::Greater).unwrap(),
            (Alternative::new(1), Alternative::new(2))
        );
        assert_eq!(
            q.ordered_by(Answer::Lower).unwrap(),
            (Alternative::new(2), Alternative::new(1))
        );
        assert!(q.ordered_by(Answer::Equal).is_err());
    }

    #[test]
    fn test_committee_constraint_for_answer() {
        let q = QuestionCommittee::new(2, 1.5).unwrap();
        assert_eq!(q.constraint_for(Answer::Greater).op(), ComparisonOp::Ge);
        assert_eq!(q.constraint_for(Answer::Lower).op(), ComparisonOp::Le);
        assert_eq!(q.constraint_for(Answer::Equal).op(), ComparisonOp::Eq);
        assert!(QuestionCommittee::new(0, 1.5).is_err());
    }

    #[test]
    fn test_kind() {
        let q: Question = QuestionCommittee::new(1, 2.0).unwrap().into();
        assert_eq!(q.kind(), QuestionKind::Committee);
        assert!(q.as_voter().is_none());
        assert_eq!(QuestionKind::Committee.tag(), 'c');
    }
}
