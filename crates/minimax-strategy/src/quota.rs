//! Sequencing constraints on question kinds.

use minimax_config::QuestioningConstraint;
use minimax_core::{ElicitationError, QuestionKind, Result};

/// Phases of questions, each limited to one kind.
///
/// The active phase is the first one that still has room and for which a
/// question is available; phases without available questions are passed
/// over without being consumed. With no phase at all every kind is allowed.
///
/// # Examples
///
/// ```
/// use minimax_config::QuestioningConstraint;
/// use minimax_core::QuestionKind;
/// use minimax_strategy::QuestionQuota;
///
/// let mut quota = QuestionQuota::new(vec![
///     QuestioningConstraint::of(QuestionKind::Committee, 1),
///     QuestioningConstraint::unbounded(QuestionKind::Voter),
/// ]);
/// let anything = |_| true;
///
/// assert_eq!(quota.select(anything).unwrap(), Some((0, QuestionKind::Committee)));
/// quota.record(0);
/// assert_eq!(quota.select(anything).unwrap(), Some((1, QuestionKind::Voter)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionQuota {
    phases: Vec<QuestioningConstraint>,
    asked: Vec<usize>,
}

impl QuestionQuota {
    pub fn new(phases: Vec<QuestioningConstraint>) -> Self {
        let asked = vec![0; phases.len()];
        QuestionQuota { phases, asked }
    }

    /// A quota allowing every kind, without limit.
    pub fn unconstrained() -> Self {
        Self::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phases(&self) -> &[QuestioningConstraint] {
        &self.phases
    }

    /// Questions asked in each phase so far.
    pub fn asked(&self) -> &[usize] {
        &self.asked
    }

    fn has_room(&self, phase: usize) -> bool {
        match self.phases[phase].number {
            Some(limit) => self.asked[phase] < limit,
            None => true,
        }
    }

    /// The phase the next question must come from, with its kind.
    ///
    /// `available` tells whether some question of a kind can be asked.
    /// Returns `Ok(None)` when unconstrained.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::ExhaustedStrategy`] when no phase has both room
    /// and an available question.
    pub fn select(
        &self,
        available: impl Fn(QuestionKind) -> bool,
    ) -> Result<Option<(usize, QuestionKind)>> {
        if self.is_unconstrained() {
            return Ok(None);
        }
        (0..self.phases.len())
            .find(|&phase| self.has_room(phase) && available(self.phases[phase].kind))
            .map(|phase| Some((phase, self.phases[phase].kind)))
            .ok_or_else(|| {
                ElicitationError::ExhaustedStrategy(format!(
                    "no admissible question left, asked {:?} in phases {}",
                    self.asked,
                    self.describe()
                ))
            })
    }

    /// Counts one question asked in `phase`.
    pub fn record(&mut self, phase: usize) {
        if let Some(count) = self.asked.get_mut(phase) {
            *count += 1;
        }
    }

    /// `[2c, ∞v]` style description.
    pub fn describe(&self) -> String {
        let phases: Vec<String> = self.phases.iter().map(|p| p.to_string()).collect();
        format!("[{}]", phases.join(", "))
    }
}
