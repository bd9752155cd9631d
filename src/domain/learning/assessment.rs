//! Assessment attempts: quizzes, trading simulations and module checks.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AttemptId, DomainError, Percentage, Timestamp};

/// Score needed to pass any assessment.
pub const PASS_THRESHOLD: Percentage = Percentage::new(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    Quiz,
    Simulation,
    ModuleCheck,
}

/// One graded attempt, stored on the learning progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentAttempt {
    pub id: AttemptId,
    pub kind: AssessmentKind,
    /// Caller-defined reference, e.g. the quiz slug or module id.
    pub reference: String,
    pub score: u32,
    pub max_score: u32,
    pub passed: bool,
    pub attempted_at: Timestamp,
}

impl AssessmentAttempt {
    /// Grades a raw score.
    pub fn grade(
        kind: AssessmentKind,
        reference: impl Into<String>,
        score: u32,
        max_score: u32,
    ) -> Result<Self, DomainError> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(DomainError::validation("reference", "reference cannot be empty"));
        }
        if max_score == 0 {
            return Err(DomainError::validation("max_score", "max_score must be positive"));
        }
        if score > max_score {
            return Err(DomainError::validation("score", "score cannot exceed max_score")
                .with_detail("max_score", max_score.to_string()));
        }
        let passed =
            u64::from(score) * 100 >= u64::from(PASS_THRESHOLD.value()) * u64::from(max_score);
        Ok(Self {
            id: AttemptId::new(),
            kind,
            reference,
            score,
            max_score,
            passed,
            attempted_at: Timestamp::now(),
        })
    }

    pub fn percentage(&self) -> Percentage {
        Percentage::from_ratio(self.score as usize, self.max_score as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_percent_passes() {
        let attempt = AssessmentAttempt::grade(AssessmentKind::Quiz, "q1", 6, 10).unwrap();
        assert!(attempt.passed);
        assert_eq!(attempt.percentage().value(), 60);
    }

    #[test]
    fn just_below_threshold_fails() {
        let attempt = AssessmentAttempt::grade(AssessmentKind::Simulation, "sim", 59, 100).unwrap();
        assert!(!attempt.passed);
    }

    #[test]
    fn score_above_max_is_rejected() {
        assert!(AssessmentAttempt::grade(AssessmentKind::ModuleCheck, "m", 11, 10).is_err());
        assert!(AssessmentAttempt::grade(AssessmentKind::ModuleCheck, "m", 0, 0).is_err());
    }
}
