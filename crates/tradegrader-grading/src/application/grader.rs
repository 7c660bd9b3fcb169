//! Trade graders.
//!
//! [`TradeGrader`] is the seam between the analyze handler and whatever
//! produces a score. [`HeuristicGrader`] needs nothing external;
//! [`FallbackGrader`] puts it behind a model-backed grader.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::warn;
use tradegrader_core::error::DomainError;
use tradegrader_core::rng::DeterministicRng;

use crate::domain::scoring::{GradeReport, HEURISTIC_JITTER, heuristic_report};

/// Produces a grade report for a trade.
#[async_trait]
pub trait TradeGrader: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Grades the trade from the perspective of the user making it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Upstream` if an external grader fails.
    async fn grade(
        &self,
        incoming: &[String],
        outgoing: &[String],
    ) -> Result<GradeReport, DomainError>;
}

/// Scores by player counts plus bounded random jitter.
pub struct HeuristicGrader {
    rng: Mutex<Box<dyn DeterministicRng>>,
}

impl std::fmt::Debug for HeuristicGrader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicGrader").finish_non_exhaustive()
    }
}

impl HeuristicGrader {
    /// Creates a grader drawing jitter from `rng`.
    #[must_use]
    pub fn new(rng: impl DeterministicRng + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }
}

#[async_trait]
impl TradeGrader for HeuristicGrader {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn grade(
        &self,
        incoming: &[String],
        outgoing: &[String],
    ) -> Result<GradeReport, DomainError> {
        let jitter = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
            rng.next_i32_range(-HEURISTIC_JITTER, HEURISTIC_JITTER)
        };
        Ok(heuristic_report(incoming.len(), outgoing.len(), jitter))
    }
}

/// Tries `primary`, and answers from `fallback` if it fails.
#[derive(Clone)]
pub struct FallbackGrader {
    primary: Arc<dyn TradeGrader>,
    fallback: Arc<dyn TradeGrader>,
}

impl std::fmt::Debug for FallbackGrader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackGrader")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl FallbackGrader {
    /// Creates a grader that prefers `primary`.
    #[must_use]
    pub fn new(primary: Arc<dyn TradeGrader>, fallback: Arc<dyn TradeGrader>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl TradeGrader for FallbackGrader {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    async fn grade(
        &self,
        incoming: &[String],
        outgoing: &[String],
    ) -> Result<GradeReport, DomainError> {
        match self.primary.grade(incoming, outgoing).await {
            Ok(report) => Ok(report),
            Err(e) => {
                warn!(
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    error = %e,
                    "primary grader failed, falling back"
                );
                self.fallback.grade(incoming, outgoing).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradegrader_core::model::Grade;
    use tradegrader_test_support::{MockRng, SequenceRng};

    struct BrokenGrader;

    #[async_trait]
    impl TradeGrader for BrokenGrader {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn grade(&self, _: &[String], _: &[String]) -> Result<GradeReport, DomainError> {
            Err(DomainError::Upstream("quota exceeded".to_owned()))
        }
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    #[tokio::test]
    async fn test_heuristic_grader_uses_rng_jitter() {
        // Arrange
        let grader = HeuristicGrader::new(SequenceRng::new(vec![15, -30]));
        let incoming = names(&["Patrick Mahomes (KC - QB)"]);
        let outgoing = names(&["Justin Jefferson (MIN - WR)"]);

        // Act
        let first = grader.grade(&incoming, &outgoing).await.unwrap();
        let second = grader.grade(&incoming, &outgoing).await.unwrap();

        // Assert
        assert_eq!(first.score, 66);
        assert_eq!(first.grade, Grade::Good);
        // -30 is clamped to the jitter bound.
        assert_eq!(second.score, 31);
        assert_eq!(second.grade, Grade::VeryPoor);
    }

    #[tokio::test]
    async fn test_fallback_grader_answers_from_fallback_when_primary_fails() {
        // Arrange
        let grader = FallbackGrader::new(
            Arc::new(BrokenGrader),
            Arc::new(HeuristicGrader::new(MockRng)),
        );

        // Act
        let report = grader
            .grade(&names(&["A", "B"]), &names(&["C"]))
            .await
            .unwrap();

        // Assert
        assert_eq!(report.score, 54);
    }

    #[tokio::test]
    async fn test_fallback_grader_prefers_primary() {
        let grader = FallbackGrader::new(
            Arc::new(HeuristicGrader::new(SequenceRng::new(vec![20]))),
            Arc::new(BrokenGrader),
        );

        let report = grader.grade(&names(&["A"]), &names(&["B"])).await.unwrap();

        assert_eq!(report.score, 71);
        assert_eq!(grader.name(), "heuristic");
    }
}
