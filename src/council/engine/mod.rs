mod anomaly;
mod config;
mod confidence;
mod consensus;
mod resolve;
mod risk;

pub use config::{
    AnomalyThresholds, ConfidenceTuning, ConfidenceWeights, ConfigError, DecisionThresholds,
    EngineConfig, GradeRiskTable, OutcomeAdjustmentTable, WeightCurve,
};

use crate::council::domain::{Decision, LoanApplication, OpinionSet, RetrievedCase, SimilarityMatch};

/// Validation errors raised while checking evaluation inputs. Malformed
/// input fails fast; nothing is silently coerced.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("match {index} ({case_id}) has negative distance {distance}")]
    NegativeDistance {
        index: usize,
        case_id: String,
        distance: f64,
    },
    #[error("match {index} ({case_id}) has non-finite distance")]
    NonFiniteDistance { index: usize, case_id: String },
    #[error("match {index} ({case_id}) breaks ascending distance order")]
    UnorderedMatches { index: usize, case_id: String },
}

/// Deterministic decision engine over immutable snapshots.
///
/// Construction validates the configuration; evaluation validates the
/// inputs, runs each scoring concern over the same snapshot, and resolves a
/// terminal status. The engine holds no mutable state, performs no I/O, and
/// is freely shareable across concurrent evaluations.
#[derive(Debug)]
pub struct CouncilEngine {
    config: EngineConfig,
}

impl CouncilEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one application against its retrieved precedents and the
    /// completed opinion set. Identical inputs always produce an identical
    /// decision.
    pub fn evaluate(
        &self,
        application: &LoanApplication,
        retrieved: &[RetrievedCase],
        opinions: OpinionSet,
    ) -> Result<Decision, EvaluationError> {
        let precedents = self.weigh(retrieved)?;

        let consensus = consensus::aggregate(&opinions);
        let risk_score = risk::proximity_risk(&precedents, &self.config);
        let anomaly = anomaly::assess(application, &precedents, &self.config.anomaly);
        let (confidence_score, confidence_breakdown) =
            confidence::compose(&consensus, &precedents, &opinions, &anomaly, &self.config);
        let status = resolve::resolve(
            &consensus,
            risk_score,
            confidence_score,
            &anomaly,
            &self.config.thresholds,
        );

        Ok(Decision {
            status,
            confidence_score,
            risk_score,
            confidence_breakdown,
            consensus,
            anomaly,
            opinions,
            precedents,
        })
    }

    /// Validate the retrieved sequence and derive similarity weights from the
    /// configured curve. The input contract requires ascending distance
    /// order; a violation is rejected rather than re-sorted.
    fn weigh(&self, retrieved: &[RetrievedCase]) -> Result<Vec<SimilarityMatch>, EvaluationError> {
        let mut matches = Vec::with_capacity(retrieved.len());
        let mut previous = 0.0_f64;
        for (index, entry) in retrieved.iter().enumerate() {
            if !entry.distance.is_finite() {
                return Err(EvaluationError::NonFiniteDistance {
                    index,
                    case_id: entry.case.id.clone(),
                });
            }
            if entry.distance < 0.0 {
                return Err(EvaluationError::NegativeDistance {
                    index,
                    case_id: entry.case.id.clone(),
                    distance: entry.distance,
                });
            }
            if entry.distance < previous {
                return Err(EvaluationError::UnorderedMatches {
                    index,
                    case_id: entry.case.id.clone(),
                });
            }
            previous = entry.distance;

            matches.push(SimilarityMatch {
                case: entry.case.clone(),
                distance: entry.distance,
                weight: self.config.weight_curve.weight(entry.distance),
            });
        }
        Ok(matches)
    }
}
