use serde::{Deserialize, Serialize};

use crate::council::domain::{CaseOutcome, Grade};

/// Errors raised while validating an engine configuration. All of these fail
/// at construction, before any evaluation runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite and within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be strictly positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("confidence weights must sum to 1.0, got {sum}")]
    WeightsNotNormalized { sum: f64 },
    #[error("target_match_count must be at least 1")]
    ZeroTargetMatchCount,
}

/// Policy mapping a retrieval distance to a similarity weight in (0, 1].
///
/// Both curves are strictly decreasing in distance, so swapping one for the
/// other never touches the aggregation logic built on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "curve")]
pub enum WeightCurve {
    /// `w = 1 / (1 + d)`
    InverseDistance,
    /// `w = exp(-d / scale)`
    ExponentialDecay { scale: f64 },
}

impl WeightCurve {
    pub fn weight(&self, distance: f64) -> f64 {
        match self {
            WeightCurve::InverseDistance => 1.0 / (1.0 + distance),
            WeightCurve::ExponentialDecay { scale } => (-distance / scale).exp(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let WeightCurve::ExponentialDecay { scale } = self {
            if !scale.is_finite() || *scale <= 0.0 {
                return Err(ConfigError::NotPositive {
                    field: "weight_curve.scale",
                    value: *scale,
                });
            }
        }
        Ok(())
    }
}

/// Base risk contribution per loan grade, in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeRiskTable {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

impl GradeRiskTable {
    pub fn risk(&self, grade: Grade) -> f64 {
        match grade {
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
            Grade::D => self.d,
            Grade::E => self.e,
        }
    }
}

impl Default for GradeRiskTable {
    fn default() -> Self {
        Self {
            a: 12.0,
            b: 30.0,
            c: 50.0,
            d: 68.0,
            e: 85.0,
        }
    }
}

/// Signed shift applied to the grade risk depending on how the historical
/// loan actually ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeAdjustmentTable {
    pub repaid: f64,
    pub delinquent: f64,
    pub defaulted: f64,
}

impl OutcomeAdjustmentTable {
    pub fn adjustment(&self, outcome: CaseOutcome) -> f64 {
        match outcome {
            CaseOutcome::Repaid => self.repaid,
            CaseOutcome::Delinquent => self.delinquent,
            CaseOutcome::Defaulted => self.defaulted,
        }
    }
}

impl Default for OutcomeAdjustmentTable {
    fn default() -> Self {
        Self {
            repaid: -10.0,
            delinquent: 12.0,
            defaulted: 15.0,
        }
    }
}

/// Dials controlling when an application counts as anomalous.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyThresholds {
    /// Multiple of the neighborhood spread a feature may deviate before it is
    /// flagged as an outlier.
    pub spread_multiplier: f64,
    /// Best-match distance beyond which the application has no usable
    /// precedent at all.
    pub max_best_distance: f64,
    /// Minimum neighborhood size required before feature statistics are
    /// considered meaningful.
    pub min_neighborhood: usize,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            spread_multiplier: 2.0,
            max_best_distance: 0.75,
            min_neighborhood: 3,
        }
    }
}

/// Fixed weights combining the three confidence sub-scores. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub consensus: f64,
    pub similarity: f64,
    pub stability: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            consensus: 0.40,
            similarity: 0.35,
            stability: 0.25,
        }
    }
}

/// Tuning for the stability sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceTuning {
    /// Stability points deducted per point of standard deviation among the
    /// three agent confidences.
    pub spread_penalty: f64,
    /// Stability points deducted at full anomaly severity.
    pub anomaly_penalty: f64,
}

impl Default for ConfidenceTuning {
    fn default() -> Self {
        Self {
            spread_penalty: 2.0,
            anomaly_penalty: 40.0,
        }
    }
}

/// Cutoffs the decision resolver applies, in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// Risk score above which a majority Reject becomes a rejection.
    pub high_risk: f64,
    /// Overall confidence a unanimous Approve must clear to auto-approve.
    pub approval_confidence: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            high_risk: 70.0,
            approval_confidence: 75.0,
        }
    }
}

/// Complete engine configuration. Read once at construction; thresholds and
/// weights are data, never inline literals in the scoring code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub grade_risk: GradeRiskTable,
    pub outcome_adjustment: OutcomeAdjustmentTable,
    /// Risk score reported when no similarity evidence exists.
    pub neutral_risk: f64,
    pub weight_curve: WeightCurve,
    pub anomaly: AnomalyThresholds,
    pub confidence_weights: ConfidenceWeights,
    pub confidence_tuning: ConfidenceTuning,
    /// Match-set size at which the similarity sub-score stops rewarding
    /// additional neighbors.
    pub target_match_count: usize,
    pub thresholds: DecisionThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grade_risk: GradeRiskTable::default(),
            outcome_adjustment: OutcomeAdjustmentTable::default(),
            neutral_risk: 50.0,
            weight_curve: WeightCurve::InverseDistance,
            anomaly: AnomalyThresholds::default(),
            confidence_weights: ConfidenceWeights::default(),
            confidence_tuning: ConfidenceTuning::default(),
            target_match_count: 9,
            thresholds: DecisionThresholds::default(),
        }
    }
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

impl EngineConfig {
    /// Validate every dial. Called by `CouncilEngine::new`; a configuration
    /// that fails here never runs an evaluation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let score_fields = [
            ("grade_risk.a", self.grade_risk.a),
            ("grade_risk.b", self.grade_risk.b),
            ("grade_risk.c", self.grade_risk.c),
            ("grade_risk.d", self.grade_risk.d),
            ("grade_risk.e", self.grade_risk.e),
            ("neutral_risk", self.neutral_risk),
            ("thresholds.high_risk", self.thresholds.high_risk),
            (
                "thresholds.approval_confidence",
                self.thresholds.approval_confidence,
            ),
        ];
        for (field, value) in score_fields {
            check_range(field, value, 0.0, 100.0)?;
        }

        let adjustments = [
            ("outcome_adjustment.repaid", self.outcome_adjustment.repaid),
            (
                "outcome_adjustment.delinquent",
                self.outcome_adjustment.delinquent,
            ),
            (
                "outcome_adjustment.defaulted",
                self.outcome_adjustment.defaulted,
            ),
        ];
        for (field, value) in adjustments {
            check_range(field, value, -100.0, 100.0)?;
        }

        self.weight_curve.validate()?;

        check_positive("anomaly.spread_multiplier", self.anomaly.spread_multiplier)?;
        check_positive("anomaly.max_best_distance", self.anomaly.max_best_distance)?;

        let weights = [
            ("confidence_weights.consensus", self.confidence_weights.consensus),
            ("confidence_weights.similarity", self.confidence_weights.similarity),
            ("confidence_weights.stability", self.confidence_weights.stability),
        ];
        for (field, value) in weights {
            check_range(field, value, 0.0, 1.0)?;
        }
        let sum = self.confidence_weights.consensus
            + self.confidence_weights.similarity
            + self.confidence_weights.stability;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightsNotNormalized { sum });
        }

        check_range(
            "confidence_tuning.spread_penalty",
            self.confidence_tuning.spread_penalty,
            0.0,
            100.0,
        )?;
        check_range(
            "confidence_tuning.anomaly_penalty",
            self.confidence_tuning.anomaly_penalty,
            0.0,
            100.0,
        )?;

        if self.target_match_count == 0 {
            return Err(ConfigError::ZeroTargetMatchCount);
        }

        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}
