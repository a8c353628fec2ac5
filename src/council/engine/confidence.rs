use crate::council::domain::{
    AnomalyAssessment, ConfidenceBreakdown, ConsensusSignal, OpinionSet, SimilarityMatch,
};

use super::config::EngineConfig;

/// Merge consensus strength, similarity quality, and signal stability into
/// the overall confidence score plus its three-part breakdown.
pub(crate) fn compose(
    consensus: &ConsensusSignal,
    matches: &[SimilarityMatch],
    opinions: &OpinionSet,
    anomaly: &AnomalyAssessment,
    config: &EngineConfig,
) -> (f64, ConfidenceBreakdown) {
    let breakdown = ConfidenceBreakdown {
        consensus: consensus.agreement,
        similarity: similarity_quality(matches, config),
        stability: stability(opinions, anomaly, config),
    };

    let weights = &config.confidence_weights;
    let overall = (weights.consensus * breakdown.consensus
        + weights.similarity * breakdown.similarity
        + weights.stability * breakdown.stability)
        .clamp(0.0, 100.0);

    (overall, breakdown)
}

/// Quality of the historical match set: decreasing in the best-match
/// distance, increasing in match-set size up to the configured target. An
/// empty set carries no evidence and scores zero.
fn similarity_quality(matches: &[SimilarityMatch], config: &EngineConfig) -> f64 {
    let best = match matches
        .iter()
        .map(|m| m.distance)
        .fold(f64::INFINITY, f64::min)
    {
        best if best.is_finite() => best,
        _ => return 0.0,
    };

    let target = config.target_match_count as f64;
    let coverage = (matches.len() as f64).min(target) / target;

    (100.0 * config.weight_curve.weight(best) * (0.5 + 0.5 * coverage)).clamp(0.0, 100.0)
}

/// Dispersion of the three agent confidences, penalized further when the
/// anomaly detector reports high severity.
fn stability(opinions: &OpinionSet, anomaly: &AnomalyAssessment, config: &EngineConfig) -> f64 {
    let confidences: Vec<f64> = opinions.iter().map(|o| o.confidence).collect();
    let n = confidences.len() as f64;
    let mean = confidences.iter().sum::<f64>() / n;
    let variance = confidences.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
    let spread = variance.sqrt();

    let tuning = &config.confidence_tuning;
    (100.0 - spread * tuning.spread_penalty - anomaly.severity * tuning.anomaly_penalty)
        .clamp(0.0, 100.0)
}
