use crate::council::domain::SimilarityMatch;

use super::config::EngineConfig;

/// Similarity-weighted estimate of default probability, in [0, 100].
///
/// Each matched case contributes its grade risk shifted by its terminal
/// outcome; contributions are averaged with weights renormalized over the
/// retrieved set. An empty set carries no similarity evidence and yields the
/// configured neutral score.
pub(crate) fn proximity_risk(matches: &[SimilarityMatch], config: &EngineConfig) -> f64 {
    if matches.is_empty() {
        return config.neutral_risk;
    }

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for matched in matches {
        let base = config.grade_risk.risk(matched.case.grade)
            + config.outcome_adjustment.adjustment(matched.case.outcome);
        weighted_sum += matched.weight * base.clamp(0.0, 100.0);
        weight_total += matched.weight;
    }

    (weighted_sum / weight_total).clamp(0.0, 100.0)
}
