use crate::council::domain::{AnomalyAssessment, ConsensusSignal, DecisionStatus, Vote};

use super::config::DecisionThresholds;

/// Map the synthesized signals to a terminal status. Rules are evaluated in
/// order and the first match wins; ambiguity or novelty lands on human
/// review rather than approval.
pub(crate) fn resolve(
    consensus: &ConsensusSignal,
    risk_score: f64,
    confidence_score: f64,
    anomaly: &AnomalyAssessment,
    thresholds: &DecisionThresholds,
) -> DecisionStatus {
    let majority_reject = consensus.leading == Vote::Reject && consensus.tally.reject >= 2;
    if (consensus.unanimous && consensus.leading == Vote::Reject)
        || (risk_score > thresholds.high_risk && majority_reject)
    {
        return DecisionStatus::Rejected;
    }

    if consensus.unanimous
        && consensus.leading == Vote::Approve
        && confidence_score > thresholds.approval_confidence
        && !anomaly.flagged
    {
        return DecisionStatus::Approved;
    }

    DecisionStatus::RequiresHumanReview
}
