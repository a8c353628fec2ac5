//! Credit council: precedent retrieval boundary, opinion panel boundary, and
//! the deterministic engine that synthesizes both into a final decision.

pub mod domain;
pub(crate) mod engine;
pub mod panel;
pub mod retrieval;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AgentOpinion, AgentRole, AnomalyAssessment, AnomalyReason, CaseOutcome, ConfidenceBreakdown,
    ConsensusSignal, Decision, DecisionStatus, EmploymentStatus, Grade, HistoricalCase,
    LoanApplication, LoanCategory, OpinionError, OpinionSet, RetrievedCase, SimilarityMatch,
    TrackedFeature, Vote, VoteTally,
};
pub use engine::{
    AnomalyThresholds, ConfidenceTuning, ConfidenceWeights, ConfigError, CouncilEngine,
    DecisionThresholds, EngineConfig, EvaluationError, GradeRiskTable, OutcomeAdjustmentTable,
    WeightCurve,
};
pub use panel::{OpinionPanel, PanelError};
pub use retrieval::{PrecedentRetriever, RetrievalError, RetrievalQuery};
pub use service::{CouncilServiceError, CreditCouncilService};
