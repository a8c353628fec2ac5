//! Decision-synthesis layer for loan applications.
//!
//! The `council` module combines similarity-weighted historical outcomes with
//! three independent agent opinions (Historian, Auditor, Compliance) into a
//! single calibrated decision. Retrieval, embedding, and rationale generation
//! live behind the boundary traits in [`council::retrieval`] and
//! [`council::panel`]; the engine itself is a pure, synchronous computation.

pub mod council;

pub use council::{
    AgentOpinion, AgentRole, AnomalyAssessment, CaseOutcome, ConfidenceBreakdown, CouncilEngine,
    Decision, DecisionStatus, EngineConfig, EvaluationError, Grade, HistoricalCase,
    LoanApplication, OpinionSet, RetrievedCase, SimilarityMatch, Vote,
};
