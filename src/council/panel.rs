use super::domain::{AgentOpinion, AgentRole, LoanApplication, RetrievedCase};

/// Boundary to the reasoning collaborator producing one opinion per council
/// seat. Implementations see the application and the same retrieved case
/// sequence the engine will score; the rationale they return stays opaque.
pub trait OpinionPanel: Send + Sync {
    fn deliberate(
        &self,
        role: AgentRole,
        application: &LoanApplication,
        precedents: &[RetrievedCase],
    ) -> Result<AgentOpinion, PanelError>;
}

/// Error enumeration for panel failures.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("agent for role {} unavailable: {reason}", role.label())]
    Unavailable { role: AgentRole, reason: String },
    #[error("agent for role {} failed: {reason}", role.label())]
    Deliberation { role: AgentRole, reason: String },
}
