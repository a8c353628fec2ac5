use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Employment situation declared on a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Student,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "employed",
            EmploymentStatus::SelfEmployed => "self-employed",
            EmploymentStatus::Unemployed => "unemployed",
            EmploymentStatus::Student => "student",
        }
    }
}

/// Inbound loan application as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub applicant_name: String,
    pub amount: f64,
    pub purpose: String,
    pub monthly_income: f64,
    pub existing_debt: f64,
    pub credit_score: u16,
    pub employment_status: EmploymentStatus,
    pub employment_years: f64,
    pub business_location: Option<String>,
}

impl LoanApplication {
    /// Debt-to-income ratio as a percentage. A zero income yields the sentinel
    /// 999.0 so downstream anomaly checks treat it as far outside any
    /// neighborhood instead of dividing by zero.
    pub fn dti_ratio(&self) -> f64 {
        if self.monthly_income == 0.0 {
            return 999.0;
        }
        (self.existing_debt / self.monthly_income) * 100.0
    }

    /// Loan category used as a retrieval filter.
    pub fn category(&self) -> LoanCategory {
        match self.employment_status {
            EmploymentStatus::SelfEmployed => LoanCategory::SmeEntrepreneur,
            EmploymentStatus::Student => LoanCategory::EducationalRetail,
            _ if self.amount > 100_000.0 => LoanCategory::HighValueInstitutional,
            _ => LoanCategory::StandardRetail,
        }
    }

    /// Geographic region extracted from the business location, defaulting to
    /// the global bucket when no region is present.
    pub fn region(&self) -> String {
        match &self.business_location {
            Some(location) => {
                let parts: Vec<&str> = location.split(',').collect();
                if parts.len() > 1 {
                    parts[parts.len() - 1].trim().to_string()
                } else {
                    "Global".to_string()
                }
            }
            None => "Global".to_string(),
        }
    }
}

/// Category buckets aligned with the historical database payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanCategory {
    SmeEntrepreneur,
    EducationalRetail,
    HighValueInstitutional,
    StandardRetail,
}

impl LoanCategory {
    pub const fn label(self) -> &'static str {
        match self {
            LoanCategory::SmeEntrepreneur => "SME/Entrepreneur",
            LoanCategory::EducationalRetail => "Educational/Retail",
            LoanCategory::HighValueInstitutional => "High-Value Institutional",
            LoanCategory::StandardRetail => "Standard Retail",
        }
    }
}

/// Ordered loan grade, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

/// Terminal outcome recorded for a historical loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    Repaid,
    Delinquent,
    Defaulted,
}

/// Immutable historical loan record as stored in the precedent database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalCase {
    pub id: String,
    pub applicant_profile: String,
    pub loan_amount: f64,
    pub outcome: CaseOutcome,
    pub grade: Grade,
    pub dti: f64,
    pub credit_score: u16,
    pub employment_status: EmploymentStatus,
    pub key_risk_factors: BTreeSet<String>,
    pub category: LoanCategory,
    pub region: String,
}

/// A historical case paired with its retrieval distance (lower = more
/// similar), exactly as returned by the retrieval collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedCase {
    pub case: HistoricalCase,
    pub distance: f64,
}

/// A retrieved case annotated with the similarity weight the engine derived
/// from its distance. Weights are always positive, finite, and at most 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    pub case: HistoricalCase,
    pub distance: f64,
    pub weight: f64,
}

/// Council seat producing one opinion per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Historian,
    Auditor,
    Compliance,
}

impl AgentRole {
    pub const ALL: [AgentRole; 3] = [AgentRole::Historian, AgentRole::Auditor, AgentRole::Compliance];

    pub const fn label(self) -> &'static str {
        match self {
            AgentRole::Historian => "Historian",
            AgentRole::Auditor => "Auditor",
            AgentRole::Compliance => "Compliance",
        }
    }
}

/// Ballot options available to every council member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Approve,
    Reject,
    Escalate,
}

/// One agent's position. The rationale is opaque prose and is never parsed
/// for decision logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOpinion {
    pub agent_name: String,
    pub role: AgentRole,
    pub rationale: String,
    pub vote: Vote,
    pub confidence: f64,
}

/// Validation errors raised while assembling an opinion set.
#[derive(Debug, thiserror::Error)]
pub enum OpinionError {
    #[error("expected exactly 3 opinions, got {0}")]
    WrongCount(usize),
    #[error("duplicate opinion for role {}", .0.label())]
    DuplicateRole(AgentRole),
    #[error("missing opinion for role {}", .0.label())]
    MissingRole(AgentRole),
    #[error("confidence {confidence} for role {} outside [0, 100]", role.label())]
    ConfidenceOutOfRange { role: AgentRole, confidence: f64 },
}

/// Role-keyed set holding exactly one opinion per council seat.
///
/// Construction validates the exactly-one-per-role invariant and the
/// confidence range, so every `OpinionSet` the engine sees is well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionSet {
    historian: AgentOpinion,
    auditor: AgentOpinion,
    compliance: AgentOpinion,
}

impl OpinionSet {
    /// Assemble a set from the three opinions, in any order.
    pub fn new(opinions: Vec<AgentOpinion>) -> Result<Self, OpinionError> {
        if opinions.len() != 3 {
            return Err(OpinionError::WrongCount(opinions.len()));
        }

        let mut historian = None;
        let mut auditor = None;
        let mut compliance = None;
        for opinion in opinions {
            if !opinion.confidence.is_finite()
                || opinion.confidence < 0.0
                || opinion.confidence > 100.0
            {
                return Err(OpinionError::ConfidenceOutOfRange {
                    role: opinion.role,
                    confidence: opinion.confidence,
                });
            }
            let slot = match opinion.role {
                AgentRole::Historian => &mut historian,
                AgentRole::Auditor => &mut auditor,
                AgentRole::Compliance => &mut compliance,
            };
            if slot.is_some() {
                return Err(OpinionError::DuplicateRole(opinion.role));
            }
            *slot = Some(opinion);
        }

        let historian = historian.ok_or(OpinionError::MissingRole(AgentRole::Historian))?;
        let auditor = auditor.ok_or(OpinionError::MissingRole(AgentRole::Auditor))?;
        let compliance = compliance.ok_or(OpinionError::MissingRole(AgentRole::Compliance))?;

        Ok(Self {
            historian,
            auditor,
            compliance,
        })
    }

    pub fn get(&self, role: AgentRole) -> &AgentOpinion {
        match role {
            AgentRole::Historian => &self.historian,
            AgentRole::Auditor => &self.auditor,
            AgentRole::Compliance => &self.compliance,
        }
    }

    /// Iterate the three opinions in fixed role order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentOpinion> + '_ {
        [&self.historian, &self.auditor, &self.compliance].into_iter()
    }
}

/// Per-vote counts across the three council seats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub approve: u8,
    pub reject: u8,
    pub escalate: u8,
}

impl VoteTally {
    pub fn count(&self, vote: Vote) -> u8 {
        match vote {
            Vote::Approve => self.approve,
            Vote::Reject => self.reject,
            Vote::Escalate => self.escalate,
        }
    }
}

/// Aggregated voting signal: the leading vote plus how strongly the council
/// stands behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSignal {
    pub leading: Vote,
    pub tally: VoteTally,
    pub agreement: f64,
    pub unanimous: bool,
}

/// Application features the anomaly detector compares against the retrieved
/// neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedFeature {
    DtiRatio,
    CreditScore,
    Amount,
}

impl TrackedFeature {
    pub const fn label(self) -> &'static str {
        match self {
            TrackedFeature::DtiRatio => "dti_ratio",
            TrackedFeature::CreditScore => "credit_score",
            TrackedFeature::Amount => "amount",
        }
    }
}

/// Reasons an application was flagged as statistically unlike its retrieved
/// neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnomalyReason {
    FeatureOutlier {
        feature: TrackedFeature,
        value: f64,
        neighborhood_mean: f64,
        neighborhood_spread: f64,
    },
    NoClosePrecedent {
        best_distance: f64,
        threshold: f64,
    },
    NoPrecedent,
}

/// Advisory anomaly signal. A raised flag routes borderline applications to
/// human review but never rejects on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAssessment {
    pub flagged: bool,
    pub severity: f64,
    pub reasons: Vec<AnomalyReason>,
}

/// Per-signal confidence sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub consensus: f64,
    pub similarity: f64,
    pub stability: f64,
}

/// Terminal decision status. Every evaluation resolves to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionStatus {
    Approved,
    Rejected,
    RequiresHumanReview,
}

impl DecisionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionStatus::Approved => "approved",
            DecisionStatus::Rejected => "rejected",
            DecisionStatus::RequiresHumanReview => "requires_human_review",
        }
    }
}

/// Final, immutable council decision for one evaluation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub status: DecisionStatus,
    pub confidence_score: f64,
    pub risk_score: f64,
    pub confidence_breakdown: ConfidenceBreakdown,
    pub consensus: ConsensusSignal,
    pub anomaly: AnomalyAssessment,
    pub opinions: OpinionSet,
    pub precedents: Vec<SimilarityMatch>,
}

impl Decision {
    /// Short mechanical summary of how the decision fell out.
    pub fn summary(&self) -> String {
        let votes = format!(
            "approve {} / reject {} / escalate {}",
            self.consensus.tally.approve, self.consensus.tally.reject, self.consensus.tally.escalate
        );
        match self.status {
            DecisionStatus::Approved => format!(
                "approved on unanimous council vote ({votes}) with {:.1}% confidence",
                self.confidence_score
            ),
            DecisionStatus::Rejected => format!(
                "rejected on council vote ({votes}) with risk score {:.1}",
                self.risk_score
            ),
            DecisionStatus::RequiresHumanReview => {
                if self.anomaly.flagged {
                    format!(
                        "routed to human review: application anomalous (severity {:.2}), council vote {votes}",
                        self.anomaly.severity
                    )
                } else {
                    format!(
                        "routed to human review: council vote {votes} at {:.1}% confidence",
                        self.confidence_score
                    )
                }
            }
        }
    }
}
