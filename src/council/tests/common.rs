use std::collections::BTreeSet;

use crate::council::domain::{
    AgentOpinion, AgentRole, CaseOutcome, EmploymentStatus, Grade, HistoricalCase, LoanApplication,
    LoanCategory, OpinionSet, RetrievedCase, Vote,
};
use crate::council::engine::{CouncilEngine, EngineConfig};

pub(super) fn engine() -> CouncilEngine {
    CouncilEngine::new(EngineConfig::default()).expect("default config is valid")
}

pub(super) fn case(
    id: &str,
    grade: Grade,
    outcome: CaseOutcome,
    dti: f64,
    credit_score: u16,
    loan_amount: f64,
) -> HistoricalCase {
    HistoricalCase {
        id: id.to_string(),
        applicant_profile: format!("historical applicant {id}"),
        loan_amount,
        outcome,
        grade,
        dti,
        credit_score,
        employment_status: EmploymentStatus::Employed,
        key_risk_factors: BTreeSet::new(),
        category: LoanCategory::StandardRetail,
        region: "Global".to_string(),
    }
}

pub(super) fn retrieved(case: HistoricalCase, distance: f64) -> RetrievedCase {
    RetrievedCase { case, distance }
}

/// Nine tight grade-A repaid matches clustered around `strong_application`.
pub(super) fn repaid_a_neighborhood() -> Vec<RetrievedCase> {
    let dtis = [8.0, 9.0, 10.0, 11.0, 12.0, 9.5, 10.5, 10.0, 10.0];
    let credits = [760, 770, 780, 790, 800, 775, 785, 780, 780];
    let amounts = [
        12_000.0, 13_000.0, 14_000.0, 15_000.0, 16_000.0, 17_000.0, 18_000.0, 15_000.0, 15_000.0,
    ];
    (0..9)
        .map(|i| {
            retrieved(
                case(
                    &format!("LC-A{i:02}"),
                    Grade::A,
                    CaseOutcome::Repaid,
                    dtis[i],
                    credits[i],
                    amounts[i],
                ),
                0.05 + i as f64 * 0.01,
            )
        })
        .collect()
}

/// Nine grade-E defaulted matches with DTIs far below `risky_application`'s.
pub(super) fn defaulted_e_neighborhood() -> Vec<RetrievedCase> {
    let dtis = [42.0, 43.0, 44.0, 45.0, 46.0, 47.0, 48.0, 45.0, 45.0];
    let credits = [540, 550, 560, 570, 580, 555, 565, 560, 560];
    let amounts = [
        22_000.0, 23_000.0, 24_000.0, 25_000.0, 26_000.0, 27_000.0, 28_000.0, 25_000.0, 25_000.0,
    ];
    (0..9)
        .map(|i| {
            retrieved(
                case(
                    &format!("LC-E{i:02}"),
                    Grade::E,
                    CaseOutcome::Defaulted,
                    dtis[i],
                    credits[i],
                    amounts[i],
                ),
                0.10 + i as f64 * 0.01,
            )
        })
        .collect()
}

pub(super) fn strong_application() -> LoanApplication {
    LoanApplication {
        applicant_name: "Avery Stone".to_string(),
        amount: 15_000.0,
        purpose: "Working capital".to_string(),
        monthly_income: 5_000.0,
        existing_debt: 500.0,
        credit_score: 780,
        employment_status: EmploymentStatus::Employed,
        employment_years: 6.0,
        business_location: None,
    }
}

pub(super) fn risky_application() -> LoanApplication {
    LoanApplication {
        applicant_name: "Jordan Vale".to_string(),
        amount: 25_000.0,
        purpose: "Debt consolidation".to_string(),
        monthly_income: 3_000.0,
        existing_debt: 2_400.0,
        credit_score: 560,
        employment_status: EmploymentStatus::Employed,
        employment_years: 1.0,
        business_location: None,
    }
}

pub(super) fn opinion(role: AgentRole, vote: Vote, confidence: f64) -> AgentOpinion {
    AgentOpinion {
        agent_name: format!("{} seat", role.label()),
        role,
        rationale: "opaque rationale".to_string(),
        vote,
        confidence,
    }
}

/// Build a valid set assigning the given votes/confidences to the roles in
/// Historian, Auditor, Compliance order.
pub(super) fn opinion_set(ballots: [(Vote, f64); 3]) -> OpinionSet {
    let opinions = AgentRole::ALL
        .into_iter()
        .zip(ballots)
        .map(|(role, (vote, confidence))| opinion(role, vote, confidence))
        .collect();
    OpinionSet::new(opinions).expect("well-formed opinion set")
}

pub(super) fn unanimous(vote: Vote, confidence: f64) -> OpinionSet {
    opinion_set([(vote, confidence); 3])
}
