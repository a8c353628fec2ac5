use std::sync::{Arc, Mutex};

use super::common::*;
use crate::council::domain::{
    AgentOpinion, AgentRole, DecisionStatus, LoanApplication, LoanCategory, RetrievedCase, Vote,
};
use crate::council::engine::EngineConfig;
use crate::council::panel::{OpinionPanel, PanelError};
use crate::council::retrieval::{PrecedentRetriever, RetrievalError, RetrievalQuery};
use crate::council::service::{CouncilServiceError, CreditCouncilService};

#[derive(Default)]
struct MemoryRetriever {
    precedents: Vec<RetrievedCase>,
    fail: bool,
    queries: Mutex<Vec<RetrievalQuery>>,
}

impl MemoryRetriever {
    fn with_precedents(precedents: Vec<RetrievedCase>) -> Self {
        Self {
            precedents,
            ..Self::default()
        }
    }

    fn queries(&self) -> Vec<RetrievalQuery> {
        self.queries.lock().expect("query mutex poisoned").clone()
    }
}

impl PrecedentRetriever for MemoryRetriever {
    fn similar_cases(
        &self,
        _query_text: &str,
        query: &RetrievalQuery,
    ) -> Result<Vec<RetrievedCase>, RetrievalError> {
        if self.fail {
            return Err(RetrievalError::Unavailable("vector store offline".to_string()));
        }
        self.queries
            .lock()
            .expect("query mutex poisoned")
            .push(query.clone());
        Ok(self.precedents.clone())
    }
}

struct ScriptedPanel {
    ballots: [(Vote, f64); 3],
    fail_role: Option<AgentRole>,
    misreport_role: bool,
}

impl ScriptedPanel {
    fn voting(ballots: [(Vote, f64); 3]) -> Self {
        Self {
            ballots,
            fail_role: None,
            misreport_role: false,
        }
    }
}

impl OpinionPanel for ScriptedPanel {
    fn deliberate(
        &self,
        role: AgentRole,
        _application: &LoanApplication,
        _precedents: &[RetrievedCase],
    ) -> Result<AgentOpinion, PanelError> {
        if self.fail_role == Some(role) {
            return Err(PanelError::Deliberation {
                role,
                reason: "model timeout".to_string(),
            });
        }
        let index = AgentRole::ALL
            .iter()
            .position(|candidate| *candidate == role)
            .unwrap_or(0);
        let (vote, confidence) = self.ballots[index];
        let reported_role = if self.misreport_role {
            AgentRole::Historian
        } else {
            role
        };
        Ok(opinion(reported_role, vote, confidence))
    }
}

fn service(
    retriever: Arc<MemoryRetriever>,
    panel: Arc<ScriptedPanel>,
) -> CreditCouncilService<MemoryRetriever, ScriptedPanel> {
    CreditCouncilService::new(retriever, panel, EngineConfig::default())
        .expect("default config is valid")
}

#[test]
fn evaluate_runs_the_full_pipeline() {
    let retriever = Arc::new(MemoryRetriever::with_precedents(repaid_a_neighborhood()));
    let panel = Arc::new(ScriptedPanel::voting([
        (Vote::Approve, 88.0),
        (Vote::Approve, 90.0),
        (Vote::Approve, 92.0),
    ]));
    let service = service(retriever.clone(), panel);

    let decision = service
        .evaluate(&strong_application())
        .expect("evaluation succeeds");

    assert_eq!(decision.status, DecisionStatus::Approved);
    assert_eq!(decision.precedents.len(), 9);

    let queries = retriever.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].limit, 9);
    assert_eq!(queries[0].category, Some(LoanCategory::StandardRetail));
    assert_eq!(queries[0].region.as_deref(), Some("Global"));
}

#[test]
fn retrieval_filters_follow_the_application() {
    let retriever = Arc::new(MemoryRetriever::with_precedents(Vec::new()));
    let panel = Arc::new(ScriptedPanel::voting([(Vote::Escalate, 50.0); 3]));
    let service = service(retriever.clone(), panel);

    let mut application = strong_application();
    application.employment_status = crate::council::EmploymentStatus::SelfEmployed;
    application.business_location = Some("Austin, Texas".to_string());

    service.evaluate(&application).expect("evaluation succeeds");

    let queries = retriever.queries();
    assert_eq!(queries[0].category, Some(LoanCategory::SmeEntrepreneur));
    assert_eq!(queries[0].region.as_deref(), Some("Texas"));
}

#[test]
fn retrieval_failures_propagate() {
    let retriever = Arc::new(MemoryRetriever {
        fail: true,
        ..MemoryRetriever::default()
    });
    let panel = Arc::new(ScriptedPanel::voting([(Vote::Approve, 80.0); 3]));
    let service = service(retriever, panel);

    match service.evaluate(&strong_application()) {
        Err(CouncilServiceError::Retrieval(RetrievalError::Unavailable(_))) => {}
        other => panic!("expected retrieval error, got {other:?}"),
    }
}

#[test]
fn panel_failures_propagate() {
    let retriever = Arc::new(MemoryRetriever::with_precedents(repaid_a_neighborhood()));
    let panel = Arc::new(ScriptedPanel {
        ballots: [(Vote::Approve, 80.0); 3],
        fail_role: Some(AgentRole::Auditor),
        misreport_role: false,
    });
    let service = service(retriever, panel);

    match service.evaluate(&strong_application()) {
        Err(CouncilServiceError::Panel(PanelError::Deliberation {
            role: AgentRole::Auditor,
            ..
        })) => {}
        other => panic!("expected panel error, got {other:?}"),
    }
}

#[test]
fn misattributed_opinions_fail_validation() {
    let retriever = Arc::new(MemoryRetriever::with_precedents(repaid_a_neighborhood()));
    let panel = Arc::new(ScriptedPanel {
        ballots: [(Vote::Approve, 80.0); 3],
        fail_role: None,
        misreport_role: true,
    });
    let service = service(retriever, panel);

    match service.evaluate(&strong_application()) {
        Err(CouncilServiceError::Opinion(_)) => {}
        other => panic!("expected opinion validation error, got {other:?}"),
    }
}

#[test]
fn empty_retrieval_still_produces_a_decision() {
    let retriever = Arc::new(MemoryRetriever::with_precedents(Vec::new()));
    let panel = Arc::new(ScriptedPanel::voting([(Vote::Approve, 95.0); 3]));
    let service = service(retriever, panel);

    let decision = service
        .evaluate(&strong_application())
        .expect("degenerate evidence is not an error");

    assert_eq!(decision.status, DecisionStatus::RequiresHumanReview);
    assert!(decision.precedents.is_empty());
}
