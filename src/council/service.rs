use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{AgentRole, Decision, LoanApplication, OpinionError, OpinionSet};
use super::engine::{ConfigError, CouncilEngine, EngineConfig, EvaluationError};
use super::panel::{OpinionPanel, PanelError};
use super::retrieval::{PrecedentRetriever, RetrievalError, RetrievalQuery};

/// Number of precedents requested per evaluation.
const DEFAULT_RETRIEVAL_LIMIT: usize = 9;

/// Service composing the retrieval collaborator, the opinion panel, and the
/// decision engine. Owns no shared mutable state; evaluations are
/// independent and reentrant.
pub struct CreditCouncilService<R, P> {
    retriever: Arc<R>,
    panel: Arc<P>,
    engine: CouncilEngine,
    retrieval_limit: usize,
}

impl<R, P> CreditCouncilService<R, P>
where
    R: PrecedentRetriever + 'static,
    P: OpinionPanel + 'static,
{
    pub fn new(retriever: Arc<R>, panel: Arc<P>, config: EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            retriever,
            panel,
            engine: CouncilEngine::new(config)?,
            retrieval_limit: DEFAULT_RETRIEVAL_LIMIT,
        })
    }

    pub fn with_retrieval_limit(mut self, limit: usize) -> Self {
        self.retrieval_limit = limit.max(1);
        self
    }

    /// Run one full evaluation: retrieve precedents, gather the three
    /// opinions, and synthesize the decision.
    pub fn evaluate(&self, application: &LoanApplication) -> Result<Decision, CouncilServiceError> {
        let category = application.category();
        let region = application.region();
        info!(
            applicant = %application.applicant_name,
            category = category.label(),
            %region,
            amount = application.amount,
            dti = application.dti_ratio(),
            "evaluating loan application"
        );

        let query = RetrievalQuery {
            limit: self.retrieval_limit,
            category: Some(category),
            region: Some(region),
        };
        let precedents = self
            .retriever
            .similar_cases(&query_text(application), &query)?;
        debug!(count = precedents.len(), "retrieved historical precedents");

        let mut opinions = Vec::with_capacity(AgentRole::ALL.len());
        for role in AgentRole::ALL {
            let opinion = self.panel.deliberate(role, application, &precedents)?;
            debug!(
                role = role.label(),
                vote = ?opinion.vote,
                confidence = opinion.confidence,
                "agent opinion collected"
            );
            opinions.push(opinion);
        }
        let opinions = OpinionSet::new(opinions)?;

        let decision = self.engine.evaluate(application, &precedents, opinions)?;
        info!(
            status = decision.status.label(),
            confidence = decision.confidence_score,
            risk = decision.risk_score,
            anomalous = decision.anomaly.flagged,
            "council decision synthesized"
        );

        Ok(decision)
    }
}

fn query_text(application: &LoanApplication) -> String {
    format!(
        "Loan Amount: ${:.2} | Purpose: {} | Monthly Income: ${:.2} | DTI Ratio: {:.1}% | \
         Credit Score: {} | Employment: {} | Employment Years: {} | Location: {}",
        application.amount,
        application.purpose,
        application.monthly_income,
        application.dti_ratio(),
        application.credit_score,
        application.employment_status.label(),
        application.employment_years,
        application.business_location.as_deref().unwrap_or("Unknown"),
    )
}

/// Error raised by the council service.
#[derive(Debug, thiserror::Error)]
pub enum CouncilServiceError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error(transparent)]
    Opinion(#[from] OpinionError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
