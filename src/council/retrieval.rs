use serde::{Deserialize, Serialize};

use super::domain::{LoanCategory, RetrievedCase};

/// Filters handed to the retrieval collaborator. Filtering happens inside
/// the collaborator; the engine never re-filters results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalQuery {
    pub limit: usize,
    pub category: Option<LoanCategory>,
    pub region: Option<String>,
}

/// Boundary to the vector database holding historical cases. Implementations
/// return cases ordered by ascending distance, already filtered as requested.
pub trait PrecedentRetriever: Send + Sync {
    fn similar_cases(
        &self,
        query_text: &str,
        query: &RetrievalQuery,
    ) -> Result<Vec<RetrievedCase>, RetrievalError>;
}

/// Error enumeration for retrieval failures.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("retrieval backend unavailable: {0}")]
    Unavailable(String),
    #[error("retrieval backend failure: {0}")]
    Backend(String),
}
