use tracing::{debug, warn};

use crate::catalog::QueryDefinition;
use crate::error::QueryError;
use crate::store::{describe_failure, RowSet, Store};

impl QueryError {
    pub fn new(definition: &QueryDefinition, message: impl Into<String>) -> Self {
        Self {
            seq: definition.seq,
            question: definition.question.to_string(),
            message: message.into(),
        }
    }
}

/// Execute one catalog entry. Failures come back as a `QueryError` tagged with the entry, never
/// as a panic or a request-level error.
pub fn execute(store: &Store, definition: &QueryDefinition) -> Result<RowSet, QueryError> {
    debug!("Executing question {}: {}", definition.seq, definition.question);
    match store.row_set(definition.sql) {
        Ok(rows) => {
            debug!("Question {} returned {} rows", definition.seq, rows.len());
            Ok(rows)
        }
        Err(e) => {
            let message = describe_failure(&e, store.query_timeout());
            warn!("Question {} failed: {}", definition.seq, message);
            Err(QueryError::new(definition, message))
        }
    }
}
