//! The batch module runs a list of catalog entries and reports one outcome per entry, in order.
//! A failing entry is recorded and the batch moves on.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::QueryDefinition;
use crate::config::Config;
use crate::error::{QueryError, Result, SongbookError};
use crate::executor::execute;
use crate::store::{RowSet, Store};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "lowercase")]
pub enum Outcome {
    Rows(RowSet),
    Failed(QueryError),
}

impl Outcome {
    pub fn rows(&self) -> Option<&RowSet> {
        match self {
            Outcome::Rows(rows) => Some(rows),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            Outcome::Rows(_) => None,
            Outcome::Failed(e) => Some(e),
        }
    }
}

impl From<std::result::Result<RowSet, QueryError>> for Outcome {
    fn from(result: std::result::Result<RowSet, QueryError>) -> Self {
        match result {
            Ok(rows) => Outcome::Rows(rows),
            Err(e) => Outcome::Failed(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub seq: usize,
    pub question: String,
    pub outcome: Outcome,
}

impl BatchOutcome {
    fn new(definition: &QueryDefinition, result: std::result::Result<RowSet, QueryError>) -> Self {
        Self {
            seq: definition.seq,
            question: definition.question.to_string(),
            outcome: result.into(),
        }
    }
}

/// Fold every definition through `execute_fn`, keeping one outcome per definition.
pub fn run_batch<F>(definitions: &[QueryDefinition], mut execute_fn: F) -> Vec<BatchOutcome>
where
    F: FnMut(&QueryDefinition) -> std::result::Result<RowSet, QueryError>,
{
    definitions.iter().fold(Vec::with_capacity(definitions.len()), |mut outcomes, definition| {
        outcomes.push(BatchOutcome::new(definition, execute_fn(definition)));
        outcomes
    })
}

/// Run the definitions against a single request-scoped store.
pub fn run_sequential(store: &Store, definitions: &[QueryDefinition]) -> Vec<BatchOutcome> {
    run_batch(definitions, |definition| execute(store, definition))
}

/// Run the definitions on a pool of `c.max_proc` workers. Each worker opens its own read-only
/// connection; a worker that cannot connect fails only the entries it was handed.
pub fn run_parallel(c: &Config, definitions: &[QueryDefinition]) -> Result<Vec<BatchOutcome>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(c.max_proc)
        .build()
        .map_err(|e| SongbookError::Generic(format!("failed to start batch worker pool: {e}")))?;
    debug!("Running {} questions on {} workers", definitions.len(), c.max_proc);

    let outcomes = pool.install(|| {
        definitions
            .par_iter()
            .map_init(
                || Store::open(c),
                |store, definition| {
                    let result = match store {
                        Ok(store) => execute(store, definition),
                        Err(e) => Err(QueryError::new(definition, e.to_string())),
                    };
                    BatchOutcome::new(definition, result)
                },
            )
            .collect::<Vec<_>>()
    });
    Ok(outcomes)
}

pub fn summarize(outcomes: &[BatchOutcome]) {
    let failed = outcomes.iter().filter(|o| o.outcome.error().is_some()).count();
    info!("Answered {}/{} questions ({} failed)", outcomes.len() - failed, outcomes.len(), failed);
}
