//! The execution collaborator seam and the end-to-end runner.
//!
//! [`Executor`] abstracts the store client: it receives a wire operation
//! and its argument document and returns the raw response document.
//! Transport, retry, and backoff live behind that trait. [`QueryRunner`]
//! wires the whole pipeline together: plan, build, execute, normalize.

use dynaquery_model::Operation;
use dynaquery_model::input::DescribeTableInput;
use dynaquery_model::output::DescribeTableOutput;
use dynaquery_model::types::TableDescription;
use tracing::info;

use crate::builder;
use crate::error::QueryError;
use crate::normalizer::{NormalizedPage, normalize};
use crate::planner::Planner;
use crate::query::LogicalQuery;
use crate::schema::SchemaSource;

/// Runs built requests against the store.
pub trait Executor {
    /// Executes one operation and returns the raw response document.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying client surfaces; the runner
    /// wraps it as [`QueryError::Collaborator`].
    fn execute(
        &self,
        operation: Operation,
        argument: &serde_json::Value,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>>;
}

/// Adapts an [`Executor`] into a [`SchemaSource`] by issuing
/// `DescribeTable` through it.
#[derive(Debug)]
pub struct ExecutorSchemaSource<E>(pub E);

impl<E: Executor> SchemaSource for ExecutorSchemaSource<E> {
    fn describe_table(
        &self,
        table: &str,
    ) -> Result<TableDescription, Box<dyn std::error::Error + Send + Sync>> {
        let input = DescribeTableInput {
            table_name: table.to_owned(),
        };
        let argument = serde_json::to_value(&input)?;
        let response = self.0.execute(Operation::DescribeTable, &argument)?;
        let output: DescribeTableOutput = serde_json::from_value(response)?;
        output
            .table
            .ok_or_else(|| "DescribeTable response carries no table description".into())
    }
}

/// Plans, builds, executes, and normalizes logical queries.
#[derive(Debug)]
pub struct QueryRunner<S, E> {
    planner: Planner<S>,
    executor: E,
    fold_metadata: bool,
}

impl<S: SchemaSource, E: Executor> QueryRunner<S, E> {
    /// Creates a runner resolving schemas from `source` and executing
    /// through `executor`.
    pub fn new(source: S, executor: E) -> Self {
        Self {
            planner: Planner::new(source),
            executor,
            fold_metadata: false,
        }
    }

    /// Folds response metadata into each returned row under the reserved
    /// `_response` key.
    #[must_use]
    pub fn fold_metadata(mut self, fold: bool) -> Self {
        self.fold_metadata = fold;
        self
    }

    /// The underlying executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Runs `query` end to end and returns the normalized page.
    ///
    /// # Errors
    ///
    /// Returns planning and building errors, [`QueryError::Collaborator`]
    /// when execution fails, and normalization errors on a malformed
    /// response.
    pub fn run(&self, query: &LogicalQuery) -> Result<NormalizedPage, QueryError> {
        let plan = self.planner.plan(query)?;
        let request = builder::build(query, &plan)?;
        info!(table = %query.table, operation = %request.operation, "executing query");
        let response = self
            .executor
            .execute(request.operation, &request.argument)
            .map_err(QueryError::Collaborator)?;
        normalize(plan.kind, &query.table, &response, self.fold_metadata)
    }

    /// Runs `query` and returns only the returned-item count.
    ///
    /// # Errors
    ///
    /// Same as [`QueryRunner::run`].
    pub fn count(&self, query: &LogicalQuery) -> Result<i64, QueryError> {
        Ok(self.run(query)?.count)
    }
}
