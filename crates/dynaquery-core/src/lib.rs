//! Query planning and request building for dynaquery.
//!
//! This crate maps a relational-style [`LogicalQuery`] (condition tree,
//! projection, ordering, pagination) onto DynamoDB's native operation set.
//! The pipeline is:
//!
//! 1. **Schema resolution**: look up the key schema for the target table or
//!    index, cached for the process lifetime.
//! 2. **Classification**: decide which native operation the query must use
//!    (`GetItem`, `BatchGetItem`, `Query`, or `Scan`).
//! 3. **Compilation**: turn the condition tree into expression text plus a
//!    positionally-numbered value table.
//! 4. **Building**: assemble the operation name and argument document.
//! 5. **Normalization**: extract rows from the heterogeneous response shapes.
//!
//! Everything except the schema cache is a pure, synchronous computation
//! with no shared state; the planner never retries and never logs errors,
//! leaving retry/backoff policy to the executing collaborator.
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod batch;
pub mod builder;
pub mod command;
pub mod compiler;
pub mod condition;
pub mod error;
pub mod executor;
pub mod normalizer;
pub mod planner;
pub mod query;
pub mod schema;

pub use batch::BatchKeys;
pub use builder::NativeRequest;
pub use compiler::{CompiledExpression, compile, compile_into};
pub use condition::{CompareOp, Condition, FunctionName};
pub use error::QueryError;
pub use executor::{Executor, ExecutorSchemaSource, QueryRunner};
pub use normalizer::{NormalizedPage, RESPONSE_KEY, Row, normalize};
pub use planner::{Classification, OperationKind, Plan, Planner, classify};
pub use query::{LogicalQuery, OrderDirection};
pub use schema::{KeySchema, SchemaResolver, SchemaSource};
