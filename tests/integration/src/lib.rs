//! Integration tests for the dynaquery planning pipeline.
//!
//! These tests exercise the whole plan/build/execute/normalize chain
//! against fake collaborators; no store is required. Shared fixtures live
//! here, the scenarios in the `test_*` modules.

use std::collections::HashMap;
use std::sync::{Mutex, Once};

use dynaquery_core::{Executor, SchemaSource};
use dynaquery_model::Operation;
use dynaquery_model::types::{KeySchemaElement, TableDescription};

mod test_batch_shapes;
mod test_pipeline;
mod test_planning;
mod test_requests;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A schema collaborator serving canned table descriptions.
#[derive(Debug)]
pub struct FakeSchemaSource {
    tables: HashMap<String, TableDescription>,
}

impl FakeSchemaSource {
    /// A source knowing the given tables.
    #[must_use]
    pub fn new(tables: Vec<TableDescription>) -> Self {
        init_tracing();
        Self {
            tables: tables
                .into_iter()
                .filter_map(|t| Some((t.table_name.clone()?, t)))
                .collect(),
        }
    }
}

impl SchemaSource for FakeSchemaSource {
    fn describe_table(
        &self,
        table: &str,
    ) -> Result<TableDescription, Box<dyn std::error::Error + Send + Sync>> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| format!("unknown table '{table}'").into())
    }
}

/// An executor recording every call and replaying one canned response.
#[derive(Debug)]
pub struct RecordingExecutor {
    response: serde_json::Value,
    calls: Mutex<Vec<(Operation, serde_json::Value)>>,
}

impl RecordingExecutor {
    /// An executor answering every call with `response`.
    #[must_use]
    pub fn new(response: serde_json::Value) -> Self {
        init_tracing();
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The recorded calls, in execution order.
    #[must_use]
    pub fn calls(&self) -> Vec<(Operation, serde_json::Value)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Executor for RecordingExecutor {
    fn execute(
        &self,
        operation: Operation,
        argument: &serde_json::Value,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>> {
        self.calls
            .lock()
            .map_err(|_| "call log poisoned")?
            .push((operation, argument.clone()));
        Ok(self.response.clone())
    }
}

/// The `Customers` table: single string hash key `id`.
#[must_use]
pub fn customers_table() -> TableDescription {
    TableDescription {
        table_name: Some("Customers".to_owned()),
        key_schema: vec![KeySchemaElement::hash("id")],
        ..Default::default()
    }
}

/// The `Orders` table: composite key `customer_id` / `placed_at`.
#[must_use]
pub fn orders_table() -> TableDescription {
    TableDescription {
        table_name: Some("Orders".to_owned()),
        key_schema: vec![
            KeySchemaElement::hash("customer_id"),
            KeySchemaElement::range("placed_at"),
        ],
        ..Default::default()
    }
}
