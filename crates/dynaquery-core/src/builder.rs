//! The four request builders.
//!
//! Each builder turns a planned [`LogicalQuery`] into a [`NativeRequest`]:
//! the wire operation plus its argument document. Builders validate the
//! parameters the planner's decision tree does not inspect, so a forced
//! operation override still fails cleanly on an incompatible query.

use std::collections::HashMap;

use dynaquery_model::input::{BatchGetItemInput, GetItemInput, QueryInput, ScanInput};
use dynaquery_model::types::{Key, KeysAndAttributes};
use dynaquery_model::{Operation, Value, marshal};
use serde::Serialize;
use tracing::trace;

use crate::batch::BatchKeys;
use crate::compiler::{compile, compile_into, key_candidates};
use crate::error::QueryError;
use crate::planner::{OperationKind, Plan, split_key_condition};
use crate::query::{LogicalQuery, OrderDirection};

/// A built request: the operation name and its argument document, ready
/// for the execution collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeRequest {
    /// The wire operation.
    pub operation: Operation,
    /// The argument document.
    pub argument: serde_json::Value,
}

impl NativeRequest {
    /// Serializes a typed input into a request.
    pub(crate) fn new<T: Serialize>(operation: Operation, input: &T) -> Result<Self, QueryError> {
        Ok(Self {
            operation,
            argument: serde_json::to_value(input)?,
        })
    }
}

/// Builds the request for a planned query.
///
/// # Errors
///
/// Returns the building errors of the selected operation's builder; see
/// [`build_single_get`], [`build_batch_get`], [`build_key_query`], and
/// [`build_scan`].
pub fn build(query: &LogicalQuery, plan: &Plan) -> Result<NativeRequest, QueryError> {
    let request = match plan.kind {
        OperationKind::SingleGet => build_single_get(query, plan)?,
        OperationKind::BatchGet => build_batch_get(query, plan)?,
        OperationKind::KeyQuery => build_key_query(query, plan)?,
        OperationKind::Scan => build_scan(query, plan)?,
    };
    trace!(operation = %request.operation, "built request");
    Ok(request)
}

/// Builds a `GetItem` request for a single fully-specified key.
///
/// # Errors
///
/// Fails with [`QueryError::UnsupportedParameterCombination`] when the
/// condition is empty, expands to more than one key, or any of
/// index/limit/ordering/continuation is requested.
pub fn build_single_get(query: &LogicalQuery, plan: &Plan) -> Result<NativeRequest, QueryError> {
    forbid_read_modifiers(query, Operation::GetItem)?;
    let condition = require_condition(query, Operation::GetItem)?;
    let candidates = key_candidates(condition, Operation::GetItem)?;
    let mut keys = BatchKeys::from_candidates(candidates)?.materialize(&plan.schema)?;
    let key = match keys.pop() {
        Some(key) if keys.is_empty() => key,
        _ => {
            return Err(QueryError::UnsupportedParameterCombination {
                operation: Operation::GetItem,
                detail: "a condition selecting more than one key".to_owned(),
            });
        }
    };

    let input = GetItemInput {
        table_name: query.table.clone(),
        key,
        consistent_read: query.consistent_read,
        projection_expression: query.projection_expression(),
        return_consumed_capacity: query.return_capacity,
    };
    NativeRequest::new(Operation::GetItem, &input)
}

/// Builds a `BatchGetItem` request, expanding the condition's key
/// candidates into one key map per item.
///
/// # Errors
///
/// Same restrictions as [`build_single_get`], minus the single-key bound.
pub fn build_batch_get(query: &LogicalQuery, plan: &Plan) -> Result<NativeRequest, QueryError> {
    forbid_read_modifiers(query, Operation::BatchGetItem)?;
    let condition = require_condition(query, Operation::BatchGetItem)?;
    let candidates = key_candidates(condition, Operation::BatchGetItem)?;
    let keys = BatchKeys::from_candidates(candidates)?.materialize(&plan.schema)?;

    let input = batch_get_input(query, keys);
    NativeRequest::new(Operation::BatchGetItem, &input)
}

/// Builds a `BatchGetItem` request from explicit batch keys, bypassing
/// condition compilation.
///
/// # Errors
///
/// Returns the materialization errors of [`BatchKeys::materialize`].
pub fn build_batch_get_keys(
    query: &LogicalQuery,
    plan: &Plan,
    keys: &BatchKeys,
) -> Result<NativeRequest, QueryError> {
    let keys = keys.materialize(&plan.schema)?;
    let input = batch_get_input(query, keys);
    NativeRequest::new(Operation::BatchGetItem, &input)
}

fn batch_get_input(query: &LogicalQuery, keys: Vec<Key>) -> BatchGetItemInput {
    BatchGetItemInput {
        request_items: HashMap::from([(
            query.table.clone(),
            KeysAndAttributes {
                keys,
                projection_expression: query.projection_expression(),
                consistent_read: query.consistent_read,
            },
        )]),
        return_consumed_capacity: query.return_capacity,
    }
}

/// Builds a `Query` request, splitting the condition into the key
/// condition and a residual filter with one shared placeholder sequence.
///
/// # Errors
///
/// Fails with [`QueryError::UnsupportedParameterCombination`] when the
/// condition is empty or carries no partition-key equality, and with
/// [`QueryError::InvalidContinuationKey`] when the continuation cursor is
/// not a map.
pub fn build_key_query(query: &LogicalQuery, plan: &Plan) -> Result<NativeRequest, QueryError> {
    let condition = require_condition(query, Operation::Query)?;
    let (key_part, filter_part) = split_key_condition(condition, &plan.schema);
    let Some(key_part) = key_part else {
        return Err(QueryError::UnsupportedParameterCombination {
            operation: Operation::Query,
            detail: "a condition without a partition-key equality".to_owned(),
        });
    };

    let mut values = Vec::new();
    let key_text = compile_into(&key_part, &mut values)?;
    let filter_text = match &filter_part {
        Some(filter) => non_empty(compile_into(filter, &mut values)?),
        None => None,
    };

    let input = QueryInput {
        table_name: query.table.clone(),
        index_name: query.index_name.clone(),
        key_condition_expression: non_empty(key_text),
        filter_expression: filter_text,
        projection_expression: query.projection_expression(),
        expression_attribute_values: values.into_iter().collect(),
        scan_index_forward: query.order_direction.map(OrderDirection::scan_index_forward),
        limit: query.limit,
        exclusive_start_key: continuation_key(query)?,
        consistent_read: query.consistent_read,
        return_consumed_capacity: query.return_capacity,
    };
    NativeRequest::new(Operation::Query, &input)
}

/// Builds a `Scan` request with the whole condition as a filter.
///
/// # Errors
///
/// Fails with [`QueryError::UnsupportedOnScan`] when an ordering direction
/// is requested, and with [`QueryError::InvalidContinuationKey`] when the
/// continuation cursor is not a map.
pub fn build_scan(query: &LogicalQuery, _plan: &Plan) -> Result<NativeRequest, QueryError> {
    if query.order_direction.is_some() {
        return Err(QueryError::UnsupportedOnScan);
    }

    let (filter_text, values) = match &query.condition {
        Some(condition) => {
            let compiled = compile(condition)?;
            (non_empty(compiled.text), compiled.values)
        }
        None => (None, Vec::new()),
    };

    let input = ScanInput {
        table_name: query.table.clone(),
        index_name: query.index_name.clone(),
        filter_expression: filter_text,
        projection_expression: query.projection_expression(),
        expression_attribute_values: values.into_iter().collect(),
        limit: query.limit,
        exclusive_start_key: continuation_key(query)?,
        consistent_read: query.consistent_read,
        return_consumed_capacity: query.return_capacity,
    };
    NativeRequest::new(Operation::Scan, &input)
}

fn require_condition<'a>(
    query: &'a LogicalQuery,
    operation: Operation,
) -> Result<&'a crate::condition::Condition, QueryError> {
    query
        .condition
        .as_ref()
        .ok_or_else(|| QueryError::UnsupportedParameterCombination {
            operation,
            detail: "an empty condition".to_owned(),
        })
}

fn forbid_read_modifiers(query: &LogicalQuery, operation: Operation) -> Result<(), QueryError> {
    let detail = if query.index_name.is_some() {
        "an index"
    } else if query.limit.is_some() {
        "a limit"
    } else if query.order_direction.is_some() {
        "an ordering direction"
    } else if query.continuation_key.is_some() {
        "a continuation key"
    } else {
        return Ok(());
    };
    Err(QueryError::UnsupportedParameterCombination {
        operation,
        detail: detail.to_owned(),
    })
}

/// Marshals the continuation cursor, which must be a map of key attributes.
fn continuation_key(query: &LogicalQuery) -> Result<Key, QueryError> {
    match &query.continuation_key {
        None => Ok(Key::new()),
        Some(Value::Map(entries)) => {
            let mut key = Key::new();
            for (attribute, value) in entries {
                key.insert(attribute.clone(), marshal(value)?);
            }
            Ok(key)
        }
        Some(_) => Err(QueryError::InvalidContinuationKey),
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
