//! Write-side and table-management request builders.
//!
//! These mirror the read builders: each function produces a
//! [`NativeRequest`] the execution collaborator can run as-is. Batch
//! writes are chunked at the provider's 25-item limit; resubmission of
//! unprocessed items stays with the caller.

use std::collections::{BTreeMap, HashMap};

use dynaquery_model::input::{
    BatchWriteItemInput, CreateTableInput, DeleteItemInput, DeleteTableInput, DescribeTableInput,
    PutItemInput, UpdateItemInput, UpdateTableInput,
};
use dynaquery_model::types::{ProvisionedThroughput, WriteRequest};
use dynaquery_model::{Operation, Value, marshal, marshal_item};

use crate::batch::BatchKeys;
use crate::builder::NativeRequest;
use crate::compiler::PLACEHOLDER_PREFIX;
use crate::error::QueryError;
use crate::schema::KeySchema;

/// Provider limit on items per `BatchWriteItem` request.
pub const BATCH_WRITE_CHUNK: usize = 25;

/// Builds a `PutItem` request storing the full `item`.
///
/// # Errors
///
/// Returns a codec error when an attribute has no wire representation.
pub fn put_item(
    table: &str,
    item: &BTreeMap<String, Value>,
) -> Result<NativeRequest, QueryError> {
    let input = PutItemInput {
        table_name: table.to_owned(),
        item: marshal_item(item)?,
        return_consumed_capacity: None,
    };
    NativeRequest::new(Operation::PutItem, &input)
}

/// Builds an `UpdateItem` request applying `SET` assignments in order.
///
/// # Errors
///
/// Returns [`QueryError::NullValueNotAllowed`] for a null assignment value
/// and codec errors for unrepresentable values.
pub fn update_item(
    table: &str,
    key: &BTreeMap<String, Value>,
    assignments: &[(String, Value)],
) -> Result<NativeRequest, QueryError> {
    let mut values = HashMap::with_capacity(assignments.len());
    let mut clauses = Vec::with_capacity(assignments.len());
    for (i, (column, value)) in assignments.iter().enumerate() {
        if value.is_null() {
            return Err(QueryError::NullValueNotAllowed {
                column: column.clone(),
            });
        }
        let placeholder = format!("{PLACEHOLDER_PREFIX}{i}");
        clauses.push(format!("{column}={placeholder}"));
        values.insert(placeholder, marshal(value)?);
    }

    let input = UpdateItemInput {
        table_name: table.to_owned(),
        key: marshal_item(key)?,
        update_expression: if clauses.is_empty() {
            None
        } else {
            Some(format!("SET {}", clauses.join(", ")))
        },
        expression_attribute_values: values,
        return_consumed_capacity: None,
    };
    NativeRequest::new(Operation::UpdateItem, &input)
}

/// Builds a `DeleteItem` request for one fully-specified key.
///
/// # Errors
///
/// Returns codec errors for unrepresentable key values.
pub fn delete_item(
    table: &str,
    key: &BTreeMap<String, Value>,
) -> Result<NativeRequest, QueryError> {
    let input = DeleteItemInput {
        table_name: table.to_owned(),
        key: marshal_item(key)?,
        return_consumed_capacity: None,
    };
    NativeRequest::new(Operation::DeleteItem, &input)
}

/// Builds the chunked `BatchWriteItem` requests that put every item.
///
/// Chunks preserve item order; each request carries at most
/// [`BATCH_WRITE_CHUNK`] writes.
///
/// # Errors
///
/// Returns codec errors for unrepresentable attribute values.
pub fn batch_put(
    table: &str,
    items: &[BTreeMap<String, Value>],
) -> Result<Vec<NativeRequest>, QueryError> {
    let writes = items
        .iter()
        .map(|item| Ok(WriteRequest::put(marshal_item(item)?)))
        .collect::<Result<Vec<_>, QueryError>>()?;
    chunk_writes(table, writes)
}

/// Builds the chunked `BatchWriteItem` requests that delete every key.
///
/// Accepts the same four key shapes as batch reads.
///
/// # Errors
///
/// Returns the materialization errors of [`BatchKeys::materialize`].
pub fn batch_delete(
    table: &str,
    schema: &KeySchema,
    keys: &BatchKeys,
) -> Result<Vec<NativeRequest>, QueryError> {
    let writes = keys
        .materialize(schema)?
        .into_iter()
        .map(WriteRequest::delete)
        .collect();
    chunk_writes(table, writes)
}

fn chunk_writes(table: &str, writes: Vec<WriteRequest>) -> Result<Vec<NativeRequest>, QueryError> {
    writes
        .chunks(BATCH_WRITE_CHUNK)
        .map(|chunk| {
            let input = BatchWriteItemInput {
                request_items: HashMap::from([(table.to_owned(), chunk.to_vec())]),
                return_consumed_capacity: None,
            };
            NativeRequest::new(Operation::BatchWriteItem, &input)
        })
        .collect()
}

/// Builds a `CreateTable` request.
///
/// # Errors
///
/// Returns [`QueryError::Serialization`] when the input fails to serialize.
pub fn create_table(input: &CreateTableInput) -> Result<NativeRequest, QueryError> {
    NativeRequest::new(Operation::CreateTable, input)
}

/// Builds a `DeleteTable` request.
///
/// # Errors
///
/// Returns [`QueryError::Serialization`] when the input fails to serialize.
pub fn delete_table(table: &str) -> Result<NativeRequest, QueryError> {
    let input = DeleteTableInput {
        table_name: table.to_owned(),
    };
    NativeRequest::new(Operation::DeleteTable, &input)
}

/// Builds a `DescribeTable` request.
///
/// # Errors
///
/// Returns [`QueryError::Serialization`] when the input fails to serialize.
pub fn describe_table(table: &str) -> Result<NativeRequest, QueryError> {
    let input = DescribeTableInput {
        table_name: table.to_owned(),
    };
    NativeRequest::new(Operation::DescribeTable, &input)
}

/// Builds an `UpdateTable` request changing provisioned throughput.
///
/// # Errors
///
/// Returns [`QueryError::Serialization`] when the input fails to serialize.
pub fn update_table(
    table: &str,
    throughput: ProvisionedThroughput,
) -> Result<NativeRequest, QueryError> {
    let input = UpdateTableInput {
        table_name: table.to_owned(),
        provisioned_throughput: Some(throughput),
    };
    NativeRequest::new(Operation::UpdateTable, &input)
}
