//! Result normalization.
//!
//! The four read operations return rows in three different shapes:
//! `GetItem` wraps a single optional `Item`, `BatchGetItem` groups items
//! per table under `Responses`, and `Query`/`Scan` return an `Items` page
//! with counts and a continuation cursor. The normalizer flattens all of
//! them into a uniform row list of native values, optionally folding the
//! response metadata into each row under the reserved `_response` key.

use std::collections::BTreeMap;

use dynaquery_model::output::{BatchGetItemOutput, GetItemOutput, ItemPageOutput};
use dynaquery_model::types::{ConsumedCapacity, Item, Key};
use dynaquery_model::{Value, unmarshal_item};

use crate::error::QueryError;
use crate::planner::OperationKind;

/// Reserved attribute name the response metadata is folded under.
pub const RESPONSE_KEY: &str = "_response";

/// One normalized result row: attribute name to native value.
pub type Row = BTreeMap<String, Value>;

/// A normalized response page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPage {
    /// The result rows, in response order.
    pub rows: Vec<Row>,
    /// Continuation cursor to resume a truncated query or scan.
    pub last_evaluated_key: Option<Value>,
    /// Items returned by the operation.
    pub count: i64,
    /// Items evaluated before filtering, when the operation reports it.
    pub scanned_count: Option<i64>,
}

/// Normalizes a raw response document for the given operation.
///
/// `table` selects the per-table group in a batch response. When
/// `fold_metadata` is set, each row additionally carries the response's
/// counts, capacity, and continuation cursor under [`RESPONSE_KEY`].
///
/// # Errors
///
/// Returns [`QueryError::Serialization`] when the response does not match
/// the operation's documented shape, a codec error when a wire value
/// cannot be unmarshalled, and [`QueryError::ReservedKeyCollision`] when a
/// row already has a `_response` attribute and folding was requested.
pub fn normalize(
    kind: OperationKind,
    table: &str,
    response: &serde_json::Value,
    fold_metadata: bool,
) -> Result<NormalizedPage, QueryError> {
    let mut page = match kind {
        OperationKind::SingleGet => {
            let output: GetItemOutput = serde_json::from_value(response.clone())?;
            let rows = match &output.item {
                Some(item) => vec![unmarshal_item(item)?],
                None => Vec::new(),
            };
            let count = i64::try_from(rows.len()).unwrap_or(i64::MAX);
            NormalizedPage {
                rows,
                count,
                ..NormalizedPage::default()
            }
        }
        OperationKind::BatchGet => {
            let output: BatchGetItemOutput = serde_json::from_value(response.clone())?;
            let items: &[Item] = output
                .responses
                .get(table)
                .map_or(&[], Vec::as_slice);
            let rows = items
                .iter()
                .map(unmarshal_item)
                .collect::<Result<Vec<_>, _>>()?;
            let count = i64::try_from(rows.len()).unwrap_or(i64::MAX);
            NormalizedPage {
                rows,
                count,
                ..NormalizedPage::default()
            }
        }
        OperationKind::KeyQuery | OperationKind::Scan => {
            let output: ItemPageOutput = serde_json::from_value(response.clone())?;
            let rows = output
                .items
                .iter()
                .map(unmarshal_item)
                .collect::<Result<Vec<_>, _>>()?;
            let count = output
                .count
                .unwrap_or_else(|| i64::try_from(rows.len()).unwrap_or(i64::MAX));
            NormalizedPage {
                rows,
                last_evaluated_key: key_to_value(&output.last_evaluated_key)?,
                count,
                scanned_count: output.scanned_count,
            }
        }
    };

    if fold_metadata {
        let metadata = response_metadata(kind, response)?;
        for row in &mut page.rows {
            if row.contains_key(RESPONSE_KEY) {
                return Err(QueryError::ReservedKeyCollision {
                    key: RESPONSE_KEY.to_owned(),
                });
            }
            row.insert(RESPONSE_KEY.to_owned(), metadata.clone());
        }
    }
    Ok(page)
}

/// Builds the metadata map folded under [`RESPONSE_KEY`].
fn response_metadata(
    kind: OperationKind,
    response: &serde_json::Value,
) -> Result<Value, QueryError> {
    let mut metadata = BTreeMap::new();
    match kind {
        OperationKind::SingleGet => {
            let output: GetItemOutput = serde_json::from_value(response.clone())?;
            if let Some(capacity) = &output.consumed_capacity {
                metadata.insert("ConsumedCapacity".to_owned(), capacity_value(capacity));
            }
        }
        OperationKind::BatchGet => {
            let output: BatchGetItemOutput = serde_json::from_value(response.clone())?;
            if !output.consumed_capacity.is_empty() {
                metadata.insert(
                    "ConsumedCapacity".to_owned(),
                    Value::List(
                        output
                            .consumed_capacity
                            .iter()
                            .map(capacity_value)
                            .collect(),
                    ),
                );
            }
        }
        OperationKind::KeyQuery | OperationKind::Scan => {
            let output: ItemPageOutput = serde_json::from_value(response.clone())?;
            if let Some(count) = output.count {
                metadata.insert("Count".to_owned(), Value::Int(count));
            }
            if let Some(scanned) = output.scanned_count {
                metadata.insert("ScannedCount".to_owned(), Value::Int(scanned));
            }
            if let Some(key) = key_to_value(&output.last_evaluated_key)? {
                metadata.insert("LastEvaluatedKey".to_owned(), key);
            }
            if let Some(capacity) = &output.consumed_capacity {
                metadata.insert("ConsumedCapacity".to_owned(), capacity_value(capacity));
            }
        }
    }
    Ok(Value::Map(metadata))
}

fn capacity_value(capacity: &ConsumedCapacity) -> Value {
    let mut map = BTreeMap::new();
    if let Some(table) = &capacity.table_name {
        map.insert("TableName".to_owned(), Value::String(table.clone()));
    }
    if let Some(units) = capacity.capacity_units {
        map.insert("CapacityUnits".to_owned(), Value::Float(units));
    }
    Value::Map(map)
}

fn key_to_value(key: &Key) -> Result<Option<Value>, QueryError> {
    if key.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::Map(unmarshal_item(key)?)))
    }
}
