//! Output (response document) types for the consumed operations.
//!
//! The result normalizer deserializes raw response documents into these
//! shapes before extracting rows. Fields the query layer never reads are
//! omitted; serde ignores them on deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ConsumedCapacity, Item, Key, KeysAndAttributes, TableDescription};

/// Response document for `GetItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemOutput {
    /// The retrieved item, absent when no item matched the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,

    /// Capacity consumed by the read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Response document for `Query` and `Scan` (identical row shape).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemPageOutput {
    /// The matching items, in traversal order.
    #[serde(default)]
    pub items: Vec<Item>,

    /// The number of items returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,

    /// The number of items evaluated before filtering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_count: Option<i64>,

    /// Cursor to resume a truncated result, absent on the final page.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub last_evaluated_key: Key,

    /// Capacity consumed by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Response document for `BatchGetItem`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemOutput {
    /// Retrieved items grouped by table, in request-key order.
    #[serde(default)]
    pub responses: HashMap<String, Vec<Item>>,

    /// Keys the service did not process; must be resubmitted by the caller.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub unprocessed_keys: HashMap<String, KeysAndAttributes>,

    /// Capacity consumed per table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumed_capacity: Vec<ConsumedCapacity>,
}

/// Response document for `DescribeTable`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTableOutput {
    /// The table's properties, including its key schema and indexes.
    #[serde(rename = "Table", skip_serializing_if = "Option::is_none")]
    pub table: Option<TableDescription>,
}
