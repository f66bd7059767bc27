//! The operation name enum.

use std::fmt;

/// Every wire operation the query layer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Table management
    /// Create a new table.
    CreateTable,
    /// Delete a table.
    DeleteTable,
    /// Describe a table's key schema and indexes.
    DescribeTable,
    /// Update a table's provisioned throughput.
    UpdateTable,

    // Item writes
    /// Put (insert or replace) an item.
    PutItem,
    /// Update an item in place.
    UpdateItem,
    /// Delete an item by primary key.
    DeleteItem,
    /// Batch write (put/delete) items.
    BatchWriteItem,

    // Reads
    /// Get a single item by full primary key.
    GetItem,
    /// Get many items by full primary keys.
    BatchGetItem,
    /// Query items by key condition, optionally through an index.
    Query,
    /// Scan all items in a table.
    Scan,
}

impl Operation {
    /// The exact operation name string used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateTable => "CreateTable",
            Self::DeleteTable => "DeleteTable",
            Self::DescribeTable => "DescribeTable",
            Self::UpdateTable => "UpdateTable",
            Self::PutItem => "PutItem",
            Self::UpdateItem => "UpdateItem",
            Self::DeleteItem => "DeleteItem",
            Self::BatchWriteItem => "BatchWriteItem",
            Self::GetItem => "GetItem",
            Self::BatchGetItem => "BatchGetItem",
            Self::Query => "Query",
            Self::Scan => "Scan",
        }
    }

    /// Parses an operation name string.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CreateTable" => Some(Self::CreateTable),
            "DeleteTable" => Some(Self::DeleteTable),
            "DescribeTable" => Some(Self::DescribeTable),
            "UpdateTable" => Some(Self::UpdateTable),
            "PutItem" => Some(Self::PutItem),
            "UpdateItem" => Some(Self::UpdateItem),
            "DeleteItem" => Some(Self::DeleteItem),
            "BatchWriteItem" => Some(Self::BatchWriteItem),
            "GetItem" => Some(Self::GetItem),
            "BatchGetItem" => Some(Self::BatchGetItem),
            "Query" => Some(Self::Query),
            "Scan" => Some(Self::Scan),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
