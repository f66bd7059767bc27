//! The error taxonomy for planning and building.
//!
//! Every variant is a caller error surfaced synchronously from a single
//! compile/plan/build call. Nothing here is retried or swallowed; the
//! orchestrating caller owns retry and backoff policy against the store.

use dynaquery_model::CodecError;
use dynaquery_model::Operation;
use thiserror::Error;

/// Errors produced by the query planning core.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A value could not be marshalled to or from the wire format.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A null value was supplied where the store has no null semantics.
    #[error("null value not allowed for column '{column}'")]
    NullValueNotAllowed {
        /// The column the null value was bound to.
        column: String,
    },

    /// A named index is absent from the table description.
    #[error("index '{index}' not found on table '{table}'")]
    IndexNotFound {
        /// The table that was described.
        table: String,
        /// The missing index name.
        index: String,
    },

    /// The table description did not contain a usable key schema.
    #[error("table '{table}' returned no HASH key in its key schema")]
    MalformedKeySchema {
        /// The table that was described.
        table: String,
    },

    /// Flat scalar batch keys were given for a table with a composite key.
    #[error("flat scalar keys require a single-attribute key schema, but this schema has {key_count} key attributes")]
    MultiKeyTableRequiresCompositeKey {
        /// Number of attributes in the active key schema.
        key_count: usize,
    },

    /// Parallel key-column lists have differing lengths.
    #[error("key column '{column}' has {actual} values, expected {expected}")]
    InconsistentKeyColumnLengths {
        /// The offending column.
        column: String,
        /// The length of the first column list.
        expected: usize,
        /// The length of the offending column list.
        actual: usize,
    },

    /// A candidate tuple does not match the number of columns it is bound to.
    #[error("key tuple has {actual} values, expected {expected}")]
    KeyTupleArityMismatch {
        /// Number of columns in the tuple target.
        expected: usize,
        /// Number of values in the offending tuple.
        actual: usize,
    },

    /// A request parameter is not legal for the chosen operation.
    #[error("{operation} does not support {detail}")]
    UnsupportedParameterCombination {
        /// The operation being built.
        operation: Operation,
        /// What was requested.
        detail: String,
    },

    /// An ordering direction was requested for a full scan.
    #[error("Scan has no server-side ordering; remove the order direction or constrain the query to key attributes")]
    UnsupportedOnScan,

    /// The continuation cursor is not a key map.
    #[error("continuation key must be a map of key attributes")]
    InvalidContinuationKey,

    /// The response-metadata key would shadow a real item attribute.
    #[error("item already has an attribute named '{key}'")]
    ReservedKeyCollision {
        /// The reserved metadata key.
        key: String,
    },

    /// A condition operator outside the supported set.
    #[error("operator '{token}' is not supported")]
    UnimplementedOperator {
        /// The rejected operator token.
        token: String,
    },

    /// An argument or response document failed to (de)serialize.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An external collaborator (schema or execution) failed.
    #[error("collaborator error: {0}")]
    Collaborator(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl QueryError {
    /// Wraps an arbitrary collaborator failure.
    #[must_use]
    pub fn collaborator(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Collaborator(Box::new(err))
    }
}
