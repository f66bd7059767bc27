//! The logical query description.
//!
//! A [`LogicalQuery`] is the caller-facing input: table, condition tree,
//! projection, ordering, pagination. It is immutable once handed to the
//! planner; the builders read it but never write it.

use dynaquery_model::Value;
use dynaquery_model::types::ReturnConsumedCapacity;

use crate::condition::Condition;
use crate::planner::OperationKind;

/// Server-side ordering over the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending sort-key order (`ScanIndexForward = true`).
    Ascending,
    /// Descending sort-key order (`ScanIndexForward = false`).
    Descending,
}

impl OrderDirection {
    /// The `ScanIndexForward` value this direction maps to.
    #[must_use]
    pub fn scan_index_forward(self) -> bool {
        matches!(self, Self::Ascending)
    }
}

/// A relational-style query to be planned onto a native operation.
#[derive(Debug, Clone, Default)]
pub struct LogicalQuery {
    /// The target table.
    pub table: String,
    /// Secondary index to query, when set.
    pub index_name: Option<String>,
    /// The condition tree; `None` selects everything.
    pub condition: Option<Condition>,
    /// Attributes to project; empty projects all attributes.
    pub projection: Vec<String>,
    /// Sort-key ordering request.
    pub order_direction: Option<OrderDirection>,
    /// Maximum number of items to evaluate.
    pub limit: Option<i32>,
    /// Continuation cursor from a previous truncated page. Must be a map
    /// of key attributes.
    pub continuation_key: Option<Value>,
    /// Whether to use strongly consistent reads.
    pub consistent_read: Option<bool>,
    /// Level of consumed-capacity reporting to request.
    pub return_capacity: Option<ReturnConsumedCapacity>,
    /// Forces a specific operation, bypassing classification.
    pub operation_override: Option<OperationKind>,
}

impl LogicalQuery {
    /// A query over `table` with no condition.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Sets the condition tree.
    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Builds the condition from ordered column/value pairs, the implicit
    /// equality/membership form.
    #[must_use]
    pub fn where_all(mut self, pairs: Vec<(String, Value)>) -> Self {
        self.condition = Some(Condition::all(pairs));
        self
    }

    /// Queries the named secondary index.
    #[must_use]
    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Projects only the named attributes.
    #[must_use]
    pub fn select(mut self, attributes: Vec<String>) -> Self {
        self.projection = attributes;
        self
    }

    /// Requests sort-key ordering.
    #[must_use]
    pub fn order(mut self, direction: OrderDirection) -> Self {
        self.order_direction = Some(direction);
        self
    }

    /// Caps the number of evaluated items.
    #[must_use]
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resumes from a previous page's continuation cursor.
    #[must_use]
    pub fn start_after(mut self, key: Value) -> Self {
        self.continuation_key = Some(key);
        self
    }

    /// Requests strongly consistent reads.
    #[must_use]
    pub fn consistent(mut self, consistent: bool) -> Self {
        self.consistent_read = Some(consistent);
        self
    }

    /// Requests consumed-capacity reporting.
    #[must_use]
    pub fn return_capacity(mut self, mode: ReturnConsumedCapacity) -> Self {
        self.return_capacity = Some(mode);
        self
    }

    /// Forces the given operation, skipping classification.
    #[must_use]
    pub fn force_operation(mut self, kind: OperationKind) -> Self {
        self.operation_override = Some(kind);
        self
    }

    /// Returns `true` when any of index, limit, ordering, or continuation
    /// is requested. Point and batch lookups accept none of these.
    #[must_use]
    pub(crate) fn has_read_modifiers(&self) -> bool {
        self.index_name.is_some()
            || self.limit.is_some()
            || self.order_direction.is_some()
            || self.continuation_key.is_some()
    }

    /// The projection as a `ProjectionExpression`, or `None` when empty.
    #[must_use]
    pub(crate) fn projection_expression(&self) -> Option<String> {
        if self.projection.is_empty() {
            None
        } else {
            Some(self.projection.join(", "))
        }
    }
}
