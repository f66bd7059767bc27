//! The condition tree.
//!
//! A [`Condition`] is a read-only AST describing a boolean predicate over
//! item attributes. It is built by the caller (directly or through the
//! [`Condition::all`] map form), classified by the planner, and compiled by
//! the condition compiler. Compilation never mutates the tree.

use std::collections::BTreeSet;
use std::fmt;

use dynaquery_model::Value;

use crate::error::QueryError;

/// Comparison operators legal in compiled expressions.
///
/// DynamoDB's grammar also has `<>`, but the underlying key and filter
/// semantics this layer targets only admit the five below; everything else
/// is rejected at parse time rather than passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (`=`).
    Eq,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
}

impl CompareOp {
    /// The operator token as it appears in compiled expression text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Parses an operator token.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnimplementedOperator`] for any token outside
    /// the supported set (`LIKE`, `<>`, `!=`, ...).
    pub fn parse(token: &str) -> Result<Self, QueryError> {
        match token {
            "=" => Ok(Self::Eq),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            other => Err(QueryError::UnimplementedOperator {
                token: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in expression functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionName {
    /// `attribute_exists(path)`.
    AttributeExists,
    /// `attribute_not_exists(path)`.
    AttributeNotExists,
    /// `attribute_type(path, type)`.
    AttributeType,
    /// `begins_with(path, prefix)`.
    BeginsWith,
    /// `contains(path, operand)`.
    Contains,
}

impl FunctionName {
    /// The function name as it appears in compiled expression text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AttributeExists => "attribute_exists",
            Self::AttributeNotExists => "attribute_not_exists",
            Self::AttributeType => "attribute_type",
            Self::BeginsWith => "begins_with",
            Self::Contains => "contains",
        }
    }

    /// Number of operands: 1 for existence checks, 2 for the rest.
    ///
    /// The first operand of a 2-ary function is always a literal attribute
    /// name; only the second is value-substituted.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::AttributeExists | Self::AttributeNotExists => 1,
            Self::AttributeType | Self::BeginsWith | Self::Contains => 2,
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Implicit equality, the only form accepted in pure key-lookup contexts.
    Hash {
        /// The attribute name.
        column: String,
        /// The value to match.
        value: Value,
    },
    /// Explicit comparison: `column op value`.
    Compare {
        /// The comparison operator.
        op: CompareOp,
        /// The attribute name.
        column: String,
        /// The value to compare against.
        value: Value,
    },
    /// Inclusive range: `column BETWEEN low AND high`.
    Between {
        /// The attribute name.
        column: String,
        /// Lower bound.
        low: Value,
        /// Upper bound.
        high: Value,
    },
    /// Membership: `column IN (values...)`.
    In {
        /// The attribute name.
        column: String,
        /// The candidate values, in input order.
        values: Vec<Value>,
    },
    /// Composite-key membership: each tuple binds one value per column.
    InComposite {
        /// The attribute names, in tuple order.
        columns: Vec<String>,
        /// The candidate tuples, in input order.
        tuples: Vec<Vec<Value>>,
    },
    /// A function call on an attribute.
    Function {
        /// The function.
        name: FunctionName,
        /// The attribute the function applies to (always a literal name).
        column: String,
        /// The second operand for 2-ary functions.
        operand: Option<Value>,
    },
    /// Conjunction of child conditions.
    And(Vec<Condition>),
    /// Disjunction of child conditions.
    Or(Vec<Condition>),
    /// Negation of a child condition.
    Not(Box<Condition>),
}

impl Condition {
    /// Implicit equality on `column`.
    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Hash {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Explicit comparison, parsing the operator token.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnimplementedOperator`] for unsupported tokens.
    pub fn compare(
        op: &str,
        column: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        Ok(Self::Compare {
            op: CompareOp::parse(op)?,
            column: column.into(),
            value: value.into(),
        })
    }

    /// Inclusive range on `column`.
    #[must_use]
    pub fn between(
        column: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Self::Between {
            column: column.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// Membership of `column` in `values`.
    #[must_use]
    pub fn is_in(column: impl Into<String>, values: Vec<Value>) -> Self {
        Self::In {
            column: column.into(),
            values,
        }
    }

    /// Builds the implicit-AND form from ordered column/value pairs.
    ///
    /// Scalar values become equality tests; list values become `IN`
    /// memberships. Placeholder numbering follows pair order, so the same
    /// input always compiles to the same text.
    #[must_use]
    pub fn all(pairs: Vec<(String, Value)>) -> Self {
        let children = pairs
            .into_iter()
            .map(|(column, value)| match value {
                Value::List(values) => Self::In { column, values },
                value => Self::Hash { column, value },
            })
            .collect();
        Self::And(children)
    }

    /// Collects every attribute name referenced by the tree.
    pub fn collect_columns(&self, columns: &mut BTreeSet<String>) {
        match self {
            Self::Hash { column, .. }
            | Self::Compare { column, .. }
            | Self::Between { column, .. }
            | Self::In { column, .. }
            | Self::Function { column, .. } => {
                columns.insert(column.clone());
            }
            Self::InComposite { columns: cols, .. } => {
                for c in cols {
                    columns.insert(c.clone());
                }
            }
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_columns(columns);
                }
            }
            Self::Not(child) => child.collect_columns(columns),
        }
    }

    /// Returns `true` if the tree uses only equality and membership,
    /// combined with `AND`. This is the precondition for point and batch
    /// lookups, which accept nothing but full-key equality.
    #[must_use]
    pub fn is_simple_ops(&self) -> bool {
        match self {
            Self::Hash { .. } | Self::In { .. } | Self::InComposite { .. } => true,
            Self::Compare { op, .. } => *op == CompareOp::Eq,
            Self::And(children) => children.iter().all(Self::is_simple_ops),
            Self::Between { .. } | Self::Function { .. } | Self::Or(_) | Self::Not(_) => false,
        }
    }
}
