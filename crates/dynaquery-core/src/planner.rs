//! Query classification and operation selection.
//!
//! The planner resolves the active key schema, classifies the condition
//! tree against it, and picks one of the four native operations. The
//! decision is made once per query and never revisited; the chosen
//! builder still validates parameters the decision tree does not inspect.
//!
//! Selection order mirrors operation cost: point and batch lookups are the
//! cheapest and accept only full-key equality; key queries support sort-key
//! ranges but need the partition key fixed; scans are the fallback and the
//! only operation that rejects a server-side ordering request.

use std::collections::BTreeSet;

use dynaquery_model::Operation;
use tracing::debug;

use crate::compiler::key_candidates;
use crate::condition::{CompareOp, Condition, FunctionName};
use crate::error::QueryError;
use crate::query::LogicalQuery;
use crate::schema::{KeySchema, SchemaResolver, SchemaSource};

/// The four native read operations a query can plan onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// `GetItem`: one fully-specified key.
    SingleGet,
    /// `BatchGetItem`: several fully-specified keys.
    BatchGet,
    /// `Query`: partition key fixed, optional sort-key predicate.
    KeyQuery,
    /// `Scan`: no key constraint, post-filter only.
    Scan,
}

impl OperationKind {
    /// The wire operation this kind builds.
    #[must_use]
    pub fn operation(self) -> Operation {
        match self {
            Self::SingleGet => Operation::GetItem,
            Self::BatchGet => Operation::BatchGetItem,
            Self::KeyQuery => Operation::Query,
            Self::Scan => Operation::Scan,
        }
    }
}

/// How a condition tree relates to the active key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No condition, or a condition referencing no attributes.
    NoCondition,
    /// Every referenced attribute is a key attribute.
    KeyOnly {
        /// Whether every key attribute in the schema is referenced.
        exact: bool,
    },
    /// Both key and non-key attributes are referenced.
    KeyAndNonKey,
    /// Only non-key attributes are referenced.
    NonKeyOnly,
}

/// Classifies `condition` against `schema` by the attributes it touches.
#[must_use]
pub fn classify(condition: Option<&Condition>, schema: &KeySchema) -> Classification {
    let Some(condition) = condition else {
        return Classification::NoCondition;
    };
    let mut columns = BTreeSet::new();
    condition.collect_columns(&mut columns);
    if columns.is_empty() {
        return Classification::NoCondition;
    }
    let key_hits = columns.iter().filter(|c| schema.contains(c)).count();
    if key_hits == 0 {
        Classification::NonKeyOnly
    } else if key_hits == columns.len() {
        Classification::KeyOnly {
            exact: schema.columns().iter().all(|k| columns.contains(*k)),
        }
    } else {
        Classification::KeyAndNonKey
    }
}

/// The planner's output: the chosen operation plus the resolved schema.
#[derive(Debug, Clone)]
pub struct Plan {
    /// The operation the query will use.
    pub kind: OperationKind,
    /// The key schema the decision was made against.
    pub schema: KeySchema,
}

/// Plans logical queries onto native operations.
#[derive(Debug)]
pub struct Planner<S> {
    resolver: SchemaResolver<S>,
}

impl<S: SchemaSource> Planner<S> {
    /// Creates a planner resolving schemas from `source`.
    pub fn new(source: S) -> Self {
        Self {
            resolver: SchemaResolver::new(source),
        }
    }

    /// Decides which operation `query` must use.
    ///
    /// # Errors
    ///
    /// Returns schema-resolution errors, or compilation errors from probing
    /// the key candidates of an exact-key condition.
    pub fn plan(&self, query: &LogicalQuery) -> Result<Plan, QueryError> {
        let schema = self
            .resolver
            .resolve(&query.table, query.index_name.as_deref())?;

        if let Some(kind) = query.operation_override {
            debug!(table = %query.table, ?kind, "operation forced by caller");
            return Ok(Plan { kind, schema });
        }

        let classification = classify(query.condition.as_ref(), &schema);
        let kind = match (&query.condition, classification) {
            (Some(condition), Classification::KeyOnly { exact: true })
                if condition.is_simple_ops() && !query.has_read_modifiers() =>
            {
                // Full-key equality with no read modifiers: point or batch
                // lookup, depending on how many concrete keys the
                // candidates expand to.
                let candidates = key_candidates(condition, Operation::BatchGetItem)?;
                if candidates.key_count() == 1 {
                    OperationKind::SingleGet
                } else {
                    OperationKind::BatchGet
                }
            }
            _ => {
                let key_query_eligible = query.order_direction.is_some()
                    && query
                        .condition
                        .as_ref()
                        .is_some_and(|c| split_key_condition(c, &schema).0.is_some());
                if key_query_eligible {
                    OperationKind::KeyQuery
                } else {
                    OperationKind::Scan
                }
            }
        };
        debug!(table = %query.table, ?classification, ?kind, "planned operation");
        Ok(Plan { kind, schema })
    }
}

/// Splits a condition into a key condition and a residual filter.
///
/// Only a top-level conjunction is split: the first partition-key equality
/// and at most one sort-key predicate (comparison, range, or prefix) form
/// the key condition; every other child becomes filter. A tree without a
/// partition-key equality is returned whole as filter.
pub(crate) fn split_key_condition(
    condition: &Condition,
    schema: &KeySchema,
) -> (Option<Condition>, Option<Condition>) {
    let children: Vec<&Condition> = match condition {
        Condition::And(children) => children.iter().collect(),
        other => vec![other],
    };

    let mut partition = None;
    let mut sort = None;
    let mut filter = Vec::new();
    for child in children {
        if partition.is_none() && is_partition_equality(child, &schema.partition_key) {
            partition = Some(child.clone());
        } else if sort.is_none()
            && schema
                .sort_key
                .as_deref()
                .is_some_and(|sk| is_sort_predicate(child, sk))
        {
            sort = Some(child.clone());
        } else {
            filter.push(child.clone());
        }
    }

    let Some(partition) = partition else {
        return (None, Some(condition.clone()));
    };
    let key = match sort {
        Some(sort) => Condition::And(vec![partition, sort]),
        None => partition,
    };
    let filter = match filter.len() {
        0 => None,
        1 => filter.pop(),
        _ => Some(Condition::And(filter)),
    };
    (Some(key), filter)
}

fn is_partition_equality(node: &Condition, partition_key: &str) -> bool {
    match node {
        Condition::Hash { column, .. } => column == partition_key,
        Condition::Compare {
            op: CompareOp::Eq,
            column,
            ..
        } => column == partition_key,
        _ => false,
    }
}

fn is_sort_predicate(node: &Condition, sort_key: &str) -> bool {
    match node {
        Condition::Hash { column, .. }
        | Condition::Compare { column, .. }
        | Condition::Between { column, .. } => column == sort_key,
        Condition::Function {
            name: FunctionName::BeginsWith,
            column,
            ..
        } => column == sort_key,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use dynaquery_model::Value;
    use dynaquery_model::types::{KeySchemaElement, TableDescription};

    use super::*;
    use crate::query::OrderDirection;

    struct FixedSource(TableDescription);

    impl SchemaSource for FixedSource {
        fn describe_table(
            &self,
            _table: &str,
        ) -> Result<TableDescription, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.0.clone())
        }
    }

    fn customers_planner() -> Planner<FixedSource> {
        Planner::new(FixedSource(TableDescription {
            table_name: Some("Customers".to_owned()),
            key_schema: vec![KeySchemaElement::hash("id")],
            ..Default::default()
        }))
    }

    fn orders_planner() -> Planner<FixedSource> {
        Planner::new(FixedSource(TableDescription {
            table_name: Some("Orders".to_owned()),
            key_schema: vec![
                KeySchemaElement::hash("customer_id"),
                KeySchemaElement::range("placed_at"),
            ],
            ..Default::default()
        }))
    }

    fn pairs(items: &[(&str, Value)]) -> Vec<(String, Value)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn test_should_plan_single_key_equality_as_single_get() {
        let planner = customers_planner();
        let query = LogicalQuery::new("Customers").where_all(pairs(&[("id", "x".into())]));
        let plan = planner.plan(&query).unwrap();
        assert_eq!(plan.kind, OperationKind::SingleGet);
    }

    #[test]
    fn test_should_plan_multi_candidate_key_as_batch_get() {
        let planner = customers_planner();
        let query = LogicalQuery::new("Customers").where_all(pairs(&[(
            "id",
            Value::List(vec!["x".into(), "y".into()]),
        )]));
        let plan = planner.plan(&query).unwrap();
        assert_eq!(plan.kind, OperationKind::BatchGet);
    }

    #[test]
    fn test_should_plan_non_key_attribute_as_scan() {
        let planner = customers_planner();
        let query = LogicalQuery::new("Customers")
            .where_all(pairs(&[("id", "x".into()), ("name", "bob".into())]));
        let plan = planner.plan(&query).unwrap();
        assert_eq!(plan.kind, OperationKind::Scan);
    }

    #[test]
    fn test_should_plan_ordered_key_condition_as_key_query() {
        let planner = orders_planner();
        let query = LogicalQuery::new("Orders")
            .condition(Condition::And(vec![
                Condition::eq("customer_id", "c1"),
                Condition::compare(">", "placed_at", 100i64).unwrap(),
            ]))
            .order(OrderDirection::Descending);
        let plan = planner.plan(&query).unwrap();
        assert_eq!(plan.kind, OperationKind::KeyQuery);
    }

    #[test]
    fn test_should_plan_ordered_non_key_condition_as_scan() {
        let planner = customers_planner();
        let query = LogicalQuery::new("Customers")
            .where_all(pairs(&[("name", "bob".into())]))
            .order(OrderDirection::Ascending);
        let plan = planner.plan(&query).unwrap();
        assert_eq!(plan.kind, OperationKind::Scan);
    }

    #[test]
    fn test_should_plan_limit_as_scan_even_on_exact_key() {
        let planner = customers_planner();
        let query = LogicalQuery::new("Customers")
            .where_all(pairs(&[("id", "x".into())]))
            .limit(1);
        let plan = planner.plan(&query).unwrap();
        assert_eq!(plan.kind, OperationKind::Scan);
    }

    #[test]
    fn test_should_honor_operation_override() {
        let planner = customers_planner();
        let query = LogicalQuery::new("Customers")
            .where_all(pairs(&[("id", "x".into())]))
            .force_operation(OperationKind::Scan);
        let plan = planner.plan(&query).unwrap();
        assert_eq!(plan.kind, OperationKind::Scan);
    }

    #[test]
    fn test_should_plan_empty_condition_as_scan() {
        let planner = customers_planner();
        let plan = planner.plan(&LogicalQuery::new("Customers")).unwrap();
        assert_eq!(plan.kind, OperationKind::Scan);
    }

    #[test]
    fn test_should_plan_single_composite_tuple_as_single_get() {
        let planner = orders_planner();
        let query = LogicalQuery::new("Orders").condition(Condition::InComposite {
            columns: vec!["customer_id".to_owned(), "placed_at".to_owned()],
            tuples: vec![vec!["c1".into(), Value::Int(1)]],
        });
        let plan = planner.plan(&query).unwrap();
        assert_eq!(plan.kind, OperationKind::SingleGet);
    }

    #[test]
    fn test_should_classify_partial_key_as_non_exact() {
        let schema = KeySchema::composite("pk", "sk");
        let condition = Condition::eq("pk", "x");
        assert_eq!(
            classify(Some(&condition), &schema),
            Classification::KeyOnly { exact: false }
        );
    }

    #[test]
    fn test_should_split_key_and_filter_children() {
        let schema = KeySchema::composite("pk", "sk");
        let condition = Condition::And(vec![
            Condition::eq("pk", "x"),
            Condition::between("sk", 1i64, 9i64),
            Condition::eq("status", "open"),
        ]);
        let (key, filter) = split_key_condition(&condition, &schema);
        let Some(Condition::And(key_children)) = key else {
            panic!("expected composite key condition");
        };
        assert_eq!(key_children.len(), 2);
        assert_eq!(filter, Some(Condition::eq("status", "open")));
    }

    #[test]
    fn test_should_treat_tree_without_partition_equality_as_filter() {
        let schema = KeySchema::composite("pk", "sk");
        let condition = Condition::compare(">", "sk", 5i64).unwrap();
        let (key, filter) = split_key_condition(&condition, &schema);
        assert!(key.is_none());
        assert_eq!(filter, Some(condition));
    }
}
