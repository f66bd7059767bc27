//! The condition compiler.
//!
//! Compiles a [`Condition`] tree into expression text plus an ordered value
//! table. Placeholders are named `:dqp0`, `:dqp1`, ... by the size of the
//! value table at the moment of insertion, which makes numbering a stable,
//! testable property of the input tree rather than an implementation
//! accident: external golden tests key on the exact text.
//!
//! The value table is threaded through every recursive call as an explicit
//! accumulator, so one compilation pass over several subtrees (the
//! key-condition/filter split) still yields collision-free placeholders.

use std::collections::HashMap;

use dynaquery_model::attribute_value::AttributeValue;
use dynaquery_model::{Value, marshal};

use crate::condition::{CompareOp, Condition};
use crate::error::QueryError;

/// Prefix for generated value placeholders.
pub const PLACEHOLDER_PREFIX: &str = ":dqp";

/// The literal an empty `IN` compiles to: false for every item.
pub const UNSATISFIABLE: &str = "0=1";

/// The output of one compilation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledExpression {
    /// The expression text, empty when the tree compiled to nothing.
    pub text: String,
    /// Placeholder-to-value bindings, in insertion order.
    pub values: Vec<(String, AttributeValue)>,
}

impl CompiledExpression {
    /// Returns `true` when the tree compiled to no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The value table as the wire's `ExpressionAttributeValues` map.
    #[must_use]
    pub fn values_map(&self) -> HashMap<String, AttributeValue> {
        self.values.iter().cloned().collect()
    }
}

/// Compiles a condition tree into expression text and a value table.
///
/// # Errors
///
/// Returns [`QueryError::NullValueNotAllowed`] when a null value is bound,
/// or a codec error when a value has no wire representation.
pub fn compile(node: &Condition) -> Result<CompiledExpression, QueryError> {
    let mut values = Vec::new();
    let text = compile_into(node, &mut values)?;
    Ok(CompiledExpression { text, values })
}

/// Compiles `node`, appending its bindings to an existing value table.
///
/// Used by the key-query builder to compile the key condition and the
/// filter in one numbering sequence.
///
/// # Errors
///
/// Same as [`compile`].
pub fn compile_into(
    node: &Condition,
    values: &mut Vec<(String, AttributeValue)>,
) -> Result<String, QueryError> {
    match node {
        Condition::Hash { column, value } => {
            let p = bind(column, value, values)?;
            Ok(format!("{column}={p}"))
        }
        Condition::Compare { op, column, value } => {
            let p = bind(column, value, values)?;
            Ok(format!("{column}{op}{p}"))
        }
        Condition::Between { column, low, high } => {
            let p_low = bind(column, low, values)?;
            let p_high = bind(column, high, values)?;
            Ok(format!("{column} BETWEEN {p_low} AND {p_high}"))
        }
        Condition::In {
            column,
            values: candidates,
        } => compile_in(column, candidates, values),
        Condition::InComposite { columns, tuples } => {
            compile_in_composite(columns, tuples, values)
        }
        Condition::Function {
            name,
            column,
            operand,
        } => {
            if name.arity() == 1 {
                return Ok(format!("{name}({column})"));
            }
            let Some(operand) = operand else {
                return Err(QueryError::NullValueNotAllowed {
                    column: column.clone(),
                });
            };
            let p = bind(column, operand, values)?;
            Ok(format!("{name}({column}, {p})"))
        }
        Condition::Not(child) => {
            let inner = compile_into(child, values)?;
            // An empty child degenerates NOT to a no-op rather than
            // producing invalid syntax.
            if inner.is_empty() {
                Ok(String::new())
            } else {
                Ok(format!("NOT ({inner})"))
            }
        }
        Condition::And(children) => compile_junction("AND", children, values),
        Condition::Or(children) => compile_junction("OR", children, values),
    }
}

/// Registers `value` under a fresh placeholder and returns the placeholder.
fn bind(
    column: &str,
    value: &Value,
    values: &mut Vec<(String, AttributeValue)>,
) -> Result<String, QueryError> {
    if value.is_null() {
        return Err(QueryError::NullValueNotAllowed {
            column: column.to_owned(),
        });
    }
    let placeholder = format!("{PLACEHOLDER_PREFIX}{}", values.len());
    let wire = marshal(value)?;
    values.push((placeholder.clone(), wire));
    Ok(placeholder)
}

fn compile_in(
    column: &str,
    candidates: &[Value],
    values: &mut Vec<(String, AttributeValue)>,
) -> Result<String, QueryError> {
    match candidates {
        // No candidates can ever match.
        [] => Ok(UNSATISFIABLE.to_owned()),
        // A singleton degrades to plain equality.
        [single] => {
            let p = bind(column, single, values)?;
            Ok(format!("{column}={p}"))
        }
        many => {
            let placeholders = many
                .iter()
                .map(|v| bind(column, v, values))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{column} IN ({})", placeholders.join(", ")))
        }
    }
}

fn compile_in_composite(
    columns: &[String],
    tuples: &[Vec<Value>],
    values: &mut Vec<(String, AttributeValue)>,
) -> Result<String, QueryError> {
    if tuples.is_empty() {
        return Ok(UNSATISFIABLE.to_owned());
    }
    let mut groups = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        if tuple.len() != columns.len() {
            return Err(QueryError::KeyTupleArityMismatch {
                expected: columns.len(),
                actual: tuple.len(),
            });
        }
        let parts = columns
            .iter()
            .zip(tuple)
            .map(|(column, value)| {
                let p = bind(column, value, values)?;
                Ok(format!("{column}={p}"))
            })
            .collect::<Result<Vec<_>, QueryError>>()?;
        groups.push(format!("({})", parts.join(" AND ")));
    }
    Ok(groups.join(" OR "))
}

/// Joins compiled children with a keyword, skipping empty children.
///
/// A single surviving child is emitted without extra parentheses; two or
/// more are each parenthesized.
fn compile_junction(
    keyword: &str,
    children: &[Condition],
    values: &mut Vec<(String, AttributeValue)>,
) -> Result<String, QueryError> {
    let mut compiled = Vec::with_capacity(children.len());
    for child in children {
        let text = compile_into(child, values)?;
        if !text.is_empty() {
            compiled.push(text);
        }
    }
    match compiled.len() {
        0 => Ok(String::new()),
        1 => Ok(compiled.remove(0)),
        _ => {
            let wrapped: Vec<String> = compiled.iter().map(|c| format!("({c})")).collect();
            Ok(wrapped.join(&format!(" {keyword} ")))
        }
    }
}

// ---------------------------------------------------------------------------
// Key extraction (the hash path)
// ---------------------------------------------------------------------------

/// Key candidates extracted from an equality-only condition tree.
///
/// Point and batch builders use this instead of expression text: the
/// candidates expand into concrete key maps.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyCandidates {
    /// Independent candidate lists per column; the key set is their
    /// cartesian product in column order.
    PerColumn(Vec<(String, Vec<Value>)>),
    /// Explicit tuples, one key per tuple.
    Tuples {
        /// The key columns, in tuple order.
        columns: Vec<String>,
        /// The candidate tuples.
        tuples: Vec<Vec<Value>>,
    },
}

impl KeyCandidates {
    /// Number of concrete keys these candidates expand to.
    #[must_use]
    pub fn key_count(&self) -> usize {
        match self {
            Self::PerColumn(columns) => {
                columns.iter().map(|(_, vs)| vs.len()).product()
            }
            Self::Tuples { tuples, .. } => tuples.len(),
        }
    }
}

/// Extracts key candidates from an equality/membership condition tree.
///
/// Accepts `Hash`, equality `Compare`, `In`, a lone `InComposite`, and an
/// `And` of the first three. Anything else is not a key lookup.
///
/// # Errors
///
/// Returns [`QueryError::UnsupportedParameterCombination`] when the tree
/// contains an operator or shape with no key-lookup equivalent.
pub fn key_candidates(
    node: &Condition,
    operation: dynaquery_model::Operation,
) -> Result<KeyCandidates, QueryError> {
    match node {
        Condition::InComposite { columns, tuples } => Ok(KeyCandidates::Tuples {
            columns: columns.clone(),
            tuples: tuples.clone(),
        }),
        other => {
            let mut columns = Vec::new();
            collect_candidates(other, operation, &mut columns)?;
            Ok(KeyCandidates::PerColumn(columns))
        }
    }
}

fn collect_candidates(
    node: &Condition,
    operation: dynaquery_model::Operation,
    out: &mut Vec<(String, Vec<Value>)>,
) -> Result<(), QueryError> {
    match node {
        Condition::Hash { column, value } => {
            out.push((column.clone(), vec![value.clone()]));
            Ok(())
        }
        Condition::Compare {
            op: CompareOp::Eq,
            column,
            value,
        } => {
            out.push((column.clone(), vec![value.clone()]));
            Ok(())
        }
        Condition::In { column, values } => {
            out.push((column.clone(), values.clone()));
            Ok(())
        }
        Condition::And(children) => {
            for child in children {
                collect_candidates(child, operation, out)?;
            }
            Ok(())
        }
        other => Err(QueryError::UnsupportedParameterCombination {
            operation,
            detail: format!("condition shape {other:?} in a key lookup"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use dynaquery_model::Operation;

    use super::*;
    use crate::condition::FunctionName;

    fn n(s: &str) -> AttributeValue {
        AttributeValue::N(s.to_owned())
    }

    fn s(v: &str) -> AttributeValue {
        AttributeValue::S(v.to_owned())
    }

    #[test]
    fn test_should_compile_hash_pairs_with_deterministic_placeholders() {
        let cond = Condition::all(vec![
            ("a".to_owned(), Value::Int(1)),
            ("b".to_owned(), Value::Int(2)),
        ]);
        let compiled = compile(&cond).unwrap();
        assert_eq!(compiled.text, "(a=:dqp0) AND (b=:dqp1)");
        assert_eq!(
            compiled.values,
            vec![(":dqp0".to_owned(), n("1")), (":dqp1".to_owned(), n("2"))]
        );
    }

    #[test]
    fn test_should_compile_single_pair_without_wrapper() {
        let cond = Condition::all(vec![("name".to_owned(), "bob".into())]);
        let compiled = compile(&cond).unwrap();
        assert_eq!(compiled.text, "name=:dqp0");
        assert_eq!(compiled.values, vec![(":dqp0".to_owned(), s("bob"))]);
    }

    #[test]
    fn test_should_compile_comparison_operators() {
        let cond = Condition::compare(">=", "age", 21i64).unwrap();
        let compiled = compile(&cond).unwrap();
        assert_eq!(compiled.text, "age>=:dqp0");
    }

    #[test]
    fn test_should_compile_between_with_bounds_in_order() {
        let cond = Condition::between("age", 18i64, 65i64);
        let compiled = compile(&cond).unwrap();
        assert_eq!(compiled.text, "age BETWEEN :dqp0 AND :dqp1");
        assert_eq!(
            compiled.values,
            vec![(":dqp0".to_owned(), n("18")), (":dqp1".to_owned(), n("65"))]
        );
    }

    #[test]
    fn test_should_degrade_singleton_in_to_equality() {
        let via_in = compile(&Condition::is_in("id", vec![Value::Int(5)])).unwrap();
        let via_hash = compile(&Condition::eq("id", 5i64)).unwrap();
        assert_eq!(via_in, via_hash);
    }

    #[test]
    fn test_should_compile_empty_in_as_unsatisfiable() {
        let compiled = compile(&Condition::is_in("id", vec![])).unwrap();
        assert_eq!(compiled.text, "0=1");
        assert!(compiled.values.is_empty());
    }

    #[test]
    fn test_should_compile_multi_value_in() {
        let cond = Condition::is_in("id", vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let compiled = compile(&cond).unwrap();
        assert_eq!(compiled.text, "id IN (:dqp0, :dqp1, :dqp2)");
    }

    #[test]
    fn test_should_compile_composite_in_as_or_of_conjunctions() {
        let cond = Condition::InComposite {
            columns: vec!["pk".to_owned(), "sk".to_owned()],
            tuples: vec![
                vec!["a".into(), Value::Int(1)],
                vec!["b".into(), Value::Int(2)],
            ],
        };
        let compiled = compile(&cond).unwrap();
        assert_eq!(
            compiled.text,
            "(pk=:dqp0 AND sk=:dqp1) OR (pk=:dqp2 AND sk=:dqp3)"
        );
        assert_eq!(compiled.values.len(), 4);
    }

    #[test]
    fn test_should_reject_composite_tuple_arity_mismatch() {
        let cond = Condition::InComposite {
            columns: vec!["pk".to_owned(), "sk".to_owned()],
            tuples: vec![vec!["a".into()]],
        };
        let err = compile(&cond).unwrap_err();
        assert!(matches!(
            err,
            QueryError::KeyTupleArityMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_should_compile_unary_function_without_placeholder() {
        let cond = Condition::Function {
            name: FunctionName::AttributeExists,
            column: "email".to_owned(),
            operand: None,
        };
        let compiled = compile(&cond).unwrap();
        assert_eq!(compiled.text, "attribute_exists(email)");
        assert!(compiled.values.is_empty());
    }

    #[test]
    fn test_should_compile_binary_function_with_placeholder_second_arg() {
        let cond = Condition::Function {
            name: FunctionName::BeginsWith,
            column: "name".to_owned(),
            operand: Some("bo".into()),
        };
        let compiled = compile(&cond).unwrap();
        assert_eq!(compiled.text, "begins_with(name, :dqp0)");
        assert_eq!(compiled.values, vec![(":dqp0".to_owned(), s("bo"))]);
    }

    #[test]
    fn test_should_compile_not_of_empty_child_as_noop() {
        let cond = Condition::Not(Box::new(Condition::And(vec![])));
        let compiled = compile(&cond).unwrap();
        assert!(compiled.is_empty());
    }

    #[test]
    fn test_should_compile_not_with_parenthesized_child() {
        let cond = Condition::Not(Box::new(Condition::eq("a", 1i64)));
        let compiled = compile(&cond).unwrap();
        assert_eq!(compiled.text, "NOT (a=:dqp0)");
    }

    #[test]
    fn test_should_compile_nested_or_inside_and() {
        let cond = Condition::And(vec![
            Condition::eq("field4", 2i64),
            Condition::Or(vec![
                Condition::eq("field1", 4i64),
                Condition::eq("field2", 5i64),
            ]),
        ]);
        let compiled = compile(&cond).unwrap();
        assert_eq!(
            compiled.text,
            "(field4=:dqp0) AND ((field1=:dqp1) OR (field2=:dqp2))"
        );
    }

    #[test]
    fn test_should_skip_empty_children_in_junctions() {
        let cond = Condition::And(vec![
            Condition::Not(Box::new(Condition::And(vec![]))),
            Condition::eq("a", 1i64),
        ]);
        let compiled = compile(&cond).unwrap();
        assert_eq!(compiled.text, "a=:dqp0");
    }

    #[test]
    fn test_should_reject_null_value() {
        let err = compile(&Condition::eq("id", Value::Null)).unwrap_err();
        assert!(matches!(
            err,
            QueryError::NullValueNotAllowed { column } if column == "id"
        ));
    }

    #[test]
    fn test_should_reject_null_in_membership_list() {
        let cond = Condition::is_in("id", vec![Value::Int(1), Value::Null]);
        let err = compile(&cond).unwrap_err();
        assert!(matches!(err, QueryError::NullValueNotAllowed { .. }));
    }

    #[test]
    fn test_should_continue_numbering_across_compile_into_calls() {
        let mut values = Vec::new();
        let key = compile_into(&Condition::eq("pk", "x"), &mut values).unwrap();
        let filter = compile_into(&Condition::eq("age", 30i64), &mut values).unwrap();
        assert_eq!(key, "pk=:dqp0");
        assert_eq!(filter, "age=:dqp1");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_should_extract_per_column_candidates() {
        let cond = Condition::And(vec![
            Condition::eq("pk", "x"),
            Condition::is_in("sk", vec![Value::Int(1), Value::Int(2)]),
        ]);
        let candidates = key_candidates(&cond, Operation::BatchGetItem).unwrap();
        assert_eq!(candidates.key_count(), 2);
        let KeyCandidates::PerColumn(columns) = candidates else {
            panic!("expected per-column candidates");
        };
        assert_eq!(columns[0].0, "pk");
        assert_eq!(columns[1].1.len(), 2);
    }

    #[test]
    fn test_should_reject_range_in_key_candidates() {
        let cond = Condition::compare(">", "pk", 1i64).unwrap();
        let err = key_candidates(&cond, Operation::GetItem).unwrap_err();
        assert!(matches!(
            err,
            QueryError::UnsupportedParameterCombination { .. }
        ));
    }
}
