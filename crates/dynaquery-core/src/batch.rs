//! Batch key materialization.
//!
//! Multi-key requests accept four input shapes. Each shape is classified
//! once at this boundary into an explicit variant and converted by its own
//! pure function, so the builders downstream only ever see the canonical
//! per-item key-map list. Output order always follows input order: batch
//! responses are re-correlated by position.

use std::collections::BTreeMap;

use dynaquery_model::types::Key;
use dynaquery_model::{Value, marshal};

use crate::compiler::KeyCandidates;
use crate::error::QueryError;
use crate::schema::KeySchema;

/// The accepted input shapes for a multi-key request.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchKeys {
    /// Flat scalars, one per item. Valid only for single-attribute schemas.
    Scalars(Vec<Value>),
    /// Ordered tuples, zipped positionally against the key schema.
    Tuples(Vec<Vec<Value>>),
    /// Explicit key maps, used as-is.
    Maps(Vec<BTreeMap<String, Value>>),
    /// Parallel per-column lists, transposed into per-item maps.
    Columns(Vec<(String, Vec<Value>)>),
}

impl BatchKeys {
    /// Converts these keys into the canonical per-item key-map list,
    /// preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MultiKeyTableRequiresCompositeKey`] when flat
    /// scalars are given for a composite schema,
    /// [`QueryError::KeyTupleArityMismatch`] when a tuple does not match
    /// the schema width, [`QueryError::InconsistentKeyColumnLengths`] when
    /// parallel lists disagree, and [`QueryError::NullValueNotAllowed`]
    /// when any key value is null.
    pub fn materialize(&self, schema: &KeySchema) -> Result<Vec<Key>, QueryError> {
        match self {
            Self::Scalars(values) => materialize_scalars(values, schema),
            Self::Tuples(tuples) => materialize_tuples(tuples, schema),
            Self::Maps(maps) => maps.iter().map(|m| marshal_key_map(m.iter())).collect(),
            Self::Columns(columns) => {
                let maps = transpose_columns(columns)?;
                maps.iter()
                    .map(|m| marshal_key_map(m.iter().map(|(k, v)| (k, v))))
                    .collect()
            }
        }
    }

    /// Builds batch keys from the compiler's extracted key candidates.
    ///
    /// Per-column candidates expand to their cartesian product in column
    /// order; explicit tuples pass through.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::KeyTupleArityMismatch`] when an explicit tuple
    /// does not bind one value per column.
    pub(crate) fn from_candidates(candidates: KeyCandidates) -> Result<Self, QueryError> {
        match candidates {
            KeyCandidates::PerColumn(columns) => {
                Ok(Self::Tuples(cartesian_product(&columns)))
            }
            KeyCandidates::Tuples { columns, tuples } => {
                let maps = tuples
                    .into_iter()
                    .map(|tuple| {
                        if tuple.len() != columns.len() {
                            return Err(QueryError::KeyTupleArityMismatch {
                                expected: columns.len(),
                                actual: tuple.len(),
                            });
                        }
                        Ok(columns.iter().cloned().zip(tuple).collect())
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Maps(maps))
            }
        }
    }
}

fn materialize_scalars(values: &[Value], schema: &KeySchema) -> Result<Vec<Key>, QueryError> {
    if schema.key_count() != 1 {
        return Err(QueryError::MultiKeyTableRequiresCompositeKey {
            key_count: schema.key_count(),
        });
    }
    values
        .iter()
        .map(|value| {
            marshal_key_map(std::iter::once((&schema.partition_key, value)))
        })
        .collect()
}

fn materialize_tuples(tuples: &[Vec<Value>], schema: &KeySchema) -> Result<Vec<Key>, QueryError> {
    let columns = schema.columns();
    tuples
        .iter()
        .map(|tuple| {
            if tuple.len() != columns.len() {
                return Err(QueryError::KeyTupleArityMismatch {
                    expected: columns.len(),
                    actual: tuple.len(),
                });
            }
            marshal_key_map(columns.iter().copied().zip(tuple))
        })
        .collect()
}

/// Transposes parallel column lists into per-item maps, in column order.
fn transpose_columns(
    columns: &[(String, Vec<Value>)],
) -> Result<Vec<Vec<(String, Value)>>, QueryError> {
    let Some((_, first)) = columns.first() else {
        return Ok(Vec::new());
    };
    let expected = first.len();
    for (column, values) in columns {
        if values.len() != expected {
            return Err(QueryError::InconsistentKeyColumnLengths {
                column: column.clone(),
                expected,
                actual: values.len(),
            });
        }
    }
    let mut items = Vec::with_capacity(expected);
    for i in 0..expected {
        items.push(
            columns
                .iter()
                .map(|(column, values)| (column.clone(), values[i].clone()))
                .collect(),
        );
    }
    Ok(items)
}

/// Cartesian product of per-column candidates, first column slowest.
fn cartesian_product(columns: &[(String, Vec<Value>)]) -> Vec<Vec<Value>> {
    let mut tuples: Vec<Vec<Value>> = vec![Vec::new()];
    for (_, candidates) in columns {
        let mut next = Vec::with_capacity(tuples.len() * candidates.len());
        for tuple in &tuples {
            for candidate in candidates {
                let mut extended = tuple.clone();
                extended.push(candidate.clone());
                next.push(extended);
            }
        }
        tuples = next;
    }
    tuples
}

/// Marshals one key map, rejecting nulls.
fn marshal_key_map<'a, K, I>(entries: I) -> Result<Key, QueryError>
where
    K: AsRef<str> + 'a,
    I: Iterator<Item = (K, &'a Value)>,
{
    let mut key = Key::new();
    for (column, value) in entries {
        if value.is_null() {
            return Err(QueryError::NullValueNotAllowed {
                column: column.as_ref().to_owned(),
            });
        }
        key.insert(column.as_ref().to_owned(), marshal(value)?);
    }
    Ok(key)
}
