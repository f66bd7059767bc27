//! Key-schema resolution with a process-lifetime cache.
//!
//! The resolver asks a [`SchemaSource`] to describe a table once per
//! distinct `(table, index)` pair and remembers the answer forever. Schema
//! is treated as immutable for the lifetime of the process; concurrent
//! misses on the same pair may describe the table twice, which is harmless
//! because describes are idempotent and side-effect free.

use dashmap::DashMap;
use dynaquery_model::types::{KeyType, TableDescription};
use tracing::debug;

use crate::error::QueryError;

/// The active key schema of a table or index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    /// The partition key attribute.
    pub partition_key: String,
    /// The sort key attribute, when the schema is composite.
    pub sort_key: Option<String>,
}

impl KeySchema {
    /// A single-attribute schema.
    #[must_use]
    pub fn hash_only(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: None,
        }
    }

    /// A composite schema.
    #[must_use]
    pub fn composite(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: Some(sort_key.into()),
        }
    }

    /// Key attribute names, partition key first.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        match &self.sort_key {
            Some(sort) => vec![self.partition_key.as_str(), sort.as_str()],
            None => vec![self.partition_key.as_str()],
        }
    }

    /// Number of key attributes: 1 or 2.
    #[must_use]
    pub fn key_count(&self) -> usize {
        if self.sort_key.is_some() { 2 } else { 1 }
    }

    /// Returns `true` when `column` is one of the key attributes.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.partition_key == column || self.sort_key.as_deref() == Some(column)
    }
}

/// The table-description collaborator.
///
/// Implementations own transport, retry, and backoff; the resolver calls
/// this exactly once per cache miss.
pub trait SchemaSource {
    /// Describes `table`, returning its key schema and index collections.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying client surfaces; the resolver
    /// wraps it as [`QueryError::Collaborator`].
    fn describe_table(
        &self,
        table: &str,
    ) -> Result<TableDescription, Box<dyn std::error::Error + Send + Sync>>;
}

/// Resolves and caches key schemas per `(table, index)` pair.
#[derive(Debug)]
pub struct SchemaResolver<S> {
    source: S,
    cache: DashMap<(String, Option<String>), KeySchema>,
}

impl<S: SchemaSource> SchemaResolver<S> {
    /// Creates a resolver over `source` with an empty cache.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: DashMap::new(),
        }
    }

    /// Resolves the key schema for `table`, or for the named secondary
    /// index when `index` is given.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::IndexNotFound`] when `index` is absent from
    /// both index collections, [`QueryError::MalformedKeySchema`] when the
    /// description carries no `HASH` element, and
    /// [`QueryError::Collaborator`] when the describe call itself fails.
    pub fn resolve(&self, table: &str, index: Option<&str>) -> Result<KeySchema, QueryError> {
        let cache_key = (table.to_owned(), index.map(str::to_owned));
        if let Some(hit) = self.cache.get(&cache_key) {
            return Ok(hit.clone());
        }

        debug!(table, index, "resolving key schema");
        let description = self
            .source
            .describe_table(table)
            .map_err(QueryError::Collaborator)?;
        let schema = extract_schema(table, index, &description)?;
        self.cache.insert(cache_key, schema.clone());
        Ok(schema)
    }
}

/// Picks the right key-schema element list and converts it.
fn extract_schema(
    table: &str,
    index: Option<&str>,
    description: &TableDescription,
) -> Result<KeySchema, QueryError> {
    let elements = match index {
        None => &description.key_schema,
        Some(name) => {
            let found = description
                .local_secondary_indexes
                .iter()
                .chain(&description.global_secondary_indexes)
                .find(|idx| idx.index_name.as_deref() == Some(name));
            match found {
                Some(idx) => &idx.key_schema,
                None => {
                    return Err(QueryError::IndexNotFound {
                        table: table.to_owned(),
                        index: name.to_owned(),
                    });
                }
            }
        }
    };

    let mut partition_key = None;
    let mut sort_key = None;
    for element in elements {
        match element.key_type {
            KeyType::Hash => partition_key = Some(element.attribute_name.clone()),
            KeyType::Range => sort_key = Some(element.attribute_name.clone()),
        }
    }
    let Some(partition_key) = partition_key else {
        return Err(QueryError::MalformedKeySchema {
            table: table.to_owned(),
        });
    };
    Ok(KeySchema {
        partition_key,
        sort_key,
    })
}
