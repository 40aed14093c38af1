//! Per-batch query cache for backend record assertions.
//!
//! The cache lives exactly as long as one data-table step: the step owns the
//! instance, every row shares it, and the step flushes it once the table has
//! been processed. A key is the `(object, criteria)` pair itself, so
//! delimiter characters inside either part cannot collide.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use lexbdd_core::engine::SfdcEngine;
use lexbdd_core::record::{ObjectDescribe, QueryResult};
use serde_json::Value;
use tracing::debug;

use crate::error::StepError;

/// Structured cache key; never a concatenated string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    object: String,
    criteria: String,
}

impl CacheKey {
    pub fn new(object: impl Into<String>, criteria: impl Into<String>) -> Self {
        Self { object: object.into(), criteria: criteria.into() }
    }
}

/// One cached query: the full field projection of the matching records plus
/// the names of the numeric fields from the object's schema.
#[derive(Clone, Debug)]
pub struct CachedQuery {
    object: String,
    criteria: String,
    result: QueryResult,
    numeric_fields: HashSet<String>,
}

impl CachedQuery {
    pub fn result(&self) -> &QueryResult {
        &self.result
    }

    /// Asserts one field of the first matching record against an expected
    /// string from the step table.
    ///
    /// Numeric schema fields (`integer`/`double`) coerce the retrieved value
    /// to its string form before comparing. The literal `"null"` asserts the
    /// value is absent, not the string "null". Everything else compares the
    /// retrieved string exactly.
    pub fn assert_field(&self, path: &str, expected: &str) -> Result<(), StepError> {
        let record = self.result.first().ok_or_else(|| StepError::NoMatchingRecord {
            object: self.object.clone(),
            criteria: self.criteria.clone(),
        })?;
        let retrieved = record.get(path);
        let context = format!("{}.{} where {}", self.object, path, self.criteria);

        if expected == "null" {
            return match retrieved {
                None | Some(Value::Null) => Ok(()),
                Some(value) => Err(StepError::mismatch("null", render(value), context)),
            };
        }

        if self.numeric_fields.contains(path) {
            let actual = retrieved.map_or_else(|| "null".to_owned(), render);
            return StepError::check_eq(expected, &actual, context);
        }

        match retrieved {
            Some(Value::String(actual)) => StepError::check_eq(expected, actual, context),
            Some(other) => Err(StepError::mismatch(expected, render(other), context)),
            None => Err(StepError::mismatch(expected, "null", context)),
        }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `SELECT <all fields> FROM <object> WHERE <criteria>` over the describe
/// projection.
fn select_all_fields(describe: &ObjectDescribe, object: &str, criteria: &str) -> String {
    let fields: Vec<&str> = describe.field_names().collect();
    format!("SELECT {} FROM {object} WHERE {criteria}", fields.join(", "))
}

/// Caller-owned cache ensuring one backend query per distinct
/// `(object, criteria)` pair within a batch.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<CacheKey, CachedQuery>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached projection for the pair, querying the backend on
    /// first use only.
    pub async fn fetch(
        &mut self,
        engine: &dyn SfdcEngine,
        object: &str,
        criteria: &str,
    ) -> Result<&CachedQuery, StepError> {
        let key = CacheKey::new(object, criteria);
        let cached = match self.entries.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(%object, %criteria, "query cache miss");
                let describe = engine
                    .describe_object(object)
                    .await
                    .map_err(StepError::engine(format!("describe {object}")))?;
                let numeric_fields = describe
                    .fields
                    .iter()
                    .filter(|field| field.is_numeric())
                    .map(|field| field.name.clone())
                    .collect();
                let soql = select_all_fields(&describe, object, criteria);
                let result = engine
                    .query(&soql)
                    .await
                    .map_err(StepError::engine(format!("query {object} where {criteria}")))?;
                entry.insert(CachedQuery {
                    object: object.to_owned(),
                    criteria: criteria.to_owned(),
                    result,
                    numeric_fields,
                })
            }
        };
        Ok(cached)
    }

    /// Drops every entry the batch populated. Must run when the data table
    /// has been fully processed so later scenarios never read stale state.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
