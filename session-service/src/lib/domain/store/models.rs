use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::store::errors::StoreError;

/// A stored record: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, Value>;

/// Logical collections of the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Sessions,
}

impl Collection {
    /// Stable collection name, also used as the backing table name.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Sessions => "sessions",
        }
    }

    /// Fields whose values must be unique across the collection.
    ///
    /// Adapters enforce these at write time; inserts that would duplicate a
    /// value fail with `StoreError::DuplicateKey`.
    pub fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Users => &["username"],
            Collection::Sessions => &["session_token"],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single predicate on a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the given JSON value.
    Eq { field: String, value: Value },
    /// Field holds an RFC 3339 timestamp strictly after `value`.
    Gt { field: String, value: DateTime<Utc> },
    /// Field holds an RFC 3339 timestamp strictly before `value`.
    Lt { field: String, value: DateTime<Utc> },
}

impl Condition {
    pub fn field(&self) -> &str {
        match self {
            Condition::Eq { field, .. } | Condition::Gt { field, .. } | Condition::Lt { field, .. } => {
                field
            }
        }
    }

    fn matches(&self, document: &Document) -> bool {
        match self {
            Condition::Eq { field, value } => document.get(field) == Some(value),
            Condition::Gt { field, value } => {
                timestamp_field(document, field).is_some_and(|stored| stored > *value)
            }
            Condition::Lt { field, value } => {
                timestamp_field(document, field).is_some_and(|stored| stored < *value)
            }
        }
    }
}

fn timestamp_field(document: &Document, field: &str) -> Option<DateTime<Utc>> {
    document
        .get(field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Conjunction of conditions. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Require the timestamp in `field` to be strictly after `value`.
    pub fn gt(mut self, field: impl Into<String>, value: DateTime<Utc>) -> Self {
        self.conditions.push(Condition::Gt {
            field: field.into(),
            value,
        });
        self
    }

    /// Require the timestamp in `field` to be strictly before `value`.
    pub fn lt(mut self, field: impl Into<String>, value: DateTime<Utc>) -> Self {
        self.conditions.push(Condition::Lt {
            field: field.into(),
            value,
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}

/// Serialize a record into a document.
///
/// # Errors
/// * `Serialization` - The value does not serialize to a JSON object
pub fn to_document<T: Serialize>(record: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {}",
            other
        ))),
        Err(e) => Err(StoreError::Serialization(e.to_string())),
    }
}

/// Deserialize a document into a record.
///
/// # Errors
/// * `Serialization` - The document does not have the record's shape
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| StoreError::Serialization(e.to_string()))
}
