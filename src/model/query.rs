//! Parsed query descriptor
//!
//! Produced by the SQL translator and read-only from then on.

use serde::{Deserialize, Serialize};

use crate::predicate::Predicate;
use crate::value::Value;

/// Immutable description of one SELECT statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Namespace (schema)
    pub namespace: String,
    /// Set (table)
    pub table: String,
    /// Requested output column names
    #[serde(default)]
    pub columns: Vec<String>,
    /// Root predicate (WHERE clause)
    #[serde(default)]
    pub predicate: Option<Predicate>,
    /// Explicit primary key value
    #[serde(default)]
    pub primary_key: Option<Value>,
    /// Pagination offset, used as first partition for scans
    #[serde(default)]
    pub offset: Option<u64>,
    /// Pagination limit
    #[serde(default)]
    pub limit: Option<u64>,
    /// Explicit bin subset to fetch (None = all bins)
    #[serde(default)]
    pub bin_names: Option<Vec<String>>,
}

impl Query {
    /// Creates a query over a namespace and set
    pub fn new(namespace: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            table: table.into(),
            columns: Vec::new(),
            predicate: None,
            primary_key: None,
            offset: None,
            limit: None,
            bin_names: None,
        }
    }

    /// Sets the requested output columns
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the root predicate
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Sets an explicit primary key
    pub fn with_primary_key(mut self, key: impl Into<Value>) -> Self {
        self.primary_key = Some(key.into());
        self
    }

    /// Sets the pagination offset
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the limit
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restricts the bins fetched from the store
    pub fn with_bin_names<I, S>(mut self, bins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bin_names = Some(bins.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true for `SELECT count(...)` queries
    pub fn is_count(&self) -> bool {
        self.columns.len() == 1 && self.columns[0].to_ascii_lowercase().starts_with("count(")
    }

    /// Label of the single count column
    pub fn count_label(&self) -> Option<&str> {
        if self.is_count() {
            self.columns.first().map(String::as_str)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_builder() {
        let query = Query::new("test", "users")
            .with_columns(["name", "age"])
            .with_primary_key("user_1")
            .with_limit(10);

        assert_eq!(query.namespace, "test");
        assert_eq!(query.columns, vec!["name", "age"]);
        assert_eq!(query.primary_key, Some(Value::String("user_1".into())));
        assert_eq!(query.limit, Some(10));
        assert!(!query.is_count());
    }

    #[test]
    fn test_count_detection() {
        assert!(Query::new("t", "s").with_columns(["COUNT(*)"]).is_count());
        assert!(Query::new("t", "s").with_columns(["count(age)"]).is_count());
        assert!(!Query::new("t", "s").with_columns(["count(*)", "name"]).is_count());
        assert!(!Query::new("t", "s").with_columns(["counter"]).is_count());
        assert_eq!(
            Query::new("t", "s").with_columns(["count(*)"]).count_label(),
            Some("count(*)")
        );
    }

    #[test]
    fn test_query_from_json() {
        let query: Query = serde_json::from_value(json!({
            "namespace": "test",
            "table": "users",
            "columns": ["name"],
            "predicate": {"op": "range", "field": "age", "lower": {"value": 30, "inclusive": false}},
            "limit": 5
        }))
        .unwrap();

        assert_eq!(query.table, "users");
        assert!(query.predicate.is_some());
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.bin_names, None);
    }
}
