//! Seed files for the in-memory store
//!
//! ```json
//! {
//!   "records": [{"set": "users", "key": 1, "bins": {"name": "Ann", "age": 31}}],
//!   "indexes": [{"name": "idx_age", "namespace": "test", "bin": "age", "index_type": "numeric"}],
//!   "schemas": [{"table": "users", "columns": [...]}]
//! }
//! ```
//!
//! Tables without a declared schema get one derived from their records:
//! `__key` first, then every bin name in ascending order.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::errors::{CliError, CliResult};
use crate::catalog::SecondaryIndexDescriptor;
use crate::executor::StaticSchema;
use crate::model::{ColumnType, DataColumn, Key, PRIMARY_KEY_FIELD};
use crate::store::MemoryStore;
use crate::value::Value;

/// One seeded record
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRecord {
    /// Defaults to the connection namespace
    #[serde(default)]
    pub namespace: Option<String>,
    pub set: String,
    pub key: Value,
    #[serde(default)]
    pub bins: BTreeMap<String, Value>,
    /// Keep the user key with the record
    #[serde(default = "default_true")]
    pub send_key: bool,
}

/// Declared columns of one table
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSchema {
    #[serde(default)]
    pub namespace: Option<String>,
    pub table: String,
    pub columns: Vec<SeedColumn>,
}

/// Column declaration; the label defaults to the bin name
#[derive(Debug, Clone, Deserialize)]
pub struct SeedColumn {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// Whole seed file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub records: Vec<SeedRecord>,
    #[serde(default)]
    pub indexes: Vec<SecondaryIndexDescriptor>,
    #[serde(default)]
    pub schemas: Vec<SeedSchema>,
    /// Report secondary index support to the planner
    #[serde(default = "default_true")]
    pub secondary_index_support: bool,
}

fn default_true() -> bool {
    true
}

impl SeedData {
    /// Builds the store and schema described by the file
    pub fn load(&self, default_namespace: &str) -> CliResult<(MemoryStore, StaticSchema)> {
        let store = if self.secondary_index_support {
            MemoryStore::new()
        } else {
            MemoryStore::without_secondary_index_support()
        };

        let mut derived: BTreeMap<(String, String), BTreeMap<String, ColumnType>> = BTreeMap::new();
        for record in &self.records {
            let namespace = record.namespace.as_deref().unwrap_or(default_namespace);
            let key = Key::new(namespace, &record.set, record.key.clone())
                .map_err(|e| CliError::input(format!("record in set '{}': {}", record.set, e)))?;

            let columns = derived
                .entry((namespace.to_string(), record.set.clone()))
                .or_default();
            for (name, value) in &record.bins {
                columns.entry(name.clone()).or_insert_with(|| column_type_of(value));
            }

            if record.send_key {
                store.put(key, record.bins.clone());
            } else {
                store.put_without_key(key, record.bins.clone());
            }
        }

        for index in &self.indexes {
            store.create_index(index.clone());
        }

        let mut schema = StaticSchema::new();
        for ((namespace, table), bins) in &derived {
            let mut columns = vec![DataColumn::new(
                namespace,
                table,
                ColumnType::Other,
                PRIMARY_KEY_FIELD,
                PRIMARY_KEY_FIELD,
            )];
            columns.extend(bins.iter().map(|(name, column_type)| {
                DataColumn::new(namespace, table, *column_type, name, name)
            }));
            schema.insert(namespace, table, columns);
        }
        for declared in &self.schemas {
            let namespace = declared.namespace.as_deref().unwrap_or(default_namespace);
            let columns = declared
                .columns
                .iter()
                .map(|c| {
                    DataColumn::new(
                        namespace,
                        &declared.table,
                        c.column_type,
                        &c.name,
                        c.label.as_deref().unwrap_or(&c.name),
                    )
                })
                .collect();
            schema.insert(namespace, &declared.table, columns);
        }

        Ok((store, schema))
    }
}

fn column_type_of(value: &Value) -> ColumnType {
    match value {
        Value::Int(_) => ColumnType::Integer,
        Value::Float(_) => ColumnType::Double,
        Value::String(_) => ColumnType::String,
        Value::Blob(_) => ColumnType::Blob,
        Value::Bool(_) => ColumnType::Boolean,
        Value::List(_) => ColumnType::List,
        Value::Map(_) => ColumnType::Map,
        Value::Nil => ColumnType::Other,
    }
}
