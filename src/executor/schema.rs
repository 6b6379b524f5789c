//! Table schemas consumed by the engine

use std::collections::BTreeMap;

use crate::model::DataColumn;

/// Supplies the ordered column list of a table.
///
/// Unknown tables yield an empty list.
pub trait SchemaProvider: Send + Sync {
    fn columns(&self, namespace: &str, table: &str) -> Vec<DataColumn>;
}

/// Fixed schemas registered up front
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    tables: BTreeMap<(String, String), Vec<DataColumn>>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the columns of one table
    pub fn insert(&mut self, namespace: &str, table: &str, columns: Vec<DataColumn>) {
        self.tables
            .insert((namespace.to_string(), table.to_string()), columns);
    }

    pub fn with_table(mut self, namespace: &str, table: &str, columns: Vec<DataColumn>) -> Self {
        self.insert(namespace, table, columns);
        self
    }
}

impl SchemaProvider for StaticSchema {
    fn columns(&self, namespace: &str, table: &str) -> Vec<DataColumn> {
        self.tables
            .get(&(namespace.to_string(), table.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}
