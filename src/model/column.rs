//! Output column descriptors supplied by schema introspection

use serde::{Deserialize, Serialize};

/// Declared column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Double,
    String,
    Blob,
    Boolean,
    List,
    Map,
    Other,
}

/// One output column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataColumn {
    /// Namespace
    pub namespace: String,
    /// Set (table)
    pub table: String,
    /// Declared type
    pub column_type: ColumnType,
    /// Bin name in the store
    pub name: String,
    /// Output label
    pub label: String,
}

impl DataColumn {
    pub fn new(
        namespace: impl Into<String>,
        table: impl Into<String>,
        column_type: ColumnType,
        name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            table: table.into(),
            column_type,
            name: name.into(),
            label: label.into(),
        }
    }
}
