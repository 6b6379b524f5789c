//! Secondary index descriptors as reported by the store

use serde::{Deserialize, Serialize};

use crate::predicate::Filter;

/// Kind of values an index holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    Numeric,
    String,
    Geo2dSphere,
}

impl IndexType {
    /// True if an index of this type can answer the filter
    pub fn can_serve(&self, filter: &Filter) -> bool {
        match self {
            IndexType::Numeric => filter.is_numeric(),
            IndexType::String => !filter.is_numeric(),
            IndexType::Geo2dSphere => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::Numeric => "NUMERIC",
            IndexType::String => "STRING",
            IndexType::Geo2dSphere => "GEO2DSPHERE",
        }
    }
}

/// One secondary index over a single bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryIndexDescriptor {
    /// Index name
    pub name: String,
    /// Namespace the index lives in
    pub namespace: String,
    /// Set the index is restricted to (None = whole namespace)
    #[serde(default)]
    pub set: Option<String>,
    /// Indexed bin
    pub bin: String,
    /// Index type
    pub index_type: IndexType,
}

impl SecondaryIndexDescriptor {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        bin: impl Into<String>,
        index_type: IndexType,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            set: None,
            bin: bin.into(),
            index_type,
        }
    }

    /// Restricts the index to one set
    pub fn on_set(mut self, set: impl Into<String>) -> Self {
        self.set = Some(set.into());
        self
    }

    /// True if the index covers records of `namespace`.`set`
    pub fn covers(&self, namespace: &str, set: &str) -> bool {
        self.namespace == namespace && self.set.as_deref().map_or(true, |s| s == set)
    }
}
