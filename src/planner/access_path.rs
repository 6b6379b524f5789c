//! Access paths chosen by the planner

use std::fmt;

use crate::catalog::SecondaryIndexDescriptor;
use crate::model::{Key, PartitionRange};
use crate::predicate::Filter;

/// How the records of one query are fetched
#[derive(Debug, Clone, PartialEq)]
pub enum AccessPath {
    /// Count from store statistics, no records read
    MetadataCount { label: String },
    /// Count by draining a scan without bin data
    CountScan { label: String },
    /// Single synchronous get
    PointLookup { key: Key },
    /// Secondary index query narrowed by `filter`
    IndexQuery {
        index: SecondaryIndexDescriptor,
        filter: Filter,
    },
    /// Full scan, optionally restricted to a partition range
    Scan { partitions: Option<PartitionRange> },
}

/// Discriminant of an access path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    MetadataCount,
    CountScan,
    PointLookup,
    IndexQuery,
    Scan,
}

impl AccessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKind::MetadataCount => "METADATA_COUNT",
            AccessKind::CountScan => "COUNT_SCAN",
            AccessKind::PointLookup => "PK_LOOKUP",
            AccessKind::IndexQuery => "INDEX_QUERY",
            AccessKind::Scan => "SCAN",
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AccessPath {
    pub fn kind(&self) -> AccessKind {
        match self {
            AccessPath::MetadataCount { .. } => AccessKind::MetadataCount,
            AccessPath::CountScan { .. } => AccessKind::CountScan,
            AccessPath::PointLookup { .. } => AccessKind::PointLookup,
            AccessPath::IndexQuery { .. } => AccessKind::IndexQuery,
            AccessPath::Scan { .. } => AccessKind::Scan,
        }
    }

    /// Returns true for either count path
    pub fn is_count(&self) -> bool {
        matches!(
            self,
            AccessPath::MetadataCount { .. } | AccessPath::CountScan { .. }
        )
    }
}
