//! Explain output
//!
//! Deterministic, human-readable description of a chosen access path.
//! Serializable so the CLI can print it as JSON.

use std::fmt;

use serde::Serialize;

use super::access_path::AccessPath;
use super::errors::PlannerError;
use crate::model::Query;

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainPlan {
    /// Whether planning succeeded
    pub accepted: bool,
    /// Access path kind (if accepted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_path: Option<String>,
    /// Namespace and set
    pub target: String,
    /// Selected index name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Index filter pushed to the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_filter: Option<String>,
    /// Filter expression evaluated per record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual: Option<String>,
    /// Partition range for paginated scans
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partitions: Option<String>,
    /// Record limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Rejection reason (if rejected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Describes a successfully planned query
    pub fn from_path(query: &Query, path: &AccessPath) -> Self {
        let residual = match path {
            // point lookups and metadata counts never evaluate the predicate
            AccessPath::PointLookup { .. } | AccessPath::MetadataCount { .. } => None,
            _ => query
                .predicate
                .as_ref()
                .map(|p| p.to_filter_expression().to_string()),
        };

        let (index, index_filter, partitions) = match path {
            AccessPath::IndexQuery { index, filter } => {
                (Some(index.name.clone()), Some(filter.to_string()), None)
            }
            AccessPath::Scan {
                partitions: Some(range),
            } => (None, None, Some(range.to_string())),
            _ => (None, None, None),
        };

        Self {
            accepted: true,
            access_path: Some(path.kind().as_str().to_string()),
            target: target(query),
            index,
            index_filter,
            residual,
            partitions,
            limit: if path.is_count() { None } else { query.limit },
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Describes a query the planner rejected
    pub fn from_error(query: &Query, err: &PlannerError) -> Self {
        let reason = match err {
            PlannerError::InvalidOperand(r) | PlannerError::InvalidQuery(r) => r.clone(),
            PlannerError::Catalog(e) => e.to_string(),
        };
        Self {
            accepted: false,
            access_path: None,
            target: target(query),
            index: None,
            index_filter: None,
            residual: None,
            partitions: None,
            limit: None,
            rejection_reason: Some(reason),
            rejection_code: Some(err.code().to_string()),
        }
    }
}

fn target(query: &Query) -> String {
    format!("{}.{}", query.namespace, query.table)
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;
        writeln!(f, "Target: {}", self.target)?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if let Some(path) = &self.access_path {
                writeln!(f, "Access Path: {}", path)?;
            }
            if let Some(index) = &self.index {
                writeln!(f, "Index: {}", index)?;
            }
            if let Some(filter) = &self.index_filter {
                writeln!(f, "Index Filter: {}", filter)?;
            }
            if let Some(residual) = &self.residual {
                writeln!(f, "Filter Expression: {}", residual)?;
            }
            if let Some(partitions) = &self.partitions {
                writeln!(f, "Partitions: {}", partitions)?;
            }
            if let Some(limit) = self.limit {
                writeln!(f, "Limit: {}", limit)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}
