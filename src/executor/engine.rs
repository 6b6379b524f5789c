//! Query engine
//!
//! Execution flow (strict order):
//! 1. Plan the access path against a fresh index catalog
//! 2. Build the store policy for that path
//! 3. Start the executor, which fills a record stream
//! 4. Project the schema columns and wrap the stream in a cursor

use std::sync::Arc;

use tracing::{info, info_span};
use uuid::Uuid;

use crate::config::ConnectionContext;
use crate::model::{ColumnType, DataColumn, Query};
use crate::planner::{AccessPath, ExplainPlan, PlannerResult, QueryPlanner};
use crate::projector::{filter_columns, ExecutionResult, RecordCursor};

use super::count::CountExecutor;
use super::errors::ExecutorResult;
use super::index_query::IndexQueryExecutor;
use super::point_lookup::PointLookupExecutor;
use super::policy::PolicyBuilder;
use super::scan::ScanExecutor;
use super::schema::SchemaProvider;

/// Runs queries for one connection
pub struct QueryEngine {
    context: ConnectionContext,
    schema: Arc<dyn SchemaProvider>,
}

impl QueryEngine {
    pub fn new(context: ConnectionContext, schema: Arc<dyn SchemaProvider>) -> Self {
        Self { context, schema }
    }

    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    /// Chooses the access path without executing
    pub fn plan(&self, query: &Query) -> PlannerResult<AccessPath> {
        QueryPlanner::new(self.context.store()).plan(query)
    }

    /// Describes how a query would run
    pub fn explain(&self, query: &Query) -> ExplainPlan {
        match self.plan(query) {
            Ok(path) => ExplainPlan::from_path(query, &path),
            Err(err) => ExplainPlan::from_error(query, &err),
        }
    }

    /// Executes a query and returns a cursor over its rows.
    ///
    /// Planning errors and synchronous store failures are returned here;
    /// failures of a running scan or index query surface from the cursor.
    pub fn execute(&self, query: &Query) -> ExecutorResult<ExecutionResult> {
        let query_id = Uuid::new_v4();
        let span = info_span!(
            "query",
            %query_id,
            namespace = %query.namespace,
            table = %query.table
        );
        let _guard = span.enter();

        let path = self.plan(query)?;
        info!(access_path = %path.kind(), "executing query");

        let store = self.context.store();
        let policies = PolicyBuilder::new(self.context.config(), query);
        let bin_names = query.bin_names.as_deref();
        let (namespace, table) = (query.namespace.as_str(), query.table.as_str());

        let (stream, columns) = match &path {
            AccessPath::MetadataCount { label } => (
                CountExecutor::new(store).metadata(namespace, table, label)?,
                vec![count_column(query, label)],
            ),
            AccessPath::CountScan { label } => (
                CountExecutor::new(store).scan(
                    &policies.scan_no_bin_data_policy(),
                    namespace,
                    table,
                    label,
                )?,
                vec![count_column(query, label)],
            ),
            AccessPath::PointLookup { key } => (
                PointLookupExecutor::new(store).execute(&policies.read_policy(), key, bin_names)?,
                self.columns(query),
            ),
            AccessPath::IndexQuery { index, filter } => (
                IndexQueryExecutor::new(store).execute(
                    &policies.query_policy(),
                    table,
                    index,
                    filter,
                    bin_names,
                    policies.stream_capacity(),
                )?,
                self.columns(query),
            ),
            AccessPath::Scan { partitions } => (
                ScanExecutor::new(store).execute(
                    &policies.scan_policy(*partitions),
                    namespace,
                    table,
                    bin_names,
                    policies.stream_capacity(),
                )?,
                self.columns(query),
            ),
        };

        Ok(ExecutionResult::new(RecordCursor::new(stream, columns)))
    }

    /// Schema columns restricted to the query's selection
    fn columns(&self, query: &Query) -> Vec<DataColumn> {
        let schema = self.schema.columns(&query.namespace, &query.table);
        filter_columns(schema, selected_bins(query).as_deref())
    }
}

/// Bins the query selects: explicit bin names, else named columns
fn selected_bins(query: &Query) -> Option<Vec<String>> {
    if let Some(bins) = &query.bin_names {
        return Some(bins.clone());
    }
    match query.columns.as_slice() {
        [] => None,
        [star] if star == "*" => None,
        columns => Some(columns.to_vec()),
    }
}

fn count_column(query: &Query, label: &str) -> DataColumn {
    DataColumn::new(
        &query.namespace,
        &query.table,
        ColumnType::Integer,
        label,
        label,
    )
}
