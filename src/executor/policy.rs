//! Per-query store policies
//!
//! Starts from the connection's configured policies and specialises them
//! for one query: record limit, residual filter expression, throughput
//! cap, bin data flag and partition range.

use crate::config::{BasePolicy, ConnectionConfig, QueryPolicy, ScanPolicy, DEFAULT_RECORDS_PER_SECOND};
use crate::model::{PartitionRange, Query};
use crate::predicate::Exp;
use crate::stream::StreamCapacity;

/// Builds store policies for one query
pub struct PolicyBuilder<'a> {
    config: &'a ConnectionConfig,
    query: &'a Query,
}

impl<'a> PolicyBuilder<'a> {
    pub fn new(config: &'a ConnectionConfig, query: &'a Query) -> Self {
        Self { config, query }
    }

    /// Point lookup policy; the key alone selects the record
    pub fn read_policy(&self) -> BasePolicy {
        self.config.read.clone()
    }

    /// Scan policy for a row-returning scan
    pub fn scan_policy(&self, partitions: Option<PartitionRange>) -> ScanPolicy {
        let mut policy = self.config.scan.clone();
        policy.base.filter_expression = self.filter_expression();
        policy.max_records = self.query.limit.unwrap_or(0);
        policy.partitions = partitions;
        if policy.records_per_second == 0 {
            policy.records_per_second = DEFAULT_RECORDS_PER_SECOND;
        }
        policy
    }

    /// Scan policy for counting: metadata only, every matching record
    pub fn scan_no_bin_data_policy(&self) -> ScanPolicy {
        let mut policy = self.scan_policy(None);
        policy.include_bin_data = false;
        policy.max_records = 0;
        policy
    }

    /// Secondary index query policy
    pub fn query_policy(&self) -> QueryPolicy {
        let mut policy = self.config.query.clone();
        policy.base.filter_expression = self.filter_expression();
        policy.max_records = self.query.limit.unwrap_or(0);
        policy
    }

    /// Capacity of streams fed by scans and index queries
    pub fn stream_capacity(&self) -> StreamCapacity {
        match self.config.record_queue_capacity {
            Some(capacity) => StreamCapacity::Bounded(capacity),
            None => StreamCapacity::Unbounded,
        }
    }

    fn filter_expression(&self) -> Option<Exp> {
        let exp = self.query.predicate.as_ref()?.to_filter_expression();
        if self.config.use_bool_bin {
            Some(exp)
        } else {
            Some(exp.bools_as_ints())
        }
    }
}
