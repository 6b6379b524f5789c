//! Store access policies
//!
//! Plain structs with every tunable spelled out. Connection properties are
//! applied onto them by `ConnectionConfig`; executors clone and specialise
//! them per query.

use crate::model::PartitionRange;
use crate::predicate::Exp;

/// Scan throughput cap applied when none is configured
pub const DEFAULT_RECORDS_PER_SECOND: u32 = 512;

/// Cluster-level client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPolicy {
    pub user: Option<String>,
    pub password: Option<String>,
    pub cluster_name: Option<String>,
    /// Initial connection timeout
    pub timeout_ms: u32,
    pub login_timeout_ms: u32,
    pub max_conns_per_node: u32,
}

impl Default for ClientPolicy {
    fn default() -> Self {
        Self {
            user: None,
            password: None,
            cluster_name: None,
            timeout_ms: 1_000,
            login_timeout_ms: 5_000,
            max_conns_per_node: 100,
        }
    }
}

/// Settings shared by every single-record and multi-record command
#[derive(Debug, Clone, PartialEq)]
pub struct BasePolicy {
    pub socket_timeout_ms: u32,
    /// 0 = no total timeout
    pub total_timeout_ms: u32,
    pub max_retries: u32,
    pub sleep_between_retries_ms: u32,
    /// Ask the server to return the stored user key
    pub send_key: bool,
    /// Residual filter evaluated server-side per record
    pub filter_expression: Option<Exp>,
}

impl Default for BasePolicy {
    fn default() -> Self {
        Self {
            socket_timeout_ms: 30_000,
            total_timeout_ms: 1_000,
            max_retries: 2,
            sleep_between_retries_ms: 0,
            send_key: false,
            filter_expression: None,
        }
    }
}

/// Full and partition scans
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPolicy {
    pub base: BasePolicy,
    /// 0 = unthrottled
    pub records_per_second: u32,
    /// 0 = all nodes in parallel
    pub max_concurrent_nodes: u32,
    /// 0 = no limit
    pub max_records: u64,
    /// false returns record metadata only
    pub include_bin_data: bool,
    /// None = every partition
    pub partitions: Option<PartitionRange>,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            base: BasePolicy {
                total_timeout_ms: 0,
                max_retries: 5,
                ..BasePolicy::default()
            },
            records_per_second: 0,
            max_concurrent_nodes: 0,
            max_records: 0,
            include_bin_data: true,
            partitions: None,
        }
    }
}

/// Secondary index queries
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPolicy {
    pub base: BasePolicy,
    pub records_per_second: u32,
    pub max_records: u64,
    pub include_bin_data: bool,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            base: BasePolicy {
                total_timeout_ms: 0,
                max_retries: 5,
                ..BasePolicy::default()
            },
            records_per_second: 0,
            max_records: 0,
            include_bin_data: true,
        }
    }
}
