//! Partition ranges for paginated scans

use std::fmt;

use serde::Serialize;

use super::key::PARTITIONS;
use super::errors::{ModelError, ModelResult};

/// Contiguous run of partitions `[begin, begin + count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartitionRange {
    pub begin: u16,
    pub count: u16,
}

impl PartitionRange {
    /// All partitions from `offset` to the last one.
    ///
    /// The offset must name an existing partition.
    pub fn from_offset(offset: u64) -> ModelResult<Self> {
        if offset >= PARTITIONS as u64 {
            return Err(ModelError::OffsetOutOfRange {
                offset,
                partitions: PARTITIONS,
            });
        }
        let begin = offset as u16;
        Ok(Self {
            begin,
            count: PARTITIONS - begin,
        })
    }

    /// True if `partition_id` falls inside the range
    pub fn contains(&self, partition_id: u16) -> bool {
        partition_id >= self.begin && (partition_id - self.begin) < self.count
    }
}

impl fmt::Display for PartitionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "partitions [{}, {})", self.begin, self.begin as u32 + self.count as u32)
    }
}
