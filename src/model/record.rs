//! Raw store records

use std::collections::BTreeMap;

use super::key::Key;
use crate::value::Value;

/// A record as delivered by the store.
///
/// Never mutated once it has been handed to a record stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Key, when the store kept the user key
    pub key: Option<Key>,
    /// Bin name -> value
    pub bins: BTreeMap<String, Value>,
    /// Write generation
    pub generation: u32,
    /// Expiration (seconds since store epoch, 0 = never)
    pub expiration: u32,
}

impl Record {
    pub fn new(key: Option<Key>, bins: BTreeMap<String, Value>, generation: u32) -> Self {
        Self {
            key,
            bins,
            generation,
            expiration: 0,
        }
    }

    /// Returns the value of a bin
    pub fn bin(&self, name: &str) -> Option<&Value> {
        self.bins.get(name)
    }

    /// Returns true if the bin is present and not nil
    pub fn has_bin(&self, name: &str) -> bool {
        self.bins.get(name).is_some_and(|v| !v.is_nil())
    }
}
