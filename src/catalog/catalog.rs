//! Per-query index catalog snapshot

use std::collections::BTreeMap;

use super::descriptor::SecondaryIndexDescriptor;
use crate::predicate::Filter;
use crate::store::{StoreClient, StoreResult};

/// Indexes usable by one query, keyed by bin name.
///
/// Iteration is in bin-name order, which is what makes index choice
/// deterministic when several bins qualify.
#[derive(Debug, Clone, Default)]
pub struct IndexCatalog {
    by_bin: BTreeMap<String, Vec<SecondaryIndexDescriptor>>,
}

impl IndexCatalog {
    /// Builds a catalog from descriptors, keeping those covering `namespace`.`set`
    pub fn from_descriptors(
        namespace: &str,
        set: &str,
        descriptors: impl IntoIterator<Item = SecondaryIndexDescriptor>,
    ) -> Self {
        let mut by_bin: BTreeMap<String, Vec<SecondaryIndexDescriptor>> = BTreeMap::new();
        for descriptor in descriptors {
            if descriptor.covers(namespace, set) {
                by_bin
                    .entry(descriptor.bin.clone())
                    .or_default()
                    .push(descriptor);
            }
        }
        for indexes in by_bin.values_mut() {
            indexes.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Self { by_bin }
    }

    /// Takes a fresh snapshot from the live store
    pub fn load<S: StoreClient + ?Sized>(store: &S, namespace: &str, set: &str) -> StoreResult<Self> {
        let descriptors = store.secondary_indexes()?;
        Ok(Self::from_descriptors(namespace, set, descriptors))
    }

    /// Returns true if no index covers the query's set
    pub fn is_empty(&self) -> bool {
        self.by_bin.is_empty()
    }

    /// Number of indexed bins
    pub fn len(&self) -> usize {
        self.by_bin.len()
    }

    /// First index on `bin`, if any
    pub fn get(&self, bin: &str) -> Option<&SecondaryIndexDescriptor> {
        self.by_bin.get(bin).and_then(|v| v.first())
    }

    /// First index on the filter's bin whose type can answer it
    pub fn find_serving(&self, filter: &Filter) -> Option<&SecondaryIndexDescriptor> {
        self.by_bin
            .get(filter.bin())
            .and_then(|v| v.iter().find(|d| d.index_type.can_serve(filter)))
    }

    /// Indexed bin names in ascending order
    pub fn bins(&self) -> impl Iterator<Item = &str> {
        self.by_bin.keys().map(String::as_str)
    }
}
