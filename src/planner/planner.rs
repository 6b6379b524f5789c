//! Access path selection
//!
//! Selection order (first match wins):
//! 1. `count(...)` without predicate: metadata count
//! 2. `count(...)` with predicate: count over a no-bin-data scan
//! 3. Explicit primary key: point lookup
//! 4. Indexable predicate and a usable secondary index: index query
//! 5. Otherwise: scan, starting at the offset partition if one is given
//!
//! Index ties are broken by bin name, smallest first. A missing index is
//! never an error, the query simply scans.

use tracing::{debug, info};

use super::access_path::AccessPath;
use super::errors::PlannerResult;
use crate::catalog::{IndexCatalog, SecondaryIndexDescriptor};
use crate::model::{Key, PartitionRange, Query};
use crate::predicate::{Filter, Predicate};
use crate::store::StoreClient;

/// Chooses an access path per query against a live store
pub struct QueryPlanner<'a, S: StoreClient + ?Sized> {
    store: &'a S,
}

impl<'a, S: StoreClient + ?Sized> QueryPlanner<'a, S> {
    /// Creates a new planner
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Plans a query.
    ///
    /// Fails only on an unusable primary key, a bad offset, or when the
    /// index catalog cannot be read.
    pub fn plan(&self, query: &Query) -> PlannerResult<AccessPath> {
        if let Some(label) = query.count_label() {
            let label = label.to_string();
            return Ok(match query.predicate {
                None => AccessPath::MetadataCount { label },
                Some(_) => AccessPath::CountScan { label },
            });
        }

        if let Some(pk) = &query.primary_key {
            let key = Key::new(&query.namespace, &query.table, pk.clone())?;
            debug!(key = %pk, partition = key.partition_id(), "primary key lookup");
            return Ok(AccessPath::PointLookup { key });
        }

        if let Some(predicate) = &query.predicate {
            if predicate.is_indexable() && self.store.supports_secondary_index() {
                // fresh snapshot, indexes may have changed since the last query
                let catalog = IndexCatalog::load(self.store, &query.namespace, &query.table)?;
                match choose_index(predicate, &catalog) {
                    Some((index, filter)) => {
                        info!(index = %index.name, bin = %index.bin, filter = %filter, "secondary index query");
                        return Ok(AccessPath::IndexQuery { index, filter });
                    }
                    None => debug!(indexes = catalog.len(), "no usable secondary index"),
                }
            }
        }

        let partitions = query.offset.map(PartitionRange::from_offset).transpose()?;
        match &partitions {
            Some(range) => info!(%range, "partition scan"),
            None => info!("full scan"),
        }
        Ok(AccessPath::Scan { partitions })
    }
}

/// Picks the index for a predicate.
///
/// Indexed bins are visited in name order; the first one the predicate
/// references, can build a filter for, and whose index type serves that
/// filter wins.
pub fn choose_index(
    predicate: &Predicate,
    catalog: &IndexCatalog,
) -> Option<(SecondaryIndexDescriptor, Filter)> {
    if !predicate.is_indexable() {
        return None;
    }
    let referenced = predicate.bin_names();
    catalog
        .bins()
        .filter(|bin| referenced.iter().any(|r| r.as_str() == *bin))
        .find_map(|bin| {
            let filter = predicate.to_filter(bin)?;
            let index = catalog.find_serving(&filter)?;
            Some((index.clone(), filter))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IndexType;
    use crate::model::PARTITIONS;
    use crate::store::{MemoryStore, StoreError};
    use crate::value::Value;

    fn catalog(indexes: &[(&str, &str, IndexType)]) -> IndexCatalog {
        IndexCatalog::from_descriptors(
            "test",
            "users",
            indexes
                .iter()
                .map(|(name, bin, t)| SecondaryIndexDescriptor::new(*name, "test", *bin, *t)),
        )
    }

    fn store_with(indexes: &[(&str, &str, IndexType)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (name, bin, t) in indexes {
            store.create_index(SecondaryIndexDescriptor::new(*name, "test", *bin, *t));
        }
        store
    }

    #[test]
    fn test_metadata_count_without_predicate() {
        let store = store_with(&[]);
        let query = Query::new("test", "users").with_columns(["count(*)"]);
        let path = QueryPlanner::new(&store).plan(&query).unwrap();
        assert_eq!(
            path,
            AccessPath::MetadataCount {
                label: "count(*)".into()
            }
        );
    }

    #[test]
    fn test_count_with_predicate_scans() {
        let store = store_with(&[("idx_age", "age", IndexType::Numeric)]);
        let query = Query::new("test", "users")
            .with_columns(["count(*)"])
            .with_predicate(Predicate::gt("age", 30));
        let path = QueryPlanner::new(&store).plan(&query).unwrap();
        assert!(matches!(path, AccessPath::CountScan { .. }));
    }

    #[test]
    fn test_primary_key_wins_over_index() {
        let store = store_with(&[("idx_age", "age", IndexType::Numeric)]);
        let query = Query::new("test", "users")
            .with_primary_key(7)
            .with_predicate(Predicate::eq("age", 30));
        let path = QueryPlanner::new(&store).plan(&query).unwrap();
        match path {
            AccessPath::PointLookup { key } => assert_eq!(key.user_key, Value::Int(7)),
            other => panic!("expected point lookup, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_primary_key_rejected() {
        let store = store_with(&[]);
        let query = Query::new("test", "users").with_primary_key(1.5);
        let err = QueryPlanner::new(&store).plan(&query).unwrap_err();
        assert_eq!(err.code(), "AERO_SQL_INVALID_OPERAND");
    }

    #[test]
    fn test_range_uses_numeric_index() {
        let store = store_with(&[("idx_age", "age", IndexType::Numeric)]);
        let query = Query::new("test", "users").with_predicate(Predicate::gt("age", 30));
        match QueryPlanner::new(&store).plan(&query).unwrap() {
            AccessPath::IndexQuery { index, filter } => {
                assert_eq!(index.name, "idx_age");
                assert_eq!(filter, Filter::range("age", 31, i64::MAX));
            }
            other => panic!("expected index query, got {:?}", other),
        }
    }

    #[test]
    fn test_is_null_always_scans() {
        let store = store_with(&[("idx_name", "name", IndexType::String)]);
        let query = Query::new("test", "users").with_predicate(Predicate::is_null("name"));
        let path = QueryPlanner::new(&store).plan(&query).unwrap();
        assert_eq!(path, AccessPath::Scan { partitions: None });
    }

    #[test]
    fn test_no_sindex_support_scans() {
        let store = MemoryStore::without_secondary_index_support();
        store.create_index(SecondaryIndexDescriptor::new(
            "idx_age",
            "test",
            "age",
            IndexType::Numeric,
        ));
        let query = Query::new("test", "users").with_predicate(Predicate::eq("age", 3));
        let path = QueryPlanner::new(&store).plan(&query).unwrap();
        assert_eq!(path.kind().as_str(), "SCAN");
    }

    #[test]
    fn test_offset_becomes_partition_range() {
        let store = store_with(&[]);
        let query = Query::new("test", "users").with_offset(100);
        let path = QueryPlanner::new(&store).plan(&query).unwrap();
        assert_eq!(
            path,
            AccessPath::Scan {
                partitions: Some(PartitionRange {
                    begin: 100,
                    count: PARTITIONS - 100
                })
            }
        );

        let bad = Query::new("test", "users").with_offset(PARTITIONS as u64);
        let err = QueryPlanner::new(&store).plan(&bad).unwrap_err();
        assert_eq!(err.code(), "AERO_SQL_INVALID_QUERY");
    }

    #[test]
    fn test_compound_prefers_smallest_bin_name() {
        let cat = catalog(&[
            ("idx_b", "b", IndexType::Numeric),
            ("idx_a", "a", IndexType::Numeric),
        ]);
        let predicate = Predicate::and(vec![Predicate::eq("b", 2), Predicate::eq("a", 1)]);
        let (index, filter) = choose_index(&predicate, &cat).unwrap();
        assert_eq!(index.name, "idx_a");
        assert_eq!(filter, Filter::equal("a", 1i64));
    }

    #[test]
    fn test_compound_uses_only_indexed_bin() {
        let cat = catalog(&[("idx_b", "b", IndexType::Numeric)]);
        let predicate = Predicate::and(vec![Predicate::eq("a", 1), Predicate::gte("b", 10)]);
        let (index, filter) = choose_index(&predicate, &cat).unwrap();
        assert_eq!(index.bin, "b");
        assert_eq!(filter, Filter::range("b", 10, i64::MAX));
    }

    #[test]
    fn test_index_type_mismatch_skipped() {
        let cat = catalog(&[
            ("idx_a", "a", IndexType::String),
            ("idx_c", "c", IndexType::Numeric),
        ]);
        let predicate = Predicate::and(vec![Predicate::eq("a", 1), Predicate::eq("c", 5)]);
        let (index, _) = choose_index(&predicate, &cat).unwrap();
        assert_eq!(index.name, "idx_c");
    }

    #[test]
    fn test_unreferenced_index_ignored() {
        let cat = catalog(&[("idx_zip", "zip", IndexType::Numeric)]);
        assert!(choose_index(&Predicate::eq("age", 1), &cat).is_none());
    }

    /// Store whose catalog listing always fails
    struct BrokenCatalog(MemoryStore);

    impl StoreClient for BrokenCatalog {
        fn get(
            &self,
            policy: &crate::config::BasePolicy,
            key: &Key,
            bins: Option<&[String]>,
        ) -> crate::store::StoreResult<Option<crate::model::Record>> {
            self.0.get(policy, key, bins)
        }

        fn scan(
            &self,
            policy: &crate::config::ScanPolicy,
            namespace: &str,
            set: &str,
            bins: Option<&[String]>,
            listener: Box<dyn crate::store::RecordListener>,
        ) -> crate::store::StoreResult<()> {
            self.0.scan(policy, namespace, set, bins, listener)
        }

        fn query(
            &self,
            policy: &crate::config::QueryPolicy,
            statement: &crate::store::Statement,
            listener: Box<dyn crate::store::RecordListener>,
        ) -> crate::store::StoreResult<()> {
            self.0.query(policy, statement, listener)
        }

        fn record_count(&self, namespace: &str, set: &str) -> crate::store::StoreResult<u64> {
            self.0.record_count(namespace, set)
        }

        fn secondary_indexes(&self) -> crate::store::StoreResult<Vec<SecondaryIndexDescriptor>> {
            Err(StoreError::Timeout(50))
        }

        fn supports_secondary_index(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_catalog_failure_surfaces() {
        let store = BrokenCatalog(MemoryStore::new());
        let query = Query::new("test", "users").with_predicate(Predicate::eq("age", 1));
        let err = QueryPlanner::new(&store).plan(&query).unwrap_err();
        assert_eq!(err.code(), "AERO_SQL_CATALOG_UNAVAILABLE");

        // non-indexable predicates never read the catalog
        let query = Query::new("test", "users").with_predicate(Predicate::is_null("age"));
        assert!(QueryPlanner::new(&store).plan(&query).is_ok());
    }
}
