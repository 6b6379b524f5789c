//! Record keys
//!
//! A key is (namespace, set, user key) plus a digest that decides the
//! partition the record lives in.

use sha2::{Digest, Sha256};

use super::errors::{ModelError, ModelResult};
use crate::value::Value;

/// Reserved pseudo-field naming the primary key in predicates
pub const PRIMARY_KEY_FIELD: &str = "__key";

/// Number of partitions a namespace is split into
pub const PARTITIONS: u16 = 4096;

/// A fully qualified record key
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub namespace: String,
    pub set: String,
    pub user_key: Value,
    pub digest: [u8; 20],
}

impl Key {
    /// Builds a key, rejecting user keys the store cannot address.
    ///
    /// Only integer, string and blob keys are legal.
    pub fn new(
        namespace: impl Into<String>,
        set: impl Into<String>,
        user_key: Value,
    ) -> ModelResult<Self> {
        let set = set.into();
        let (tag, bytes): (u8, Vec<u8>) = match &user_key {
            Value::Int(i) => (1, i.to_be_bytes().to_vec()),
            Value::String(s) => (3, s.as_bytes().to_vec()),
            Value::Blob(b) => (4, b.clone()),
            other => {
                return Err(ModelError::UnsupportedKey {
                    type_name: other.type_name(),
                    value: other.to_string(),
                })
            }
        };

        let mut hasher = Sha256::new();
        hasher.update(set.as_bytes());
        hasher.update([tag]);
        hasher.update(&bytes);
        let hash = hasher.finalize();

        let mut digest = [0u8; 20];
        digest.copy_from_slice(&hash[..20]);

        Ok(Self {
            namespace: namespace.into(),
            set,
            user_key,
            digest,
        })
    }

    /// Partition owning this key
    pub fn partition_id(&self) -> u16 {
        u16::from_le_bytes([self.digest[0], self.digest[1]]) & (PARTITIONS - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_key_types() {
        assert!(Key::new("test", "users", Value::Int(7)).is_ok());
        assert!(Key::new("test", "users", Value::String("u1".into())).is_ok());
        assert!(Key::new("test", "users", Value::Blob(vec![0xde, 0xad])).is_ok());
    }

    #[test]
    fn test_unsupported_key_rejected() {
        for bad in [Value::Float(1.5), Value::Bool(true), Value::Nil, Value::List(vec![])] {
            let err = Key::new("test", "users", bad).unwrap_err();
            assert!(matches!(err, ModelError::UnsupportedKey { .. }));
        }
    }

    #[test]
    fn test_digest_is_stable_and_type_sensitive() {
        let a = Key::new("test", "users", Value::Int(1)).unwrap();
        let b = Key::new("other_ns", "users", Value::Int(1)).unwrap();
        let c = Key::new("test", "users", Value::String("1".into())).unwrap();

        // namespace does not take part in the digest
        assert_eq!(a.digest, b.digest);
        assert_ne!(a.digest, c.digest);
        assert!(a.partition_id() < PARTITIONS);
    }
}
