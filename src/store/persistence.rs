//! Persistent store backed by sled.
//!
//! Each key maps to one sled entry. The first byte of the stored value tags
//! the entry: `d` for a directory, `f` followed by UTF-8 text for a leaf.

use crate::error::StoreError;
use crate::store::tree::{Backend, Entry, TreeStore};
use std::path::Path;

const DIR_TAG: u8 = b'd';
const LEAF_TAG: u8 = b'f';

pub struct SledBackend {
    db: sled::Db,
}

impl SledBackend {
    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }

    fn encode(entry: &Entry) -> Vec<u8> {
        match entry {
            Entry::Dir => vec![DIR_TAG],
            Entry::Leaf(value) => {
                let mut bytes = Vec::with_capacity(value.len() + 1);
                bytes.push(LEAF_TAG);
                bytes.extend_from_slice(value.as_bytes());
                bytes
            }
        }
    }

    fn decode(key: &str, bytes: &[u8]) -> Result<Entry, StoreError> {
        match bytes.split_first() {
            Some((&DIR_TAG, [])) => Ok(Entry::Dir),
            Some((&LEAF_TAG, rest)) => String::from_utf8(rest.to_vec())
                .map(Entry::Leaf)
                .map_err(|_| StoreError::Corrupt {
                    key: key.to_string(),
                }),
            _ => Err(StoreError::Corrupt {
                key: key.to_string(),
            }),
        }
    }
}

impl Backend for SledBackend {
    fn read(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(key, &bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, entry: &Entry) -> Result<(), StoreError> {
        self.db.insert(key.as_bytes(), Self::encode(entry))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.db.remove(key.as_bytes())?;
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Entry)>, StoreError> {
        let mut out = Vec::new();
        for item in self.db.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            let key = String::from_utf8(key.to_vec()).map_err(|e| StoreError::Corrupt {
                key: String::from_utf8_lossy(e.as_bytes()).into_owned(),
            })?;
            let entry = Self::decode(&key, &value)?;
            out.push((key, entry));
        }
        Ok(out)
    }

    fn next_index(&self) -> Result<u64, StoreError> {
        Ok(self.db.generate_id()? + 1)
    }
}

/// Hierarchical store persisted in a sled database.
pub type SledStore = TreeStore<SledBackend>;

impl TreeStore<SledBackend> {
    /// Open (or create) the database directory at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self::from_db(db))
    }

    pub fn from_db(db: sled::Db) -> Self {
        TreeStore::with_backend(SledBackend::from_db(db))
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.backend().db.flush()?;
        Ok(())
    }
}
