use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
use rocksdb::{DB, Options};
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

/// Durable, synchronous, string-keyed storage boundary. The wishlist
/// core treats implementations as opaque; failures are reported, never
/// retried.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<K: KvStore + ?Sized> KvStore for &K {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Discards writes and reads nothing. For detached sessions and tests
/// that only care about the in-memory model.
#[derive(Default)]
pub struct NoopKv;

impl KvStore for NoopKv {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl KvStore for InMemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.entries.lock().map_err(|_| anyhow!("kv lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.entries.lock().map_err(|_| anyhow!("kv lock poisoned"))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// RocksDB-backed store for native targets.
#[cfg(not(target_arch = "wasm32"))]
pub struct RocksDbKv {
    db: Arc<DB>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RocksDbKv {
    pub fn open_default(path: &str) -> Result<Self> {
        let mut options = Options::default();
        options.create_if_missing(true);
        let db = DB::open(&options, path)?;
        tracing::debug!(path, "opened rocksdb kv store");
        Ok(Self { db: Arc::new(db) })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KvStore for RocksDbKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.get(key.as_bytes())? {
            Some(raw) => Ok(Some(String::from_utf8(raw)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.put(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_reads_nothing() -> Result<()> {
        let kv = NoopKv;
        kv.set("wishlistItems", "[]")?;
        assert_eq!(kv.get("wishlistItems")?, None);
        Ok(())
    }

    #[test]
    fn in_memory_round_trip_and_overwrite() -> Result<()> {
        let kv = InMemoryKv::default();
        assert_eq!(kv.get("wishlistItems")?, None);

        kv.set("wishlistItems", "[1]")?;
        assert_eq!(kv.get("wishlistItems")?.as_deref(), Some("[1]"));

        kv.set("wishlistItems", "[1,2]")?;
        assert_eq!(kv.get("wishlistItems")?.as_deref(), Some("[1,2]"));
        Ok(())
    }

    #[test]
    fn rocksdb_round_trip_survives_reopen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("kv");
        let path = path.to_str().expect("utf-8 temp path");

        {
            let kv = RocksDbKv::open_default(path)?;
            kv.set("wishlistItems", r#"[{"id":"1"}]"#)?;
            assert_eq!(kv.get("wishlistItems")?.as_deref(), Some(r#"[{"id":"1"}]"#));
        }

        let kv = RocksDbKv::open_default(path)?;
        assert_eq!(kv.get("wishlistItems")?.as_deref(), Some(r#"[{"id":"1"}]"#));
        assert_eq!(kv.get("missing")?, None);
        Ok(())
    }
}
