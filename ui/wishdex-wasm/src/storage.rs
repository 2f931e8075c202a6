//! Browser-side `KvStore` backend over `window.localStorage`.
//!
//! Storage access can be denied (private-mode policies), so the handle
//! is optional: reads come back empty and writes fail with an error the
//! session logs and absorbs.

use anyhow::{Result, anyhow};
use wd_storage::KvStore;

pub struct LocalStorageKv {
    storage: Option<web_sys::Storage>,
}

impl LocalStorageKv {
    pub fn bind() -> Self {
        Self {
            storage: web_sys::window().and_then(|w| w.local_storage().ok().flatten()),
        }
    }
}

impl KvStore for LocalStorageKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match &self.storage {
            Some(storage) => storage
                .get_item(key)
                .map_err(|err| anyhow!("localStorage read failed: {err:?}")),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Err(anyhow!("localStorage is unavailable"));
        };
        storage.set_item(key, value).map_err(|err| {
            gloo_console::error!("localStorage write failed", format!("{err:?}"));
            anyhow!("localStorage write failed: {err:?}")
        })
    }
}
