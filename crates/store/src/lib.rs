//! # SeniorCare Store
//!
//! Device-local key-value storage. Each key is owned by exactly one feature:
//! the alarm engine owns [`keys::ALARMS`], the login flow owns the session
//! and remembered-login keys.

pub mod fallback;
pub mod file;
pub mod memory;
pub mod preferences;

pub mod mock;

use std::path::Path;

use async_trait::async_trait;
use eyre::Result;

pub use fallback::FallbackStore;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage keys used by the application.
pub mod keys {
    /// JSON array of alarms.
    pub const ALARMS: &str = "seniorcare_alarms";
    /// Opaque session token issued by the backend.
    pub const SESSION: &str = "seniorcare_session";
    pub const REMEMBERED_USERNAME: &str = "rememberedUsername";
    pub const REMEMBER_ME: &str = "rememberMe";

    /// Keys copied from durable storage into the fast cache at start.
    pub const WARM_ON_START: [&str; 3] = [SESSION, REMEMBERED_USERNAME, REMEMBER_ME];
}

/// String-keyed storage holding whole serialized values.
///
/// Writes replace the full value, never a delta.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// Opens the on-disk store rooted at `data_dir`, creating the directory.
pub async fn open_store(data_dir: impl AsRef<Path>) -> Result<FileStore> {
    let store = FileStore::new(data_dir.as_ref());
    tokio::fs::create_dir_all(store.root()).await?;

    tracing::debug!("Opened key-value store at {}", store.root().display());
    Ok(store)
}

/// Copies `keys` from `durable` into `cache` when the cache lacks them.
///
/// Failures are ignored: a cold cache only costs a slower first read.
pub async fn warm_cache(durable: &dyn KeyValueStore, cache: &dyn KeyValueStore, keys: &[&str]) {
    for key in keys {
        let value = match durable.get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => continue,
            Err(e) => {
                tracing::debug!("Skipping cache warm-up for {}: {}", key, e);
                continue;
            }
        };

        if let Ok(None) = cache.get(key).await {
            if let Err(e) = cache.set(key, &value).await {
                tracing::debug!("Failed to warm cache for {}: {}", key, e);
            }
        }
    }
}
