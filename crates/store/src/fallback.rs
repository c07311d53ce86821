use async_trait::async_trait;
use eyre::Result;

use crate::KeyValueStore;

/// Uses `primary` and falls back to `secondary` whenever the primary fails.
///
/// Native preference storage can be unavailable (web build, permissions);
/// the fallback keeps the app working off the secondary store instead.
pub struct FallbackStore<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackStore<P, S>
where
    P: KeyValueStore,
    S: KeyValueStore,
{
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl<P, S> KeyValueStore for FallbackStore<P, S>
where
    P: KeyValueStore,
    S: KeyValueStore,
{
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.primary.get(key).await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Primary store read of {} failed, using fallback: {}", key, e);
                self.secondary.get(key).await
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Err(e) = self.primary.set(key, value).await {
            tracing::warn!("Primary store write of {} failed, using fallback: {}", key, e);
            return self.secondary.set(key, value).await;
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if let Err(e) = self.primary.remove(key).await {
            tracing::warn!("Primary store removal of {} failed, using fallback: {}", key, e);
            return self.secondary.remove(key).await;
        }
        Ok(())
    }
}
