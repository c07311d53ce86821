use async_trait::async_trait;
use mockall::mock;

use crate::KeyValueStore;

// Mock store for simulating storage failures in tests
mock! {
    pub Store {}

    #[async_trait]
    impl KeyValueStore for Store {
        async fn get(&self, key: &str) -> eyre::Result<Option<String>>;

        async fn set(&self, key: &str, value: &str) -> eyre::Result<()>;

        async fn remove(&self, key: &str) -> eyre::Result<()>;
    }
}
