//! Store readiness check.

use crate::{DatabasePool, MemoryStore};
use async_trait::async_trait;
use koinonia_core::{KoinoniaError, KoinoniaResult};

/// Something the readiness endpoint can ping.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> KoinoniaResult<()>;
}

#[async_trait]
impl StoreHealth for DatabasePool {
    async fn ping(&self) -> KoinoniaResult<()> {
        self.health_check().await
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> KoinoniaResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(KoinoniaError::Unavailable("in-memory store disabled".to_string()))
        }
    }
}
