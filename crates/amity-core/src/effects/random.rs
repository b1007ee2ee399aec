//! Randomness effects

use async_trait::async_trait;
use uuid::Uuid;

/// Source of fresh identifiers.
#[async_trait]
pub trait RandomEffects: Send + Sync {
    /// Generate a random 64-bit value
    async fn random_u64(&self) -> u64;

    /// Generate a fresh UUID
    async fn random_uuid(&self) -> Uuid;
}
