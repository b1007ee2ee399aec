//! OS-seeded randomness handler

use amity_core::effects::RandomEffects;
use async_trait::async_trait;
use uuid::Uuid;

/// Randomness handler backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealRandomHandler;

impl RealRandomHandler {
    /// Create a new randomness handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RandomEffects for RealRandomHandler {
    async fn random_u64(&self) -> u64 {
        rand::random()
    }

    async fn random_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}
