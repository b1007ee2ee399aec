//! Seeded randomness for reproducible ids

use amity_core::effects::RandomEffects;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// `RandomEffects` backed by a seeded `StdRng`.
///
/// Two handlers with the same seed produce the same sequence of ids.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Arc<Mutex<StdRng>>,
}

impl SeededRandom {
    /// Create a handler from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

#[async_trait]
impl RandomEffects for SeededRandom {
    async fn random_u64(&self) -> u64 {
        self.rng.lock().unwrap().gen()
    }

    async fn random_uuid(&self) -> Uuid {
        let bytes: [u8; 16] = self.rng.lock().unwrap().gen();
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}
