//! Controllable clock for deterministic tests

use amity_core::effects::{PhysicalTimeEffects, TimeError};
use amity_core::PhysicalTime;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default start of a test clock (2023-11-14T22:13:20Z)
pub const TEST_EPOCH_MS: u64 = 1_700_000_000_000;

/// Clock that ticks a fixed step on every read.
///
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct DeterministicClock {
    now_ms: Arc<AtomicU64>,
    step_ms: u64,
}

impl Default for DeterministicClock {
    fn default() -> Self {
        Self::new(TEST_EPOCH_MS, 1)
    }
}

impl DeterministicClock {
    /// Start at `start_ms`, advancing `step_ms` after each read
    pub fn new(start_ms: u64, step_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(start_ms)),
            step_ms,
        }
    }

    /// Clock that never advances on its own
    pub fn frozen(at_ms: u64) -> Self {
        Self::new(at_ms, 0)
    }

    /// Move the clock forward
    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Current reading without ticking
    pub fn peek(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhysicalTimeEffects for DeterministicClock {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        let ts_ms = self.now_ms.fetch_add(self.step_ms, Ordering::SeqCst);
        Ok(PhysicalTime::from_ms(ts_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ticks_per_read() {
        let clock = DeterministicClock::new(10, 5);
        assert_eq!(clock.physical_time().await.unwrap().ts_ms, 10);
        assert_eq!(clock.physical_time().await.unwrap().ts_ms, 15);
        clock.advance(100);
        assert_eq!(clock.peek(), 120);
    }

    #[tokio::test]
    async fn test_frozen() {
        let clock = DeterministicClock::frozen(42);
        assert_eq!(clock.physical_time().await.unwrap().ts_ms, 42);
        assert_eq!(clock.physical_time().await.unwrap().ts_ms, 42);
    }
}
