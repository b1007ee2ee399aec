//! System clock handler

use amity_core::effects::{PhysicalTimeEffects, TimeError};
use amity_core::PhysicalTime;
use async_trait::async_trait;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock handler backed by `SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicalTimeHandler;

impl PhysicalTimeHandler {
    /// Create a new system clock handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for PhysicalTimeHandler {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TimeError::ClockUnavailable {
                reason: format!("system clock before epoch: {e}"),
            })?;
        Ok(PhysicalTime::from_ms(elapsed.as_millis() as u64))
    }
}
