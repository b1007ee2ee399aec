//! Wall-clock timestamps
//!
//! Timestamps are produced through `PhysicalTimeEffects` so tests can drive a
//! deterministic clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical (wall-clock) time in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalTime {
    /// Milliseconds since the Unix epoch
    pub ts_ms: u64,
    /// Clock uncertainty in milliseconds, if known
    pub uncertainty: Option<u64>,
}

impl PhysicalTime {
    /// Create a timestamp with no uncertainty bound
    pub fn from_ms(ts_ms: u64) -> Self {
        Self {
            ts_ms,
            uncertainty: None,
        }
    }
}

impl fmt::Display for PhysicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.ts_ms)
    }
}
