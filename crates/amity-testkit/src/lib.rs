//! Amity Testing Infrastructure
//!
//! Deterministic effect handlers, fixtures and proptest strategies shared by
//! the test suites of the other Amity crates.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```rust,no_run
//! use amity_testkit::TestNetwork;
//!
//! # async fn demo() {
//! let network = TestNetwork::with_users(&["alice", "bob"]).await;
//! let alice = network.id("alice");
//! # }
//! ```

pub mod assertions;
pub mod faults;
pub mod fixtures;
pub mod random;
pub mod strategies;
pub mod time;

pub use faults::{FaultInjectingStore, FaultPoint};
pub use fixtures::*;
pub use random::SeededRandom;
pub use time::DeterministicClock;

/// Install a test-friendly `tracing` subscriber.
///
/// Honours `RUST_LOG`; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
