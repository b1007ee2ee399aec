//! Amity Effects - Production Effect Handlers
//!
//! Implementations of the effect traits defined in `amity-core`:
//!
//! - `MemoryFriendshipStore`: the storage collaborator. Enforces
//!   pair-uniqueness atomically and evaluates `EdgeAccessPolicy` on every
//!   mutation, so permission checks are authoritative here rather than
//!   advisory in the UI.
//! - `PhysicalTimeHandler`: system clock
//! - `RealRandomHandler`: OS-seeded randomness
//!
//! Deterministic handlers for tests live in `amity-testkit`.

pub mod access_control;
pub mod random;
pub mod storage;
pub mod time;

pub use access_control::{AccessDecision, EdgeAccessPolicy, EdgeOperation};
pub use random::RealRandomHandler;
pub use storage::{MemoryFriendshipStore, StoreSnapshot};
pub use time::PhysicalTimeHandler;
