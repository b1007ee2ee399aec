//! Storage collaborator handlers
//!
//! `MemoryFriendshipStore` stands in for the hosted relational backend.
//! Snapshots let a session's rows be written to disk and restored.

mod memory;
mod snapshot;

pub use memory::MemoryFriendshipStore;
pub use snapshot::StoreSnapshot;
