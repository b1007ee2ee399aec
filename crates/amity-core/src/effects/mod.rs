//! Core effect trait definitions
//!
//! Pure trait definitions for every side effect the resolver performs.
//! This module defines **what** effects can be performed; handlers in
//! `amity-effects` and `amity-testkit` define **how**.
//!
//! - **Storage**: the hosted relational backend (profiles, friendship edges)
//! - **Time**: wall-clock timestamps for `created_at` / `updated_at`
//! - **Random**: identifier generation for new rows

pub mod random;
pub mod storage;
pub mod time;

pub use random::RandomEffects;
pub use storage::{FriendshipStoreEffects, ProfileStoreEffects};
pub use time::{PhysicalTimeEffects, TimeError};
