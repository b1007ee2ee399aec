//! Amity Core - Friendship Model Foundation
//!
//! This crate provides the foundational types and effect interfaces for the
//! Amity friendship resolver. It contains no I/O and no handler
//! implementations; those live in `amity-effects` (production) and
//! `amity-testkit` (deterministic test handlers).
//!
//! # Contents
//!
//! - Identifiers: `ProfileId`, `EdgeId`
//! - Time: `PhysicalTime`
//! - Domain types: `Profile`, `ProfileUpdate`, `FriendshipEdge`, `EdgeStatus`, `EdgePair`
//! - Effect interfaces: `FriendshipStoreEffects`, `ProfileStoreEffects`,
//!   `PhysicalTimeEffects`, `RandomEffects`
//! - Unified error handling: `AmityError`, `Result`
//! - Configuration: `AmityConfig`, `FriendshipConfig`, `ProfileConfig`

#![forbid(unsafe_code)]

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Profile and edge identifiers
pub mod identifiers;

/// Wall-clock timestamps
pub mod time;

/// Domain records for profiles and friendship edges
pub mod types;

/// Configuration sections, loading and validation
pub mod config;

pub use config::{AmityConfig, ConfigValidation, FriendshipConfig, ProfileConfig};
pub use effects::{
    FriendshipStoreEffects, PhysicalTimeEffects, ProfileStoreEffects, RandomEffects, TimeError,
};
pub use errors::{AmityError, Result};
pub use identifiers::{EdgeId, ProfileId};
pub use time::PhysicalTime;
pub use types::{DeleteIntent, EdgePair, EdgeStatus, FriendshipEdge, NewEdge, Profile, ProfileUpdate};
