//! Amity Social - Friendship Relationship Resolver
//!
//! Classifies every other profile relative to the signed-in user and
//! performs the friendship mutations:
//!
//! - `relationship`: the pure `classify` function over directed edges
//! - `resolver` / `view`: one fetch of profiles and edges, bucketed into
//!   incoming, outgoing, friends and suggestions
//! - `service`: send, accept, reject, cancel and remove, each followed by a
//!   full re-fetch
//! - `profile`: own-profile reads and edits
//!
//! Storage is reached through the effect traits in `amity-core`; services
//! take the store per call and keep no state of their own.

pub mod profile;
pub mod relationship;
pub mod resolver;
pub mod service;
pub mod session;
pub mod view;

pub use profile::ProfileService;
pub use relationship::{classify, find_edge, Relationship};
pub use resolver::Resolver;
pub use service::{FriendshipService, RemovalConfirmation};
pub use session::Session;
pub use view::{ClassifiedProfile, FriendshipView};
