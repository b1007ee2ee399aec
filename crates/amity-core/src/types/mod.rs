//! Domain records
//!
//! Rows as the storage collaborator hands them out. They carry no behaviour
//! beyond pure queries; mutation goes through the effect traits.

pub mod friendship;
pub mod profile;

pub use friendship::{DeleteIntent, EdgePair, EdgeStatus, FriendshipEdge, NewEdge};
pub use profile::{Profile, ProfileUpdate};
