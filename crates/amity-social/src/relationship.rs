//! Per-viewer classification of a single profile
//!
//! `classify` is a pure function of `(profile, edges, viewer)`: no hidden
//! state, deterministic, and total. It is the only place the two-direction
//! edge match is written out.

use amity_core::{EdgeStatus, FriendshipEdge, ProfileId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship of another profile to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    /// No edge: shown as a suggestion
    None,
    /// The other profile asked the viewer; the viewer must act
    IncomingPending,
    /// The viewer asked the other profile; the viewer must wait
    OutgoingPending,
    /// Friends
    Accepted,
}

impl Relationship {
    /// Whether the viewer may send a new request to this profile
    pub fn can_send_request(&self) -> bool {
        matches!(self, Relationship::None)
    }

    /// Whether any edge currently links the pair
    pub fn is_linked(&self) -> bool {
        !matches!(self, Relationship::None)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Relationship::None => "none",
            Relationship::IncomingPending => "incoming_pending",
            Relationship::OutgoingPending => "outgoing_pending",
            Relationship::Accepted => "accepted",
        };
        f.write_str(name)
    }
}

/// Find the edge linking `self_id` and `profile_id`, in either direction.
///
/// Pair-uniqueness means there is at most one; if a stale `rejected` row
/// sits next to an active one, the active one wins.
pub fn find_edge<'a>(
    profile_id: &ProfileId,
    edges: &'a [FriendshipEdge],
    self_id: &ProfileId,
) -> Option<&'a FriendshipEdge> {
    let mut linking = edges.iter().filter(|e| e.connects(self_id, profile_id));
    let first = linking.next()?;
    if first.status.is_active() {
        return Some(first);
    }
    linking.find(|e| e.status.is_active()).or(Some(first))
}

/// Classify `profile_id` from the point of view of `self_id`.
pub fn classify(
    profile_id: &ProfileId,
    edges: &[FriendshipEdge],
    self_id: &ProfileId,
) -> Relationship {
    let Some(edge) = find_edge(profile_id, edges, self_id) else {
        return Relationship::None;
    };

    match edge.status {
        EdgeStatus::Accepted => Relationship::Accepted,
        EdgeStatus::Pending if edge.friend_id == *self_id => Relationship::IncomingPending,
        EdgeStatus::Pending if edge.user_id == *self_id => Relationship::OutgoingPending,
        // persisted `rejected` rows never block anything
        _ => Relationship::None,
    }
}
