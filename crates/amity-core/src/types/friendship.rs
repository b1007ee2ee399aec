//! Friendship edges
//!
//! A friendship is logically undirected but stored as a directed row from
//! initiator (`user_id`) to recipient (`friend_id`). Every symmetric lookup
//! goes through [`FriendshipEdge::connects`] or [`EdgePair`] so no caller
//! has to spell out the two-direction match by hand.

use crate::errors::AmityError;
use crate::identifiers::{EdgeId, ProfileId};
use crate::time::PhysicalTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a friendship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    /// Request sent, waiting for the recipient
    Pending,
    /// Both sides are friends
    Accepted,
    /// Declined. Never written by Amity (rejection deletes the edge); only
    /// kept so rows from older writers still decode.
    Rejected,
}

impl EdgeStatus {
    /// Stable lowercase name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeStatus::Pending => "pending",
            EdgeStatus::Accepted => "accepted",
            EdgeStatus::Rejected => "rejected",
        }
    }

    /// Whether an edge in this status counts towards pair-uniqueness.
    pub fn is_active(&self) -> bool {
        matches!(self, EdgeStatus::Pending | EdgeStatus::Accepted)
    }
}

impl fmt::Display for EdgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeStatus {
    type Err = AmityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EdgeStatus::Pending),
            "accepted" => Ok(EdgeStatus::Accepted),
            "rejected" => Ok(EdgeStatus::Rejected),
            other => Err(AmityError::invalid(format!("unknown edge status: {other}"))),
        }
    }
}

/// Unordered pair of profiles, normalised so `low <= high`.
///
/// This is the uniqueness key for edges: `(a, b)` and `(b, a)` are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgePair {
    low: ProfileId,
    high: ProfileId,
}

impl EdgePair {
    /// Normalise two endpoints into a pair.
    pub fn new(a: ProfileId, b: ProfileId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Smaller endpoint
    pub fn low(&self) -> ProfileId {
        self.low
    }

    /// Larger endpoint
    pub fn high(&self) -> ProfileId {
        self.high
    }

    /// True when both endpoints are the same profile
    pub fn is_self_loop(&self) -> bool {
        self.low == self.high
    }

    /// Whether `id` is one of the endpoints
    pub fn contains(&self, id: &ProfileId) -> bool {
        self.low == *id || self.high == *id
    }
}

/// A stored friendship edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendshipEdge {
    /// Edge identifier
    pub id: EdgeId,
    /// Initiator of the request
    pub user_id: ProfileId,
    /// Recipient of the request
    pub friend_id: ProfileId,
    /// Current status
    pub status: EdgeStatus,
    /// When the request was sent
    pub created_at: PhysicalTime,
    /// Last status change
    pub updated_at: PhysicalTime,
}

impl FriendshipEdge {
    /// Unordered pair key of this edge
    pub fn pair(&self) -> EdgePair {
        EdgePair::new(self.user_id, self.friend_id)
    }

    /// Whether `id` is either endpoint
    pub fn involves(&self, id: &ProfileId) -> bool {
        self.user_id == *id || self.friend_id == *id
    }

    /// Whether this edge links `a` and `b`, in either direction
    pub fn connects(&self, a: &ProfileId, b: &ProfileId) -> bool {
        (self.user_id == *a && self.friend_id == *b) || (self.user_id == *b && self.friend_id == *a)
    }

    /// The endpoint that is not `self_id`, or `None` if `self_id` is not on the edge
    pub fn other_party(&self, self_id: &ProfileId) -> Option<ProfileId> {
        if self.user_id == *self_id {
            Some(self.friend_id)
        } else if self.friend_id == *self_id {
            Some(self.user_id)
        } else {
            None
        }
    }

    /// Pending request addressed to `id`
    pub fn is_incoming_for(&self, id: &ProfileId) -> bool {
        self.status == EdgeStatus::Pending && self.friend_id == *id
    }

    /// Pending request sent by `id`
    pub fn is_outgoing_for(&self, id: &ProfileId) -> bool {
        self.status == EdgeStatus::Pending && self.user_id == *id
    }
}

/// Insert request for a new edge. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEdge {
    /// Initiator
    pub user_id: ProfileId,
    /// Recipient
    pub friend_id: ProfileId,
    /// Initial status, always `Pending` for requests
    pub status: EdgeStatus,
}

impl NewEdge {
    /// A pending friend request from `user_id` to `friend_id`
    pub fn request(user_id: ProfileId, friend_id: ProfileId) -> Self {
        Self {
            user_id,
            friend_id,
            status: EdgeStatus::Pending,
        }
    }

    /// Unordered pair key of the edge to be created
    pub fn pair(&self) -> EdgePair {
        EdgePair::new(self.user_id, self.friend_id)
    }
}

/// Why an edge is being deleted.
///
/// The store checks the intent against the edge it finds under its write
/// lock, so a concurrent accept cannot turn a cancel into an unfriend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteIntent {
    /// Recipient declines a pending request
    Reject,
    /// Initiator withdraws a pending request
    Cancel,
    /// Either endpoint ends an accepted friendship
    Remove,
}

impl DeleteIntent {
    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteIntent::Reject => "reject",
            DeleteIntent::Cancel => "cancel",
            DeleteIntent::Remove => "remove",
        }
    }
}

impl fmt::Display for DeleteIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
