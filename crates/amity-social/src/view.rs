//! Derived friendship views
//!
//! A `FriendshipView` is recomputed from scratch after every mutation and is
//! never patched in place. Every profile handed to the resolver appears in
//! exactly one bucket.

use crate::relationship::Relationship;
use amity_core::{EdgeId, Profile, ProfileId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A profile together with its relationship to the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedProfile {
    /// The other profile
    pub profile: Profile,
    /// Relationship to the viewer
    pub relationship: Relationship,
    /// Edge backing the relationship, if any
    pub edge_id: Option<EdgeId>,
}

/// The viewer's friendship buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendshipView {
    /// Viewer
    pub self_id: ProfileId,
    /// Requests the viewer can accept or reject
    pub incoming: Vec<ClassifiedProfile>,
    /// Requests the viewer sent and can cancel
    pub outgoing: Vec<ClassifiedProfile>,
    /// Accepted friends
    pub friends: Vec<ClassifiedProfile>,
    /// Profiles with no edge to the viewer
    pub suggestions: Vec<ClassifiedProfile>,
    /// Suggestions dropped by the configured limit
    pub suggestions_truncated: usize,
    index: HashMap<ProfileId, (Relationship, Option<EdgeId>)>,
}

impl FriendshipView {
    /// Bucket already-classified profiles, preserving their order.
    pub fn from_classified(
        self_id: ProfileId,
        classified: impl IntoIterator<Item = ClassifiedProfile>,
        suggestion_limit: Option<usize>,
    ) -> Self {
        let mut view = Self {
            self_id,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            friends: Vec::new(),
            suggestions: Vec::new(),
            suggestions_truncated: 0,
            index: HashMap::new(),
        };

        for entry in classified {
            view.index
                .insert(entry.profile.id, (entry.relationship, entry.edge_id));
            match entry.relationship {
                Relationship::IncomingPending => view.incoming.push(entry),
                Relationship::OutgoingPending => view.outgoing.push(entry),
                Relationship::Accepted => view.friends.push(entry),
                Relationship::None => view.suggestions.push(entry),
            }
        }

        if let Some(limit) = suggestion_limit {
            if view.suggestions.len() > limit {
                view.suggestions_truncated = view.suggestions.len() - limit;
                view.suggestions.truncate(limit);
            }
        }
        view
    }

    /// Relationship of a profile, including suggestions cut by the limit.
    ///
    /// `None` means the profile was not part of the fetch.
    pub fn relationship_of(&self, profile_id: &ProfileId) -> Option<Relationship> {
        self.index.get(profile_id).map(|(rel, _)| *rel)
    }

    /// Edge backing the relationship with a profile, if any
    pub fn edge_id_for(&self, profile_id: &ProfileId) -> Option<EdgeId> {
        self.index.get(profile_id).and_then(|(_, edge)| *edge)
    }

    /// Find a profile's entry in whichever bucket holds it
    pub fn entry(&self, profile_id: &ProfileId) -> Option<&ClassifiedProfile> {
        self.incoming
            .iter()
            .chain(&self.outgoing)
            .chain(&self.friends)
            .chain(&self.suggestions)
            .find(|entry| entry.profile.id == *profile_id)
    }

    /// Number of classified profiles, truncated suggestions included
    pub fn total(&self) -> usize {
        self.index.len()
    }

    /// Number of accepted friends
    pub fn friend_count(&self) -> usize {
        self.friends.len()
    }

    /// Whether there are requests waiting for the viewer
    pub fn has_incoming(&self) -> bool {
        !self.incoming.is_empty()
    }
}
