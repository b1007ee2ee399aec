//! Snapshot of everything the viewer can see, and the lookups over it

use crate::relationship::{classify, find_edge, Relationship};
use crate::view::{ClassifiedProfile, FriendshipView};
use amity_core::{EdgeId, FriendshipEdge, Profile, ProfileId};

/// Profiles and edges fetched for one viewer.
///
/// Built fresh after every mutation; nothing here is cached across fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    self_id: ProfileId,
    profiles: Vec<Profile>,
    edges: Vec<FriendshipEdge>,
}

impl Resolver {
    /// Build a resolver, dropping the viewer's own profile if present.
    pub fn new(self_id: ProfileId, profiles: Vec<Profile>, edges: Vec<FriendshipEdge>) -> Self {
        let profiles = profiles.into_iter().filter(|p| p.id != self_id).collect();
        Self {
            self_id,
            profiles,
            edges,
        }
    }

    /// Viewer
    pub fn self_id(&self) -> ProfileId {
        self.self_id
    }

    /// Other profiles in fetch order
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Edges involving the viewer
    pub fn edges(&self) -> &[FriendshipEdge] {
        &self.edges
    }

    /// Relationship between the viewer and `profile_id`
    pub fn classify(&self, profile_id: &ProfileId) -> Relationship {
        classify(profile_id, &self.edges, &self.self_id)
    }

    /// Edge linking the viewer and `profile_id`, in either direction
    pub fn edge_for(&self, profile_id: &ProfileId) -> Option<&FriendshipEdge> {
        find_edge(profile_id, &self.edges, &self.self_id)
    }

    /// Look up an edge by id among those visible to the viewer
    pub fn edge(&self, edge_id: &EdgeId) -> Option<&FriendshipEdge> {
        self.edges.iter().find(|e| e.id == *edge_id)
    }

    /// Classify every profile and bucket the result.
    pub fn view(&self, suggestion_limit: Option<usize>) -> FriendshipView {
        let classified = self.profiles.iter().map(|profile| {
            let relationship = self.classify(&profile.id);
            // a stale rejected row is not a usable handle
            let edge_id = relationship
                .is_linked()
                .then(|| self.edge_for(&profile.id).map(|e| e.id))
                .flatten();
            ClassifiedProfile {
                profile: profile.clone(),
                relationship,
                edge_id,
            }
        });
        FriendshipView::from_classified(self.self_id, classified, suggestion_limit)
    }
}
