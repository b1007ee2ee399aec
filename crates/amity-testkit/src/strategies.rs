//! Property test strategies for friendship graphs
//!
//! Graphs respect the storage invariants: at most one edge per unordered
//! pair and no self-edges. Ids are derived from small seeds so failures
//! shrink to readable cases.

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use crate::fixtures::{test_edge, test_profile};
use amity_core::{EdgeStatus, FriendshipEdge, Profile, ProfileId, ProfileUpdate};

/// A population of profiles and the edges between them.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    /// Viewer, always `profiles[0]`
    pub self_id: ProfileId,
    /// Every profile, viewer included
    pub profiles: Vec<Profile>,
    /// Edges between any two profiles
    pub edges: Vec<FriendshipEdge>,
}

/// Strategy for any stored edge status, legacy `rejected` included
pub fn arb_edge_status() -> impl Strategy<Value = EdgeStatus> {
    prop_oneof![
        4 => Just(EdgeStatus::Pending),
        4 => Just(EdgeStatus::Accepted),
        1 => Just(EdgeStatus::Rejected),
    ]
}

/// Strategy for a graph of `2..=max_profiles` profiles.
///
/// Each unordered pair independently gets no edge or one edge with a random
/// direction and status.
///
/// # Example
///
/// ```rust
/// use amity_testkit::strategies::arb_social_graph;
/// use proptest::prelude::*;
///
/// proptest! {
///     #[test]
///     fn graph_has_viewer(graph in arb_social_graph(6)) {
///         prop_assert_eq!(graph.profiles[0].id, graph.self_id);
///     }
/// }
/// ```
pub fn arb_social_graph(max_profiles: u8) -> impl Strategy<Value = SocialGraph> {
    (2..=max_profiles.max(2)).prop_flat_map(|count| {
        let pairs = usize::from(count) * usize::from(count - 1) / 2;
        let slot = prop::option::weighted(0.6, (any::<bool>(), arb_edge_status()));
        prop::collection::vec(slot, pairs).prop_map(move |slots| build_graph(count, slots))
    })
}

fn build_graph(count: u8, slots: Vec<Option<(bool, EdgeStatus)>>) -> SocialGraph {
    let profiles: Vec<Profile> = (1..=count).map(test_profile).collect();
    let mut edges = Vec::new();
    let mut slots = slots.into_iter();
    let mut edge_seed: u8 = 0;

    for low in 1..=count {
        for high in (low + 1)..=count {
            if let Some(Some((forward, status))) = slots.next() {
                let (from, to) = if forward { (low, high) } else { (high, low) };
                edge_seed = edge_seed.wrapping_add(1);
                edges.push(test_edge(edge_seed, from, to, status));
            }
        }
    }

    SocialGraph {
        self_id: profiles[0].id,
        profiles,
        edges,
    }
}

/// Strategy for owner edits with short printable fields
pub fn arb_profile_update() -> impl Strategy<Value = ProfileUpdate> {
    (
        prop::option::of("[a-zA-Z ]{0,20}"),
        prop::option::of("[a-z ]{0,40}"),
        prop::option::of("https://[a-z]{1,10}\\.test/[a-z]{0,8}"),
    )
        .prop_map(|(full_name, bio, avatar_url)| ProfileUpdate {
            full_name,
            bio,
            avatar_url,
        })
}
