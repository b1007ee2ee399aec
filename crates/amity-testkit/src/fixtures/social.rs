//! Social Graph Test Fixtures
//!
//! Helpers for building profiles, edges and whole populated stores with
//! deterministic ids and timestamps.

use crate::random::SeededRandom;
use crate::time::{DeterministicClock, TEST_EPOCH_MS};
use amity_core::{EdgeId, EdgeStatus, FriendshipEdge, PhysicalTime, Profile, ProfileId};
use amity_effects::MemoryFriendshipStore;
use std::sync::Arc;
use uuid::Uuid;

/// Create a test timestamp for fixtures.
pub fn test_timestamp() -> PhysicalTime {
    PhysicalTime::from_ms(TEST_EPOCH_MS)
}

/// Create a test profile ID with a given seed.
pub fn test_profile_id(seed: u8) -> ProfileId {
    ProfileId::new_from_entropy([seed; 32])
}

/// Create a test edge ID with a given seed.
pub fn test_edge_id(seed: u8) -> EdgeId {
    EdgeId::from_uuid(Uuid::from_u128(0xED6E_0000 + u128::from(seed)))
}

/// Create a test profile named `user{seed}`.
pub fn test_profile(seed: u8) -> Profile {
    Profile::new(test_profile_id(seed), format!("user{seed}"), test_timestamp())
}

/// Create an edge from `from` to `to` between seeded profiles.
///
/// # Arguments
/// * `edge_seed` - Seed for the edge ID
/// * `from` - Seed of the initiator
/// * `to` - Seed of the recipient
/// * `status` - Stored status
pub fn test_edge(edge_seed: u8, from: u8, to: u8, status: EdgeStatus) -> FriendshipEdge {
    FriendshipEdge {
        id: test_edge_id(edge_seed),
        user_id: test_profile_id(from),
        friend_id: test_profile_id(to),
        status,
        created_at: test_timestamp(),
        updated_at: test_timestamp(),
    }
}

/// A shared in-memory store populated with named users.
///
/// Every handle to the store sees the same rows, so one `TestNetwork` can
/// stand in for several clients talking to the same backend.
#[derive(Debug, Clone)]
pub struct TestNetwork {
    store: MemoryFriendshipStore,
    clock: DeterministicClock,
    users: Vec<(String, ProfileId)>,
}

impl Default for TestNetwork {
    fn default() -> Self {
        Self::new(42)
    }
}

impl TestNetwork {
    /// Empty network with deterministic ids derived from `seed`
    pub fn new(seed: u64) -> Self {
        let clock = DeterministicClock::default();
        let store = MemoryFriendshipStore::with_effects(
            Arc::new(clock.clone()),
            Arc::new(SeededRandom::new(seed)),
        );
        Self {
            store,
            clock,
            users: Vec::new(),
        }
    }

    /// Network with one profile per name, provisioned in order
    pub async fn with_users(names: &[&str]) -> Self {
        let mut network = Self::default();
        for name in names {
            network.add_user(name).await;
        }
        network
    }

    /// Provision another profile
    pub async fn add_user(&mut self, name: &str) -> ProfileId {
        let profile = self
            .store
            .provision_profile(name)
            .await
            .expect("provision test profile");
        self.users.push((name.to_string(), profile.id));
        profile.id
    }

    /// Id of a named user
    ///
    /// # Panics
    /// If no user with that name was added.
    pub fn id(&self, name: &str) -> ProfileId {
        self.users
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
            .unwrap_or_else(|| panic!("unknown test user {name}"))
    }

    /// Ids of every user in provisioning order
    pub fn ids(&self) -> Vec<ProfileId> {
        self.users.iter().map(|(_, id)| *id).collect()
    }

    /// The shared store
    pub fn store(&self) -> &MemoryFriendshipStore {
        &self.store
    }

    /// The store's clock
    pub fn clock(&self) -> &DeterministicClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amity_core::effects::FriendshipStoreEffects;

    #[tokio::test]
    async fn test_network_users_in_order() {
        let network = TestNetwork::with_users(&["alice", "bob", "carol"]).await;
        let others = network
            .store()
            .list_profiles(network.id("alice"))
            .await
            .unwrap();
        let names: Vec<_> = others.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "carol"]);
        assert_eq!(network.ids().len(), 3);
    }

    #[tokio::test]
    async fn test_same_seed_same_ids() {
        let a = TestNetwork::with_users(&["alice"]).await;
        let b = TestNetwork::with_users(&["alice"]).await;
        assert_eq!(a.id("alice"), b.id("alice"));
    }

    #[test]
    fn test_edge_fixture() {
        let edge = test_edge(1, 2, 3, EdgeStatus::Pending);
        assert_eq!(edge.user_id, test_profile_id(2));
        assert_eq!(edge.friend_id, test_profile_id(3));
        assert_ne!(test_profile_id(2), test_profile_id(3));
    }
}
