//! In-memory storage collaborator
//!
//! All mutations take the write half of one `RwLock`, so the
//! pair-uniqueness check and the insert it guards happen atomically. Two
//! clients requesting each other at the same instant therefore produce one
//! edge and one `ConstraintViolation`.

use super::snapshot::StoreSnapshot;
use crate::access_control::{EdgeAccessPolicy, EdgeOperation};
use crate::{PhysicalTimeHandler, RealRandomHandler};
use amity_core::effects::{
    FriendshipStoreEffects, PhysicalTimeEffects, ProfileStoreEffects, RandomEffects,
};
use amity_core::{
    AmityError, DeleteIntent, EdgeId, EdgePair, EdgeStatus, FriendshipEdge, NewEdge, Profile, ProfileId,
    ProfileUpdate, Result,
};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoreState {
    profiles: IndexMap<ProfileId, Profile>,
    edges: IndexMap<EdgeId, FriendshipEdge>,
    pairs: HashMap<EdgePair, EdgeId>,
}

impl StoreState {
    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut state = Self::default();
        for profile in snapshot.profiles {
            state.profiles.insert(profile.id, profile);
        }
        for edge in snapshot.edges {
            state.pairs.insert(edge.pair(), edge.id);
            state.edges.insert(edge.id, edge);
        }
        state
    }

    fn to_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::new(
            self.profiles.values().cloned().collect(),
            self.edges.values().cloned().collect(),
        )
    }

    fn remove_edge(&mut self, edge_id: &EdgeId) -> Option<FriendshipEdge> {
        let edge = self.edges.shift_remove(edge_id)?;
        self.pairs.remove(&edge.pair());
        Some(edge)
    }
}

/// Shared in-memory backend for profiles and friendship edges.
///
/// Cloning yields another handle to the same rows, which is how tests model
/// several clients talking to one backend.
#[derive(Clone)]
pub struct MemoryFriendshipStore {
    state: Arc<RwLock<StoreState>>,
    policy: EdgeAccessPolicy,
    time: Arc<dyn PhysicalTimeEffects>,
    random: Arc<dyn RandomEffects>,
}

impl std::fmt::Debug for MemoryFriendshipStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryFriendshipStore")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for MemoryFriendshipStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFriendshipStore {
    /// Create an empty store using the system clock and OS randomness
    pub fn new() -> Self {
        Self::with_effects(
            Arc::new(PhysicalTimeHandler::new()),
            Arc::new(RealRandomHandler::new()),
        )
    }

    /// Create an empty store with caller-supplied clock and randomness
    pub fn with_effects(
        time: Arc<dyn PhysicalTimeEffects>,
        random: Arc<dyn RandomEffects>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            policy: EdgeAccessPolicy::new(),
            time,
            random,
        }
    }

    /// Provision a new profile with a fresh id.
    ///
    /// Stands in for account sign-up, which is outside the resolver.
    ///
    /// # Errors
    /// * `ConstraintViolation` if the username is taken
    /// * `Invalid` if the username is blank
    pub async fn provision_profile(&self, username: &str) -> Result<Profile> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AmityError::invalid("username cannot be empty"));
        }
        let id = ProfileId::from_uuid(self.random.random_uuid().await);
        let now = self.time.physical_time().await?;
        let profile = Profile::new(id, username, now);
        self.insert_profile(profile.clone()).await?;
        Ok(profile)
    }

    /// Insert a fully formed profile row.
    ///
    /// # Errors
    /// * `ConstraintViolation` if the id or username already exists
    pub async fn insert_profile(&self, profile: Profile) -> Result<()> {
        let mut state = self.state.write().await;
        if state.profiles.contains_key(&profile.id) {
            return Err(AmityError::constraint_violation(format!(
                "profile {} already exists",
                profile.id
            )));
        }
        if state
            .profiles
            .values()
            .any(|existing| existing.username == profile.username)
        {
            return Err(AmityError::constraint_violation(format!(
                "username {} is taken",
                profile.username
            )));
        }
        tracing::debug!(profile_id = %profile.id, username = %profile.username, "Profile provisioned");
        state.profiles.insert(profile.id, profile);
        Ok(())
    }

    /// Look up a single edge regardless of viewer.
    pub async fn get_edge(&self, edge_id: EdgeId) -> Option<FriendshipEdge> {
        self.state.read().await.edges.get(&edge_id).cloned()
    }

    /// Number of stored edges
    pub async fn edge_count(&self) -> usize {
        self.state.read().await.edges.len()
    }

    /// Copy every row into a snapshot
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.to_snapshot()
    }

    /// Replace every row with the contents of a validated snapshot
    pub async fn restore(&self, snapshot: StoreSnapshot) -> Result<()> {
        snapshot.validate()?;
        let mut state = self.state.write().await;
        *state = StoreState::from_snapshot(snapshot);
        tracing::info!(
            profiles = state.profiles.len(),
            edges = state.edges.len(),
            "Store restored from snapshot"
        );
        Ok(())
    }

    /// Write all rows to `path` as JSON
    pub async fn save_snapshot(&self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot().await;
        snapshot.write_to(path).await?;
        tracing::info!(path = %path.display(), "Store snapshot saved");
        Ok(())
    }

    /// Replace all rows with the snapshot stored at `path`
    pub async fn load_snapshot(&self, path: &Path) -> Result<()> {
        let snapshot = StoreSnapshot::read_from(path).await?;
        self.restore(snapshot).await
    }
}

#[async_trait]
impl FriendshipStoreEffects for MemoryFriendshipStore {
    async fn list_profiles(&self, excluding: ProfileId) -> Result<Vec<Profile>> {
        let state = self.state.read().await;
        Ok(state
            .profiles
            .values()
            .filter(|p| p.id != excluding)
            .cloned()
            .collect())
    }

    async fn list_edges(&self, involving: ProfileId) -> Result<Vec<FriendshipEdge>> {
        let state = self.state.read().await;
        Ok(state
            .edges
            .values()
            .filter(|e| e.involves(&involving))
            .cloned()
            .collect())
    }

    async fn insert_edge(&self, caller: ProfileId, edge: NewEdge) -> Result<FriendshipEdge> {
        self.policy.check_insert(caller, &edge).into_result()?;

        let id = EdgeId::from_uuid(self.random.random_uuid().await);
        let now = self.time.physical_time().await?;

        let mut state = self.state.write().await;
        for endpoint in [edge.user_id, edge.friend_id] {
            if !state.profiles.contains_key(&endpoint) {
                return Err(AmityError::not_found(format!("profile {endpoint}")));
            }
        }

        let pair = edge.pair();
        if let Some(existing_id) = state.pairs.get(&pair).copied() {
            let active = state
                .edges
                .get(&existing_id)
                .map(|e| e.status.is_active())
                .unwrap_or(false);
            if active {
                tracing::warn!(
                    %caller,
                    user_id = %edge.user_id,
                    friend_id = %edge.friend_id,
                    existing = %existing_id,
                    "Duplicate friendship edge refused"
                );
                return Err(AmityError::constraint_violation(format!(
                    "an edge already links {} and {}",
                    edge.user_id, edge.friend_id
                )));
            }
            // stale rejected row from an older writer gives way to the new request
            state.remove_edge(&existing_id);
        }

        let stored = FriendshipEdge {
            id,
            user_id: edge.user_id,
            friend_id: edge.friend_id,
            status: edge.status,
            created_at: now,
            updated_at: now,
        };
        state.pairs.insert(pair, id);
        state.edges.insert(id, stored.clone());
        tracing::info!(edge_id = %id, user_id = %stored.user_id, friend_id = %stored.friend_id, "Friend request stored");
        Ok(stored)
    }

    async fn update_edge_status(
        &self,
        caller: ProfileId,
        edge_id: EdgeId,
        status: EdgeStatus,
    ) -> Result<FriendshipEdge> {
        let now = self.time.physical_time().await?;

        let mut state = self.state.write().await;
        let edge = state
            .edges
            .get_mut(&edge_id)
            .ok_or_else(|| AmityError::not_found(format!("friendship {edge_id}")))?;

        self.policy
            .check_edge(caller, edge, EdgeOperation::UpdateStatus { to: status })
            .into_result()?;

        if edge.status != status {
            edge.status = status;
            edge.updated_at = now;
            tracing::info!(%edge_id, %status, "Friendship status updated");
        }
        Ok(edge.clone())
    }

    async fn delete_edge(
        &self,
        caller: ProfileId,
        edge_id: EdgeId,
        intent: DeleteIntent,
    ) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(edge) = state.edges.get(&edge_id) else {
            tracing::debug!(%caller, %edge_id, %intent, "Delete matched no rows");
            return Ok(false);
        };

        // status and endpoint are checked under the same lock as the removal
        self.policy
            .check_edge(caller, edge, EdgeOperation::Delete { intent })
            .into_result()?;

        state.remove_edge(&edge_id);
        tracing::info!(%caller, %edge_id, %intent, "Friendship deleted");
        Ok(true)
    }
}

#[async_trait]
impl ProfileStoreEffects for MemoryFriendshipStore {
    async fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>> {
        Ok(self.state.read().await.profiles.get(&id).cloned())
    }

    async fn update_profile(
        &self,
        caller: ProfileId,
        id: ProfileId,
        update: ProfileUpdate,
    ) -> Result<Profile> {
        let now = self.time.physical_time().await?;

        let mut state = self.state.write().await;
        let profile = state
            .profiles
            .get_mut(&id)
            .ok_or_else(|| AmityError::not_found(format!("profile {id}")))?;

        self.policy.check_profile_update(caller, id).into_result()?;

        profile.apply_update(&update, now);
        Ok(profile.clone())
    }
}
