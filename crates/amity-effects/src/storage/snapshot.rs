//! JSON snapshots of the store's rows

use amity_core::{AmityError, EdgePair, FriendshipEdge, Profile, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Snapshot format version written by this crate
pub const SNAPSHOT_VERSION: u32 = 1;

/// Point-in-time copy of every profile and edge in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Format version
    pub version: u32,
    /// Profiles in provisioning order
    pub profiles: Vec<Profile>,
    /// Edges in insertion order
    pub edges: Vec<FriendshipEdge>,
}

impl StoreSnapshot {
    /// Build a snapshot of the given rows at the current format version
    pub fn new(profiles: Vec<Profile>, edges: Vec<FriendshipEdge>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            profiles,
            edges,
        }
    }

    /// Check the invariants a store relies on before accepting these rows.
    ///
    /// # Errors
    /// * `Invalid` for an unknown version, self-edges or dangling endpoints
    /// * `ConstraintViolation` for duplicate ids, usernames or active pairs
    pub fn validate(&self) -> Result<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(AmityError::invalid(format!(
                "unsupported snapshot version {}",
                self.version
            )));
        }

        let mut ids = HashSet::new();
        let mut usernames = HashSet::new();
        for profile in &self.profiles {
            if !ids.insert(profile.id) {
                return Err(AmityError::constraint_violation(format!(
                    "duplicate profile {}",
                    profile.id
                )));
            }
            if !usernames.insert(profile.username.as_str()) {
                return Err(AmityError::constraint_violation(format!(
                    "duplicate username {}",
                    profile.username
                )));
            }
        }

        let mut edge_ids = HashSet::new();
        let mut pairs: HashSet<EdgePair> = HashSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id) {
                return Err(AmityError::constraint_violation(format!(
                    "duplicate edge {}",
                    edge.id
                )));
            }
            if edge.user_id == edge.friend_id {
                return Err(AmityError::invalid(format!("{} is a self-edge", edge.id)));
            }
            if !ids.contains(&edge.user_id) || !ids.contains(&edge.friend_id) {
                return Err(AmityError::invalid(format!(
                    "{} references an unknown profile",
                    edge.id
                )));
            }
            if !pairs.insert(edge.pair()) {
                return Err(AmityError::constraint_violation(format!(
                    "{} duplicates an existing pair",
                    edge.id
                )));
            }
        }
        Ok(())
    }

    /// Write the snapshot as pretty-printed JSON
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    /// Read and validate a snapshot
    pub async fn read_from(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path).await?;
        let snapshot: Self = serde_json::from_slice(&data)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
