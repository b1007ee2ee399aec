//! Storage collaborator effects
//!
//! The hosted backend the client talks to. Implementations are the
//! authority on the invariants the UI cannot guarantee:
//!
//! - pair-uniqueness of edges (at most one edge per unordered pair),
//! - the access policy (only endpoints may touch an edge, only the
//!   recipient may accept, only the owner may edit a profile),
//! - `rejected` is never written.
//!
//! Reads are scoped to a viewer. Mutations take the acting profile as
//! `caller` so the policy can be evaluated in the store, not in the UI.

use crate::errors::Result;
use crate::identifiers::{EdgeId, ProfileId};
use crate::types::{DeleteIntent, EdgeStatus, FriendshipEdge, NewEdge, Profile, ProfileUpdate};
use async_trait::async_trait;

/// Friendship edge storage and the profile directory.
#[async_trait]
pub trait FriendshipStoreEffects: Send + Sync {
    /// All profiles except `excluding`, in provisioning order.
    async fn list_profiles(&self, excluding: ProfileId) -> Result<Vec<Profile>>;

    /// All edges where `involving` is the initiator or the recipient.
    async fn list_edges(&self, involving: ProfileId) -> Result<Vec<FriendshipEdge>>;

    /// Create an edge.
    ///
    /// # Errors
    /// * `ConstraintViolation` if an active edge already links the pair
    /// * `Forbidden` if `caller` is not the initiator
    /// * `Invalid` for self-edges or a non-pending initial status
    async fn insert_edge(&self, caller: ProfileId, edge: NewEdge) -> Result<FriendshipEdge>;

    /// Change the status of an edge and bump `updated_at`.
    ///
    /// # Errors
    /// * `NotFound` if the edge does not exist
    /// * `Forbidden` if `caller` may not perform the transition
    /// * `Invalid` for transitions outside `pending -> accepted`
    async fn update_edge_status(
        &self,
        caller: ProfileId,
        edge_id: EdgeId,
        status: EdgeStatus,
    ) -> Result<FriendshipEdge>;

    /// Delete an edge for the given reason. Returns `false` when no row was
    /// affected.
    ///
    /// The intent is checked against the stored edge atomically with the
    /// removal.
    ///
    /// # Errors
    /// * `Forbidden` if `caller` is not an endpoint, or is the wrong endpoint
    ///   for `intent`
    /// * `Invalid` if the edge's status does not match `intent`
    async fn delete_edge(
        &self,
        caller: ProfileId,
        edge_id: EdgeId,
        intent: DeleteIntent,
    ) -> Result<bool>;
}

/// Profile reads and owner edits.
#[async_trait]
pub trait ProfileStoreEffects: Send + Sync {
    /// Look up a single profile.
    async fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>>;

    /// Apply an owner edit and return the stored result.
    ///
    /// # Errors
    /// * `NotFound` if the profile does not exist
    /// * `Forbidden` if `caller` is not `id`
    async fn update_profile(
        &self,
        caller: ProfileId,
        id: ProfileId,
        update: ProfileUpdate,
    ) -> Result<Profile>;
}
