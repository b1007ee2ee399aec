//! Storage wrapper that fails on demand
//!
//! Used to check that transient storage errors reach the caller unchanged
//! and leave the stored rows untouched.

use amity_core::effects::{FriendshipStoreEffects, ProfileStoreEffects};
use amity_core::{
    AmityError, DeleteIntent, EdgeId, EdgeStatus, FriendshipEdge, NewEdge, Profile, ProfileId,
    ProfileUpdate, Result,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Store calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    /// `list_profiles`
    ListProfiles,
    /// `list_edges`
    ListEdges,
    /// `insert_edge`
    InsertEdge,
    /// `update_edge_status`
    UpdateEdgeStatus,
    /// `delete_edge`
    DeleteEdge,
    /// `get_profile` and `update_profile`
    Profile,
}

/// Wraps a store and returns `TransientIo` from armed calls.
#[derive(Debug, Clone)]
pub struct FaultInjectingStore<S> {
    inner: S,
    armed: Arc<Mutex<HashSet<FaultPoint>>>,
}

impl<S> FaultInjectingStore<S> {
    /// Wrap `inner` with no faults armed
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            armed: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Make every subsequent call at `point` fail
    pub fn fail(&self, point: FaultPoint) {
        self.armed.lock().unwrap().insert(point);
    }

    /// Disarm every fault
    pub fn heal(&self) {
        self.armed.lock().unwrap().clear();
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self, point: FaultPoint) -> Result<()> {
        if self.armed.lock().unwrap().contains(&point) {
            tracing::debug!(?point, "Injecting storage fault");
            return Err(AmityError::transient_io(format!(
                "injected fault at {point:?}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: FriendshipStoreEffects> FriendshipStoreEffects for FaultInjectingStore<S> {
    async fn list_profiles(&self, excluding: ProfileId) -> Result<Vec<Profile>> {
        self.check(FaultPoint::ListProfiles)?;
        self.inner.list_profiles(excluding).await
    }

    async fn list_edges(&self, involving: ProfileId) -> Result<Vec<FriendshipEdge>> {
        self.check(FaultPoint::ListEdges)?;
        self.inner.list_edges(involving).await
    }

    async fn insert_edge(&self, caller: ProfileId, edge: NewEdge) -> Result<FriendshipEdge> {
        self.check(FaultPoint::InsertEdge)?;
        self.inner.insert_edge(caller, edge).await
    }

    async fn update_edge_status(
        &self,
        caller: ProfileId,
        edge_id: EdgeId,
        status: EdgeStatus,
    ) -> Result<FriendshipEdge> {
        self.check(FaultPoint::UpdateEdgeStatus)?;
        self.inner.update_edge_status(caller, edge_id, status).await
    }

    async fn delete_edge(
        &self,
        caller: ProfileId,
        edge_id: EdgeId,
        intent: DeleteIntent,
    ) -> Result<bool> {
        self.check(FaultPoint::DeleteEdge)?;
        self.inner.delete_edge(caller, edge_id, intent).await
    }
}

#[async_trait]
impl<S: ProfileStoreEffects> ProfileStoreEffects for FaultInjectingStore<S> {
    async fn get_profile(&self, id: ProfileId) -> Result<Option<Profile>> {
        self.check(FaultPoint::Profile)?;
        self.inner.get_profile(id).await
    }

    async fn update_profile(
        &self,
        caller: ProfileId,
        id: ProfileId,
        update: ProfileUpdate,
    ) -> Result<Profile> {
        self.check(FaultPoint::Profile)?;
        self.inner.update_profile(caller, id, update).await
    }
}
