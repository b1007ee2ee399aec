//! Friendship Service - request, accept, reject, cancel and remove
//!
//! The service follows the per-call effects pattern: each method takes the
//! storage collaborator by reference instead of owning it. It holds no
//! durable state; after every successful mutation it re-fetches profiles and
//! edges and returns a freshly derived `FriendshipView`.

use crate::relationship::Relationship;
use crate::resolver::Resolver;
use crate::view::FriendshipView;
use amity_core::{
    effects::FriendshipStoreEffects, AmityError, DeleteIntent, EdgeId, EdgeStatus,
    FriendshipConfig, NewEdge, ProfileId, Result,
};

/// Request to end an accepted friendship.
///
/// Built by the caller once the user has confirmed the removal. An
/// unconfirmed value is refused when `require_removal_confirmation` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalConfirmation {
    edge_id: EdgeId,
    confirmed: bool,
}

impl RemovalConfirmation {
    /// The user confirmed removing the friendship backed by `edge_id`
    pub fn confirmed(edge_id: EdgeId) -> Self {
        Self {
            edge_id,
            confirmed: true,
        }
    }

    /// Removal requested without a confirmation step
    pub fn unconfirmed(edge_id: EdgeId) -> Self {
        Self {
            edge_id,
            confirmed: false,
        }
    }

    /// Edge to delete
    pub fn edge_id(&self) -> EdgeId {
        self.edge_id
    }

    /// Whether the user confirmed
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }
}

/// Friendship operations on behalf of one signed-in profile.
///
/// # Example
///
/// ```ignore
/// let service = FriendshipService::new(alice, FriendshipConfig::default());
/// let view = service.send_request(&store, bob).await?;
/// assert_eq!(view.relationship_of(&bob), Some(Relationship::OutgoingPending));
/// ```
#[derive(Debug, Clone)]
pub struct FriendshipService {
    self_id: ProfileId,
    config: FriendshipConfig,
}

impl FriendshipService {
    /// Create a service acting as `self_id`
    pub fn new(self_id: ProfileId, config: FriendshipConfig) -> Self {
        Self { self_id, config }
    }

    /// Profile this service acts as
    pub fn self_id(&self) -> ProfileId {
        self.self_id
    }

    /// Active configuration
    pub fn config(&self) -> &FriendshipConfig {
        &self.config
    }

    /// Fetch profiles and edges concurrently and wrap them in a resolver.
    pub async fn resolver<E>(&self, effects: &E) -> Result<Resolver>
    where
        E: FriendshipStoreEffects + ?Sized,
    {
        let (profiles, edges) = futures::try_join!(
            effects.list_profiles(self.self_id),
            effects.list_edges(self.self_id)
        )?;
        tracing::trace!(
            self_id = %self.self_id,
            profiles = profiles.len(),
            edges = edges.len(),
            "Fetched friendship data"
        );
        Ok(Resolver::new(self.self_id, profiles, edges))
    }

    /// Re-fetch everything and derive the current view.
    pub async fn refresh<E>(&self, effects: &E) -> Result<FriendshipView>
    where
        E: FriendshipStoreEffects + ?Sized,
    {
        Ok(self.resolver(effects).await?.view(self.config.suggestion_limit))
    }

    /// Current relationship with a single profile
    pub async fn relationship_with<E>(&self, effects: &E, other: ProfileId) -> Result<Relationship>
    where
        E: FriendshipStoreEffects + ?Sized,
    {
        Ok(self.resolver(effects).await?.classify(&other))
    }

    /// Send a friend request to `target`.
    ///
    /// # Arguments
    /// * `effects` - Storage collaborator
    /// * `target` - Profile to befriend
    ///
    /// # Errors
    /// * `Invalid` if `target` is the caller
    /// * `ConstraintViolation` if an edge already links the pair in either direction
    /// * `NotFound` if `target` does not exist
    pub async fn send_request<E>(&self, effects: &E, target: ProfileId) -> Result<FriendshipView>
    where
        E: FriendshipStoreEffects + ?Sized,
    {
        if target == self.self_id {
            return Err(AmityError::invalid("cannot send a friend request to yourself"));
        }

        let edge = effects
            .insert_edge(self.self_id, NewEdge::request(self.self_id, target))
            .await?;
        tracing::info!(self_id = %self.self_id, %target, edge_id = %edge.id, "Friend request sent");

        self.refresh(effects).await
    }

    /// Accept an incoming request.
    ///
    /// Accepting an edge that is already accepted is a no-op success.
    ///
    /// # Errors
    /// * `NotFound` if the edge does not exist
    /// * `Forbidden` if the caller is not the recipient
    pub async fn accept_request<E>(&self, effects: &E, edge_id: EdgeId) -> Result<FriendshipView>
    where
        E: FriendshipStoreEffects + ?Sized,
    {
        let edge = effects
            .update_edge_status(self.self_id, edge_id, EdgeStatus::Accepted)
            .await?;
        tracing::info!(
            self_id = %self.self_id,
            %edge_id,
            friend = %edge.user_id,
            "Friend request accepted"
        );

        self.refresh(effects).await
    }

    /// Decline an incoming request by deleting its edge.
    ///
    /// A missing edge counts as success.
    ///
    /// # Errors
    /// * `Forbidden` if the caller is not the recipient
    /// * `Invalid` if the edge is an accepted friendship
    pub async fn reject_request<E>(&self, effects: &E, edge_id: EdgeId) -> Result<FriendshipView>
    where
        E: FriendshipStoreEffects + ?Sized,
    {
        self.release(effects, edge_id, DeleteIntent::Reject).await
    }

    /// Withdraw an outgoing request by deleting its edge.
    ///
    /// # Errors
    /// * `Forbidden` if the caller is not the sender
    /// * `Invalid` if the edge is an accepted friendship
    pub async fn cancel_request<E>(&self, effects: &E, edge_id: EdgeId) -> Result<FriendshipView>
    where
        E: FriendshipStoreEffects + ?Sized,
    {
        self.release(effects, edge_id, DeleteIntent::Cancel).await
    }

    /// End an accepted friendship.
    ///
    /// # Errors
    /// * `Invalid` if the removal is unconfirmed while confirmation is required
    /// * `Invalid` if the edge is still pending
    /// * `Forbidden` if the caller is not an endpoint
    pub async fn remove_friend<E>(
        &self,
        effects: &E,
        removal: RemovalConfirmation,
    ) -> Result<FriendshipView>
    where
        E: FriendshipStoreEffects + ?Sized,
    {
        if self.config.require_removal_confirmation && !removal.is_confirmed() {
            return Err(AmityError::invalid(format!(
                "removing {} requires confirmation",
                removal.edge_id()
            )));
        }
        self.release(effects, removal.edge_id(), DeleteIntent::Remove)
            .await
    }

    /// Delete an edge, letting the store check `intent` against the row it
    /// finds under its write lock.
    async fn release<E>(
        &self,
        effects: &E,
        edge_id: EdgeId,
        intent: DeleteIntent,
    ) -> Result<FriendshipView>
    where
        E: FriendshipStoreEffects + ?Sized,
    {
        let deleted = match effects.delete_edge(self.self_id, edge_id, intent).await {
            Ok(deleted) => deleted,
            Err(err) if err.is_not_found() => false,
            Err(err) => return Err(err),
        };
        if deleted {
            tracing::info!(self_id = %self.self_id, %edge_id, operation = %intent, "Friendship edge deleted");
        } else {
            tracing::debug!(self_id = %self.self_id, %edge_id, operation = %intent, "Edge already gone");
        }

        self.refresh(effects).await
    }
}
