//! Integration Tests for the Friendship Resolver
//!
//! Drives the services against the shared in-memory store:
//! - request, accept, reject, cancel and remove lifecycles
//! - access policy enforcement for endpoints and third parties
//! - store atomicity under concurrent mutual requests
//! - transient storage faults
//! - profile edits and snapshot restore

use amity_core::effects::FriendshipStoreEffects;
use amity_core::{
    AmityConfig, AmityError, DeleteIntent, EdgeId, EdgeStatus, FriendshipConfig, FriendshipEdge,
    NewEdge, Profile, ProfileId, ProfileUpdate, Result,
};
use amity_effects::MemoryFriendshipStore;
use amity_social::{
    FriendshipService, ProfileService, Relationship, RemovalConfirmation, Session,
};
use amity_testkit::{
    assert_relationship, assert_unlinked, init_test_tracing, FaultInjectingStore, FaultPoint,
    TestNetwork,
};
use async_trait::async_trait;

// ============================================================================
// Test Helpers
// ============================================================================

fn service(network: &TestNetwork, name: &str) -> FriendshipService {
    FriendshipService::new(network.id(name), FriendshipConfig::default())
}

async fn network() -> TestNetwork {
    init_test_tracing();
    TestNetwork::with_users(&["alice", "bob", "carol"]).await
}

/// Store that lets `recipient` accept the edge just before any delete lands
struct AcceptBeforeDelete {
    inner: MemoryFriendshipStore,
    recipient: ProfileId,
}

#[async_trait]
impl FriendshipStoreEffects for AcceptBeforeDelete {
    async fn list_profiles(&self, excluding: ProfileId) -> Result<Vec<Profile>> {
        self.inner.list_profiles(excluding).await
    }

    async fn list_edges(&self, involving: ProfileId) -> Result<Vec<FriendshipEdge>> {
        self.inner.list_edges(involving).await
    }

    async fn insert_edge(&self, caller: ProfileId, edge: NewEdge) -> Result<FriendshipEdge> {
        self.inner.insert_edge(caller, edge).await
    }

    async fn update_edge_status(
        &self,
        caller: ProfileId,
        edge_id: EdgeId,
        status: EdgeStatus,
    ) -> Result<FriendshipEdge> {
        self.inner.update_edge_status(caller, edge_id, status).await
    }

    async fn delete_edge(
        &self,
        caller: ProfileId,
        edge_id: EdgeId,
        intent: DeleteIntent,
    ) -> Result<bool> {
        self.inner
            .update_edge_status(self.recipient, edge_id, EdgeStatus::Accepted)
            .await?;
        self.inner.delete_edge(caller, edge_id, intent).await
    }
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn test_fresh_network_is_all_suggestions() {
    let network = network().await;
    let view = service(&network, "alice")
        .refresh(network.store())
        .await
        .unwrap();

    assert_eq!(view.suggestions.len(), 2);
    assert!(view.incoming.is_empty() && view.outgoing.is_empty() && view.friends.is_empty());
    assert_relationship!(view, network.id("bob"), Relationship::None);
    assert_unlinked!(view, network.id("bob"));
}

#[tokio::test]
async fn test_send_request_classifies_both_sides() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));

    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    assert_relationship!(view, bob.self_id(), Relationship::OutgoingPending);
    assert!(view.edge_id_for(&bob.self_id()).is_some());

    let bob_view = bob.refresh(network.store()).await.unwrap();
    assert_relationship!(bob_view, alice.self_id(), Relationship::IncomingPending);
    assert_eq!(bob_view.incoming.len(), 1);
    assert_relationship!(bob_view, network.id("carol"), Relationship::None);
}

#[tokio::test]
async fn test_self_request_is_invalid() {
    let network = network().await;
    let alice = service(&network, "alice");

    let err = alice
        .send_request(network.store(), alice.self_id())
        .await
        .unwrap_err();
    assert!(matches!(err, AmityError::Invalid { .. }));
    assert_eq!(network.store().edge_count().await, 0);
}

#[tokio::test]
async fn test_duplicate_request_either_direction() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    alice.send_request(network.store(), bob.self_id()).await.unwrap();

    let again = alice.send_request(network.store(), bob.self_id()).await;
    assert!(matches!(again, Err(AmityError::ConstraintViolation { .. })));

    let reverse = bob.send_request(network.store(), alice.self_id()).await;
    assert!(matches!(reverse, Err(AmityError::ConstraintViolation { .. })));
    assert_eq!(network.store().edge_count().await, 1);
}

// ============================================================================
// Accept
// ============================================================================

#[tokio::test]
async fn test_accept_by_recipient() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    let bob_view = bob.accept_request(network.store(), edge_id).await.unwrap();
    assert_relationship!(bob_view, alice.self_id(), Relationship::Accepted);
    assert_eq!(bob_view.friend_count(), 1);

    let alice_view = alice.refresh(network.store()).await.unwrap();
    assert_relationship!(alice_view, bob.self_id(), Relationship::Accepted);

    // accepting again is a no-op
    let again = bob.accept_request(network.store(), edge_id).await.unwrap();
    assert_eq!(again.friend_count(), 1);
}

#[tokio::test]
async fn test_accept_bumps_updated_at_once() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    network.clock().advance(60_000);
    bob.accept_request(network.store(), edge_id).await.unwrap();
    let accepted = network.store().get_edge(edge_id).await.unwrap();
    assert!(accepted.updated_at.ts_ms > accepted.created_at.ts_ms);
    assert!(accepted.updated_at.ts_ms >= accepted.created_at.ts_ms + 60_000);
    assert!(accepted.updated_at.ts_ms < network.clock().peek());

    network.clock().advance(60_000);
    bob.accept_request(network.store(), edge_id).await.unwrap();
    let again = network.store().get_edge(edge_id).await.unwrap();
    assert_eq!(again.updated_at, accepted.updated_at);
    assert_eq!(again.created_at, accepted.created_at);
}

#[tokio::test]
async fn test_accept_by_initiator_is_forbidden() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    let err = alice
        .accept_request(network.store(), edge_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AmityError::Forbidden { .. }));

    let edge = network.store().get_edge(edge_id).await.unwrap();
    assert_eq!(edge.status, EdgeStatus::Pending);
    let view = alice.refresh(network.store()).await.unwrap();
    assert_relationship!(view, bob.self_id(), Relationship::OutgoingPending);
}

#[tokio::test]
async fn test_accept_missing_edge_is_not_found() {
    let network = network().await;
    let alice = service(&network, "alice");
    let err = alice
        .accept_request(network.store(), amity_testkit::test_edge_id(9))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Reject, cancel and remove
// ============================================================================

#[tokio::test]
async fn test_reject_is_idempotent() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    let first = bob.reject_request(network.store(), edge_id).await.unwrap();
    assert_relationship!(first, alice.self_id(), Relationship::None);
    let second = bob.reject_request(network.store(), edge_id).await.unwrap();
    assert_relationship!(second, alice.self_id(), Relationship::None);
    assert_eq!(network.store().edge_count().await, 0);
}

#[tokio::test]
async fn test_reject_own_request_is_forbidden() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    let err = alice
        .reject_request(network.store(), edge_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AmityError::Forbidden { .. }));
    assert_eq!(network.store().edge_count().await, 1);
}

#[tokio::test]
async fn test_cancel_outgoing_request() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    let err = bob
        .cancel_request(network.store(), edge_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AmityError::Forbidden { .. }));

    let view = alice.cancel_request(network.store(), edge_id).await.unwrap();
    assert_relationship!(view, bob.self_id(), Relationship::None);
    let bob_view = bob.refresh(network.store()).await.unwrap();
    assert!(bob_view.incoming.is_empty());
}

#[tokio::test]
async fn test_reject_accepted_friendship_is_invalid() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();
    bob.accept_request(network.store(), edge_id).await.unwrap();

    let err = bob
        .reject_request(network.store(), edge_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AmityError::Invalid { .. }));

    let err = alice
        .cancel_request(network.store(), edge_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AmityError::Invalid { .. }));
    assert_eq!(network.store().edge_count().await, 1);
}

#[tokio::test]
async fn test_remove_friend_twice() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();
    bob.accept_request(network.store(), edge_id).await.unwrap();

    let first = bob
        .remove_friend(network.store(), RemovalConfirmation::confirmed(edge_id))
        .await
        .unwrap();
    assert_relationship!(first, alice.self_id(), Relationship::None);
    bob.remove_friend(network.store(), RemovalConfirmation::confirmed(edge_id))
        .await
        .unwrap();
    assert_eq!(network.store().edge_count().await, 0);
}

#[tokio::test]
async fn test_remove_requires_confirmation() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();
    bob.accept_request(network.store(), edge_id).await.unwrap();

    let err = alice
        .remove_friend(network.store(), RemovalConfirmation::unconfirmed(edge_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AmityError::Invalid { .. }));
    assert_eq!(network.store().edge_count().await, 1);

    let lenient = FriendshipService::new(
        alice.self_id(),
        FriendshipConfig {
            require_removal_confirmation: false,
            ..Default::default()
        },
    );
    lenient
        .remove_friend(network.store(), RemovalConfirmation::unconfirmed(edge_id))
        .await
        .unwrap();
    assert_eq!(network.store().edge_count().await, 0);
}

#[tokio::test]
async fn test_remove_pending_request_is_invalid() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    let err = bob
        .remove_friend(network.store(), RemovalConfirmation::confirmed(edge_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AmityError::Invalid { .. }));
}

#[tokio::test]
async fn test_third_party_cannot_touch_edge() {
    let network = network().await;
    let (alice, bob, carol) = (
        service(&network, "alice"),
        service(&network, "bob"),
        service(&network, "carol"),
    );
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    let accept = carol.accept_request(network.store(), edge_id).await;
    assert!(matches!(accept, Err(AmityError::Forbidden { .. })));

    let reject = carol.reject_request(network.store(), edge_id).await;
    assert!(matches!(reject, Err(AmityError::Forbidden { .. })));

    let remove = carol
        .remove_friend(network.store(), RemovalConfirmation::confirmed(edge_id))
        .await;
    assert!(matches!(remove, Err(AmityError::Forbidden { .. })));

    assert_eq!(network.store().edge_count().await, 1);
    let carol_view = carol.refresh(network.store()).await.unwrap();
    assert_relationship!(carol_view, alice.self_id(), Relationship::None);
    assert_relationship!(carol_view, bob.self_id(), Relationship::None);
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test]
async fn test_request_accept_remove_rerequest() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));

    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    assert_relationship!(view, bob.self_id(), Relationship::OutgoingPending);
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    let bob_view = bob.accept_request(network.store(), edge_id).await.unwrap();
    assert_relationship!(bob_view, alice.self_id(), Relationship::Accepted);

    let alice_view = alice
        .remove_friend(network.store(), RemovalConfirmation::confirmed(edge_id))
        .await
        .unwrap();
    assert_relationship!(alice_view, bob.self_id(), Relationship::None);
    let bob_view = bob.refresh(network.store()).await.unwrap();
    assert_relationship!(bob_view, alice.self_id(), Relationship::None);

    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    assert_relationship!(view, bob.self_id(), Relationship::OutgoingPending);
    assert_ne!(view.edge_id_for(&bob.self_id()), Some(edge_id));
}

#[tokio::test]
async fn test_request_reject_rerequest() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));

    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();
    bob.reject_request(network.store(), edge_id).await.unwrap();

    let alice_view = alice.refresh(network.store()).await.unwrap();
    assert_relationship!(alice_view, bob.self_id(), Relationship::None);

    alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let bob_view = bob.refresh(network.store()).await.unwrap();
    assert_relationship!(bob_view, alice.self_id(), Relationship::IncomingPending);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_mutual_requests() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let alice_store = network.store().clone();
    let bob_store = network.store().clone();

    let (from_alice, from_bob) = tokio::join!(
        alice.send_request(&alice_store, bob.self_id()),
        bob.send_request(&bob_store, alice.self_id())
    );

    let successes = [from_alice.is_ok(), from_bob.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(successes, 1);
    for result in [from_alice, from_bob] {
        if let Err(err) = result {
            assert!(matches!(err, AmityError::ConstraintViolation { .. }));
        }
    }
    assert_eq!(network.store().edge_count().await, 1);
}

#[tokio::test]
async fn test_cancel_racing_accept_does_not_unfriend() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    let racing = AcceptBeforeDelete {
        inner: network.store().clone(),
        recipient: bob.self_id(),
    };
    let err = alice.cancel_request(&racing, edge_id).await.unwrap_err();
    assert!(matches!(err, AmityError::Invalid { .. }));

    assert_eq!(network.store().edge_count().await, 1);
    let bob_view = bob.refresh(network.store()).await.unwrap();
    assert_relationship!(bob_view, alice.self_id(), Relationship::Accepted);
}

#[tokio::test]
async fn test_reject_racing_accept_does_not_unfriend() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    // a stale reject from a second client lands after the first accepted
    let racing = AcceptBeforeDelete {
        inner: network.store().clone(),
        recipient: bob.self_id(),
    };
    let err = bob.reject_request(&racing, edge_id).await.unwrap_err();
    assert!(matches!(err, AmityError::Invalid { .. }));

    let alice_view = alice.refresh(network.store()).await.unwrap();
    assert_relationship!(alice_view, bob.self_id(), Relationship::Accepted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_requests_across_threads() {
    let network = network().await;
    let alice = service(&network, "alice");
    let bob = service(&network, "bob");
    let (alice_id, bob_id) = (alice.self_id(), bob.self_id());
    let a_store = network.store().clone();
    let b_store = network.store().clone();

    let a = tokio::spawn(async move { alice.send_request(&a_store, bob_id).await.is_ok() });
    let b = tokio::spawn(async move { bob.send_request(&b_store, alice_id).await.is_ok() });
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    assert!(a ^ b);
    assert_eq!(network.store().edge_count().await, 1);
}

// ============================================================================
// Transient faults
// ============================================================================

#[tokio::test]
async fn test_transient_insert_failure_surfaces() {
    let network = network().await;
    let alice = service(&network, "alice");
    let store = FaultInjectingStore::new(network.store().clone());
    store.fail(FaultPoint::InsertEdge);

    let err = alice
        .send_request(&store, network.id("bob"))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(network.store().edge_count().await, 0);

    store.heal();
    let view = alice.send_request(&store, network.id("bob")).await.unwrap();
    assert_relationship!(view, network.id("bob"), Relationship::OutgoingPending);
}

#[tokio::test]
async fn test_transient_delete_failure_keeps_edge() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    let edge_id = view.edge_id_for(&bob.self_id()).unwrap();

    let store = FaultInjectingStore::new(network.store().clone());
    store.fail(FaultPoint::DeleteEdge);
    let err = bob.reject_request(&store, edge_id).await.unwrap_err();
    assert!(matches!(err, AmityError::TransientIo { .. }));
    assert!(network.store().get_edge(edge_id).await.is_some());
}

#[tokio::test]
async fn test_transient_read_failure_fails_refresh() {
    let network = network().await;
    let alice = service(&network, "alice");
    let store = FaultInjectingStore::new(network.store().clone());
    store.fail(FaultPoint::ListProfiles);

    let err = alice.refresh(&store).await.unwrap_err();
    assert!(err.is_retryable());
}

// ============================================================================
// Configuration, profiles and persistence
// ============================================================================

#[tokio::test]
async fn test_suggestion_limit() {
    let mut network = network().await;
    network.add_user("dave").await;
    let config = AmityConfig::from_toml_str("[social]\nsuggestion_limit = 2\n").unwrap();
    let session = Session::new(network.id("alice"), &config);

    let view = session.friendships().refresh(network.store()).await.unwrap();
    assert_eq!(view.suggestions.len(), 2);
    assert_eq!(view.suggestions_truncated, 1);
    assert_eq!(view.total(), 3);
}

#[tokio::test]
async fn test_profile_edit_through_session() {
    let network = network().await;
    let session = Session::new(network.id("alice"), &AmityConfig::default());

    let before = session.profiles().load_own(network.store()).await.unwrap();
    assert_eq!(before.display_name(), "alice");

    let after = session
        .profiles()
        .update_own(
            network.store(),
            ProfileUpdate {
                full_name: Some("  Alice Liddell ".to_string()),
                bio: Some("curiouser".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(after.full_name, "Alice Liddell");
    assert_eq!(after.display_name(), "Alice Liddell");
    assert_eq!(after.username, "alice");
    assert!(after.updated_at > before.updated_at);

    // other users see the edit on their next fetch
    let bob_view = service(&network, "bob")
        .refresh(network.store())
        .await
        .unwrap();
    let entry = bob_view.entry(&network.id("alice")).unwrap();
    assert_eq!(entry.profile.bio, "curiouser");
}

#[tokio::test]
async fn test_profile_limits_and_missing_profile() {
    let network = network().await;
    let profiles = ProfileService::new(network.id("alice"), Default::default());

    let err = profiles
        .update_own(
            network.store(),
            ProfileUpdate {
                bio: Some("x".repeat(501)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AmityError::Invalid { .. }));
    let unchanged = profiles.load_own(network.store()).await.unwrap();
    assert!(unchanged.bio.is_empty());

    let ghost = ProfileService::new(amity_testkit::test_profile_id(200), Default::default());
    assert!(ghost.load_own(network.store()).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_snapshot_restore_preserves_relationships() {
    let network = network().await;
    let (alice, bob) = (service(&network, "alice"), service(&network, "bob"));
    let view = alice.send_request(network.store(), bob.self_id()).await.unwrap();
    bob.accept_request(network.store(), view.edge_id_for(&bob.self_id()).unwrap())
        .await
        .unwrap();
    alice
        .send_request(network.store(), network.id("carol"))
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("amity.json");
    network.store().save_snapshot(&path).await.unwrap();

    let restored = MemoryFriendshipStore::new();
    restored.load_snapshot(&path).await.unwrap();

    let before = alice.refresh(network.store()).await.unwrap();
    let after = alice.refresh(&restored).await.unwrap();
    assert_eq!(before, after);
    assert_relationship!(after, bob.self_id(), Relationship::Accepted);
    assert_relationship!(after, network.id("carol"), Relationship::OutgoingPending);
    assert_eq!(
        restored.list_edges(bob.self_id()).await.unwrap().len(),
        1
    );
}
