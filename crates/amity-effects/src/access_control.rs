//! Edge and profile access policy
//!
//! The rules the storage collaborator enforces on every mutation:
//!
//! | Operation            | Allowed caller                     |
//! |----------------------|------------------------------------|
//! | insert edge          | the initiator (`user_id`)          |
//! | `pending -> accepted`| the recipient (`friend_id`) only   |
//! | reject (delete)      | the recipient, pending edges only  |
//! | cancel (delete)      | the initiator, pending edges only  |
//! | remove (delete)      | either endpoint, accepted edges    |
//! | update profile       | the profile owner                  |
//!
//! `rejected` is never written, self-edges are refused, and an accepted
//! edge cannot go back to pending.

use amity_core::{
    AmityError, DeleteIntent, EdgeStatus, FriendshipEdge, NewEdge, ProfileId, Result,
};
use std::fmt;

/// Mutations subject to the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOperation {
    /// Create a new edge
    Insert,
    /// Change the status of an existing edge
    UpdateStatus {
        /// Requested status
        to: EdgeStatus,
    },
    /// Delete an existing edge
    Delete {
        /// Reason for the delete
        intent: DeleteIntent,
    },
}

impl fmt::Display for EdgeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeOperation::Insert => write!(f, "insert"),
            EdgeOperation::UpdateStatus { to } => write!(f, "update_status({to})"),
            EdgeOperation::Delete { intent } => write!(f, "delete({intent})"),
        }
    }
}

/// Access control decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access granted
    Allow,
    /// Caller lacks permission
    Forbidden(String),
    /// Request is malformed regardless of caller
    Invalid(String),
}

impl AccessDecision {
    /// Whether the operation may proceed
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// Convert into the unified error type
    pub fn into_result(self) -> Result<()> {
        match self {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Forbidden(reason) => Err(AmityError::forbidden(reason)),
            AccessDecision::Invalid(reason) => Err(AmityError::invalid(reason)),
        }
    }
}

/// Stateless policy evaluator for friendship edges and profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeAccessPolicy;

impl EdgeAccessPolicy {
    /// Create the policy
    pub fn new() -> Self {
        Self
    }

    /// Evaluate an insert request.
    pub fn check_insert(&self, caller: ProfileId, edge: &NewEdge) -> AccessDecision {
        let decision = if edge.user_id == edge.friend_id {
            AccessDecision::Invalid("cannot befriend yourself".to_string())
        } else if caller != edge.user_id {
            AccessDecision::Forbidden(format!(
                "{caller} cannot create a request on behalf of {}",
                edge.user_id
            ))
        } else if edge.status != EdgeStatus::Pending {
            AccessDecision::Invalid(format!(
                "new edges start as pending, not {}",
                edge.status
            ))
        } else {
            AccessDecision::Allow
        };
        Self::trace(caller, EdgeOperation::Insert, &decision);
        decision
    }

    /// Evaluate an update or delete against an existing edge.
    pub fn check_edge(
        &self,
        caller: ProfileId,
        edge: &FriendshipEdge,
        operation: EdgeOperation,
    ) -> AccessDecision {
        let decision = if !edge.involves(&caller) {
            AccessDecision::Forbidden(format!("{caller} is not an endpoint of {}", edge.id))
        } else {
            match operation {
                EdgeOperation::Insert => {
                    AccessDecision::Invalid("insert does not apply to an existing edge".to_string())
                }
                EdgeOperation::Delete { intent } => Self::check_delete(caller, edge, intent),
                EdgeOperation::UpdateStatus { to } => Self::check_transition(caller, edge, to),
            }
        };
        Self::trace(caller, operation, &decision);
        decision
    }

    /// Evaluate an owner edit of a profile.
    pub fn check_profile_update(&self, caller: ProfileId, target: ProfileId) -> AccessDecision {
        if caller == target {
            tracing::debug!(%caller, "Profile update permitted");
            AccessDecision::Allow
        } else {
            tracing::warn!(%caller, %target, "Profile update denied - not the owner");
            AccessDecision::Forbidden(format!("{caller} cannot edit {target}"))
        }
    }

    fn check_transition(caller: ProfileId, edge: &FriendshipEdge, to: EdgeStatus) -> AccessDecision {
        match (edge.status, to) {
            (_, EdgeStatus::Rejected) => AccessDecision::Invalid(
                "rejected is never stored; delete the edge instead".to_string(),
            ),
            (EdgeStatus::Pending | EdgeStatus::Accepted, EdgeStatus::Accepted) => {
                if caller == edge.friend_id {
                    AccessDecision::Allow
                } else {
                    AccessDecision::Forbidden(format!(
                        "only the recipient may accept {}",
                        edge.id
                    ))
                }
            }
            (EdgeStatus::Pending, EdgeStatus::Pending) => AccessDecision::Allow,
            (from, to) => {
                AccessDecision::Invalid(format!("transition {from} -> {to} is not allowed"))
            }
        }
    }

    fn check_delete(
        caller: ProfileId,
        edge: &FriendshipEdge,
        intent: DeleteIntent,
    ) -> AccessDecision {
        match (intent, edge.status) {
            // a stale rejected row blocks nothing, clearing it is harmless
            (_, EdgeStatus::Rejected) => AccessDecision::Allow,
            (DeleteIntent::Reject, EdgeStatus::Pending) if caller != edge.friend_id => {
                AccessDecision::Forbidden(format!("only the recipient may reject {}", edge.id))
            }
            (DeleteIntent::Cancel, EdgeStatus::Pending) if caller != edge.user_id => {
                AccessDecision::Forbidden(format!("only the sender may cancel {}", edge.id))
            }
            (DeleteIntent::Reject | DeleteIntent::Cancel, EdgeStatus::Pending)
            | (DeleteIntent::Remove, EdgeStatus::Accepted) => AccessDecision::Allow,
            (DeleteIntent::Reject | DeleteIntent::Cancel, EdgeStatus::Accepted) => {
                AccessDecision::Invalid(format!(
                    "{} is an accepted friendship; remove the friend instead",
                    edge.id
                ))
            }
            (DeleteIntent::Remove, EdgeStatus::Pending) => AccessDecision::Invalid(format!(
                "{} is still pending; reject or cancel it instead",
                edge.id
            )),
        }
    }

    fn trace(caller: ProfileId, operation: EdgeOperation, decision: &AccessDecision) {
        match decision {
            AccessDecision::Allow => {
                tracing::debug!(%caller, %operation, "Edge operation permitted");
            }
            AccessDecision::Forbidden(reason) | AccessDecision::Invalid(reason) => {
                tracing::warn!(%caller, %operation, reason = %reason, "Edge operation denied");
            }
        }
    }
}
