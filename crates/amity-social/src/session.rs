//! Signed-in session wiring

use crate::profile::ProfileService;
use crate::service::FriendshipService;
use amity_core::{AmityConfig, ProfileId};

/// Services bound to one signed-in profile.
#[derive(Debug, Clone)]
pub struct Session {
    self_id: ProfileId,
    friendships: FriendshipService,
    profiles: ProfileService,
}

impl Session {
    /// Bind the services to `self_id` using the loaded configuration
    pub fn new(self_id: ProfileId, config: &AmityConfig) -> Self {
        tracing::debug!(%self_id, "Session started");
        Self {
            self_id,
            friendships: FriendshipService::new(self_id, config.social.clone()),
            profiles: ProfileService::new(self_id, config.profile.clone()),
        }
    }

    /// Signed-in profile
    pub fn self_id(&self) -> ProfileId {
        self.self_id
    }

    /// Friendship operations
    pub fn friendships(&self) -> &FriendshipService {
        &self.friendships
    }

    /// Own-profile operations
    pub fn profiles(&self) -> &ProfileService {
        &self.profiles
    }
}
