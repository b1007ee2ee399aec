//! Profile records

use crate::identifiers::ProfileId;
use crate::time::PhysicalTime;
use serde::{Deserialize, Serialize};

/// Identity record of a user.
///
/// `username` is unique and immutable; only the owner may change
/// `full_name`, `bio` and `avatar_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile identifier (same as the account id)
    pub id: ProfileId,
    /// Unique handle, fixed at provisioning
    pub username: String,
    /// Free-form display name, may be empty
    #[serde(default)]
    pub full_name: String,
    /// Short biography, may be empty
    #[serde(default)]
    pub bio: String,
    /// Avatar image location, may be empty
    #[serde(default)]
    pub avatar_url: String,
    /// When the profile was provisioned
    pub created_at: PhysicalTime,
    /// Last owner edit
    pub updated_at: PhysicalTime,
}

impl Profile {
    /// Create a freshly provisioned profile with empty optional fields.
    pub fn new(id: ProfileId, username: impl Into<String>, now: PhysicalTime) -> Self {
        Self {
            id,
            username: username.into(),
            full_name: String::new(),
            bio: String::new(),
            avatar_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style setter for the full name.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Name to show in lists: the full name when set, otherwise the username.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }

    /// Upper-cased first character of the username, used as avatar fallback.
    pub fn initial(&self) -> Option<char> {
        self.username.chars().next().map(|c| {
            // to_uppercase can expand (e.g. 'ß'); keep the first scalar
            c.to_uppercase().next().unwrap_or(c)
        })
    }

    /// Apply an owner edit. Fields left as `None` are kept.
    pub fn apply_update(&mut self, update: &ProfileUpdate, now: PhysicalTime) {
        if let Some(full_name) = &update.full_name {
            self.full_name = full_name.clone();
        }
        if let Some(bio) = &update.bio {
            self.bio = bio.clone();
        }
        if let Some(avatar_url) = &update.avatar_url {
            self.avatar_url = avatar_url.clone();
        }
        self.updated_at = now;
    }
}

/// Owner edit of a profile. `username` is deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New full name
    pub full_name: Option<String>,
    /// New biography
    pub bio: Option<String>,
    /// New avatar location
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    /// True when the update would change nothing but `updated_at`.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.bio.is_none() && self.avatar_url.is_none()
    }
}
