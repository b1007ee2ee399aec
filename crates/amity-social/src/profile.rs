//! Own-profile reads and edits

use amity_core::{
    effects::ProfileStoreEffects, AmityError, Profile, ProfileConfig, ProfileId, ProfileUpdate,
    Result,
};

/// Profile operations for the signed-in user.
#[derive(Debug, Clone)]
pub struct ProfileService {
    self_id: ProfileId,
    config: ProfileConfig,
}

impl ProfileService {
    /// Create a service for `self_id`
    pub fn new(self_id: ProfileId, config: ProfileConfig) -> Self {
        Self { self_id, config }
    }

    /// Load the caller's own profile.
    ///
    /// # Errors
    /// * `NotFound` if the profile was never provisioned
    pub async fn load_own<E>(&self, effects: &E) -> Result<Profile>
    where
        E: ProfileStoreEffects + ?Sized,
    {
        effects
            .get_profile(self.self_id)
            .await?
            .ok_or_else(|| AmityError::not_found(format!("profile {}", self.self_id)))
    }

    /// Trim and length-check an edit without touching storage.
    pub fn validate_update(&self, mut update: ProfileUpdate) -> Result<ProfileUpdate> {
        if let Some(full_name) = update.full_name.as_mut() {
            *full_name = full_name.trim().to_string();
        }

        let limits = [
            ("full_name", &update.full_name, self.config.max_full_name_length),
            ("bio", &update.bio, self.config.max_bio_length),
            ("avatar_url", &update.avatar_url, self.config.max_avatar_url_length),
        ];
        for (field, value, max) in limits {
            let Some(value) = value else { continue };
            let len = value.chars().count();
            if len > max {
                return Err(AmityError::invalid(format!(
                    "{field} is {len} characters, limit is {max}"
                )));
            }
        }
        Ok(update)
    }

    /// Apply an owner edit.
    ///
    /// # Errors
    /// * `Invalid` if a field exceeds its configured length
    /// * `Forbidden` / `NotFound` from the store
    pub async fn update_own<E>(&self, effects: &E, update: ProfileUpdate) -> Result<Profile>
    where
        E: ProfileStoreEffects + ?Sized,
    {
        let update = self.validate_update(update)?;
        let profile = effects
            .update_profile(self.self_id, self.self_id, update)
            .await?;
        tracing::info!(profile_id = %profile.id, "Profile updated");
        Ok(profile)
    }
}
