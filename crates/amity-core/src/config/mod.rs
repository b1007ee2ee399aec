//! Configuration for the Amity services
//!
//! `AmityConfig` is loaded from a TOML file, overridden from `AMITY_*`
//! environment variables and validated before use:
//!
//! ```toml
//! [social]
//! suggestion_limit = 20
//! require_removal_confirmation = true
//!
//! [profile]
//! max_bio_length = 500
//! ```

mod traits;

pub use traits::ConfigValidation;

use crate::errors::{AmityError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "AMITY_";

/// Friendship resolver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendshipConfig {
    /// Cap on the number of suggestions in a derived view; `None` keeps all
    pub suggestion_limit: Option<usize>,
    /// Refuse `remove_friend` unless the caller passes a confirmed removal
    pub require_removal_confirmation: bool,
}

impl Default for FriendshipConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: None,
            require_removal_confirmation: true,
        }
    }
}

impl ConfigValidation for FriendshipConfig {
    fn validate(&self) -> Result<()> {
        if self.suggestion_limit == Some(0) {
            return Err(AmityError::invalid(
                "social.suggestion_limit must be positive when set",
            ));
        }
        Ok(())
    }
}

/// Profile editing limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Maximum characters in `full_name`
    pub max_full_name_length: usize,
    /// Maximum characters in `bio`
    pub max_bio_length: usize,
    /// Maximum characters in `avatar_url`
    pub max_avatar_url_length: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            max_full_name_length: 100,
            max_bio_length: 500,
            max_avatar_url_length: 2048,
        }
    }
}

impl ConfigValidation for ProfileConfig {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("profile.max_full_name_length", self.max_full_name_length),
            ("profile.max_bio_length", self.max_bio_length),
            ("profile.max_avatar_url_length", self.max_avatar_url_length),
        ] {
            if value == 0 {
                return Err(AmityError::invalid(format!("{name} must be positive")));
            }
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmityConfig {
    /// Friendship resolver settings
    pub social: FriendshipConfig,
    /// Profile editing limits
    pub profile: ProfileConfig,
}

impl AmityConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// * `NotFound` if the file does not exist
    /// * `Invalid` if the file is not valid TOML
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from file, apply environment overrides, validate.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_file(path)?;
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `AMITY_*` environment variables into this configuration
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Merge `AMITY_*` key/value pairs. Unknown keys are ignored.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            self.set_from_string(&name.to_lowercase(), value.as_ref())?;
        }
        Ok(())
    }

    /// Set a single value by its flat name (e.g. `max_bio_length`)
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "suggestion_limit" => {
                self.social.suggestion_limit = if value.is_empty() {
                    None
                } else {
                    Some(parse_value(key, value)?)
                };
            }
            "require_removal_confirmation" => {
                self.social.require_removal_confirmation = parse_value(key, value)?;
            }
            "max_full_name_length" => self.profile.max_full_name_length = parse_value(key, value)?,
            "max_bio_length" => self.profile.max_bio_length = parse_value(key, value)?,
            "max_avatar_url_length" => {
                self.profile.max_avatar_url_length = parse_value(key, value)?;
            }
            _ => {}
        }
        Ok(())
    }
}

impl ConfigValidation for AmityConfig {
    fn validate(&self) -> Result<()> {
        self.social.validate()?;
        self.profile.validate()
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AmityError::invalid(format!("Invalid value for {key}: {value:?}")))
}
