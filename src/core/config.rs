/*!
 * Configuration
 * Explicit configuration value passed to the resolver and repositories
 */

use super::errors::{CanError, CanResult};
use super::limits::{
    DEFAULT_SEPARATOR, ENV_SEPARATOR, REFERENCE_DELIMITERS, ENV_USES_EXTEND_CAN_METHOD, ENV_USES_LOAD_ON_UPDATE,
    ENV_USES_SOFT_DELETES, ENV_USES_TIMESTAMPS, ENV_USES_UUID,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Primary key flavour minted by a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Integer,
    Uuid,
}

/// Package configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CanConfig {
    /// Slug separator
    pub separator: char,
    /// Key type for new permissions
    pub key_kind: KeyKind,
    /// Delete marks rows as trashed instead of removing them
    pub soft_deletes: bool,
    /// Stamp permissions and assignments with created/updated times
    pub timestamps: bool,
    /// Reload the entity's permission set after a successful mutation
    pub load_on_update: bool,
    /// Route `authorize` through permission checks before the fallback
    pub extend_can_method: bool,
}

impl Default for CanConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            key_kind: KeyKind::Uuid,
            soft_deletes: false,
            timestamps: true,
            load_on_update: true,
            extend_can_method: true,
        }
    }
}

impl CanConfig {
    /// Load from `CAN_*` environment variables, defaulting anything unset
    ///
    /// Environment variables:
    /// - CAN_SEPARATOR: single character (default: `.`)
    /// - CAN_USES_UUID: uuid keys instead of integers (default: true)
    /// - CAN_USES_SOFT_DELETES (default: false)
    /// - CAN_USES_TIMESTAMPS (default: true)
    /// - CAN_USES_LOAD_ON_UPDATE (default: true)
    /// - CAN_USES_EXTEND_CAN_METHOD (default: true)
    pub fn from_env() -> CanResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> CanResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_SEPARATOR) {
            config.separator = parse_separator(&raw)?;
        }
        if let Some(raw) = lookup(ENV_USES_UUID) {
            config.key_kind = if parse_flag(ENV_USES_UUID, &raw)? {
                KeyKind::Uuid
            } else {
                KeyKind::Integer
            };
        }
        if let Some(raw) = lookup(ENV_USES_SOFT_DELETES) {
            config.soft_deletes = parse_flag(ENV_USES_SOFT_DELETES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_USES_TIMESTAMPS) {
            config.timestamps = parse_flag(ENV_USES_TIMESTAMPS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_USES_LOAD_ON_UPDATE) {
            config.load_on_update = parse_flag(ENV_USES_LOAD_ON_UPDATE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_USES_EXTEND_CAN_METHOD) {
            config.extend_can_method = parse_flag(ENV_USES_EXTEND_CAN_METHOD, &raw)?;
        }

        debug!(?config, "Loaded permission configuration");
        Ok(config)
    }

    /// Panics when `separator` is a reference delimiter (`,` or `|`);
    /// slugs containing one could never be referenced by text.
    pub fn with_separator(mut self, separator: char) -> Self {
        assert!(
            !REFERENCE_DELIMITERS.contains(&separator),
            "slug separator {separator:?} collides with a reference delimiter"
        );
        self.separator = separator;
        self
    }

    /// Check values that bypassed `from_env`, e.g. deserialized ones
    pub fn validate(&self) -> CanResult<()> {
        parse_separator(&self.separator.to_string()).map(|_| ())
    }

    pub fn with_key_kind(mut self, key_kind: KeyKind) -> Self {
        self.key_kind = key_kind;
        self
    }

    pub fn with_soft_deletes(mut self, enabled: bool) -> Self {
        self.soft_deletes = enabled;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    pub fn with_load_on_update(mut self, enabled: bool) -> Self {
        self.load_on_update = enabled;
        self
    }

    pub fn with_extend_can_method(mut self, enabled: bool) -> Self {
        self.extend_can_method = enabled;
        self
    }
}

fn parse_separator(raw: &str) -> CanResult<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if REFERENCE_DELIMITERS.contains(&c) => Err(CanError::InvalidConfig {
            reason: format!("{ENV_SEPARATOR} cannot be a reference delimiter, got {raw:?}"),
        }),
        (Some(c), None) if !c.is_alphanumeric() && !c.is_whitespace() => Ok(c),
        _ => Err(CanError::InvalidConfig {
            reason: format!("{ENV_SEPARATOR} must be one punctuation character, got {raw:?}"),
        }),
    }
}

// Accepts the usual dotenv spellings for booleans
fn parse_flag(key: &str, raw: &str) -> CanResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" | "" => Ok(false),
        other => Err(CanError::InvalidConfig {
            reason: format!("{key} expects a boolean, got {other:?}"),
        }),
    }
}
