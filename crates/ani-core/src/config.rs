//! Companion configuration loaded from the environment.
//!
//! Built once at startup and passed into the controller explicitly — no
//! module reads `std::env` after construction.

use crate::error::{CompanionError, CompanionResult};
use serde::{Deserialize, Serialize};

/// Default conversation service base URL (no trailing slash).
pub const DEFAULT_API_BASE: &str = "https://api.lovable.ai";

/// Default avatar model locator (Ready Player Me `.glb`).
pub const DEFAULT_MODEL_SRC: &str =
    "https://models.readyplayer.me/664e6e64235316eab44d2d4c.glb";

/// Fixed placeholder identity sent with every message.
pub const DEFAULT_USER_ID: &str = "web-user-777";

/// Companion configuration loaded from environment.
///
/// | Env | Default | Description |
/// |-----|---------|--------------|
/// | LOVABLE_API_KEY | (required) | Bearer key for the conversation service. |
/// | LOVABLE_CHARACTER_ID | (required) | Character/session the messages address. |
/// | LOVABLE_API_URL | https://api.lovable.ai | Service base URL. |
/// | AVATAR_MODEL_URL | Ready Player Me `.glb` | Avatar 3D model locator. |
/// | COMPANION_USER_ID | web-user-777 | Placeholder user identity. |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionConfig {
    /// LOVABLE_API_KEY: bearer credential for the conversation service.
    pub api_key: String,
    /// LOVABLE_CHARACTER_ID: which character receives the messages.
    pub character_id: String,
    /// LOVABLE_API_URL: service base URL without trailing slash.
    pub base_url: String,
    /// AVATAR_MODEL_URL: locator for the avatar's 3D model, fixed for the run.
    pub model_src: String,
    /// COMPANION_USER_ID: user identity sent in every message body.
    pub user_id: String,
}

impl CompanionConfig {
    /// Load from environment. `LOVABLE_API_KEY` and `LOVABLE_CHARACTER_ID`
    /// are required; everything else falls back to defaults.
    pub fn from_env() -> CompanionResult<Self> {
        let api_key = env_required("LOVABLE_API_KEY")?;
        let character_id = env_required("LOVABLE_CHARACTER_ID")?;
        Ok(Self {
            api_key,
            character_id,
            base_url: env_opt_string("LOVABLE_API_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model_src: env_opt_string("AVATAR_MODEL_URL")
                .unwrap_or_else(|| DEFAULT_MODEL_SRC.to_string()),
            user_id: env_opt_string("COMPANION_USER_ID")
                .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
        })
    }

    /// Explicit construction for tests and non-env wiring.
    pub fn new(
        api_key: impl Into<String>,
        character_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            character_id: character_id.into(),
            base_url: base_url.into(),
            model_src: DEFAULT_MODEL_SRC.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }

    /// Override the avatar model locator.
    pub fn with_model_src(mut self, model_src: impl Into<String>) -> Self {
        self.model_src = model_src.into();
        self
    }
}

fn env_required(name: &str) -> CompanionResult<String> {
    env_opt_string(name)
        .ok_or_else(|| CompanionError::Config(format!("{} is not set", name)))
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = CompanionConfig::new("key", "char-1", DEFAULT_API_BASE);
        assert_eq!(config.user_id, "web-user-777");
        assert_eq!(config.model_src, DEFAULT_MODEL_SRC);
    }

    #[test]
    fn from_env_requires_key() {
        std::env::remove_var("LOVABLE_API_KEY");
        let err = CompanionConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("LOVABLE_API_KEY"));
    }
}
