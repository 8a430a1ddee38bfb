//! Config schema (gateway, auth, staging, session sections).

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WasendConfig {
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    pub staging: StagingConfig,
    pub session: SessionConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

/// Bearer-token auth. The `WASEND_TOKEN` environment variable overrides the
/// file value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl AuthConfig {
    /// Effective shared secret: env override first, then the config file.
    /// An empty value on either path means "unconfigured".
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var("WASEND_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.clone().filter(|t| !t.is_empty()))
    }
}

/// Temporary artifact staging and janitor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub dir: PathBuf,
    pub sweep_interval_secs: u64,
    /// Artifacts older than this are reclaimed by the janitor.
    pub max_age_secs: u64,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("temp"),
            sweep_interval_secs: 300,
            max_age_secs: 300,
        }
    }
}

impl StagingConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

/// Device session store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub store_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: crate::loader::data_dir().join("session.db"),
        }
    }
}

#[cfg(test)]
// set_var is unsafe in edition 2024; fine in single-purpose tests.
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = WasendConfig::default();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.staging.sweep_interval(), Duration::from_secs(300));
        assert_eq!(config.auth.token, None);
    }

    #[test]
    fn env_token_overrides_file_token() {
        let auth = AuthConfig {
            token: Some("file-secret".into()),
        };
        unsafe { std::env::set_var("WASEND_TOKEN", "env-secret") };
        assert_eq!(auth.resolve_token().as_deref(), Some("env-secret"));
        unsafe { std::env::remove_var("WASEND_TOKEN") };
        assert_eq!(auth.resolve_token().as_deref(), Some("file-secret"));

        // Empty values on either path mean "unconfigured", so startup bails
        // instead of accepting a bare `Authorization: Bearer ` header.
        let empty_file = AuthConfig {
            token: Some(String::new()),
        };
        assert_eq!(empty_file.resolve_token(), None);
        unsafe { std::env::set_var("WASEND_TOKEN", "") };
        assert_eq!(empty_file.resolve_token(), None);
        unsafe { std::env::remove_var("WASEND_TOKEN") };
    }
}
