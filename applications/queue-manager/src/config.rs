/// Queue manager configuration
use crate::error::{QueueManagerError, Result};
use segue_reconciler::ReconcilerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment prefix: `SEGUE_RECONCILER__CHECK_INTERVAL_SECS=60`
pub const ENV_PREFIX: &str = "SEGUE";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueManagerConfig {
    #[serde(default = "default_store")]
    pub store: StoreSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_reconciler")]
    pub reconciler: ReconcilerSettings,

    #[serde(default)]
    pub vault: VaultSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_playback_api_url")]
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReconcilerSettings {
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,

    #[serde(default = "default_sweep_pause_secs")]
    pub sweep_pause_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_concurrent_users")]
    pub max_concurrent_users: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VaultSettings {
    /// Base64 of a 32-byte key, shared with the store service
    #[serde(default)]
    pub encryption_key: String,
}

impl ReconcilerSettings {
    pub fn to_reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            check_interval: Duration::from_secs(self.check_interval_secs),
            sweep_pause: Duration::from_secs(self.sweep_pause_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_concurrent_users: self.max_concurrent_users,
        }
    }
}

impl QueueManagerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `./config.toml` is read if
    /// present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("config.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (SEGUE_<SECTION>__<KEY>)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.vault.encryption_key.is_empty() {
            return Err(QueueManagerError::Config(
                "Encryption key is required (set SEGUE_VAULT__ENCRYPTION_KEY)".to_string(),
            ));
        }
        segue_vault::AesGcmTokenCipher::from_base64_key(&self.vault.encryption_key)?;

        for (name, url) in [
            ("store.base_url", &self.store.base_url),
            ("playback.api_url", &self.playback.api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(QueueManagerError::Config(format!(
                    "{} must be an http(s) URL, got {:?}",
                    name, url
                )));
            }
        }

        let reconciler = &self.reconciler;
        for (name, value) in [
            ("reconciler.check_interval_secs", reconciler.check_interval_secs),
            ("reconciler.sweep_pause_secs", reconciler.sweep_pause_secs),
            ("reconciler.request_timeout_secs", reconciler.request_timeout_secs),
        ] {
            if value == 0 {
                return Err(QueueManagerError::Config(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        if reconciler.max_concurrent_users == 0 {
            return Err(QueueManagerError::Config(
                "reconciler.max_concurrent_users must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_store() -> StoreSettings {
    StoreSettings {
        base_url: default_store_base_url(),
    }
}

fn default_store_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        api_url: default_playback_api_url(),
    }
}

fn default_playback_api_url() -> String {
    segue_client::DEFAULT_PLAYBACK_API_URL.to_string()
}

fn default_reconciler() -> ReconcilerSettings {
    ReconcilerSettings {
        check_interval_secs: default_check_interval_secs(),
        sweep_pause_secs: default_sweep_pause_secs(),
        request_timeout_secs: default_request_timeout_secs(),
        max_concurrent_users: default_max_concurrent_users(),
    }
}

fn default_check_interval_secs() -> u64 {
    30
}

fn default_sweep_pause_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent_users() -> usize {
    8
}

impl Default for QueueManagerConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            playback: default_playback(),
            reconciler: default_reconciler(),
            vault: VaultSettings::default(),
        }
    }
}
