/// Store service configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment prefix: `SEGUE_STORE_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "SEGUE_STORE";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default)]
    pub vault: VaultSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VaultSettings {
    /// Base64 of a 32-byte key, shared with the queue manager
    #[serde(default)]
    pub encryption_key: String,
}

impl StoreConfig {
    /// Load configuration from file and environment
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

        // Override with environment variables (SEGUE_STORE_<SECTION>__<KEY>)
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
            return Err(ServerError::Config(
                "Encryption key is required (set SEGUE_STORE_VAULT__ENCRYPTION_KEY)".to_string(),
            ));
        }
        segue_vault::AesGcmTokenCipher::from_base64_key(&self.vault.encryption_key)?;

        if self.storage.database_url.is_empty() {
            return Err(ServerError::Config(
                "storage.database_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/segue.db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            vault: VaultSettings::default(),
        }
    }
}
