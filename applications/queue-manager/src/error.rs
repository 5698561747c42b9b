/// Queue manager error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueueManagerError>;

#[derive(Debug, Error)]
pub enum QueueManagerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client setup failed: {0}")]
    Client(#[from] segue_client::ClientError),

    #[error("Vault setup failed: {0}")]
    Vault(#[from] segue_vault::VaultError),
}

impl From<config::ConfigError> for QueueManagerError {
    fn from(err: config::ConfigError) -> Self {
        QueueManagerError::Config(err.to_string())
    }
}
