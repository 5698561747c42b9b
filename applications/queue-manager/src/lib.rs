//! Segue Queue Manager
//!
//! Wires the HTTP collaborators and the token cipher into the reconciliation
//! loop. The binary only parses the CLI, loads configuration and waits for
//! Ctrl-C.

pub mod config;
pub mod error;

pub use config::QueueManagerConfig;
pub use error::{QueueManagerError, Result};

use segue_client::{ServiceConfig, SpotifyPlaybackClient, StoreClient};
use segue_reconciler::Scheduler;
use segue_vault::AesGcmTokenCipher;
use std::sync::Arc;

/// Build a scheduler talking to the configured store and playback service.
pub fn build_scheduler(config: &QueueManagerConfig) -> Result<Scheduler> {
    let reconciler = config.reconciler.to_reconciler_config();

    let store = StoreClient::new(
        ServiceConfig::new(&config.store.base_url).with_timeout(reconciler.request_timeout),
    )?;
    let playback = SpotifyPlaybackClient::new(
        ServiceConfig::new(&config.playback.api_url).with_timeout(reconciler.request_timeout),
    )?;
    let cipher = AesGcmTokenCipher::from_base64_key(&config.vault.encryption_key)?;

    Ok(Scheduler::new(
        Arc::new(store),
        Arc::new(playback),
        Arc::new(cipher),
        reconciler,
    ))
}
