//! Segue Client
//!
//! HTTP clients for the two services the reconciler depends on.
//!
//! # Features
//!
//! - **Store**: roster, sealed tokens and song mappings from the Segue store API
//! - **Playback**: current track, upcoming queue and "add to queue" on the
//!   playback service Web API
//!
//! Both clients implement the matching `segue_core` collaborator trait, so the
//! reconciler never sees HTTP details.
//!
//! # Example
//!
//! ```ignore
//! use segue_client::{ServiceConfig, SpotifyPlaybackClient, StoreClient};
//! use segue_core::CollaboratorStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = StoreClient::new(ServiceConfig::new("http://localhost:8000/api/v1"))?;
//!     let playback = SpotifyPlaybackClient::new(ServiceConfig::new(
//!         segue_client::DEFAULT_PLAYBACK_API_URL,
//!     ))?;
//!
//!     for user in store.list_users().await? {
//!         println!("{}", user);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod playback;
mod store;
mod types;

pub use client::ServiceConfig;
pub use error::{ClientError, Result};
pub use playback::{SpotifyPlaybackClient, DEFAULT_PLAYBACK_API_URL};
pub use store::StoreClient;
pub use types::{
    CurrentlyPlayingResponse, MappingResponse, QueueResponse, TokenResponse, TrackObject,
    UserEntry,
};
