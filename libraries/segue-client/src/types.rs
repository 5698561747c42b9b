//! Wire types for the store API and the playback service Web API.

use segue_core::{QueueEntry, TrackId};
use serde::Deserialize;

// =============================================================================
// Store Types
// =============================================================================

/// One roster entry from `GET /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEntry {
    pub user_id: String,
}

/// Response of `GET /users/{id}/token`. The token is still sealed.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub user_id: String,
    pub access_token: String,
}

/// One mapping from `GET /users/{id}/mappings`.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingResponse {
    pub id: String,
    pub user_id: String,
    pub trigger_song_id: String,
    pub queue_song_id: String,
}

// =============================================================================
// Playback Service Types
// =============================================================================

/// Track or episode object; only the id matters here.
///
/// Local files come back with `"id": null`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    #[serde(default)]
    pub id: Option<String>,
}

impl TrackObject {
    pub fn track_id(&self) -> Option<TrackId> {
        self.id.as_deref().and_then(TrackId::parse)
    }
}

/// Response of `GET /me/player`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub item: Option<TrackObject>,
}

/// Response of `GET /me/player/queue`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueResponse {
    #[serde(default)]
    pub currently_playing: Option<TrackObject>,
    #[serde(default)]
    pub queue: Vec<TrackObject>,
}

impl QueueResponse {
    /// Upcoming entries in order; items without an id keep their slot.
    pub fn into_entries(self) -> Vec<QueueEntry> {
        self.queue
            .iter()
            .map(|item| QueueEntry {
                track_id: item.track_id(),
            })
            .collect()
    }
}
