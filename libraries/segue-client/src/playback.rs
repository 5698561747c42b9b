//! Client for the playback service Web API.

use crate::client::{self, ServiceConfig};
use crate::error::{send_error, status_error, ClientError, Result};
use crate::types::{CurrentlyPlayingResponse, QueueResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use segue_core::{AccessToken, PlaybackClient, PlaybackStatus, QueueEntry, TrackId};
use tracing::debug;

/// Public Web API root of the playback service.
pub const DEFAULT_PLAYBACK_API_URL: &str = "https://api.spotify.com/v1";

/// Reads a user's player state and appends to their queue.
///
/// Stateless apart from the connection pool: the token is passed per call, so
/// one client serves every user.
pub struct SpotifyPlaybackClient {
    http: Client,
    base_url: String,
}

impl SpotifyPlaybackClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let (http, base_url) = client::build(&config)?;
        Ok(Self { http, base_url })
    }

    /// `GET /me/player`. `None` when there is no active device.
    pub async fn current_playback(
        &self,
        token: &AccessToken,
    ) -> Result<Option<CurrentlyPlayingResponse>> {
        let url = format!("{}/me/player", self.base_url);
        debug!(url = %url, "Fetching current playback");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(send_error)?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(response).await);
        }

        let body = response.text().await.map_err(send_error)?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse playback response: {}", e)))
    }

    /// `GET /me/player/queue`.
    pub async fn queue(&self, token: &AccessToken) -> Result<QueueResponse> {
        let url = format!("{}/me/player/queue", self.base_url);
        debug!(url = %url, "Fetching queue");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(send_error)?;

        if response.status().is_success() {
            response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse queue response: {}", e))
            })
        } else {
            Err(status_error(response).await)
        }
    }

    /// `POST /me/player/queue?uri=spotify:track:{id}`.
    pub async fn add_to_queue(&self, token: &AccessToken, track_id: &TrackId) -> Result<()> {
        let url = format!("{}/me/player/queue", self.base_url);
        let uri = track_id.to_uri();
        debug!(url = %url, uri = %uri, "Adding track to queue");

        let response = self
            .http
            .post(&url)
            .query(&[("uri", uri.as_str())])
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(send_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }
}

#[async_trait]
impl PlaybackClient for SpotifyPlaybackClient {
    async fn get_playback_state(&self, token: &AccessToken) -> segue_core::Result<PlaybackStatus> {
        let Some(playing) = self.current_playback(token).await? else {
            return Ok(PlaybackStatus::NoActiveSession);
        };

        // A paused device still counts as an active session.
        if !playing.is_playing {
            debug!(is_playing = playing.is_playing, "Session is paused");
        }

        let current = playing.item.as_ref().and_then(|item| item.track_id());
        Ok(PlaybackStatus::Active(current))
    }

    async fn get_queue(&self, token: &AccessToken) -> segue_core::Result<Vec<QueueEntry>> {
        Ok(self.queue(token).await?.into_entries())
    }

    async fn enqueue_track(&self, token: &AccessToken, track_id: &TrackId) -> segue_core::Result<()> {
        self.add_to_queue(token, track_id).await?;
        Ok(())
    }
}
