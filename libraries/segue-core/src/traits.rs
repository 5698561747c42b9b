/// Collaborator traits consumed by the reconciler
use crate::error::Result;
use crate::types::{
    AccessToken, PlaybackStatus, QueueEntry, SealedToken, SongMapping, TrackId, UserId,
};
use async_trait::async_trait;

/// Store holding the user roster, their sealed tokens and their mappings.
///
/// All three reads are idempotent.
#[async_trait]
pub trait CollaboratorStore: Send + Sync {
    /// Every user that currently has a stored token
    async fn list_users(&self) -> Result<Vec<UserId>>;

    /// The user's sealed access token, `None` if the store has none
    async fn get_user_token(&self, user_id: &UserId) -> Result<Option<SealedToken>>;

    /// The user's mappings, oldest first
    async fn get_user_mappings(&self, user_id: &UserId) -> Result<Vec<SongMapping>>;
}

/// Remote playback service, acting on behalf of the token's owner.
#[async_trait]
pub trait PlaybackClient: Send + Sync {
    /// Whether the user has an active session, and its current track.
    ///
    /// This is the only call that decides activity.
    async fn get_playback_state(&self, token: &AccessToken) -> Result<PlaybackStatus>;

    /// Upcoming queue entries, next first
    async fn get_queue(&self, token: &AccessToken) -> Result<Vec<QueueEntry>>;

    /// Append a track to the user's queue
    ///
    /// Not idempotent: every successful call adds another queue entry.
    async fn enqueue_track(&self, token: &AccessToken, track_id: &TrackId) -> Result<()>;
}

/// Symmetric encryption of access tokens at rest.
pub trait TokenCipher: Send + Sync {
    /// Encrypt a plaintext token for storage
    fn seal(&self, token: &AccessToken) -> Result<SealedToken>;

    /// Decrypt a stored token
    ///
    /// # Errors
    /// Returns an `Auth`-kind error if the token cannot be opened with this key
    fn open(&self, sealed: &SealedToken) -> Result<AccessToken>;
}
