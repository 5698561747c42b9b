/// Playback observations
use super::ids::TrackId;
use crate::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};

/// One upcoming item in a user's queue.
///
/// Local files and some podcast episodes have no track id on the playback
/// service; they still occupy a queue slot, so they are kept as an
/// unidentified entry rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub track_id: Option<TrackId>,
}

impl QueueEntry {
    pub fn track(track_id: TrackId) -> Self {
        Self {
            track_id: Some(track_id),
        }
    }

    pub fn unidentified() -> Self {
        Self { track_id: None }
    }
}

/// What an active session is playing and what comes next.
///
/// Assembled from two separate reads: the session (current track) and the
/// queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// `None` while the session is active but nothing identifiable is playing
    pub current_track_id: Option<TrackId>,
    pub queue: Vec<QueueEntry>,
}

impl PlaybackState {
    /// Reduce to the single observation a cycle decides on.
    ///
    /// Returns `None` when there is no current track.
    pub fn snapshot(&self) -> Option<PlaybackSnapshot> {
        let current_track_id = self.current_track_id.clone()?;
        Some(PlaybackSnapshot::new(current_track_id, &self.queue))
    }
}

/// Point-in-time `(current, next)` pair. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub current_track_id: TrackId,
    pub next_track_id: Option<TrackId>,
}

impl PlaybackSnapshot {
    /// Only the first queue entry counts as "next"; an unidentified entry
    /// there leaves `next_track_id` empty.
    pub fn new(current_track_id: TrackId, queue: &[QueueEntry]) -> Self {
        Self {
            current_track_id,
            next_track_id: queue.first().and_then(|entry| entry.track_id.clone()),
        }
    }

    /// Whether `track` is already the immediate next item.
    pub fn is_next(&self, track: &TrackId) -> bool {
        self.next_track_id.as_ref() == Some(track)
    }
}

/// Answer of the playback service to "what is this user doing?"
///
/// Says nothing about the queue, which is read separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Session active; carries the current track when it has an id
    Active(Option<TrackId>),
    NoActiveSession,
}

/// Result of probing a user's activity, folded into a single value the
/// processor can match exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityProbe {
    Active(Option<TrackId>),
    Inactive,
    Failed(ErrorKind),
}

impl From<Result<PlaybackStatus>> for ActivityProbe {
    fn from(result: Result<PlaybackStatus>) -> Self {
        match result {
            Ok(PlaybackStatus::Active(current)) => Self::Active(current),
            Ok(PlaybackStatus::NoActiveSession) => Self::Inactive,
            Err(e) => Self::Failed(e.kind()),
        }
    }
}
