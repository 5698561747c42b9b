/// ID types for Segue entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// URI prefix the playback service uses for tracks.
pub const TRACK_URI_PREFIX: &str = "spotify:track:";

/// User identifier
///
/// Opaque to the core: users are created and destroyed by the store, the
/// reconciler only ever reads the roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Track identifier on the playback service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse an untrusted id or `spotify:track:` URI.
    ///
    /// Returns `None` for empty input, so "no track" can never be confused
    /// with a track whose id happens to be the empty string.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let id = trimmed.strip_prefix(TRACK_URI_PREFIX).unwrap_or(trimmed);
        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full track URI as expected by the queue endpoint
    pub fn to_uri(&self) -> String {
        format!("{}{}", TRACK_URI_PREFIX, self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
