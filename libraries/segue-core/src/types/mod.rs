/// Core domain types for Segue
mod ids;
mod mapping;
mod playback;
mod token;

pub use ids::{TrackId, UserId, TRACK_URI_PREFIX};
pub use mapping::{find_duplicate_trigger, MappingSet, SongMapping};
pub use playback::{ActivityProbe, PlaybackSnapshot, PlaybackState, PlaybackStatus, QueueEntry};
pub use token::{AccessToken, SealedToken};
