//! Segue Core
//!
//! Platform-agnostic types, collaborator traits, and error handling for Segue.
//!
//! Segue watches what a user is listening to on a remote playback service and,
//! when a *trigger* track is playing, queues the *follow-up* track the user
//! chained to it.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `UserId`, `TrackId`, `SongMapping`, `MappingSet`, `PlaybackSnapshot`
//! - **Collaborator Traits**: `CollaboratorStore`, `PlaybackClient`, `TokenCipher`
//! - **Error Handling**: Unified `SegueError`, `ErrorKind` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use segue_core::types::{MappingSet, PlaybackState, QueueEntry, SongMapping, TrackId, UserId};
//!
//! let user = UserId::new("alice");
//! let mappings = MappingSet::from_mappings(vec![SongMapping::new(
//!     "m1",
//!     user,
//!     TrackId::new("intro"),
//!     TrackId::new("main-theme"),
//! )]);
//!
//! let state = PlaybackState {
//!     current_track_id: Some(TrackId::new("intro")),
//!     queue: vec![QueueEntry::track(TrackId::new("something-else"))],
//! };
//!
//! let snapshot = state.snapshot().unwrap();
//! let target = mappings.resolve(&snapshot.current_track_id).unwrap();
//! assert!(!snapshot.is_next(target));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ErrorKind, Result, SegueError};
pub use traits::{CollaboratorStore, PlaybackClient, TokenCipher};

pub use types::{
    find_duplicate_trigger, AccessToken, ActivityProbe, MappingSet, PlaybackSnapshot,
    PlaybackState, PlaybackStatus, QueueEntry, SealedToken, SongMapping, TrackId, UserId,
};
