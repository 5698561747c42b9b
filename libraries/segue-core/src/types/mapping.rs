/// Trigger → follow-up song mappings
use super::ids::{TrackId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One "when T plays, queue Q" rule owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMapping {
    pub id: String,
    pub user_id: UserId,
    pub trigger_track_id: TrackId,
    pub queue_track_id: TrackId,
}

impl SongMapping {
    pub fn new(
        id: impl Into<String>,
        user_id: UserId,
        trigger_track_id: TrackId,
        queue_track_id: TrackId,
    ) -> Self {
        Self {
            id: id.into(),
            user_id,
            trigger_track_id,
            queue_track_id,
        }
    }
}

/// A user's mappings indexed by trigger track.
///
/// The store rejects duplicate trigger ids on write. If duplicates still reach
/// this type (e.g. rows written before the constraint existed), the first
/// mapping in input order wins.
#[derive(Debug, Clone, Default)]
pub struct MappingSet {
    by_trigger: HashMap<TrackId, TrackId>,
}

impl MappingSet {
    pub fn from_mappings(mappings: impl IntoIterator<Item = SongMapping>) -> Self {
        let mut by_trigger = HashMap::new();
        for mapping in mappings {
            by_trigger
                .entry(mapping.trigger_track_id)
                .or_insert(mapping.queue_track_id);
        }
        Self { by_trigger }
    }

    /// Follow-up track for the given trigger, if any.
    pub fn resolve(&self, trigger: &TrackId) -> Option<&TrackId> {
        self.by_trigger.get(trigger)
    }

    pub fn len(&self) -> usize {
        self.by_trigger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_trigger.is_empty()
    }
}

/// First trigger id that appears more than once in `triggers`.
pub fn find_duplicate_trigger<'a>(
    triggers: impl IntoIterator<Item = &'a TrackId>,
) -> Option<&'a TrackId> {
    let mut seen = HashSet::new();
    triggers.into_iter().find(|trigger| !seen.insert(*trigger))
}
