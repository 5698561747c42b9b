/// Per-user activity state
use segue_core::UserId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Active/inactive flag per user, shared by all in-flight cycles.
///
/// A user only gets an entry once observed active; a user who was never
/// active stays absent and can never produce a "became inactive"
/// transition. Nothing is persisted, so starting empty is always safe.
#[derive(Debug, Clone, Default)]
pub struct ActivityTracker {
    users: Arc<RwLock<HashMap<UserId, bool>>>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_active(&self, user_id: &UserId) -> bool {
        self.users.read().await.get(user_id).copied().unwrap_or(false)
    }

    /// Whether the user has been observed active since start.
    pub async fn is_tracked(&self, user_id: &UserId) -> bool {
        self.users.read().await.contains_key(user_id)
    }

    /// Mark the user active. Returns `true` if this is a transition.
    pub async fn set_active(&self, user_id: &UserId) -> bool {
        let mut users = self.users.write().await;
        let previous = users.insert(user_id.clone(), true);
        previous != Some(true)
    }

    /// Mark a known user inactive. Returns `true` if this is a transition.
    ///
    /// Unknown users are left untracked.
    pub async fn set_inactive(&self, user_id: &UserId) -> bool {
        let mut users = self.users.write().await;
        match users.get_mut(user_id) {
            Some(active) if *active => {
                *active = false;
                true
            }
            _ => false,
        }
    }

    /// Forget every user not in `roster`
    pub async fn retain(&self, roster: &HashSet<UserId>) {
        self.users
            .write()
            .await
            .retain(|user_id, _| roster.contains(user_id));
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}
