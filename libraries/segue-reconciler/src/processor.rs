use crate::activity::ActivityTracker;
use segue_core::{
    AccessToken, ActivityProbe, CollaboratorStore, ErrorKind, MappingSet, PlaybackClient,
    PlaybackSnapshot, Result, SegueError, TokenCipher, TrackId, UserId,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Activity change observed during a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    BecameActive,
    BecameInactive,
}

/// How a cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Token missing, unreadable or undecryptable. State untouched.
    CredentialsUnavailable,
    /// No active session on the playback service
    Inactive,
    /// The playback probe failed; treated like an inactive session
    PlaybackUnavailable(ErrorKind),
    /// Active, but no identifiable current track
    NothingPlaying,
    /// Active, but the queue could not be read. Activity is kept.
    QueueUnavailable(ErrorKind),
    MappingsUnavailable,
    NoMapping,
    /// The follow-up is already the next queued track
    AlreadyQueued(TrackId),
    Enqueued(TrackId),
    EnqueueFailed(TrackId),
}

/// Result of one user cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub user_id: UserId,
    pub transition: Option<Transition>,
    pub outcome: CycleOutcome,
}

/// Runs the per-user unit of work.
///
/// Cheap to clone: every collaborator is shared.
#[derive(Clone)]
pub struct UserProcessor {
    store: Arc<dyn CollaboratorStore>,
    playback: Arc<dyn PlaybackClient>,
    cipher: Arc<dyn TokenCipher>,
    activity: ActivityTracker,
    request_timeout: Duration,
}

impl UserProcessor {
    pub fn new(
        store: Arc<dyn CollaboratorStore>,
        playback: Arc<dyn PlaybackClient>,
        cipher: Arc<dyn TokenCipher>,
        activity: ActivityTracker,
        request_timeout: Duration,
    ) -> Self {
        Self {
            store,
            playback,
            cipher,
            activity,
            request_timeout,
        }
    }

    pub fn activity(&self) -> &ActivityTracker {
        &self.activity
    }

    /// Run one cycle for `user_id`.
    ///
    /// Never fails: every error ends the cycle and is reported in the
    /// outcome. At most one track is enqueued.
    pub async fn process(&self, user_id: &UserId) -> CycleReport {
        let token = match self.resolve_token(user_id).await {
            Ok(token) => token,
            Err(e) => {
                warn!(user_id = %user_id, kind = ?e.kind(), "Skipping user, no usable token: {}", e);
                return CycleReport {
                    user_id: user_id.clone(),
                    transition: None,
                    outcome: CycleOutcome::CredentialsUnavailable,
                };
            }
        };

        let probe: ActivityProbe = self
            .bounded(self.playback.get_playback_state(&token))
            .await
            .into();

        let current = match probe {
            ActivityProbe::Active(current) => current,
            ActivityProbe::Inactive => {
                return self
                    .report_inactive(user_id, CycleOutcome::Inactive)
                    .await;
            }
            ActivityProbe::Failed(kind) => {
                match kind {
                    ErrorKind::Transient => {
                        warn!(user_id = %user_id, "Playback state unavailable, retrying next sweep");
                    }
                    ErrorKind::Auth | ErrorKind::Other => {
                        error!(user_id = %user_id, kind = ?kind, "Playback state request rejected");
                    }
                }
                return self
                    .report_inactive(user_id, CycleOutcome::PlaybackUnavailable(kind))
                    .await;
            }
        };

        let transition = if self.activity.set_active(user_id).await {
            info!(user_id = %user_id, "User {} became active", user_id);
            Some(Transition::BecameActive)
        } else {
            None
        };
        let report = |outcome| CycleReport {
            user_id: user_id.clone(),
            transition,
            outcome,
        };

        let Some(current) = current else {
            debug!(user_id = %user_id, "Active session without a current track");
            return report(CycleOutcome::NothingPlaying);
        };

        let snapshot = match self.bounded(self.playback.get_queue(&token)).await {
            Ok(queue) => PlaybackSnapshot::new(current, &queue),
            Err(e) => {
                warn!(user_id = %user_id, kind = ?e.kind(), "Failed to read queue: {}", e);
                return report(CycleOutcome::QueueUnavailable(e.kind()));
            }
        };

        let mappings = match self.bounded(self.store.get_user_mappings(user_id)).await {
            Ok(mappings) => MappingSet::from_mappings(mappings),
            Err(e) => {
                warn!(user_id = %user_id, kind = ?e.kind(), "Failed to fetch mappings: {}", e);
                return report(CycleOutcome::MappingsUnavailable);
            }
        };

        let Some(target) = mappings.resolve(&snapshot.current_track_id).cloned() else {
            debug!(
                user_id = %user_id,
                current = %snapshot.current_track_id,
                "No mapping for current track"
            );
            return report(CycleOutcome::NoMapping);
        };

        if snapshot.is_next(&target) {
            debug!(user_id = %user_id, track = %target, "Follow-up already queued");
            return report(CycleOutcome::AlreadyQueued(target));
        }

        match self.bounded(self.playback.enqueue_track(&token, &target)).await {
            Ok(()) => {
                info!(
                    user_id = %user_id,
                    trigger = %snapshot.current_track_id,
                    track = %target,
                    "Queued {} after {}",
                    target,
                    snapshot.current_track_id
                );
                report(CycleOutcome::Enqueued(target))
            }
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    track = %target,
                    kind = ?e.kind(),
                    "Failed to enqueue track: {}",
                    e
                );
                report(CycleOutcome::EnqueueFailed(target))
            }
        }
    }

    async fn resolve_token(&self, user_id: &UserId) -> Result<AccessToken> {
        let sealed = self
            .bounded(self.store.get_user_token(user_id))
            .await?
            .ok_or_else(|| SegueError::auth(format!("no token stored for user {}", user_id)))?;

        self.cipher.open(&sealed)
    }

    async fn report_inactive(&self, user_id: &UserId, outcome: CycleOutcome) -> CycleReport {
        let transition = if self.activity.set_inactive(user_id).await {
            info!(user_id = %user_id, "User {} became inactive", user_id);
            Some(Transition::BecameInactive)
        } else {
            None
        };

        CycleReport {
            user_id: user_id.clone(),
            transition,
            outcome,
        }
    }

    /// Apply the per-call timeout
    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.request_timeout, call)
            .await
            .unwrap_or_else(|_| Err(SegueError::Timeout(self.request_timeout.as_secs())))
    }
}
