//! In-memory collaborators for reconciler tests

#![allow(dead_code)]

use async_trait::async_trait;
use segue_core::{
    AccessToken, CollaboratorStore, PlaybackClient, PlaybackState, PlaybackStatus, QueueEntry,
    Result, SealedToken, SegueError, SongMapping, TokenCipher, TrackId, UserId,
};
use segue_reconciler::{ReconcilerConfig, Scheduler, UserProcessor};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const SEAL_PREFIX: &str = "sealed:";

pub fn user(id: &str) -> UserId {
    UserId::new(id)
}

pub fn track(id: &str) -> TrackId {
    TrackId::new(id)
}

/// Plaintext token every test user gets
pub fn token_of(user_id: &str) -> String {
    format!("tok-{}", user_id)
}

// =============================================================================
// Store
// =============================================================================

#[derive(Default)]
struct StoreData {
    roster: Vec<UserId>,
    tokens: HashMap<UserId, SealedToken>,
    broken_tokens: Vec<UserId>,
    mappings: HashMap<UserId, Vec<SongMapping>>,
    roster_fails: bool,
    mappings_fail: bool,
}

#[derive(Default)]
pub struct FakeStore {
    data: Mutex<StoreData>,
    roster_calls: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Add a user with a valid sealed token
    pub fn add_user(&self, user_id: &str) {
        let mut data = self.data.lock().unwrap();
        let id = user(user_id);
        data.roster.push(id.clone());
        data.tokens.insert(
            id,
            SealedToken::new(format!("{}{}", SEAL_PREFIX, token_of(user_id))),
        );
    }

    /// Add a user whose stored token cannot be decrypted
    pub fn add_user_with_corrupt_token(&self, user_id: &str) {
        let mut data = self.data.lock().unwrap();
        let id = user(user_id);
        data.roster.push(id.clone());
        data.tokens.insert(id, SealedToken::new("garbage"));
    }

    /// Add a user whose token fetch errors
    pub fn add_user_with_failing_token(&self, user_id: &str) {
        let mut data = self.data.lock().unwrap();
        let id = user(user_id);
        data.roster.push(id.clone());
        data.broken_tokens.push(id);
    }

    pub fn corrupt_token(&self, user_id: &str) {
        self.data
            .lock()
            .unwrap()
            .tokens
            .insert(user(user_id), SealedToken::new("garbage"));
    }

    pub fn remove_user(&self, user_id: &str) {
        let mut data = self.data.lock().unwrap();
        let id = user(user_id);
        data.roster.retain(|u| u != &id);
        data.tokens.remove(&id);
        data.mappings.remove(&id);
    }

    /// Add a roster entry without touching tokens
    pub fn push_roster_entry(&self, user_id: &str) {
        self.data.lock().unwrap().roster.push(user(user_id));
    }

    pub fn add_mapping(&self, user_id: &str, trigger: &str, queue: &str) {
        let mut data = self.data.lock().unwrap();
        let list = data.mappings.entry(user(user_id)).or_default();
        let id = format!("m{}", list.len() + 1);
        list.push(SongMapping::new(id, user(user_id), track(trigger), track(queue)));
    }

    pub fn set_roster_failure(&self, fails: bool) {
        self.data.lock().unwrap().roster_fails = fails;
    }

    pub fn set_mappings_failure(&self, fails: bool) {
        self.data.lock().unwrap().mappings_fail = fails;
    }

    pub fn roster_calls(&self) -> usize {
        self.roster_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollaboratorStore for FakeStore {
    async fn list_users(&self) -> Result<Vec<UserId>> {
        self.roster_calls.fetch_add(1, Ordering::SeqCst);
        let data = self.data.lock().unwrap();
        if data.roster_fails {
            return Err(SegueError::transient("store returned 503"));
        }
        Ok(data.roster.clone())
    }

    async fn get_user_token(&self, user_id: &UserId) -> Result<Option<SealedToken>> {
        let data = self.data.lock().unwrap();
        if data.broken_tokens.contains(user_id) {
            return Err(SegueError::transient("store returned 500"));
        }
        Ok(data.tokens.get(user_id).cloned())
    }

    async fn get_user_mappings(&self, user_id: &UserId) -> Result<Vec<SongMapping>> {
        let data = self.data.lock().unwrap();
        if data.mappings_fail {
            return Err(SegueError::transient("store returned 502"));
        }
        Ok(data.mappings.get(user_id).cloned().unwrap_or_default())
    }
}

// =============================================================================
// Cipher
// =============================================================================

/// Tokens are "sealed" by prefixing them; anything else fails to open.
pub struct PlainCipher;

impl TokenCipher for PlainCipher {
    fn seal(&self, token: &AccessToken) -> Result<SealedToken> {
        Ok(SealedToken::new(format!("{}{}", SEAL_PREFIX, token.secret())))
    }

    fn open(&self, sealed: &SealedToken) -> Result<AccessToken> {
        sealed
            .as_str()
            .strip_prefix(SEAL_PREFIX)
            .map(AccessToken::new)
            .ok_or_else(|| SegueError::Decryption("bad seal".to_string()))
    }
}

// =============================================================================
// Playback
// =============================================================================

#[derive(Clone)]
enum Scripted {
    Playing(PlaybackState),
    Stopped,
    Fail,
}

#[derive(Default)]
struct PlaybackData {
    by_token: HashMap<String, Scripted>,
    unreadable_queues: HashSet<String>,
    enqueue_calls: Vec<(String, TrackId)>,
    queue_reads: usize,
    failing_enqueues: usize,
    delay: Option<Duration>,
}

/// Playback service keyed by plaintext token.
///
/// Unknown tokens report no active session. A successful enqueue puts the
/// track at the front of the queue, ahead of context tracks.
#[derive(Default)]
pub struct FakePlayback {
    data: Mutex<PlaybackData>,
}

impl FakePlayback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `user_id` is playing `current`, followed by `queue`
    pub fn playing(&self, user_id: &str, current: &str, queue: &[&str]) {
        let state = PlaybackState {
            current_track_id: Some(track(current)),
            queue: queue.iter().map(|id| QueueEntry::track(track(id))).collect(),
        };
        self.set(user_id, Scripted::Playing(state));
    }

    pub fn set_state(&self, user_id: &str, state: PlaybackState) {
        self.set(user_id, Scripted::Playing(state));
    }

    pub fn stopped(&self, user_id: &str) {
        self.set(user_id, Scripted::Stopped);
    }

    /// Session reads fail
    pub fn failing(&self, user_id: &str) {
        self.set(user_id, Scripted::Fail);
    }

    /// Queue reads fail while the session itself stays readable
    pub fn set_queue_failure(&self, user_id: &str, fails: bool) {
        let mut data = self.data.lock().unwrap();
        if fails {
            data.unreadable_queues.insert(token_of(user_id));
        } else {
            data.unreadable_queues.remove(&token_of(user_id));
        }
    }

    pub fn queue_reads(&self) -> usize {
        self.data.lock().unwrap().queue_reads
    }

    /// The next `count` enqueue calls fail
    pub fn fail_next_enqueues(&self, count: usize) {
        self.data.lock().unwrap().failing_enqueues = count;
    }

    /// Every call sleeps this long before answering
    pub fn set_delay(&self, delay: Duration) {
        self.data.lock().unwrap().delay = Some(delay);
    }

    /// Tracks the user asked to enqueue, successful or not
    pub fn enqueue_attempts(&self, user_id: &str) -> Vec<TrackId> {
        let token = token_of(user_id);
        self.data
            .lock()
            .unwrap()
            .enqueue_calls
            .iter()
            .filter(|(t, _)| *t == token)
            .map(|(_, track)| track.clone())
            .collect()
    }

    pub fn total_enqueue_attempts(&self) -> usize {
        self.data.lock().unwrap().enqueue_calls.len()
    }

    fn set(&self, user_id: &str, scripted: Scripted) {
        self.data
            .lock()
            .unwrap()
            .by_token
            .insert(token_of(user_id), scripted);
    }

    async fn pause(&self) {
        let delay = self.data.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl PlaybackClient for FakePlayback {
    async fn get_playback_state(&self, token: &AccessToken) -> Result<PlaybackStatus> {
        self.pause().await;
        let data = self.data.lock().unwrap();
        match data.by_token.get(token.secret()) {
            Some(Scripted::Playing(state)) => {
                Ok(PlaybackStatus::Active(state.current_track_id.clone()))
            }
            Some(Scripted::Fail) => Err(SegueError::transient("playback returned 502")),
            Some(Scripted::Stopped) | None => Ok(PlaybackStatus::NoActiveSession),
        }
    }

    async fn get_queue(&self, token: &AccessToken) -> Result<Vec<QueueEntry>> {
        self.pause().await;
        let mut data = self.data.lock().unwrap();
        data.queue_reads += 1;
        if data.unreadable_queues.contains(token.secret()) {
            return Err(SegueError::transient("queue returned 503"));
        }
        match data.by_token.get(token.secret()) {
            Some(Scripted::Playing(state)) => Ok(state.queue.clone()),
            Some(Scripted::Fail) => Err(SegueError::transient("playback returned 502")),
            Some(Scripted::Stopped) | None => Ok(Vec::new()),
        }
    }

    async fn enqueue_track(&self, token: &AccessToken, track_id: &TrackId) -> Result<()> {
        self.pause().await;
        let mut data = self.data.lock().unwrap();
        data.enqueue_calls
            .push((token.secret().to_string(), track_id.clone()));

        if data.failing_enqueues > 0 {
            data.failing_enqueues -= 1;
            return Err(SegueError::transient("playback returned 503"));
        }

        if let Some(Scripted::Playing(state)) = data.by_token.get_mut(token.secret()) {
            state.queue.insert(0, QueueEntry::track(track_id.clone()));
        }
        Ok(())
    }
}

// =============================================================================
// Wiring
// =============================================================================

pub struct Harness {
    pub store: Arc<FakeStore>,
    pub playback: Arc<FakePlayback>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: FakeStore::new(),
            playback: FakePlayback::new(),
        }
    }

    pub fn processor(&self) -> UserProcessor {
        self.processor_with_timeout(Duration::from_secs(10))
    }

    pub fn processor_with_timeout(&self, timeout: Duration) -> UserProcessor {
        UserProcessor::new(
            self.store.clone(),
            self.playback.clone(),
            Arc::new(PlainCipher),
            segue_reconciler::ActivityTracker::new(),
            timeout,
        )
    }

    pub fn scheduler(&self, config: ReconcilerConfig) -> Scheduler {
        Scheduler::new(
            self.store.clone(),
            self.playback.clone(),
            Arc::new(PlainCipher),
            config,
        )
    }
}
