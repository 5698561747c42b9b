use crate::activity::ActivityTracker;
use crate::config::ReconcilerConfig;
use crate::processor::{CycleReport, UserProcessor};
use segue_core::{CollaboratorStore, PlaybackClient, Result, SegueError, TokenCipher, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// What a single sweep did
#[derive(Debug, Clone, Default)]
pub struct SweepSummary {
    pub roster_size: usize,
    pub dispatched: usize,
    pub reports: Vec<CycleReport>,
}

impl SweepSummary {
    /// Report of the given user, if they were dispatched
    pub fn report_for(&self, user_id: &UserId) -> Option<&CycleReport> {
        self.reports.iter().find(|report| &report.user_id == user_id)
    }
}

/// The reconciliation loop.
///
/// Single writer of `last_checked` and the in-flight set; cycles themselves
/// run on a `JoinSet` bounded by a semaphore.
pub struct Scheduler {
    store: Arc<dyn CollaboratorStore>,
    processor: UserProcessor,
    config: ReconcilerConfig,
    permits: Arc<Semaphore>,
    last_checked: HashMap<UserId, Instant>,
    in_flight: HashSet<UserId>,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn CollaboratorStore>,
        playback: Arc<dyn PlaybackClient>,
        cipher: Arc<dyn TokenCipher>,
        config: ReconcilerConfig,
    ) -> Self {
        let processor = UserProcessor::new(
            Arc::clone(&store),
            playback,
            cipher,
            ActivityTracker::new(),
            config.request_timeout,
        );

        Self {
            store,
            processor,
            permits: Arc::new(Semaphore::new(config.max_concurrent_users.max(1))),
            config,
            last_checked: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }

    pub fn activity(&self) -> &ActivityTracker {
        self.processor.activity()
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Users tracked in `last_checked`
    pub fn known_users(&self) -> usize {
        self.last_checked.len()
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// Cancellation is observed between sweeps and while sleeping; a sweep in
    /// progress finishes first, bounded by the per-call timeouts.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!(
            check_interval_secs = self.config.check_interval.as_secs(),
            sweep_pause_secs = self.config.sweep_pause.as_secs(),
            max_concurrent_users = self.config.max_concurrent_users,
            "Reconciliation loop started"
        );

        while !shutdown.is_cancelled() {
            match self.sweep().await {
                Ok(summary) => debug!(
                    roster_size = summary.roster_size,
                    dispatched = summary.dispatched,
                    "Sweep complete"
                ),
                Err(e) => error!(kind = ?e.kind(), "Failed to fetch user roster: {}", e),
            }

            tokio::select! {
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(self.config.sweep_pause) => {}
            }
        }

        info!("Reconciliation loop stopped");
    }

    /// One pass over the roster: process every due user and wait for all of
    /// them.
    ///
    /// # Errors
    ///
    /// Fails only if the roster cannot be fetched; per-user failures end up in
    /// the reports.
    pub async fn sweep(&mut self) -> Result<SweepSummary> {
        let roster = self.fetch_roster().await?;
        let roster_size = roster.len();
        self.prune(&roster).await;

        let now = Instant::now();
        let mut tasks = JoinSet::new();

        for user_id in roster {
            if self.in_flight.contains(&user_id) || !self.is_due(&user_id, now) {
                continue;
            }

            self.last_checked.insert(user_id.clone(), now);
            self.in_flight.insert(user_id.clone());

            let processor = self.processor.clone();
            let permits = Arc::clone(&self.permits);
            tasks.spawn(async move {
                // Closed only on drop of the scheduler
                let _permit = permits.acquire_owned().await.ok();
                processor.process(&user_id).await
            });
        }

        let dispatched = tasks.len();
        let mut reports = Vec::with_capacity(dispatched);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => {
                    self.in_flight.remove(&report.user_id);
                    reports.push(report);
                }
                Err(e) => error!("User cycle aborted: {}", e),
            }
        }
        self.in_flight.clear();

        Ok(SweepSummary {
            roster_size,
            dispatched,
            reports,
        })
    }

    fn is_due(&self, user_id: &UserId, now: Instant) -> bool {
        match self.last_checked.get(user_id) {
            Some(last) => now.duration_since(*last) >= self.config.check_interval,
            None => true,
        }
    }

    async fn fetch_roster(&self) -> Result<Vec<UserId>> {
        let timeout = self.config.request_timeout;
        tokio::time::timeout(timeout, self.store.list_users())
            .await
            .unwrap_or_else(|_| Err(SegueError::Timeout(timeout.as_secs())))
    }

    /// Drop bookkeeping of users that left the roster
    async fn prune(&mut self, roster: &[UserId]) {
        let current: HashSet<UserId> = roster.iter().cloned().collect();
        self.last_checked
            .retain(|user_id, _| current.contains(user_id));
        self.activity().retain(&current).await;
    }
}
