use std::time::Duration;

/// Cadence and resource limits of the reconciliation loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Minimum time between two cycles of the same user
    pub check_interval: Duration,
    /// Sleep after every sweep, including failed ones
    pub sweep_pause: Duration,
    /// Budget for every single collaborator call
    pub request_timeout: Duration,
    /// Upper bound on user cycles running at once
    pub max_concurrent_users: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(30),
            sweep_pause: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_concurrent_users: 8,
        }
    }
}
