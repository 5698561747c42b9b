//! Segue Reconciler
//!
//! Watches what each known user is playing and, when a trigger track is on,
//! makes sure its follow-up is the next item in their queue.
//!
//! # Architecture
//!
//! - [`Scheduler`] owns the roster bookkeeping (`last_checked`, in-flight set)
//!   and dispatches due users onto a bounded pool of tasks.
//! - [`UserProcessor`] runs one cycle for one user and returns a
//!   [`CycleReport`]. It produces at most one enqueue.
//! - [`ActivityTracker`] is the only state shared between parallel cycles.
//!
//! Nothing here is fatal: per-user failures end that user's cycle, roster
//! failures end the sweep, and the loop carries on until shut down.
//!
//! # Example
//!
//! ```rust,ignore
//! use segue_reconciler::{ReconcilerConfig, Scheduler};
//! use tokio_util::sync::CancellationToken;
//!
//! let mut scheduler = Scheduler::new(store, playback, cipher, ReconcilerConfig::default());
//! let shutdown = CancellationToken::new();
//! scheduler.run(shutdown.clone()).await;
//! ```

mod activity;
mod config;
mod processor;
mod scheduler;

pub use activity::ActivityTracker;
pub use config::ReconcilerConfig;
pub use processor::{CycleOutcome, CycleReport, Transition, UserProcessor};
pub use scheduler::{Scheduler, SweepSummary};
