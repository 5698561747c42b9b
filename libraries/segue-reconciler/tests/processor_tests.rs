//! Per-user cycle behaviour against in-memory collaborators.

mod common;

use common::{track, user, Harness};
use segue_core::{ErrorKind, PlaybackState, QueueEntry};
use segue_reconciler::{CycleOutcome, Transition};
use std::time::Duration;

// =============================================================================
// Activity
// =============================================================================

mod activity {
    use super::*;

    #[tokio::test]
    async fn test_never_active_user_has_no_transition() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.playback.stopped("alice");
        let processor = h.processor();

        for _ in 0..3 {
            let report = processor.process(&user("alice")).await;
            assert_eq!(report.outcome, CycleOutcome::Inactive);
            assert_eq!(report.transition, None);
        }

        assert!(!processor.activity().is_active(&user("alice")).await);
        assert!(!processor.activity().is_tracked(&user("alice")).await);
    }

    #[tokio::test]
    async fn test_failed_probe_of_never_active_user_is_silent() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.playback.failing("alice");
        let processor = h.processor();

        let report = processor.process(&user("alice")).await;
        assert_eq!(
            report.outcome,
            CycleOutcome::PlaybackUnavailable(ErrorKind::Transient)
        );
        assert_eq!(report.transition, None);
        assert!(!processor.activity().is_tracked(&user("alice")).await);
    }

    #[tokio::test]
    async fn test_active_inactive_active_yields_two_transitions() {
        let h = Harness::new();
        h.store.add_user("alice");
        let processor = h.processor();

        h.playback.playing("alice", "song", &[]);
        let first = processor.process(&user("alice")).await;
        assert_eq!(first.transition, Some(Transition::BecameActive));

        let mut transitions = Vec::new();
        h.playback.stopped("alice");
        transitions.extend(processor.process(&user("alice")).await.transition);
        h.playback.playing("alice", "song", &[]);
        transitions.extend(processor.process(&user("alice")).await.transition);

        assert_eq!(
            transitions,
            vec![Transition::BecameInactive, Transition::BecameActive]
        );
    }

    #[tokio::test]
    async fn test_repeated_observations_do_not_transition() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.playback.playing("alice", "song", &[]);
        let processor = h.processor();

        let reports = [
            processor.process(&user("alice")).await,
            processor.process(&user("alice")).await,
        ];
        assert_eq!(reports[0].transition, Some(Transition::BecameActive));
        assert_eq!(reports[1].transition, None);

        h.playback.stopped("alice");
        let inactive = [
            processor.process(&user("alice")).await,
            processor.process(&user("alice")).await,
        ];
        assert_eq!(inactive[0].transition, Some(Transition::BecameInactive));
        assert_eq!(inactive[1].transition, None);
    }

    #[tokio::test]
    async fn test_session_failure_deactivates_active_user() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.playback.playing("alice", "song", &[]);
        let processor = h.processor();
        processor.process(&user("alice")).await;

        h.playback.failing("alice");
        let report = processor.process(&user("alice")).await;

        assert_eq!(report.transition, Some(Transition::BecameInactive));
        assert_eq!(
            report.outcome,
            CycleOutcome::PlaybackUnavailable(ErrorKind::Transient)
        );
        assert!(!processor.activity().is_active(&user("alice")).await);
    }

    #[tokio::test]
    async fn test_queue_failure_keeps_user_active() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.store.add_mapping("alice", "intro", "main");
        h.playback.playing("alice", "intro", &["main"]);
        let processor = h.processor();

        let first = processor.process(&user("alice")).await;
        assert_eq!(first.transition, Some(Transition::BecameActive));

        h.playback.set_queue_failure("alice", true);
        let failed = processor.process(&user("alice")).await;
        assert_eq!(failed.transition, None);
        assert_eq!(
            failed.outcome,
            CycleOutcome::QueueUnavailable(ErrorKind::Transient)
        );
        assert!(processor.activity().is_active(&user("alice")).await);
        assert_eq!(h.playback.total_enqueue_attempts(), 0);

        h.playback.set_queue_failure("alice", false);
        let recovered = processor.process(&user("alice")).await;
        assert_eq!(recovered.transition, None);
        assert_eq!(recovered.outcome, CycleOutcome::AlreadyQueued(track("main")));
    }

    #[tokio::test]
    async fn test_queue_failure_on_first_sighting_still_activates() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.playback.playing("alice", "song", &[]);
        h.playback.set_queue_failure("alice", true);
        let processor = h.processor();

        let report = processor.process(&user("alice")).await;
        assert_eq!(report.transition, Some(Transition::BecameActive));
        assert_eq!(
            report.outcome,
            CycleOutcome::QueueUnavailable(ErrorKind::Transient)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_playback_times_out() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.playback.playing("alice", "song", &[]);
        h.playback.set_delay(Duration::from_secs(60));
        let processor = h.processor_with_timeout(Duration::from_secs(10));

        let report = processor.process(&user("alice")).await;
        assert_eq!(
            report.outcome,
            CycleOutcome::PlaybackUnavailable(ErrorKind::Transient)
        );
    }
}

// =============================================================================
// Credentials
// =============================================================================

mod credentials {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_aborts_cycle() {
        let h = Harness::new();
        h.playback.playing("ghost", "trigger", &[]);
        let processor = h.processor();

        let report = processor.process(&user("ghost")).await;
        assert_eq!(report.outcome, CycleOutcome::CredentialsUnavailable);
        assert_eq!(h.playback.total_enqueue_attempts(), 0);
    }

    #[tokio::test]
    async fn test_undecryptable_token_leaves_state_untouched() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.playback.playing("alice", "song", &[]);
        let processor = h.processor();
        processor.process(&user("alice")).await;

        h.store.corrupt_token("alice");
        let report = processor.process(&user("alice")).await;

        assert_eq!(report.outcome, CycleOutcome::CredentialsUnavailable);
        assert_eq!(report.transition, None);
        assert!(processor.activity().is_active(&user("alice")).await);
    }
}

// =============================================================================
// Enqueue Decision
// =============================================================================

mod enqueue {
    use super::*;

    #[tokio::test]
    async fn test_trigger_with_empty_queue_enqueues_once() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.store.add_mapping("alice", "intro", "main");
        h.playback.playing("alice", "intro", &[]);
        let processor = h.processor();

        let first = processor.process(&user("alice")).await;
        assert_eq!(first.outcome, CycleOutcome::Enqueued(track("main")));
        assert_eq!(first.transition, Some(Transition::BecameActive));

        // The follow-up is now next in the queue
        let second = processor.process(&user("alice")).await;
        assert_eq!(second.outcome, CycleOutcome::AlreadyQueued(track("main")));

        assert_eq!(h.playback.enqueue_attempts("alice"), vec![track("main")]);
    }

    #[tokio::test]
    async fn test_follow_up_already_next_is_not_enqueued() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.store.add_mapping("alice", "intro", "main");
        h.playback.playing("alice", "intro", &["main", "other"]);
        let processor = h.processor();

        let report = processor.process(&user("alice")).await;
        assert_eq!(report.outcome, CycleOutcome::AlreadyQueued(track("main")));
        assert_eq!(h.playback.total_enqueue_attempts(), 0);
    }

    #[tokio::test]
    async fn test_follow_up_later_in_queue_is_enqueued() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.store.add_mapping("alice", "intro", "main");
        h.playback.playing("alice", "intro", &["other", "main"]);
        let processor = h.processor();

        let report = processor.process(&user("alice")).await;
        assert_eq!(report.outcome, CycleOutcome::Enqueued(track("main")));
    }

    #[tokio::test]
    async fn test_unidentified_next_entry_counts_as_different() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.store.add_mapping("alice", "intro", "main");
        h.playback.set_state(
            "alice",
            PlaybackState {
                current_track_id: Some(track("intro")),
                queue: vec![QueueEntry::unidentified(), QueueEntry::track(track("main"))],
            },
        );
        let processor = h.processor();

        let report = processor.process(&user("alice")).await;
        assert_eq!(report.outcome, CycleOutcome::Enqueued(track("main")));
    }

    #[tokio::test]
    async fn test_unmapped_track_is_left_alone() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.store.add_mapping("alice", "intro", "main");
        h.playback.playing("alice", "something-else", &[]);
        let processor = h.processor();

        let report = processor.process(&user("alice")).await;
        assert_eq!(report.outcome, CycleOutcome::NoMapping);
        assert_eq!(h.playback.total_enqueue_attempts(), 0);
    }

    #[tokio::test]
    async fn test_mappings_are_per_user() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.store.add_user("bob");
        h.store.add_mapping("bob", "intro", "main");
        h.playback.playing("alice", "intro", &[]);
        let processor = h.processor();

        let report = processor.process(&user("alice")).await;
        assert_eq!(report.outcome, CycleOutcome::NoMapping);
    }

    #[tokio::test]
    async fn test_nothing_playing_still_marks_active() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.playback.set_state("alice", PlaybackState::default());
        let processor = h.processor();

        let report = processor.process(&user("alice")).await;
        assert_eq!(report.outcome, CycleOutcome::NothingPlaying);
        assert_eq!(report.transition, Some(Transition::BecameActive));
        assert_eq!(h.playback.queue_reads(), 0);
    }

    #[tokio::test]
    async fn test_mapping_fetch_failure_ends_cycle() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.store.add_mapping("alice", "intro", "main");
        h.store.set_mappings_failure(true);
        h.playback.playing("alice", "intro", &[]);
        let processor = h.processor();

        let report = processor.process(&user("alice")).await;
        assert_eq!(report.outcome, CycleOutcome::MappingsUnavailable);
        assert_eq!(h.playback.total_enqueue_attempts(), 0);
    }

    #[tokio::test]
    async fn test_failed_enqueue_is_retried_next_cycle() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.store.add_mapping("alice", "intro", "main");
        h.playback.playing("alice", "intro", &[]);
        h.playback.fail_next_enqueues(1);
        let processor = h.processor();

        let first = processor.process(&user("alice")).await;
        assert_eq!(first.outcome, CycleOutcome::EnqueueFailed(track("main")));
        assert_eq!(h.playback.enqueue_attempts("alice").len(), 1);

        let second = processor.process(&user("alice")).await;
        assert_eq!(second.outcome, CycleOutcome::Enqueued(track("main")));
        assert_eq!(h.playback.enqueue_attempts("alice").len(), 2);
    }

    #[tokio::test]
    async fn test_first_mapping_wins_for_duplicate_trigger() {
        let h = Harness::new();
        h.store.add_user("alice");
        h.store.add_mapping("alice", "intro", "first");
        h.store.add_mapping("alice", "intro", "second");
        h.playback.playing("alice", "intro", &[]);
        let processor = h.processor();

        let report = processor.process(&user("alice")).await;
        assert_eq!(report.outcome, CycleOutcome::Enqueued(track("first")));
    }
}
