use planetvote::config::VoteConfig;
use planetvote::error::SessionError;
use planetvote::kernel::reactor::VoteReactor;
use planetvote::kernel::vote::{VoteNotice, VoterInfo};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

mod common;
use common::{RecordingRelay, RecordingSink};

fn ada() -> VoterInfo {
    VoterInfo::new("Ada", "Engineer")
}

#[tokio::test(start_paused = true)]
async fn test_votes_within_flush_delay_share_one_batch() {
    let sink = Arc::new(RecordingSink::healthy());
    let relay = Arc::new(RecordingRelay::default());
    let (handle, _notices, _task) = VoteReactor::spawn(VoteConfig::default(), sink.clone(), relay.clone());

    handle.cast("GitLens", ada()).await.unwrap();
    sleep(Duration::from_millis(40)).await;
    handle.cast("GitLens", ada()).await.unwrap();
    sleep(Duration::from_millis(40)).await;
    handle.cast("GitLens", ada()).await.unwrap();

    let stats = handle.settle().await.unwrap();

    let batches = sink.batches();
    assert_eq!(batches.len(), 1, "Debounced into a single batch");
    assert_eq!(batches[0].iter().map(|e| e.combo_count).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(batches[0].iter().all(|e| e.extension_id == "gitlens"));
    assert!(sink.singles().is_empty());

    assert_eq!(stats.pending, 0);
    assert_eq!(stats.batches, 1);
    assert_eq!(stats.delivered, 3);
    assert_eq!(relay.launches().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_receipt_reports_combo_immediately() {
    let sink = Arc::new(RecordingSink::healthy());
    let relay = Arc::new(RecordingRelay::default());
    let (handle, _notices, _task) = VoteReactor::spawn(VoteConfig::default(), sink.clone(), relay.clone());

    let first = handle.cast("Power Mode", ada()).await.unwrap();
    let second = handle.cast("Power Mode", ada()).await.unwrap();
    let third = handle.cast("Power Mode", ada()).await.unwrap();

    assert_eq!(first.extension_id, "power-mode");
    assert_eq!(first.combo_count, 1);
    assert_eq!(first.label, None);
    assert_eq!(second.label.as_deref(), Some("🔥 2x combo"));
    assert_eq!(third.combo_count, 3);
    assert_eq!(third.display_name, "Ada (Engineer)");

    // Nothing reaches the backend before the debounce delay.
    assert!(sink.batches().is_empty());
    assert_eq!(handle.snapshot().await.unwrap().pending, 3);
}

#[tokio::test(start_paused = true)]
async fn test_combo_window_and_idle_reset() {
    let sink = Arc::new(RecordingSink::healthy());
    let relay = Arc::new(RecordingRelay::default());
    let (handle, _notices, _task) = VoteReactor::spawn(VoteConfig::default(), sink, relay);

    assert_eq!(handle.cast("x", ada()).await.unwrap().combo_count, 1);
    sleep(Duration::from_millis(500)).await;
    assert_eq!(handle.cast("x", ada()).await.unwrap().combo_count, 2);
    sleep(Duration::from_millis(1_000)).await;
    assert_eq!(handle.cast("x", ada()).await.unwrap().combo_count, 3);
    sleep(Duration::from_millis(2_500)).await;
    assert_eq!(handle.cast("x", ada()).await.unwrap().combo_count, 1);
    assert_eq!(handle.combo_count().await.unwrap(), 1);

    sleep(Duration::from_millis(3_100)).await;
    assert_eq!(handle.combo_count().await.unwrap(), 0);

    let stats = handle.snapshot().await.unwrap();
    assert_eq!(stats.combo_resets, 1);
    assert_eq!(stats.max_combo, 3);
}

#[tokio::test(start_paused = true)]
async fn test_switching_extension_restarts_combo() {
    let sink = Arc::new(RecordingSink::healthy());
    let relay = Arc::new(RecordingRelay::default());
    let (handle, _notices, _task) = VoteReactor::spawn(VoteConfig::default(), sink, relay);

    assert_eq!(handle.cast("x", ada()).await.unwrap().combo_count, 1);
    sleep(Duration::from_millis(500)).await;
    assert_eq!(handle.cast("y", ada()).await.unwrap().combo_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_queue_sends_nothing() {
    let sink = Arc::new(RecordingSink::healthy());
    let relay = Arc::new(RecordingRelay::default());
    let (handle, _notices, _task) = VoteReactor::spawn(VoteConfig::default(), sink.clone(), relay);

    assert_eq!(handle.flush().await.unwrap(), 0);
    sleep(Duration::from_millis(500)).await;
    handle.settle().await.unwrap();

    assert!(sink.batches().is_empty());
    assert!(sink.singles().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_separate_bursts_make_separate_batches() {
    let sink = Arc::new(RecordingSink::healthy());
    let relay = Arc::new(RecordingRelay::default());
    let (handle, _notices, _task) = VoteReactor::spawn(VoteConfig::default(), sink.clone(), relay);

    handle.cast("Live Share", ada()).await.unwrap();
    handle.cast("Live Share", ada()).await.unwrap();
    handle.settle().await.unwrap();

    handle.cast("Azure Machine Learning", ada()).await.unwrap();
    handle.settle().await.unwrap();

    let batches = sink.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 2);
    assert_eq!(batches[1][0].extension_id, "azure-ml");
}

#[tokio::test(start_paused = true)]
async fn test_batch_failure_degrades_and_reports_lost_votes() {
    let mut sink = RecordingSink::batch_down();
    sink.fail_single.insert("wakatime".to_string());
    let sink = Arc::new(sink);
    let relay = Arc::new(RecordingRelay::default());
    let (handle, mut notices, _task) = VoteReactor::spawn(VoteConfig::default(), sink.clone(), relay);

    handle.cast("GitLens", ada()).await.unwrap();
    handle.cast("WakaTime", ada()).await.unwrap();
    let stats = handle.settle().await.unwrap();

    assert_eq!(sink.batches().len(), 1);
    assert_eq!(sink.singles().len(), 2, "Exactly one single attempt per event");

    assert!(matches!(
        notices.try_recv().unwrap(),
        VoteNotice::DeliveryDegraded { batch_size: 2, .. }
    ));
    match notices.try_recv().unwrap() {
        VoteNotice::VoteLost { event, .. } => assert_eq!(event.extension_id, "wakatime"),
        other => panic!("Expected lost vote, got {:?}", other),
    }
    assert!(notices.try_recv().is_err());

    assert_eq!(stats.fallbacks, 1);
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.lost, 1);

    // Lost votes are not re-queued.
    sleep(Duration::from_secs(1)).await;
    assert_eq!(sink.singles().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_anonymous_voter_gets_fallback_name() {
    let sink = Arc::new(RecordingSink::healthy());
    let relay = Arc::new(RecordingRelay::default());
    let (handle, _notices, _task) = VoteReactor::spawn(VoteConfig::default(), sink.clone(), relay.clone());

    let receipt = handle.cast("VSCode Pets", VoterInfo::default()).await.unwrap();
    handle.settle().await.unwrap();

    assert!(!receipt.display_name.is_empty());
    let launch = &relay.launches()[0];
    assert_eq!(launch.extension_id, "vscode-pets");
    assert!(!launch.voter_name.is_empty());
    assert_eq!(sink.batches()[0][0].voter_name, launch.voter_name);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_flushes_pending_votes() {
    let sink = Arc::new(RecordingSink::healthy());
    let relay = Arc::new(RecordingRelay::default());
    let (handle, _notices, task) = VoteReactor::spawn(VoteConfig::default(), sink.clone(), relay);

    handle.cast("GitLens", ada()).await.unwrap();
    handle.cast("GitLens", ada()).await.unwrap();

    let stats = handle.shutdown().await.unwrap();
    assert_eq!(stats.delivered, 2);
    assert_eq!(stats.pending, 0);
    assert_eq!(sink.batches().len(), 1);

    let final_stats = task.await.unwrap();
    assert_eq!(final_stats.votes, 2);
    assert_eq!(handle.cast("GitLens", ada()).await.unwrap_err(), SessionError::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_custom_timings_are_honoured() {
    let config = VoteConfig {
        combo_window_ms: 500,
        combo_reset_ms: 1_000,
        flush_delay_ms: 50,
    };
    let sink = Arc::new(RecordingSink::healthy());
    let relay = Arc::new(RecordingRelay::default());
    let (handle, _notices, _task) = VoteReactor::spawn(config, sink.clone(), relay);

    handle.cast("x", ada()).await.unwrap();
    sleep(Duration::from_millis(600)).await;
    assert_eq!(sink.batches().len(), 1);
    assert_eq!(handle.cast("x", ada()).await.unwrap().combo_count, 1);

    sleep(Duration::from_millis(1_100)).await;
    assert_eq!(handle.combo_count().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_long_session_keeps_exact_totals() {
    let sink = Arc::new(RecordingSink::healthy());
    let relay = Arc::new(RecordingRelay::default());
    let (handle, _notices, _task) = VoteReactor::spawn(VoteConfig::default(), sink.clone(), relay);

    for _ in 0..12_000 {
        handle.cast("GitLens", ada()).await.unwrap();
    }
    let stats = handle.shutdown().await.unwrap();

    assert_eq!(stats.votes, 12_000);
    assert_eq!(stats.delivered, 12_000);
    assert_eq!(stats.max_combo, 12_000);
    assert_eq!(stats.votes_by_extension["gitlens"], 12_000);
    assert_eq!(sink.batches().iter().map(Vec::len).sum::<usize>(), 12_000);
}
