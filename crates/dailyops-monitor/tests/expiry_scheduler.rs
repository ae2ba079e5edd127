//! Integration tests for the expiry-check scheduler.
//!
//! Uses `tokio::time::pause()` (via `start_paused`) to control time
//! deterministically: `sleep_until` resolves instantly when the runtime
//! auto-advances the clock.

use std::time::Duration;

use dailyops_monitor::{CHECK_INTERVAL, ExpiryScheduler, MonitorConfig};

// =========================================================================
// Helpers
// =========================================================================

fn config_5s() -> MonitorConfig {
    MonitorConfig::with_interval(Duration::from_secs(5))
}

// =========================================================================
// MonitorConfig
// =========================================================================

#[test]
fn test_default_interval_is_one_minute() {
    let cfg = MonitorConfig::default();
    assert_eq!(cfg.check_interval, CHECK_INTERVAL);
    assert_eq!(CHECK_INTERVAL, Duration::from_secs(60));
}

#[test]
fn test_validated_rejects_zero_interval() {
    let cfg = MonitorConfig::with_interval(Duration::ZERO).validated();
    assert_eq!(cfg.check_interval, CHECK_INTERVAL);
}

// =========================================================================
// Check firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_first_check_fires_after_one_interval() {
    let (mut scheduler, _handle) = ExpiryScheduler::new(config_5s());

    let start = tokio::time::Instant::now();
    let check = scheduler.wait_for_check().await;

    assert_eq!(check, Some(1));
    assert_eq!(scheduler.checks(), 1);
    assert_eq!(start.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_checks_increment_monotonically() {
    let (mut scheduler, _handle) = ExpiryScheduler::new(config_5s());

    for expected in 1..=4 {
        let check = scheduler.wait_for_check().await;
        assert_eq!(check, Some(expected));
    }
    assert_eq!(scheduler.checks(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_default_interval_scheduler_fires() {
    let (mut scheduler, _handle) = ExpiryScheduler::with_default_interval();

    let start = tokio::time::Instant::now();
    assert_eq!(scheduler.wait_for_check().await, Some(1));
    assert_eq!(start.elapsed(), Duration::from_secs(60));
}

// =========================================================================
// Stopping
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_stop_ends_the_check_stream() {
    let (mut scheduler, handle) = ExpiryScheduler::new(config_5s());

    assert_eq!(scheduler.wait_for_check().await, Some(1));

    handle.stop();
    assert!(handle.is_stopped());
    assert_eq!(scheduler.wait_for_check().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_first_check_yields_nothing() {
    let (mut scheduler, handle) = ExpiryScheduler::new(config_5s());

    handle.stop();

    // No check ever fires — wait_for_check returns immediately.
    assert_eq!(scheduler.wait_for_check().await, None);
    assert_eq!(scheduler.checks(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let (mut scheduler, handle) = ExpiryScheduler::new(config_5s());

    // Stopping twice, and again after the stream ended, is harmless.
    handle.stop();
    handle.stop();
    assert_eq!(scheduler.wait_for_check().await, None);
    handle.stop();
    assert!(handle.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn test_stop_while_waiting_interrupts_the_wait() {
    let (mut scheduler, handle) = ExpiryScheduler::new(MonitorConfig::with_interval(
        Duration::from_secs(3600),
    ));

    // Stop from a separate task while wait_for_check is pending on a
    // one-hour sleep. The watch channel wakes it without the sleep
    // completing.
    let stopper = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.stop();
    });

    assert_eq!(scheduler.wait_for_check().await, None);
    stopper.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_dropped_handle_counts_as_stop() {
    let (mut scheduler, handle) = ExpiryScheduler::new(config_5s());
    drop(handle);

    assert_eq!(scheduler.wait_for_check().await, None);
}

// =========================================================================
// Integration: the spawned-loop pattern (mirrors facade usage)
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_spawned_loop_stops_cleanly() {
    let (mut scheduler, handle) = ExpiryScheduler::new(config_5s());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<u64>();

    let loop_task = tokio::spawn(async move {
        while let Some(check) = scheduler.wait_for_check().await {
            if tx.send(check).is_err() {
                break;
            }
        }
        // Loop ends only via stop; report how far we got.
        scheduler.checks()
    });

    // Let three checks fire, then tear down.
    for expected in 1..=3 {
        let check = rx.recv().await.expect("check should fire");
        assert_eq!(check, expected);
    }
    handle.stop();

    let total = loop_task.await.unwrap();
    assert_eq!(total, 3);
    // Stopping again after the loop is gone is still a no-op.
    handle.stop();
}
