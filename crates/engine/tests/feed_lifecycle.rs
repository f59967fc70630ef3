//! Synthetic feed timing and lifecycle, on a paused clock.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use common::test_service;
use hazardwatch_core::error::CoreError;
use hazardwatch_core::hazard::NewHazardEvent;
use hazardwatch_engine::{ReportSource, SyntheticSource};

const TICK: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Test: one tick, one event
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn one_tick_at_full_probability_adds_exactly_one_event() {
    let service = test_service();
    assert!(service.start_feed(TICK, 1.0).await.unwrap());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(service.event_count().await, 0, "no tick before one interval");

    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(service.event_count().await, 1);

    assert!(service.stop_feed().await);
}

#[tokio::test(start_paused = true)]
async fn zero_probability_never_inserts() {
    let service = test_service();
    service.start_feed(TICK, 0.0).await.unwrap();

    tokio::time::sleep(TICK * 10).await;
    assert_eq!(service.event_count().await, 0);
    service.stop_feed().await;
}

// ---------------------------------------------------------------------------
// Test: idempotent start / stop
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn start_and_stop_are_idempotent() {
    let service = test_service();
    assert!(!service.stop_feed().await);

    assert!(service.start_feed(TICK, 1.0).await.unwrap());
    assert!(!service.start_feed(Duration::from_secs(1), 0.5).await.unwrap());

    let status = service.feed_status().await;
    assert!(status.running);
    assert_eq!(status.interval_ms, Some(30_000));
    assert_eq!(status.probability, Some(1.0));

    assert!(service.stop_feed().await);
    assert!(!service.stop_feed().await);
    assert!(!service.feed_status().await.running);
}

#[tokio::test(start_paused = true)]
async fn no_tick_runs_after_stop_returns() {
    let service = test_service();
    service.start_feed(TICK, 1.0).await.unwrap();
    tokio::time::sleep(TICK + Duration::from_secs(1)).await;
    assert_eq!(service.event_count().await, 1);

    service.stop_feed().await;
    tokio::time::sleep(TICK * 5).await;
    assert_eq!(service.event_count().await, 1);
}

#[tokio::test]
async fn invalid_feed_settings_are_rejected() {
    let service = test_service();
    assert_matches!(service.start_feed(TICK, 2.0).await, Err(CoreError::Validation(_)));
    assert_matches!(service.start_feed(Duration::ZERO, 0.5).await, Err(CoreError::Validation(_)));
    assert!(!service.feed_status().await.running);
}

#[tokio::test(start_paused = true)]
async fn start_on_running_feed_ignores_invalid_settings() {
    let service = test_service();
    assert!(service.start_feed(TICK, 1.0).await.unwrap());

    assert_matches!(service.start_feed(TICK, 2.0).await, Ok(false));
    assert_matches!(service.start_feed(Duration::ZERO, 0.5).await, Ok(false));
    assert_eq!(service.feed_status().await.probability, Some(1.0));

    assert!(service.stop_feed().await);
}

// ---------------------------------------------------------------------------
// Test: in-flight tick completes on stop
// ---------------------------------------------------------------------------

/// Source that takes a while to produce and counts completed batches.
struct SlowSource {
    inner: SyntheticSource,
    completed: Arc<AtomicUsize>,
}

#[async_trait]
impl ReportSource for SlowSource {
    async fn next_batch(&self) -> Result<Vec<NewHazardEvent>, CoreError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        let batch = self.inner.next_batch().await?;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(batch)
    }
}

#[tokio::test(start_paused = true)]
async fn stop_waits_for_in_flight_tick() {
    let service = test_service();
    let completed = Arc::new(AtomicUsize::new(0));
    let source = Arc::new(SlowSource {
        inner: SyntheticSource::with_seed(1.0, 3).unwrap(),
        completed: Arc::clone(&completed),
    });
    service.feed().start_with_source(TICK, source, None).await.unwrap();

    // Land in the middle of the first tick's slow production.
    tokio::time::sleep(TICK + Duration::from_secs(2)).await;
    assert_eq!(completed.load(Ordering::SeqCst), 0);

    assert!(service.stop_feed().await);
    assert_eq!(completed.load(Ordering::SeqCst), 1);
    assert_eq!(service.event_count().await, 1);
}
