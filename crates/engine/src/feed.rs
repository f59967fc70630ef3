//! Synthetic hazard feed.
//!
//! [`FeedGenerator`] ticks on a fixed interval and asks a [`ReportSource`]
//! for new drafts, inserting each through the ordinary [`EventStore`]
//! contract. [`SyntheticSource`] is the simulated producer; a real ingestion
//! adapter plugs in behind the same trait. [`FeedController`] owns the
//! background task and makes start/stop idempotent.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hazardwatch_core::catalog::{
    HazardType, Priority, Severity, COASTAL_SITES, MAX_SEVERITY, MIN_SEVERITY,
};
use hazardwatch_core::error::CoreError;
use hazardwatch_core::hazard::{Location, NewHazardEvent, Reporter, MAX_CONFIDENCE};
use hazardwatch_events::{AlertNotification, EventBus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::store::EventStore;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const SYNTHETIC_TITLE: &str = "New Hazard Alert";
const SYNTHETIC_DESCRIPTION: &str =
    "Automated detection system has identified a potential coastal hazard.";
const SYNTHETIC_REPORTER: &str = "Automated Detection";
const MAX_SYNTHETIC_AFFECTED_PEOPLE: u64 = 10_000;

// ---------------------------------------------------------------------------
// ReportSource
// ---------------------------------------------------------------------------

/// Producer of new event drafts, polled once per feed tick.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Drafts that arrived since the previous poll; usually empty.
    async fn next_batch(&self) -> Result<Vec<NewHazardEvent>, CoreError>;
}

/// Simulated producer: one Bernoulli trial per poll.
///
/// On success it emits a single draft whose hazard type, severity, coastal
/// site and priority are drawn uniformly from the catalog.
pub struct SyntheticSource {
    probability: f64,
    rng: Mutex<StdRng>,
}

impl SyntheticSource {
    pub fn new(probability: f64) -> Result<Self, CoreError> {
        Self::with_rng(probability, StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic source for tests and replays.
    pub fn with_seed(probability: f64, seed: u64) -> Result<Self, CoreError> {
        Self::with_rng(probability, StdRng::seed_from_u64(seed))
    }

    fn with_rng(probability: f64, rng: StdRng) -> Result<Self, CoreError> {
        validate_probability(probability)?;
        Ok(Self {
            probability,
            rng: Mutex::new(rng),
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    fn draw(&self) -> Result<Option<NewHazardEvent>, CoreError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| CoreError::Internal("synthetic feed rng poisoned".into()))?;

        if !rng.random_bool(self.probability) {
            return Ok(None);
        }

        let hazard_type = HazardType::all()[rng.random_range(0..HazardType::all().len())];
        let severity = Severity::new(rng.random_range(MIN_SEVERITY..=MAX_SEVERITY))?;
        let site = &COASTAL_SITES[rng.random_range(0..COASTAL_SITES.len())];
        let priority = Priority::all()[rng.random_range(0..Priority::all().len())];

        Ok(Some(NewHazardEvent {
            id: None,
            tracking_id: None,
            hazard_type,
            severity,
            priority,
            title: SYNTHETIC_TITLE.into(),
            description: SYNTHETIC_DESCRIPTION.into(),
            location: Location {
                latitude: site.latitude,
                longitude: site.longitude,
                name: site.name.into(),
            },
            reporter: Reporter {
                name: SYNTHETIC_REPORTER.into(),
                phone: None,
                email: None,
                verified: false,
            },
            confidence: rng.random_range(0..=MAX_CONFIDENCE),
            affected_people: Some(rng.random_range(0..MAX_SYNTHETIC_AFFECTED_PEOPLE)),
            affected_areas: vec![site.name.to_string()],
            media: vec![],
            public_visibility: false,
        }))
    }
}

impl fmt::Debug for SyntheticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntheticSource")
            .field("probability", &self.probability)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReportSource for SyntheticSource {
    async fn next_batch(&self) -> Result<Vec<NewHazardEvent>, CoreError> {
        Ok(self.draw()?.into_iter().collect())
    }
}

fn validate_probability(probability: f64) -> Result<(), CoreError> {
    if (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Feed probability must be within [0, 1], got {probability}"
        )))
    }
}

fn validate_interval(interval: Duration) -> Result<(), CoreError> {
    if interval.is_zero() {
        Err(CoreError::Validation("Feed interval must be positive".into()))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FeedGenerator
// ---------------------------------------------------------------------------

/// Periodic producer loop.
pub struct FeedGenerator {
    store: Arc<dyn EventStore>,
    bus: Arc<EventBus>,
    source: Arc<dyn ReportSource>,
    interval: Duration,
}

impl fmt::Debug for FeedGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedGenerator")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl FeedGenerator {
    pub fn new(
        store: Arc<dyn EventStore>,
        bus: Arc<EventBus>,
        source: Arc<dyn ReportSource>,
        interval: Duration,
    ) -> Result<Self, CoreError> {
        validate_interval(interval)?;
        Ok(Self {
            store,
            bus,
            source,
            interval,
        })
    }

    /// Run the feed loop.
    ///
    /// The first tick fires one full interval after start. The loop exits
    /// when `cancel` fires; a tick already in progress finishes first.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Synthetic feed cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick_once().await;
                }
            }
        }
    }

    /// Poll the source once and store what it produced.
    ///
    /// Returns the number of events inserted. Failures are logged and end
    /// the tick; they never propagate.
    pub async fn tick_once(&self) -> usize {
        let batch = match self.source.next_batch().await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::error!(error = %e, "Feed source failed, skipping tick");
                return 0;
            }
        };

        let mut inserted = 0;
        for draft in batch {
            match self.store.insert(draft).await {
                Ok(event) => {
                    tracing::info!(
                        event_id = %event.id,
                        tracking_id = %event.tracking_id,
                        hazard_type = %event.hazard_type,
                        severity = event.severity.get(),
                        "Feed produced hazard event"
                    );
                    self.bus.publish(AlertNotification::created(&event));
                    inserted += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Feed insert failed, skipping tick");
                    break;
                }
            }
        }
        inserted
    }
}

// ---------------------------------------------------------------------------
// FeedController
// ---------------------------------------------------------------------------

/// Observable state of the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedStatus {
    pub running: bool,
    pub interval_ms: Option<u64>,
    /// `None` when running a non-synthetic source.
    pub probability: Option<f64>,
}

struct RunningFeed {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    interval: Duration,
    probability: Option<f64>,
}

/// Owns the feed's background task.
pub struct FeedController {
    store: Arc<dyn EventStore>,
    bus: Arc<EventBus>,
    running: tokio::sync::Mutex<Option<RunningFeed>>,
}

impl FeedController {
    pub fn new(store: Arc<dyn EventStore>, bus: Arc<EventBus>) -> Self {
        Self {
            store,
            bus,
            running: tokio::sync::Mutex::new(None),
        }
    }

    /// Start the synthetic feed. Returns `false` if it was already running,
    /// in which case the arguments are ignored, even invalid ones.
    pub async fn start(&self, interval: Duration, probability: f64) -> Result<bool, CoreError> {
        self.spawn_if_stopped(interval, Some(probability), || {
            let source: Arc<dyn ReportSource> = Arc::new(SyntheticSource::new(probability)?);
            Ok(source)
        })
        .await
    }

    /// Start the feed with any producer behind the [`ReportSource`] seam.
    pub async fn start_with_source(
        &self,
        interval: Duration,
        source: Arc<dyn ReportSource>,
        probability: Option<f64>,
    ) -> Result<bool, CoreError> {
        self.spawn_if_stopped(interval, probability, || Ok(source)).await
    }

    /// Check for a live feed under the lock before building anything, so a
    /// start on a running feed never fails.
    async fn spawn_if_stopped(
        &self,
        interval: Duration,
        probability: Option<f64>,
        make_source: impl FnOnce() -> Result<Arc<dyn ReportSource>, CoreError>,
    ) -> Result<bool, CoreError> {
        let mut running = self.running.lock().await;
        if running.as_ref().is_some_and(|feed| !feed.handle.is_finished()) {
            return Ok(false);
        }

        let source = make_source()?;
        let generator = FeedGenerator::new(
            Arc::clone(&self.store),
            Arc::clone(&self.bus),
            source,
            interval,
        )?;
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move { generator.run(token).await });

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            probability = ?probability,
            "Synthetic feed started"
        );

        *running = Some(RunningFeed {
            cancel,
            handle,
            interval,
            probability,
        });
        Ok(true)
    }

    /// Stop the feed and wait for its task to finish. Returns `false` if it
    /// was not running.
    ///
    /// Once this returns no further tick will run.
    pub async fn stop(&self) -> bool {
        let Some(feed) = self.running.lock().await.take() else {
            return false;
        };

        feed.cancel.cancel();
        if let Err(e) = feed.handle.await {
            tracing::error!(error = %e, "Synthetic feed task ended abnormally");
        }
        tracing::info!("Synthetic feed stopped");
        true
    }

    pub async fn status(&self) -> FeedStatus {
        match self.running.lock().await.as_ref() {
            Some(feed) if !feed.handle.is_finished() => FeedStatus {
                running: true,
                interval_ms: Some(feed.interval.as_millis() as u64),
                probability: feed.probability,
            },
            _ => FeedStatus {
                running: false,
                interval_ms: None,
                probability: None,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryEventStore;
    use assert_matches::assert_matches;

    fn generator(probability: f64) -> (Arc<InMemoryEventStore>, FeedGenerator) {
        let store = Arc::new(InMemoryEventStore::default());
        let source = Arc::new(SyntheticSource::with_seed(probability, 7).unwrap());
        let generator = FeedGenerator::new(
            store.clone(),
            Arc::new(EventBus::default()),
            source,
            Duration::from_secs(30),
        )
        .unwrap();
        (store, generator)
    }

    #[test]
    fn synthetic_drafts_stay_within_catalog() {
        let source = SyntheticSource::with_seed(1.0, 42).unwrap();
        for _ in 0..200 {
            let draft = source.draw().unwrap().expect("p = 1 always produces");
            assert!(draft.validate().is_ok());
            assert!(COASTAL_SITES.iter().any(|s| s.name == draft.location.name));
            assert!(!draft.public_visibility);
        }
    }

    #[test]
    fn zero_probability_never_produces() {
        let source = SyntheticSource::with_seed(0.0, 42).unwrap();
        assert!((0..200).all(|_| source.draw().unwrap().is_none()));
    }

    #[test]
    fn probability_outside_unit_interval_is_rejected() {
        assert_matches!(SyntheticSource::new(1.5), Err(CoreError::Validation(_)));
        assert_matches!(SyntheticSource::new(-0.1), Err(CoreError::Validation(_)));
        assert_matches!(SyntheticSource::new(f64::NAN), Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn tick_once_inserts_and_publishes() {
        let (store, generator) = generator(1.0);
        let mut rx = generator.bus.subscribe();

        assert_eq!(generator.tick_once().await, 1);
        assert_eq!(store.len().await, 1);

        let notification = rx.recv().await.unwrap();
        assert_eq!(notification.tracking_id, "HR-000001");
    }

    struct CollidingSource;

    #[async_trait]
    impl ReportSource for CollidingSource {
        async fn next_batch(&self) -> Result<Vec<NewHazardEvent>, CoreError> {
            let mut draft = SyntheticSource::with_seed(1.0, 1)?
                .draw()?
                .ok_or_else(|| CoreError::Internal("no draft".into()))?;
            draft.tracking_id = Some("HR-FIXED".into());
            Ok(vec![draft])
        }
    }

    #[tokio::test]
    async fn insert_collision_skips_tick_without_panicking() {
        let store = Arc::new(InMemoryEventStore::default());
        let generator = FeedGenerator::new(
            store.clone(),
            Arc::new(EventBus::default()),
            Arc::new(CollidingSource),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(generator.tick_once().await, 1);
        assert_eq!(generator.tick_once().await, 0);
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let store = Arc::new(InMemoryEventStore::default());
        let result = FeedGenerator::new(
            store,
            Arc::new(EventBus::default()),
            Arc::new(CollidingSource),
            Duration::ZERO,
        );
        assert_matches!(result, Err(CoreError::Validation(_)));
    }
}
