//! Live telemetry simulation, one task per zone.
//!
//! Each running zone owns its [`ZoneSimulation`] context and its in-memory
//! sample window inside its task; nothing else mutates them. Readers get the
//! latest [`LiveSnapshot`] through a `watch` channel, which never blocks the
//! ticking task.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::analytics::simulator::ZoneSimulation;
use crate::analytics::{composite, segmenter};
use crate::config::SimulatorConfig;
use crate::models::{AnomalyEvent, CompositeScore, NewSample, Sample, SampleOrder};
use crate::store::{StoreError, TelemetryStore};
use crate::ws::WsHub;

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("simulation already running for zone '{0}'")]
    AlreadyRunning(String),

    #[error("zone '{0}' has no usable baseline")]
    NoBaseline(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Latest view of a simulated zone, including samples that were never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct LiveSnapshot {
    pub zone_id: String,
    pub ticks: u64,
    pub persist_requests: u64,
    pub latest: Option<Sample>,
    pub score: CompositeScore,
    pub anomalies: Vec<AnomalyEvent>,
    pub samples: Vec<Sample>,
}

impl LiveSnapshot {
    fn empty(zone_id: &str) -> Self {
        Self {
            zone_id: zone_id.to_string(),
            ticks: 0,
            persist_requests: 0,
            latest: None,
            score: CompositeScore::no_data(),
            anomalies: Vec::new(),
            samples: Vec::new(),
        }
    }
}

struct RunningSimulation {
    handle: JoinHandle<()>,
    live: watch::Receiver<LiveSnapshot>,
}

#[derive(Clone)]
pub struct SimulationManager {
    store: Arc<dyn TelemetryStore>,
    hub: WsHub,
    config: SimulatorConfig,
    running: Arc<Mutex<HashMap<String, RunningSimulation>>>,
}

impl SimulationManager {
    pub fn new(store: Arc<dyn TelemetryStore>, hub: WsHub, config: SimulatorConfig) -> Self {
        Self {
            store,
            hub,
            config,
            running: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start ticking a zone, anchored on its newest stored sample.
    pub async fn start(&self, zone_id: &str) -> Result<LiveSnapshot, SimulationError> {
        let mut running = self.running.lock().await;
        if running.get(zone_id).is_some_and(|r| !r.handle.is_finished()) {
            return Err(SimulationError::AlreadyRunning(zone_id.to_string()));
        }

        let baseline = self
            .store
            .get_baseline(zone_id)
            .await?
            .filter(|b| b.is_usable())
            .ok_or_else(|| SimulationError::NoBaseline(zone_id.to_string()))?;

        let history = self
            .store
            .get_recent_samples(zone_id, self.config.history_window as i64, SampleOrder::OldestFirst)
            .await?;
        let anchor = history.last().map(Sample::metrics);
        let simulation = ZoneSimulation::new(baseline, anchor);

        let (tx, rx) = watch::channel(LiveSnapshot::empty(zone_id));
        let task = SimulationTask {
            simulation,
            window: history.into_iter().collect(),
            history_window: self.config.history_window.max(1),
            store: self.store.clone(),
            hub: self.hub.clone(),
            live: tx,
        };
        let handle = tokio::spawn(task.run(Duration::from_millis(self.config.tick_interval_ms.max(1))));

        let snapshot = rx.borrow().clone();
        running.insert(zone_id.to_string(), RunningSimulation { handle, live: rx });
        info!(zone_id = %zone_id, "Simulation started");
        Ok(snapshot)
    }

    /// Stop a zone's simulation immediately. Returns whether one was running.
    pub async fn stop(&self, zone_id: &str) -> bool {
        match self.running.lock().await.remove(zone_id) {
            Some(sim) => {
                sim.handle.abort();
                info!(zone_id = %zone_id, "Simulation stopped");
                true
            }
            None => false,
        }
    }

    pub async fn stop_all(&self) {
        let mut running = self.running.lock().await;
        for (_, sim) in running.drain() {
            sim.handle.abort();
        }
    }

    pub async fn snapshot(&self, zone_id: &str) -> Option<LiveSnapshot> {
        let running = self.running.lock().await;
        running.get(zone_id).map(|sim| sim.live.borrow().clone())
    }

    pub async fn running_zones(&self) -> Vec<String> {
        let mut zones: Vec<String> = self.running.lock().await.keys().cloned().collect();
        zones.sort();
        zones
    }
}

/// Tracks how far anomaly broadcasts have reached. An episode that outlives
/// the sample window keeps losing its first points, so its start time and id
/// move from tick to tick; it is still announced once.
#[derive(Debug, Default)]
struct EpisodeTracker {
    announced_until: Option<DateTime<Utc>>,
}

impl EpisodeTracker {
    /// Events, in ascending order, that start after everything already announced.
    fn unannounced<'a>(&mut self, events: &'a [AnomalyEvent]) -> Vec<&'a AnomalyEvent> {
        let mut fresh = Vec::new();
        for event in events {
            match self.announced_until {
                Some(until) if event.start_time <= until => {}
                _ => fresh.push(event),
            }
            self.announced_until = Some(match self.announced_until {
                Some(until) => until.max(event.end_time),
                None => event.end_time,
            });
        }
        fresh
    }
}

struct SimulationTask {
    simulation: ZoneSimulation,
    window: VecDeque<Sample>,
    history_window: usize,
    store: Arc<dyn TelemetryStore>,
    hub: WsHub,
    live: watch::Sender<LiveSnapshot>,
}

impl SimulationTask {
    async fn run(mut self, period: Duration) {
        let mut rng = StdRng::from_entropy();
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u64;
        let mut persist_requests = 0u64;
        let mut episodes = EpisodeTracker::default();

        loop {
            ticker.tick().await;
            let tick = self.simulation.tick(&mut rng, Utc::now());
            ticks += 1;

            self.window.push_back(tick.sample.clone());
            while self.window.len() > self.history_window {
                self.window.pop_front();
            }

            if tick.persist {
                persist_requests += 1;
                self.persist(&tick.sample);
            }
            self.hub.send_sample(&tick.sample).await;

            let samples: Vec<Sample> = self.window.iter().cloned().collect();
            let baseline = self.simulation.baseline();
            let score = composite::score(Some(baseline), &samples);
            let anomalies = segmenter::segment(self.simulation.zone_id(), &samples, baseline);

            for event in episodes.unannounced(&anomalies) {
                self.hub.send_anomaly(event).await;
            }

            self.live.send_replace(LiveSnapshot {
                zone_id: self.simulation.zone_id().to_string(),
                ticks,
                persist_requests,
                latest: Some(tick.sample),
                score,
                anomalies,
                samples,
            });
        }
    }

    /// Fire-and-forget write; a failure never interrupts ticking.
    fn persist(&self, sample: &Sample) {
        let store = self.store.clone();
        let new_sample = NewSample::from(sample);
        tokio::spawn(async move {
            if let Err(e) = store.append_sample(new_sample).await {
                warn!(error = %e, "Failed to persist simulated sample");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::{baseline, latency_series};
    use crate::store::testutil::FlakyStore;
    use crate::store::MemoryStore;

    fn manager(store: Arc<dyn TelemetryStore>, history_window: usize) -> SimulationManager {
        SimulationManager::new(
            store,
            WsHub::new(),
            SimulatorConfig {
                tick_interval_ms: 10,
                history_window,
                autostart_zones: Vec::new(),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_stopped() {
        let store = Arc::new(MemoryStore::new());
        store.put_baseline(&baseline(1.0, 22.0, 0.15)).await.unwrap();
        let sims = manager(store.clone(), 30);

        let initial = sims.start("RACK-01").await.unwrap();
        assert_eq!(initial.ticks, 0);

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        let live = sims.snapshot("RACK-01").await.unwrap();
        assert!(live.ticks >= 50, "ticks {}", live.ticks);
        assert_eq!(live.samples.len(), 30);
        assert!(live.samples.iter().all(|s| s.temperature >= 20.0));
        assert!(live.persist_requests <= live.ticks);
        assert_eq!(sims.running_zones().await, vec!["RACK-01".to_string()]);

        assert!(sims.stop("RACK-01").await);
        assert!(sims.snapshot("RACK-01").await.is_none());
        assert!(!sims.stop("RACK-01").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persisted_samples_reach_store() {
        let store = Arc::new(MemoryStore::new());
        store.put_baseline(&baseline(1.0, 22.0, 0.15)).await.unwrap();
        let sims = manager(store.clone(), 30);

        sims.start("RACK-01").await.unwrap();
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        let live = sims.snapshot("RACK-01").await.unwrap();
        sims.stop("RACK-01").await;
        // Let in-flight writes land.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let stored = store
            .get_recent_samples("RACK-01", 10_000, SampleOrder::OldestFirst)
            .await
            .unwrap();
        assert!(live.persist_requests > 0);
        assert!(live.persist_requests < live.ticks);
        // At most one tick can slip in between the snapshot and the stop.
        let stored = stored.len() as u64;
        assert!(
            stored >= live.persist_requests && stored <= live.persist_requests + 1,
            "stored {stored}, requested {}",
            live.persist_requests
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_writes_do_not_stop_ticking() {
        let store = Arc::new(FlakyStore {
            reject_samples: true,
            ..FlakyStore::default()
        });
        store.put_baseline(&baseline(1.0, 22.0, 0.15)).await.unwrap();
        let sims = manager(store.clone(), 30);

        sims.start("RACK-01").await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        let first = sims.snapshot("RACK-01").await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        let second = sims.snapshot("RACK-01").await.unwrap();

        assert!(first.persist_requests > 0);
        assert!(second.ticks > first.ticks);
        assert!(second.persist_requests >= first.persist_requests);
        assert_eq!(second.samples.len(), 30);
        assert_eq!(sims.running_zones().await, vec!["RACK-01".to_string()]);
        assert!(store
            .get_recent_samples("RACK-01", 10_000, SampleOrder::OldestFirst)
            .await
            .unwrap()
            .is_empty());
        sims.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sustained_episode_announced_once() {
        let store = Arc::new(MemoryStore::new());
        store.put_baseline(&baseline(1.0, 22.0, 0.15)).await.unwrap();
        // Anchor far above baseline; reversion keeps latency >8% high for
        // many more ticks than the window holds.
        store
            .append_sample(NewSample {
                zone_id: "RACK-01".into(),
                timestamp: None,
                latency: 3.0,
                temperature: 22.0,
                vibration: 0.15,
                is_baseline: false,
            })
            .await
            .unwrap();
        let sims = manager(store, 10);
        let mut rx = sims.hub.subscribe("RACK-01").await;

        sims.start("RACK-01").await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        let live = sims.snapshot("RACK-01").await.unwrap();
        sims.stop("RACK-01").await;
        assert!(live.ticks >= 30, "ticks {}", live.ticks);
        assert_eq!(live.anomalies.len(), 1);

        let mut announced = Vec::new();
        while let Ok(raw) = rx.try_recv() {
            let msg: serde_json::Value = serde_json::from_str(&raw).unwrap();
            if msg["type"] == "anomaly" {
                announced.push(msg["data"]["id"].clone());
            }
        }
        assert_eq!(announced.len(), 1, "announced {announced:?}");
    }

    #[test]
    fn test_episode_tracker_follows_sliding_window() {
        let b = baseline(1.0, 22.0, 0.15);
        // 15 drifted points, one recovery point, then a second 4-point episode.
        let mut latencies = vec![1.5; 15];
        latencies.push(1.0);
        latencies.extend([1.5; 4]);
        let series = latency_series(&latencies);

        let mut tracker = EpisodeTracker::default();
        let mut announced = Vec::new();
        for end in 1..=series.len() {
            let window = &series[end.saturating_sub(10)..end];
            let events = segmenter::segment("RACK-01", window, &b);
            announced.extend(tracker.unannounced(&events).into_iter().map(|e| e.start_time));
        }

        assert_eq!(announced, vec![series[0].timestamp, series[16].timestamp]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_requires_baseline() {
        let store = Arc::new(MemoryStore::new());
        let sims = manager(store, 30);
        let err = sims.start("RACK-01").await.unwrap_err();
        assert!(matches!(err, SimulationError::NoBaseline(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_conflicts() {
        let store = Arc::new(MemoryStore::new());
        store.put_baseline(&baseline(1.0, 22.0, 0.15)).await.unwrap();
        let sims = manager(store, 30);
        sims.start("RACK-01").await.unwrap();
        let err = sims.start("RACK-01").await.unwrap_err();
        assert!(matches!(err, SimulationError::AlreadyRunning(_)));
        sims.stop_all().await;
        assert!(sims.running_zones().await.is_empty());
    }
}
