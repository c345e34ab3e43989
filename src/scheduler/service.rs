//! Reminder Scheduler
//!
//! Owns a timestamp-keyed `EvictableCache` of reminder buckets, dispatches
//! due buckets from a periodic tick loop and snapshots its state to disk.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheStats, EvictableCache};
use crate::clock::{system_clock, Clock};
use crate::error::{CacheError, SchedulerError};
use crate::scheduler::snapshot::{self, Buckets};
use crate::scheduler::{Notifier, Reminder};
use crate::tasks::spawn_tick_task;

/// Label of the cache every scheduler owns.
pub const REMINDER_CACHE_NAME: &str = "Reminder cache";

/// Upper bound on seconds replayed when consecutive ticks are further apart
/// than one second.
pub const MAX_CATCH_UP_SECS: i64 = 60;

const NO_TICK: i64 = i64::MIN;

type ReminderCache = EvictableCache<i64, Vec<Reminder>>;

// == Scheduler Config ==
/// Scheduler parameters.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Snapshot file read on start and written by `serialize`
    pub snapshot_path: PathBuf,
    /// Ticks between forced snapshots
    pub backup_threshold: u64,
    /// Period of the tick loop
    pub tick_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("data/reminders.json"),
            backup_threshold: 1800,
            tick_interval: Duration::from_secs(1),
        }
    }
}

// == Scheduler State ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Stopped,
    Running,
}

// == Scheduler Core ==
/// State shared between the scheduler handle and its tick loop.
pub(crate) struct SchedulerCore {
    cache: RwLock<ReminderCache>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    ticks_since_backup: AtomicU64,
    last_tick: AtomicI64,
    dropped_on_start: AtomicUsize,
    /// Set when the last `start` could not read the snapshot file
    snapshot_unreadable: AtomicBool,
    /// Serializes snapshot writers so renames never overlap
    snapshot_lock: Mutex<()>,
}

struct TickLoop {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

// == Scheduler ==
/// Persistent delayed-reminder scheduler.
///
/// `start` and `stop` toggle the tick loop. `add` and `serialize` are
/// usable in either state.
pub struct Scheduler {
    core: Arc<SchedulerCore>,
    tick_loop: Mutex<Option<TickLoop>>,
    running: AtomicBool,
}

impl Scheduler {
    // == Constructors ==
    /// Creates a stopped scheduler on the system clock.
    pub fn new(config: SchedulerConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_clock(config, notifier, system_clock())
    }

    /// Creates a stopped scheduler with an injected clock.
    pub fn with_clock(
        config: SchedulerConfig,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = EvictableCache::named(REMINDER_CACHE_NAME).with_clock(clock.clone());

        Self {
            core: Arc::new(SchedulerCore {
                cache: RwLock::new(cache),
                notifier,
                clock,
                config,
                ticks_since_backup: AtomicU64::new(0),
                last_tick: AtomicI64::new(NO_TICK),
                dropped_on_start: AtomicUsize::new(0),
                snapshot_unreadable: AtomicBool::new(false),
                snapshot_lock: Mutex::new(()),
            }),
            tick_loop: Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.core.config
    }

    pub fn state(&self) -> SchedulerState {
        if self.is_running() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Current time in Unix seconds on the scheduler's clock.
    pub fn now_secs(&self) -> i64 {
        self.core.clock.now_secs()
    }

    // == Add ==
    /// Queues a reminder for the whole second containing `at`.
    ///
    /// Returns the bucket timestamp.
    pub async fn add(
        &self,
        at: DateTime<Utc>,
        author_id: u64,
        channel_id: u64,
        message: impl Into<String>,
    ) -> Result<i64, SchedulerError> {
        if !self.is_running() {
            warn!("Reminder added while the scheduler is stopped");
        }

        let timestamp = at.timestamp();
        let reminder = Reminder::new(author_id, channel_id, message);
        self.core.push(timestamp, reminder).await?;

        debug!(timestamp, author_id, channel_id, "Reminder queued");
        Ok(timestamp)
    }

    // == Start ==
    /// Loads the snapshot, drops past-due buckets, persists the result and
    /// starts the tick loop.
    ///
    /// A snapshot that cannot be read or parsed is logged and leaves the
    /// scheduler stopped; it is not returned as an error.
    ///
    /// # Errors
    /// `AlreadyRunning` if the tick loop is already running.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        let mut tick_loop = self.tick_loop.lock().await;
        if tick_loop.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }

        let path = &self.core.config.snapshot_path;
        let loaded = match snapshot::load(path).await {
            Ok(Some(buckets)) => buckets,
            Ok(None) => {
                info!("No reminder snapshot at {}, starting empty", path.display());
                Buckets::new()
            }
            Err(err) => {
                error!("Failed to load serialized reminders: {}. Aborting start", err);
                self.core.snapshot_unreadable.store(true, Ordering::SeqCst);
                return Ok(());
            }
        };

        let started_at = self.core.clock.now_secs();
        let dropped = match self.core.restore(loaded, started_at).await {
            Ok(dropped) => dropped,
            Err(err) => {
                error!("Failed to restore serialized reminders: {}. Aborting start", err);
                self.core.snapshot_unreadable.store(true, Ordering::SeqCst);
                return Ok(());
            }
        };
        self.core.snapshot_unreadable.store(false, Ordering::SeqCst);
        info!("Deleted {} deprecated reminder buckets", dropped);

        if let Err(err) = self.core.serialize(None).await {
            error!("Failed to persist pruned reminders: {}", err);
        }

        self.core.ticks_since_backup.store(0, Ordering::SeqCst);
        // The start second survives the prune; the first tick replays it.
        self.core.last_tick.store(started_at - 1, Ordering::SeqCst);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = spawn_tick_task(self.core.clone(), shutdown_rx);

        *tick_loop = Some(TickLoop { shutdown, handle });
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    // == Stop ==
    /// Stops the tick loop, waiting for an in-flight tick to finish.
    ///
    /// # Errors
    /// `NotRunning` if the scheduler is stopped.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        let mut tick_loop = self.tick_loop.lock().await;
        let TickLoop { shutdown, handle } = tick_loop.take().ok_or(SchedulerError::NotRunning)?;
        self.running.store(false, Ordering::SeqCst);

        let _ = shutdown.send(true);
        if let Err(err) = handle.await {
            warn!("Reminder loop ended abnormally: {}", err);
        }
        Ok(())
    }

    // == Shutdown ==
    /// Stops the tick loop if it runs, then writes the final snapshot.
    ///
    /// The snapshot is skipped when the last `start` could not read the
    /// existing file, leaving that file untouched. Returns the number of
    /// buckets written, or `None` when skipped.
    pub async fn shutdown(&self) -> Result<Option<usize>, SchedulerError> {
        match self.stop().await {
            Ok(()) | Err(SchedulerError::NotRunning) => {}
            Err(err) => return Err(err),
        }

        if self.core.snapshot_unreadable.load(Ordering::SeqCst) {
            warn!(
                "Keeping unreadable snapshot at {}; final snapshot skipped",
                self.core.config.snapshot_path.display()
            );
            return Ok(None);
        }
        self.serialize(None).await.map(Some)
    }

    // == Serialize ==
    /// Drops past-due buckets and writes the rest to `path`, or to the
    /// configured snapshot path.
    ///
    /// Returns the number of buckets written.
    pub async fn serialize(&self, path: Option<&Path>) -> Result<usize, SchedulerError> {
        self.core.serialize(path).await
    }

    // == Tick ==
    /// Runs one loop iteration: dispatches due buckets and snapshots when
    /// the backup threshold is reached. Returns the number of deliveries.
    pub async fn tick(&self) -> usize {
        self.core.tick().await
    }

    // == Inspection ==
    /// Copies all pending buckets in timestamp order.
    pub async fn pending(&self) -> Buckets {
        self.core.buckets().await
    }

    /// Number of pending reminders across all buckets.
    pub async fn pending_count(&self) -> usize {
        let cache = self.core.cache.read().await;
        cache.values().map(Vec::len).sum()
    }

    /// Buckets dropped as past-due by the last successful `start`.
    pub fn dropped_on_start(&self) -> usize {
        self.core.dropped_on_start.load(Ordering::SeqCst)
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.core.cache.read().await.stats()
    }
}

impl SchedulerCore {
    async fn push(&self, timestamp: i64, reminder: Reminder) -> Result<(), CacheError> {
        let mut cache = self.cache.write().await;
        match cache.get_mut(&timestamp) {
            Ok(bucket) => {
                bucket.push(reminder);
                Ok(())
            }
            Err(_) => cache.set(timestamp, vec![reminder]),
        }
    }

    /// Merges loaded buckets into the cache and prunes past-due ones.
    async fn restore(&self, loaded: Buckets, now: i64) -> Result<usize, CacheError> {
        let mut cache = self.cache.write().await;

        for (timestamp, mut records) in loaded {
            if let Ok(queued) = cache.pop(&timestamp) {
                records.extend(queued);
            }
            cache.set(timestamp, records)?;
        }

        let dropped = prune_past(&mut cache, now);
        self.dropped_on_start.store(dropped, Ordering::SeqCst);
        Ok(dropped)
    }

    async fn buckets(&self) -> Buckets {
        let cache = self.cache.read().await;
        cache
            .iter()
            .map(|(timestamp, entry)| (*timestamp, entry.value.clone()))
            .collect()
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        self.config.tick_interval
    }

    pub(crate) async fn serialize(&self, path: Option<&Path>) -> Result<usize, SchedulerError> {
        let path = path.unwrap_or(&self.config.snapshot_path);
        let _writer = self.snapshot_lock.lock().await;

        let buckets = {
            let mut cache = self.cache.write().await;
            let pruned = prune_past(&mut cache, self.clock.now_secs());
            if pruned > 0 {
                debug!("Pruned {} past-due reminder buckets", pruned);
            }
            cache
                .iter()
                .map(|(timestamp, entry)| (*timestamp, entry.value.clone()))
                .collect::<Buckets>()
        };

        let bytes = snapshot::encode(&buckets)?;
        snapshot::write_atomic(path, &bytes).await?;

        debug!(
            "Serialized {} reminder buckets to {}",
            buckets.len(),
            path.display()
        );
        Ok(buckets.len())
    }

    pub(crate) async fn tick(&self) -> usize {
        let now = self.clock.now_secs();

        let mut delivered = 0;
        for (timestamp, bucket) in self.take_due(now).await {
            for reminder in &bucket {
                if self.deliver(timestamp, reminder).await {
                    delivered += 1;
                }
            }
        }

        let ticks = self.ticks_since_backup.fetch_add(1, Ordering::SeqCst) + 1;
        if ticks >= self.config.backup_threshold {
            self.ticks_since_backup.store(0, Ordering::SeqCst);
            if let Err(err) = self.serialize(None).await {
                error!("Backup serialization failed: {}", err);
            }
        }

        delivered
    }

    /// Pops the bucket for `now` plus any seconds skipped since the last tick.
    async fn take_due(&self, now: i64) -> Vec<(i64, Vec<Reminder>)> {
        let previous = self.last_tick.fetch_max(now, Ordering::SeqCst);
        let from = if previous == NO_TICK || previous >= now {
            now
        } else {
            (previous + 1).max(now - MAX_CATCH_UP_SECS)
        };

        let mut cache = self.cache.write().await;
        (from..=now)
            .filter_map(|timestamp| cache.pop(&timestamp).ok().map(|bucket| (timestamp, bucket)))
            .collect()
    }

    async fn deliver(&self, timestamp: i64, reminder: &Reminder) -> bool {
        let Some(channel) = self.notifier.resolve_channel(reminder.channel_id).await else {
            warn!(
                timestamp,
                channel = reminder.channel_id,
                "Failed to deliver reminder: unknown channel"
            );
            return false;
        };

        let Some(author) = self.notifier.resolve_user(reminder.author_id).await else {
            warn!(
                timestamp,
                author = reminder.author_id,
                "Failed to deliver reminder: unknown author"
            );
            return false;
        };

        let text = format!("{} {}", author.mention(), reminder.message);
        match channel.send(&text).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    timestamp,
                    channel = reminder.channel_id,
                    "Failed to deliver reminder: {:#}",
                    err
                );
                false
            }
        }
    }
}

fn prune_past(cache: &mut ReminderCache, now: i64) -> usize {
    cache.delete_delegated(|timestamp, _| *timestamp < now)
}
