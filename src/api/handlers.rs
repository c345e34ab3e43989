//! API Handlers
//!
//! HTTP request handlers for each reminder endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::SchedulerError;
use crate::models::{
    AddReminderRequest, AddReminderResponse, HealthResponse, PendingResponse, SnapshotResponse,
    StatsResponse,
};
use crate::scheduler::{Notifier, Scheduler};

/// Application state shared across all handlers.
///
/// The scheduler guards its own bucket cache, so the state only holds an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
    /// Shortest accepted reminder delay in seconds
    pub min_reminder_delay: i64,
}

impl AppState {
    pub fn new(scheduler: Arc<Scheduler>, min_reminder_delay: i64) -> Self {
        Self {
            scheduler,
            min_reminder_delay,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The scheduler is created stopped; the caller decides when to start it.
    pub fn from_config(config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        let scheduler = Scheduler::new(config.scheduler_config(), notifier);
        Self::new(Arc::new(scheduler), config.min_reminder_delay)
    }
}

/// Handler for POST /reminders
///
/// Validates the request and queues the reminder in its second bucket.
pub async fn add_reminder_handler(
    State(state): State<AppState>,
    Json(req): Json<AddReminderRequest>,
) -> Result<Json<AddReminderResponse>, SchedulerError> {
    let now = state.scheduler.now_secs();
    let target = req
        .target_timestamp(now, state.min_reminder_delay)
        .map_err(SchedulerError::InvalidRequest)?;
    let at = DateTime::<Utc>::from_timestamp(target, 0).ok_or_else(|| {
        SchedulerError::InvalidRequest(format!("Timestamp {} is out of range", target))
    })?;

    let timestamp = state
        .scheduler
        .add(at, req.author, req.channel, req.message)
        .await?;

    Ok(Json(AddReminderResponse::new(timestamp)))
}

/// Handler for GET /reminders
pub async fn pending_handler(State(state): State<AppState>) -> Json<PendingResponse> {
    let buckets = state.scheduler.pending().await;
    Json(PendingResponse::from_buckets(buckets))
}

/// Handler for POST /snapshot
///
/// Forces a snapshot to the configured path.
pub async fn snapshot_handler(
    State(state): State<AppState>,
) -> Result<Json<SnapshotResponse>, SchedulerError> {
    let buckets_written = state.scheduler.serialize(None).await?;

    Ok(Json(SnapshotResponse {
        buckets_written,
        path: state.scheduler.config().snapshot_path.display().to_string(),
    }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let scheduler = &state.scheduler;
    let stats = scheduler.cache_stats().await;

    Json(StatsResponse::new(
        scheduler.state(),
        scheduler.pending_count().await,
        scheduler.dropped_on_start(),
        &stats,
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::scheduler::{LogNotifier, SchedulerConfig, SchedulerState};
    use tempfile::TempDir;

    const NOW: i64 = 1_700_000_000;

    fn test_state(dir: &TempDir) -> AppState {
        let config = SchedulerConfig {
            snapshot_path: dir.path().join("reminders.json"),
            ..SchedulerConfig::default()
        };
        let scheduler = Scheduler::with_clock(
            config,
            Arc::new(LogNotifier),
            Arc::new(ManualClock::at_secs(NOW)),
        );
        AppState::new(Arc::new(scheduler), 10)
    }

    fn request(delay: i64, message: &str) -> AddReminderRequest {
        AddReminderRequest {
            author: 7,
            channel: 9,
            message: message.to_string(),
            at: None,
            delay: Some(delay),
        }
    }

    #[tokio::test]
    async fn test_add_and_list_reminders() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        let response = add_reminder_handler(State(state.clone()), Json(request(60, "stretch")))
            .await
            .unwrap();
        assert_eq!(response.timestamp, NOW + 60);

        let pending = pending_handler(State(state)).await;
        assert_eq!(pending.total, 1);
        assert_eq!(pending.buckets[0].timestamp, NOW + 60);
        assert_eq!(pending.buckets[0].reminders[0].message, "stretch");
    }

    #[tokio::test]
    async fn test_add_rejects_short_delay() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        let result = add_reminder_handler(State(state), Json(request(3, "too soon"))).await;
        assert!(matches!(result, Err(SchedulerError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_snapshot_handler_writes_file() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let added = add_reminder_handler(State(state.clone()), Json(request(60, "a")))
            .await
            .unwrap();
        assert_eq!(added.timestamp, NOW + 60);

        let response = snapshot_handler(State(state)).await.unwrap();
        assert_eq!(response.buckets_written, 1);
        assert!(dir.path().join("reminders.json").exists());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        let response = stats_handler(State(state)).await;
        assert_eq!(response.state, SchedulerState::Stopped);
        assert_eq!(response.pending_reminders, 0);
        assert_eq!(response.hits, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
