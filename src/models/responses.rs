//! Response DTOs for the reminder API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::scheduler::snapshot::Buckets;
use crate::scheduler::{Reminder, SchedulerState};

/// Response body for POST /reminders
#[derive(Debug, Clone, Serialize)]
pub struct AddReminderResponse {
    /// Human readable confirmation
    pub message: String,
    /// Bucket timestamp (Unix seconds)
    pub timestamp: i64,
    /// Bucket timestamp in RFC 3339
    pub scheduled_for: String,
}

impl AddReminderResponse {
    pub fn new(timestamp: i64) -> Self {
        let scheduled_for = DateTime::<Utc>::from_timestamp(timestamp, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default();
        let message = match DateTime::<Utc>::from_timestamp(timestamp, 0) {
            Some(dt) => format!("Reminder set to {} UTC", dt.format("%Y-%m-%d %H:%M:%S")),
            None => format!("Reminder set to {}", timestamp),
        };

        Self {
            message,
            timestamp,
            scheduled_for,
        }
    }
}

/// One pending bucket in GET /reminders
#[derive(Debug, Clone, Serialize)]
pub struct BucketView {
    pub timestamp: i64,
    pub reminders: Vec<Reminder>,
}

/// Response body for GET /reminders
#[derive(Debug, Clone, Serialize)]
pub struct PendingResponse {
    /// Buckets in timestamp order
    pub buckets: Vec<BucketView>,
    /// Reminders across all buckets
    pub total: usize,
}

impl PendingResponse {
    pub fn from_buckets(buckets: Buckets) -> Self {
        let buckets: Vec<BucketView> = buckets
            .into_iter()
            .map(|(timestamp, reminders)| BucketView {
                timestamp,
                reminders,
            })
            .collect();
        let total = buckets.iter().map(|b| b.reminders.len()).sum();

        Self { buckets, total }
    }
}

/// Response body for POST /snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponse {
    pub buckets_written: usize,
    pub path: String,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Scheduler state
    pub state: SchedulerState,
    /// Pending timestamp buckets
    pub pending_buckets: usize,
    /// Pending reminders across all buckets
    pub pending_reminders: usize,
    /// Buckets dropped as past-due at the last start
    pub dropped_on_start: usize,
    /// Bucket cache hits
    pub hits: u64,
    /// Bucket cache misses
    pub misses: u64,
    /// Buckets removed by pruning
    pub evictions: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(
        state: SchedulerState,
        pending_reminders: usize,
        dropped_on_start: usize,
        stats: &CacheStats,
    ) -> Self {
        Self {
            state,
            pending_buckets: stats.total_entries,
            pending_reminders,
            dropped_on_start,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_reminder_response() {
        let resp = AddReminderResponse::new(1_700_000_000);
        assert_eq!(resp.timestamp, 1_700_000_000);
        assert_eq!(resp.scheduled_for, "2023-11-14T22:13:20+00:00");
        assert_eq!(resp.message, "Reminder set to 2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_pending_response_totals() {
        let mut buckets = Buckets::new();
        buckets.insert(2, vec![Reminder::new(1, 1, "b")]);
        buckets.insert(1, vec![Reminder::new(1, 1, "a"), Reminder::new(2, 1, "c")]);

        let resp = PendingResponse::from_buckets(buckets);
        assert_eq!(resp.total, 3);
        assert_eq!(resp.buckets[0].timestamp, 1);
        assert_eq!(resp.buckets[1].timestamp, 2);
    }

    #[test]
    fn test_stats_response_serialize() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.set_total_entries(4);

        let resp = StatsResponse::new(SchedulerState::Running, 6, 2, &stats);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["state"], "running");
        assert_eq!(json["pending_buckets"], 4);
        assert_eq!(json["hit_rate"], 0.5);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
