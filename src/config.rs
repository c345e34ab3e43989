//! Configuration Module
//!
//! Handles loading and managing server and scheduler configuration from
//! environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::scheduler::SchedulerConfig;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Snapshot file the scheduler restores from and writes to
    pub snapshot_path: PathBuf,
    /// Ticks between forced snapshots
    pub backup_threshold: u64,
    /// Tick loop period in milliseconds
    pub tick_interval_ms: u64,
    /// Shortest accepted reminder delay in seconds
    pub min_reminder_delay: i64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SNAPSHOT_PATH` - Reminder snapshot file (default: data/reminders.json)
    /// - `BACKUP_THRESHOLD` - Ticks between forced snapshots (default: 1800)
    /// - `TICK_INTERVAL_MS` - Tick loop period in milliseconds (default: 1000)
    /// - `MIN_REMINDER_DELAY` - Shortest reminder delay in seconds (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            snapshot_path: env::var("SNAPSHOT_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            backup_threshold: parse_env("BACKUP_THRESHOLD").unwrap_or(defaults.backup_threshold),
            tick_interval_ms: parse_env("TICK_INTERVAL_MS")
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.tick_interval_ms),
            min_reminder_delay: parse_env("MIN_REMINDER_DELAY")
                .unwrap_or(defaults.min_reminder_delay),
            server_port: parse_env("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Scheduler parameters derived from this configuration.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            snapshot_path: self.snapshot_path.clone(),
            backup_threshold: self.backup_threshold,
            tick_interval: Duration::from_millis(self.tick_interval_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("data/reminders.json"),
            backup_threshold: 1800,
            tick_interval_ms: 1000,
            min_reminder_delay: 10,
            server_port: 3000,
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
