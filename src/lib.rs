//! Reminder Cache - an evictable in-memory cache and a persistent reminder scheduler
//!
//! `EvictableCache` tracks per-entry creation time, last access and hit count,
//! and evicts by age, popularity or an arbitrary predicate. `Scheduler` keeps
//! reminders in one-second buckets of such a cache, delivers them from a
//! background tick loop and persists them to a JSON snapshot.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
mod tasks;

pub use api::AppState;
pub use cache::{CacheKey, CacheStats, EvictableCache};
pub use config::Config;
pub use error::{CacheError, SchedulerError};
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerState};
