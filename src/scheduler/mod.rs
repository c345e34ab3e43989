//! Scheduler Module
//!
//! Persistent, time-keyed delayed-reminder scheduler built on `EvictableCache`.

mod notifier;
mod reminder;
mod service;
pub mod snapshot;

pub use notifier::{Channel, LogChannel, LogNotifier, Notifier, User};
pub use reminder::Reminder;
pub(crate) use reminder::id_string;
pub(crate) use service::SchedulerCore;
pub use service::{
    Scheduler, SchedulerConfig, SchedulerState, MAX_CATCH_UP_SECS, REMINDER_CACHE_NAME,
};
