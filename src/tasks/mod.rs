//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the scheduler is running.
//!
//! # Tasks
//! - Tick: dispatches due reminder buckets and forces periodic snapshots

mod tick;

pub(crate) use tick::spawn_tick_task;
