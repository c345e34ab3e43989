//! Request and Response models for the reminder API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::AddReminderRequest;
pub use responses::{
    AddReminderResponse, BucketView, HealthResponse, PendingResponse, SnapshotResponse,
    StatsResponse,
};
