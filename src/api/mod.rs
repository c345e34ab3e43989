//! API Module
//!
//! HTTP handlers and routing for the reminder service REST API.
//!
//! # Endpoints
//! - `POST /reminders` - Queue a reminder
//! - `GET /reminders` - List pending reminders by bucket
//! - `POST /snapshot` - Force a snapshot to disk
//! - `GET /stats` - Scheduler and bucket cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
