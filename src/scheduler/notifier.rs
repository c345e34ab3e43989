//! Notifier Module
//!
//! Delivery capability consumed by the scheduler: resolve a channel and a
//! user by id, then send text to the channel.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

// == User ==
/// A resolved reminder author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Chat mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

// == Channel ==
/// A destination that accepts text messages.
#[async_trait]
pub trait Channel: Send + Sync {
    fn id(&self) -> u64;

    async fn send(&self, text: &str) -> anyhow::Result<()>;
}

// == Notifier ==
/// Resolves recipients for reminder delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn resolve_channel(&self, id: u64) -> Option<Arc<dyn Channel>>;

    async fn resolve_user(&self, id: u64) -> Option<User>;
}

// == Log Notifier ==
/// Notifier that resolves every id and emits deliveries as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

/// Channel handed out by `LogNotifier`.
#[derive(Debug, Clone, Copy)]
pub struct LogChannel {
    id: u64,
}

#[async_trait]
impl Channel for LogChannel {
    fn id(&self) -> u64 {
        self.id
    }

    async fn send(&self, text: &str) -> anyhow::Result<()> {
        info!(target: "delivery", channel = self.id, "{}", text);
        Ok(())
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn resolve_channel(&self, id: u64) -> Option<Arc<dyn Channel>> {
        Some(Arc::new(LogChannel { id }))
    }

    async fn resolve_user(&self, id: u64) -> Option<User> {
        Some(User::new(id, format!("user-{}", id)))
    }
}
