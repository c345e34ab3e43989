//! Request DTOs for the reminder API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::scheduler::id_string;

/// Request body for POST /reminders
///
/// # Fields
/// - `author`: Id of the user to mention, as a decimal string
/// - `channel`: Id of the delivery channel, as a decimal string
/// - `message`: Reminder text
/// - `at`: Unix timestamp in seconds to fire at
/// - `delay`: Seconds from now to fire after
///
/// Exactly one of `at` and `delay` must be given.
#[derive(Debug, Clone, Deserialize)]
pub struct AddReminderRequest {
    #[serde(with = "id_string")]
    pub author: u64,
    #[serde(with = "id_string")]
    pub channel: u64,
    pub message: String,
    #[serde(default)]
    pub at: Option<i64>,
    #[serde(default)]
    pub delay: Option<i64>,
}

impl AddReminderRequest {
    /// Validates the request and resolves the target Unix timestamp.
    ///
    /// Returns an error message if validation fails.
    pub fn target_timestamp(&self, now_secs: i64, min_delay: i64) -> Result<i64, String> {
        if self.message.trim().is_empty() {
            return Err("The reminder message can not be empty".to_string());
        }

        let target = match (self.at, self.delay) {
            (Some(at), None) => at,
            (None, Some(delay)) => now_secs.saturating_add(delay),
            (None, None) => {
                return Err("Either 'at' or 'delay' is required".to_string());
            }
            (Some(_), Some(_)) => {
                return Err("Only one of 'at' and 'delay' may be given".to_string());
            }
        };

        if target.saturating_sub(now_secs) < min_delay {
            return Err(format!(
                "The reminder timer must be at least {} seconds",
                min_delay
            ));
        }
        Ok(target)
    }
}
