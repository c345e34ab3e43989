//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with hit tracking.

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Timestamp of the last value read, or creation (Unix milliseconds)
    pub last_hit_at: i64,
    /// Number of value reads since creation
    pub total_hits: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry with zeroed hit statistics.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now_ms` - Current Unix time in milliseconds
    pub fn new(value: V, now_ms: i64) -> Self {
        Self {
            value,
            created_at: now_ms,
            last_hit_at: now_ms,
            total_hits: 0,
        }
    }

    // == Do Hit ==
    /// Records a value read.
    ///
    /// `last_hit_at` never moves backwards, even if the clock does.
    pub fn do_hit(&mut self, now_ms: i64) {
        self.last_hit_at = self.last_hit_at.max(now_ms);
        self.total_hits += 1;
    }

    // == Idle Time ==
    /// Milliseconds since the last hit (or creation), clamped at zero.
    pub fn idle_ms(&self, now_ms: i64) -> i64 {
        (now_ms - self.last_hit_at).max(0)
    }

    /// Milliseconds since creation, clamped at zero.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        (now_ms - self.created_at).max(0)
    }
}
