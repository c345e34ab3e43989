//! Cache Module
//!
//! Provides an ordered in-memory cache with hit tracking and pluggable
//! eviction policies.

mod entry;
mod key;
mod stats;
mod store;
mod value;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use stats::CacheStats;
pub use store::{EvictableCache, Iter};
pub use value::RuntimeType;
