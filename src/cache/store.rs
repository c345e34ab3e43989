//! Evictable Cache Module
//!
//! Ordered key-value store with per-entry hit tracking and three bulk
//! eviction policies: idle lifetime, popularity and arbitrary predicate.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::sync::Arc;

use chrono::Duration;
use linked_hash_map::LinkedHashMap;

use crate::cache::{CacheEntry, CacheKey, CacheStats, RuntimeType};
use crate::clock::{system_clock, Clock};
use crate::error::{CacheError, Result};

// == Evictable Cache ==
/// In-memory cache preserving insertion order.
///
/// The cache does no internal locking. Wrap it in a lock or keep it owned by
/// a single task when it has to be shared.
pub struct EvictableCache<K, V> {
    /// Optional label, used in logs
    name: Option<String>,
    /// When false, overwrites must keep the value's runtime type
    allow_type_override: bool,
    /// Idle time after which `delete_deprecated` removes an entry
    item_lifetime: Option<Duration>,
    /// Key-value storage, front = oldest insertion
    entries: LinkedHashMap<K, CacheEntry<V>>,
    /// Aggregate statistics
    stats: CacheStats,
    /// Time source for entry metadata
    clock: Arc<dyn Clock>,
}

impl<K, V> Default for EvictableCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EvictableCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    // == Constructors ==
    /// Creates an unnamed cache that allows type overrides.
    pub fn new() -> Self {
        Self {
            name: None,
            allow_type_override: true,
            item_lifetime: None,
            entries: LinkedHashMap::new(),
            stats: CacheStats::new(),
            clock: system_clock(),
        }
    }

    /// Creates a named cache that allows type overrides.
    pub fn named(name: impl Into<String>) -> Self {
        let mut cache = Self::new();
        cache.name = Some(name.into());
        cache
    }

    pub fn with_type_override(mut self, allow: bool) -> Self {
        self.allow_type_override = allow;
        self
    }

    /// Replaces the time source used for entry metadata.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // == Attributes ==
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn allow_type_override(&self) -> bool {
        self.allow_type_override
    }

    pub fn set_allow_type_override(&mut self, allow: bool) {
        self.allow_type_override = allow;
    }

    pub fn lifetime(&self) -> Option<Duration> {
        self.item_lifetime
    }

    // == Set Lifetime ==
    /// Sets the idle lifetime used by `delete_deprecated`.
    ///
    /// A zero duration disables age-based eviction.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `lifetime` is negative.
    pub fn set_lifetime(&mut self, lifetime: Duration) -> Result<()> {
        if lifetime < Duration::zero() {
            return Err(CacheError::InvalidConfiguration(
                "Item lifetime can not be a negative value".to_string(),
            ));
        }

        self.item_lifetime = if lifetime == Duration::zero() {
            None
        } else {
            Some(lifetime)
        };
        Ok(())
    }

    /// Disables age-based eviction.
    pub fn reset_lifetime(&mut self) {
        self.item_lifetime = None;
    }

    // == Get ==
    /// Retrieves a value by key, registering a hit.
    pub fn get(&mut self, key: &K) -> Result<&V> {
        self.get_mut(key).map(|value| &*value)
    }

    /// Retrieves a mutable value by key, registering a hit.
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V> {
        let now = self.clock.now_ms();
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.do_hit(now);
                self.stats.record_hit();
                Ok(&mut entry.value)
            }
            None => {
                self.stats.record_miss();
                Err(not_found(key))
            }
        }
    }

    /// Returns the entry without registering a hit.
    pub fn peek(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Contains ==
    /// Pure existence check. Never touches hit statistics.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Delete / Pop ==
    /// Removes an entry by key.
    pub fn delete(&mut self, key: &K) -> Result<()> {
        self.pop(key).map(|_| ())
    }

    /// Removes an entry by key and returns its value.
    pub fn pop(&mut self, key: &K) -> Result<V> {
        match self.entries.remove(key) {
            Some(entry) => Ok(entry.value),
            None => Err(not_found(key)),
        }
    }

    // == Pop Last ==
    /// Removes and returns the most recently inserted entry.
    pub fn pop_last(&mut self) -> Result<(K, V)> {
        let (key, entry) = self.entries.pop_back().ok_or(CacheError::Empty)?;
        Ok((key, entry.value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Iteration ==
    /// Iterates `(key, entry)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, entry)| &entry.value)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Delete Deprecated ==
    /// Removes every entry idle for at least the configured lifetime.
    ///
    /// Returns 0 without touching anything when no lifetime is set.
    pub fn delete_deprecated(&mut self) -> usize {
        let Some(lifetime) = self.item_lifetime else {
            return 0;
        };

        let now = self.clock.now_ms();
        let limit_ms = lifetime.num_milliseconds();
        self.evict_where(|_, entry| entry.idle_ms(now) >= limit_ms)
    }

    // == Delete Unpopular ==
    /// Keeps entries with at least `min_hits` hits and removes the rest.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `min_hits` is negative.
    pub fn delete_unpopular(&mut self, min_hits: i64) -> Result<usize> {
        if min_hits < 0 {
            return Err(CacheError::InvalidConfiguration(format!(
                "Minimum hit count can not be negative (got {})",
                min_hits
            )));
        }

        let min_hits = min_hits as u64;
        Ok(self.evict_where(|_, entry| entry.total_hits < min_hits))
    }

    // == Delete Delegated ==
    /// Removes every entry for which `predicate(key, entry)` returns true.
    pub fn delete_delegated<F>(&mut self, predicate: F) -> usize
    where
        F: FnMut(&K, &CacheEntry<V>) -> bool,
    {
        self.evict_where(predicate)
    }

    fn evict_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&K, &CacheEntry<V>) -> bool,
    {
        let doomed: Vec<K> = self
            .iter()
            .filter(|(key, entry)| predicate(*key, *entry))
            .map(|(key, _)| key.clone())
            .collect();

        if doomed.is_empty() {
            return 0;
        }

        for key in &doomed {
            self.entries.remove(key);
        }

        self.stats.record_evictions(doomed.len());
        doomed.len()
    }
}

impl<K, V> EvictableCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: RuntimeType,
{
    // == Set ==
    /// Stores a value, replacing any existing entry and resetting its stats.
    ///
    /// An overwritten key keeps its insertion position.
    ///
    /// # Errors
    /// `TypeConflict` if type overrides are disabled and the key already
    /// holds a value of a different runtime type. The old entry is kept.
    pub fn set(&mut self, key: K, value: V) -> Result<()> {
        if !self.allow_type_override {
            if let Some(existing) = self.entries.get(&key) {
                let expected = existing.value.runtime_type();
                let found = value.runtime_type();
                if expected != found {
                    return Err(CacheError::TypeConflict {
                        key: format!("{:?}", key),
                        expected,
                        found,
                    });
                }
            }
        }

        // Overwrites keep the key's position; `insert` would move it to the back.
        let entry = CacheEntry::new(value, self.clock.now_ms());
        match self.entries.get_mut(&key) {
            Some(slot) => *slot = entry,
            None => {
                self.entries.insert(key, entry);
            }
        }
        Ok(())
    }
}

impl<K, V> EvictableCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    /// Returns the value for `key`, or `default` on a miss.
    ///
    /// A miss touches no statistics.
    pub fn get_or_default(&mut self, key: &K, default: V) -> V {
        if !self.contains(key) {
            return default;
        }
        self.get(key).cloned().unwrap_or(default)
    }
}

impl<V> EvictableCache<CacheKey, V>
where
    V: RuntimeType + Display,
{
    // == Add ==
    /// Stores a value under a textual key.
    ///
    /// Without an explicit key the value's `Display` form is used.
    ///
    /// # Errors
    /// `InvalidKey` if a non-string key is supplied; otherwise as `set`.
    pub fn add(&mut self, value: V, key: Option<CacheKey>) -> Result<CacheKey> {
        let key = match key {
            None => CacheKey::Str(value.to_string()),
            Some(key @ CacheKey::Str(_)) => key,
            Some(other) => {
                return Err(CacheError::InvalidKey(format!(
                    "Explicit key {:?} must be a string",
                    other
                )))
            }
        };

        self.set(key.clone(), value)?;
        Ok(key)
    }
}

// == Iterator ==
/// Insertion-ordered iterator over `(key, entry)` pairs.
pub struct Iter<'a, K, V> {
    inner: linked_hash_map::Iter<'a, K, CacheEntry<V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a CacheEntry<V>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> Debug for EvictableCache<K, V>
where
    K: Eq + Hash + Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvictableCache")
            .field("name", &self.name)
            .field("allow_type_override", &self.allow_type_override)
            .field("item_lifetime", &self.item_lifetime)
            .field("entries", &self.entries)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<'a, K, V> IntoIterator for &'a EvictableCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    type Item = (&'a K, &'a CacheEntry<V>);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn not_found<K: Debug>(key: &K) -> CacheError {
    CacheError::NotFound(format!("{:?}", key))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::{json, Value};

    fn manual_cache<K, V>(clock: &ManualClock) -> EvictableCache<K, V>
    where
        K: Eq + Hash + Clone + Debug,
    {
        EvictableCache::new().with_clock(Arc::new(clock.clone()))
    }

    #[test]
    fn test_constructor() {
        let cache: EvictableCache<String, i64> = EvictableCache::named("Wiki cache");
        assert_eq!(cache.name(), Some("Wiki cache"));
        assert!(cache.allow_type_override());
        assert!(cache.lifetime().is_none());

        let mut cache: EvictableCache<String, i64> = EvictableCache::new();
        cache.set_allow_type_override(false);
        assert_eq!(cache.name(), None);
        assert!(!cache.allow_type_override());
    }

    #[test]
    fn test_contains() {
        let mut cache_a: EvictableCache<&str, i64> = EvictableCache::new();
        let mut cache_b: EvictableCache<&str, i64> = EvictableCache::new();

        cache_a.set("key1", 1).unwrap();
        cache_a.set("key2", 2).unwrap();
        cache_b.set("key3", 3).unwrap();

        assert!(cache_a.contains(&"key1"));
        assert!(cache_a.contains(&"key2"));
        assert!(!cache_a.contains(&"key3"));
        assert!(cache_b.contains(&"key3"));
        assert!(!cache_b.contains(&"key1"));
    }

    #[test]
    fn test_get_counts_hits_contains_does_not() {
        let clock = ManualClock::at_ms(1_000);
        let mut cache = manual_cache(&clock);
        cache.set("a", 1i64).unwrap();

        assert!(cache.contains(&"a"));
        assert_eq!(cache.peek(&"a").unwrap().total_hits, 0);

        clock.advance_ms(250);
        assert_eq!(*cache.get(&"a").unwrap(), 1);
        clock.advance_ms(250);
        assert_eq!(*cache.get(&"a").unwrap(), 1);

        let entry = cache.peek(&"a").unwrap();
        assert_eq!(entry.total_hits, 2);
        assert_eq!(entry.last_hit_at, 1_500);
        assert_eq!(entry.created_at, 1_000);
    }

    #[test]
    fn test_get_missing_key() {
        let mut cache: EvictableCache<String, i64> = EvictableCache::new();

        let result = cache.get(&"nope".to_string());
        assert!(matches!(result, Err(CacheError::NotFound(_))));
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_getters_setters_heterogeneous() {
        let mut cache: EvictableCache<CacheKey, Value> = EvictableCache::new();
        let list = json!(["x", "y", "z"]);

        cache.set("a".into(), json!("Single string")).unwrap();
        cache.set("b".into(), list.clone()).unwrap();
        cache.set("c".into(), json!("")).unwrap();
        cache.set("d".into(), Value::Null).unwrap();
        cache
            .set("e".into(), json!({"first": "x", "second": {"list": list}}))
            .unwrap();
        cache.set(123.into(), json!(true)).unwrap();
        cache.set(1.4564.into(), json!("a")).unwrap();

        cache
            .get_mut(&"b".into())
            .unwrap()
            .as_array_mut()
            .unwrap()
            .push(json!(50));

        assert_eq!(cache.get(&"a".into()).unwrap(), &json!("Single string"));
        assert_eq!(cache.get(&"b".into()).unwrap(), &json!(["x", "y", "z", 50]));
        assert_eq!(cache.get(&"c".into()).unwrap(), &json!(""));
        assert_eq!(cache.get(&"d".into()).unwrap(), &Value::Null);
        assert_eq!(
            cache.get(&"e".into()).unwrap()["second"]["list"],
            json!(["x", "y", "z"])
        );
        assert_eq!(cache.get(&123.into()).unwrap(), &json!(true));
        assert_eq!(cache.get(&1.4564.into()).unwrap(), &json!("a"));

        assert_eq!(cache.get_or_default(&"d".into(), json!(-1)), Value::Null);
        assert_eq!(cache.get_or_default(&"sfdsa".into(), json!(-1)), json!(-1));
    }

    #[test]
    fn test_get_or_default_miss_leaves_stats() {
        let mut cache: EvictableCache<&str, i64> = EvictableCache::new();
        cache.set("a", 1).unwrap();

        assert_eq!(cache.get_or_default(&"b", -1), -1);
        assert_eq!(cache.stats().misses, 0);

        assert_eq!(cache.get_or_default(&"a", -1), 1);
        assert_eq!(cache.peek(&"a").unwrap().total_hits, 1);
    }

    #[test]
    fn test_iter_in_insertion_order() {
        let mut cache: EvictableCache<String, i64> = EvictableCache::new();
        for i in 0..50 {
            cache.set(i.to_string(), i).unwrap();
        }
        cache.set("3".to_string(), 300).unwrap();

        let keys: Vec<&String> = cache.keys().collect();
        assert_eq!(keys.len(), 50);
        assert_eq!(keys[0], "0");
        assert_eq!(keys[3], "3");

        for (key, entry) in &cache {
            let expected = if key == "3" { 300 } else { key.parse::<i64>().unwrap() };
            assert_eq!(entry.value, expected);
        }
    }

    #[test]
    fn test_poppers_del() {
        let mut cache: EvictableCache<CacheKey, Value> = EvictableCache::new();
        cache.set(1.4564.into(), json!("a")).unwrap();
        cache.set("val0".into(), json!(65465)).unwrap();
        cache.set("val1".into(), json!("aaaaa")).unwrap();
        cache.set("val2".into(), json!([1, 2, 3, 4, 5])).unwrap();
        cache.set("val3".into(), json!([1, 2, 3, 4, 5, 6, 7, 8])).unwrap();

        assert_eq!(cache.pop_last().unwrap().1, json!([1, 2, 3, 4, 5, 6, 7, 8]));
        assert_eq!(cache.pop_last().unwrap().1, json!([1, 2, 3, 4, 5]));
        assert_eq!(cache.pop(&"val0".into()).unwrap(), json!(65465));
        assert_eq!(cache.pop(&1.4564.into()).unwrap(), json!("a"));
        assert_eq!(cache.len(), 1);

        cache.delete(&"val1".into()).unwrap();
        assert!(matches!(cache.pop_last(), Err(CacheError::Empty)));
        assert!(matches!(
            cache.delete(&"val1".into()),
            Err(CacheError::NotFound(_))
        ));
    }

    #[test]
    fn test_clear() {
        let mut cache: EvictableCache<String, i64> = EvictableCache::new();
        for i in 0..100 {
            cache.set(i.to_string(), i).unwrap();
        }

        assert_eq!(cache.len(), 100);
        cache.clear();
        assert!(cache.is_empty());
        assert!(matches!(cache.pop_last(), Err(CacheError::Empty)));
    }

    #[test]
    fn test_type_override_disabled() {
        let mut cache: EvictableCache<CacheKey, Value> =
            EvictableCache::new().with_type_override(false);

        cache.set("k".into(), json!(1)).unwrap();
        cache.get(&"k".into()).unwrap();

        let err = cache.set("k".into(), json!("text")).unwrap_err();
        assert!(matches!(err, CacheError::TypeConflict { .. }));
        let entry = cache.peek(&"k".into()).unwrap();
        assert_eq!(entry.value, json!(1));
        assert_eq!(entry.total_hits, 1);

        cache.set("k".into(), json!(2)).unwrap();
        let entry = cache.peek(&"k".into()).unwrap();
        assert_eq!(entry.value, json!(2));
        assert_eq!(entry.total_hits, 0);
    }

    #[test]
    fn test_type_override_enabled_replaces_any_type() {
        let mut cache: EvictableCache<CacheKey, Value> = EvictableCache::new();

        cache.set("k".into(), json!(1)).unwrap();
        cache.set("k".into(), json!([])).unwrap();

        assert_eq!(cache.get(&"k".into()).unwrap(), &json!([]));
    }

    #[test]
    fn test_add_delete() {
        let mut cache: EvictableCache<CacheKey, Value> =
            EvictableCache::new().with_type_override(false);

        assert_eq!(cache.add(json!(1234), None).unwrap(), CacheKey::from("1234"));
        cache.add(json!([0, 1, 2]), None).unwrap();
        cache.add(json!([7, 8]), Some("randList".into())).unwrap();

        assert_eq!(cache.len(), 3);
        cache.delete(&"1234".into()).unwrap();
        assert_eq!(cache.len(), 2);
        cache.delete(&"randList".into()).unwrap();
        assert_eq!(cache.len(), 1);

        cache.add(json!(123), Some("123".into())).unwrap();
        cache.add(json!(123), None).unwrap();
        assert!(matches!(
            cache.add(json!("Should raise"), Some("123".into())),
            Err(CacheError::TypeConflict { .. })
        ));
        assert!(matches!(
            cache.add(json!([]), Some("123".into())),
            Err(CacheError::TypeConflict { .. })
        ));
        assert!(matches!(
            cache.add(json!("no int keys"), Some(123.into())),
            Err(CacheError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_len_with_add() {
        let mut cache: EvictableCache<CacheKey, i64> = EvictableCache::new();
        for i in 0..3000 {
            cache.add(i, None).unwrap();
        }
        assert_eq!(cache.len(), 3000);
    }

    #[test]
    fn test_set_lifetime_validation() {
        let mut cache: EvictableCache<String, i64> = EvictableCache::new();

        assert!(matches!(
            cache.set_lifetime(Duration::seconds(-1)),
            Err(CacheError::InvalidConfiguration(_))
        ));
        assert!(cache.lifetime().is_none());

        cache.set_lifetime(Duration::minutes(5)).unwrap();
        assert_eq!(cache.lifetime(), Some(Duration::seconds(300)));

        cache.set_lifetime(Duration::zero()).unwrap();
        assert!(cache.lifetime().is_none());
    }

    #[test]
    fn test_delete_deprecated() {
        let clock = ManualClock::at_ms(0);
        let mut cache: EvictableCache<CacheKey, i64> = manual_cache(&clock);
        cache.set_lifetime(Duration::seconds(1)).unwrap();

        for i in 0..10 {
            cache.add(i, None).unwrap();
            clock.advance_ms(500);
        }

        let deleted = cache.delete_deprecated();
        assert_eq!(deleted, 9);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&CacheKey::from("9")));

        cache.reset_lifetime();
        assert_eq!(cache.lifetime(), None);
        clock.advance_secs(60);
        assert_eq!(cache.delete_deprecated(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_delete_deprecated_hit_refreshes_idle_time() {
        let clock = ManualClock::at_ms(0);
        let mut cache: EvictableCache<&str, i64> = manual_cache(&clock);
        cache.set_lifetime(Duration::seconds(2)).unwrap();
        cache.set("read", 1).unwrap();
        cache.set("idle", 2).unwrap();

        clock.advance_ms(1_500);
        cache.get(&"read").unwrap();
        clock.advance_ms(1_000);

        assert_eq!(cache.delete_deprecated(), 1);
        assert!(cache.contains(&"read"));
        assert!(!cache.contains(&"idle"));
    }

    #[test]
    fn test_delete_unpopular() {
        let mut cache: EvictableCache<CacheKey, i64> = EvictableCache::new();
        for i in 0..10 {
            cache.add(i, None).unwrap();
        }

        cache.get(&"3".into()).unwrap();
        cache.get(&"4".into()).unwrap();
        cache.get_or_default(&"3".into(), 0);
        cache.get_or_default(&"4".into(), 0);

        assert_eq!(cache.delete_unpopular(2).unwrap(), 8);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 8);

        assert!(matches!(
            cache.delete_unpopular(-1),
            Err(CacheError::InvalidConfiguration(_))
        ));
        assert_eq!(cache.delete_unpopular(0).unwrap(), 0);
    }

    #[test]
    fn test_delete_delegated_uses_key_and_entry() {
        let mut cache: EvictableCache<i64, i64> = EvictableCache::new();
        for i in 1..=100 {
            cache.set(i, i).unwrap();
        }

        let deleted = cache.delete_delegated(|key, entry| key % 10 == 0 || entry.value % 25 == 0);

        // 10 multiples of ten by key, plus 25 and 75 by value
        assert_eq!(deleted, 12);
        for (key, entry) in &cache {
            assert!(key % 10 != 0 && entry.value % 25 != 0);
        }
        assert_eq!(cache.keys().next(), Some(&1));
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut cache: EvictableCache<&str, i64> = EvictableCache::new();
        cache.set("a", 1).unwrap();
        cache.set("b", 2).unwrap();
        cache.set("a", 3).unwrap();

        assert_eq!(cache.pop_last().unwrap(), ("b", 2));
        assert_eq!(cache.pop_last().unwrap(), ("a", 3));
    }

    #[test]
    fn test_removal_keeps_relative_order() {
        let mut cache: EvictableCache<i64, i64> = EvictableCache::new();
        for i in 0..10 {
            cache.set(i, i).unwrap();
        }

        assert_eq!(cache.pop(&4).unwrap(), 4);
        cache.delete(&7).unwrap();
        assert_eq!(cache.delete_delegated(|key, _| key % 3 == 0), 4);

        let keys: Vec<i64> = cache.keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 5, 8]);

        cache.set(4, 40).unwrap();
        assert_eq!(cache.pop_last().unwrap(), (4, 40));
        assert_eq!(cache.pop_last().unwrap(), (8, 8));
        assert_eq!(cache.iter().next_back().map(|(k, _)| *k), Some(5));
    }
}
