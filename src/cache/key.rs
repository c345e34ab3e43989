//! Cache Key Module
//!
//! Tagged-union key for caches that mix strings, integers and floats.

use std::fmt;
use std::hash::{Hash, Hasher};

// == Cache Key ==
/// Heterogeneous cache key.
///
/// Floats compare and hash by bit pattern, so `NaN` keys are usable and
/// `0.0` and `-0.0` are distinct keys.
#[derive(Debug, Clone)]
pub enum CacheKey {
    Str(String),
    Int(i64),
    Float(f64),
}

impl CacheKey {
    /// Returns true for textual keys.
    pub fn is_str(&self) -> bool {
        matches!(self, CacheKey::Str(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CacheKey::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CacheKey::Str(a), CacheKey::Str(b)) => a == b,
            (CacheKey::Int(a), CacheKey::Int(b)) => a == b,
            (CacheKey::Float(a), CacheKey::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CacheKey::Str(s) => s.hash(state),
            CacheKey::Int(i) => i.hash(state),
            CacheKey::Float(f) => f.to_bits().hash(state),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Str(s) => write!(f, "{}", s),
            CacheKey::Int(i) => write!(f, "{}", i),
            CacheKey::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for CacheKey {
    fn from(value: &str) -> Self {
        CacheKey::Str(value.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(value: String) -> Self {
        CacheKey::Str(value)
    }
}

impl From<i64> for CacheKey {
    fn from(value: i64) -> Self {
        CacheKey::Int(value)
    }
}

impl From<i32> for CacheKey {
    fn from(value: i32) -> Self {
        CacheKey::Int(value as i64)
    }
}

impl From<f64> for CacheKey {
    fn from(value: f64) -> Self {
        CacheKey::Float(value)
    }
}
