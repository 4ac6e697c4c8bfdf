//! Response wrapper with cache status

use chrono::DateTime;
use chrono::Utc;

/// A data-layer response that records whether it came from the memo slot.
///
/// # Example
///
/// ```ignore
/// let response = data.get_records(&query, false).await?;
///
/// if response.is_cached() {
///     println!("Served from memo, cached at {:?}", response.cached_at());
/// }
///
/// let page = response.into_inner();
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    data: T,
    /// Information about whether this response came from cache.
    pub cache: CacheStatus,
}

impl<T> Response<T> {
    /// Creates a response for a forced refresh that skipped the memo lookup.
    pub fn bypassed(data: T) -> Self {
        Self {
            data,
            cache: CacheStatus::Bypassed,
        }
    }

    /// Creates a response indicating a cache miss (fresh fetch, now memoized).
    pub fn cache_miss(data: T) -> Self {
        Self {
            data,
            cache: CacheStatus::Miss,
        }
    }

    /// Creates a response indicating a cache hit.
    pub fn cache_hit(data: T, cached_at: DateTime<Utc>) -> Self {
        Self {
            data,
            cache: CacheStatus::Hit { cached_at },
        }
    }

    /// Returns `true` if this response came from the cache.
    pub fn is_cached(&self) -> bool {
        self.cache.is_hit()
    }

    /// Returns when the data was cached, for hits.
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        match &self.cache {
            CacheStatus::Hit { cached_at } => Some(*cached_at),
            _ => None,
        }
    }

    /// Returns a reference to the inner data.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the response and returns the inner data.
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Cache status for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// `force_update` skipped the lookup; the result was fetched and memoized.
    Bypassed,
    /// The query differed from the memoized one; fetched and memoized.
    Miss,
    /// The query matched the memoized one; no network call was made.
    Hit {
        /// When the memoized result was fetched.
        cached_at: DateTime<Utc>,
    },
}

impl CacheStatus {
    /// Returns `true` if this is a cache hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Returns `true` if this is a cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss)
    }

    /// Returns `true` if the lookup was skipped.
    pub fn is_bypassed(&self) -> bool {
        matches!(self, Self::Bypassed)
    }
}
