//! Shared test scaffolding for the domain and app crates.
//!
//! - [`TestDatabase`]: migrated Postgres in a container (feature `postgres`)
//! - [`TestDataBuilder`]: deterministic names and time windows per test
//! - [`assertions`]: small assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn lists_events() {
//!     let db = TestDatabase::new().await;
//!     let data = TestDataBuilder::from_test_name("lists_events");
//!     let title = data.name("event", "main");
//! }
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Seeded generator so every run of a test sees the same data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// `test-{prefix}-{seed}-{suffix}`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Fixed reference instant (2025-12-01T09:00:00Z) shifted by whole days.
    pub fn day(&self, offset_days: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0)
            .single()
            .unwrap_or_default()
            + Duration::days(offset_days)
    }

    /// `(start, end)` starting `offset_days` after the reference instant.
    pub fn window(&self, offset_days: i64, hours: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.day(offset_days);
        (start, start + Duration::hours(hours))
    }
}

pub mod assertions {
    /// Unwraps `value`, naming `context` on failure.
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Asserts `items` are non-decreasing by `key`.
    pub fn assert_sorted_by<T, K, F>(items: &[T], key: F, context: &str)
    where
        K: PartialOrd + std::fmt::Debug,
        F: Fn(&T) -> K,
    {
        for pair in items.windows(2) {
            let (a, b) = (key(&pair[0]), key(&pair[1]));
            assert!(a <= b, "{}: {:?} sorted after {:?}", context, a, b);
        }
    }
}
