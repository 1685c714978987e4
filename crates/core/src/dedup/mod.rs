//! Memoized "does the remote library already have a trailer" lookups.

mod cache;

pub use cache::{CacheStats, TrailerDedupCache};
