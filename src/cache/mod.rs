//! Caching subsystem.
//!
//! [`response::ResponseCache`] holds successful upstream payloads with a
//! per-entry TTL. The [`RiotClient`](crate::RiotClient) consults it before
//! asking the rate limiter for admission, so a hit costs no upstream quota.

pub mod response;

pub use response::{CacheConfig, CacheEntry, ResponseCache};
