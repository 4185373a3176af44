//! # Access Layer
//!
//! Async calls standing in for a future remote API: simulated latency,
//! cached reads, invalidation on mutation.
//!
//! - [`api`] - The [`Api`] handle and its operations
//! - [`cache`] - Query cache keyed by query name and scope

pub mod api;
pub mod cache;

pub use api::{system_clock, Api, Clock, RoomBoardEntry};
pub use cache::{CacheStats, QueryCache, QueryKey};
