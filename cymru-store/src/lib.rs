//! # Cymru Store
//!
//! The geocode cache and where it lives between process restarts.
//!
//! - **[`GeocodeCache`]**: the in-memory mirror, loaded lazily and flushed on demand
//! - **[`JsonFileStore`]**: durable snapshot as a single pretty-printed JSON object
//! - **[`MemoryStore`]**: snapshot kept in memory, for tests and ephemeral runs
//!
//! ## Example
//!
//! ```rust,ignore
//! use cymru_store::GeocodeCache;
//!
//! let cache = GeocodeCache::json_file(".geocode-cache.json");
//! cache.ensure_loaded().await;
//!
//! if cache.get("Cardiff RFC").is_none() {
//!     cache.insert("Cardiff RFC", None);
//! }
//! cache.flush().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod file;
mod memory;

pub use cache::GeocodeCache;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

// Re-export the trait from core
pub use cymru_core::traits::SnapshotStore;
