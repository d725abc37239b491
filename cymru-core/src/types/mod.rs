//! Domain types for Cymru.
//!
//! - [`Coordinate`]: A latitude/longitude pair returned by the provider
//! - [`CacheEntry`]: A coordinate or a negative marker, keyed by organisation name
//! - [`CacheStats`]: Counts describing the cache contents

mod coordinate;
mod entry;

pub use coordinate::*;
pub use entry::*;
