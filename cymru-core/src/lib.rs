//! # Cymru Core
//!
//! Core types, errors, and traits for the Cymru geocoding cache.
//!
//! This crate provides the foundational building blocks used by all other Cymru crates:
//!
//! - **Types**: [`Coordinate`], cache entries, and statistics
//! - **Errors**: A single error enum shared across the workspace
//! - **Constants**: Defaults for the provider, cache file, and batching
//! - **Traits**: The [`GeocodingProvider`] seam between the service and the outside world
//!
//! ## Example
//!
//! ```rust
//! use cymru_core::Coordinate;
//!
//! let cardiff = Coordinate::new(51.4816, -3.1791);
//! let json = serde_json::to_string(&cardiff).unwrap();
//! assert_eq!(json, r#"{"lat":51.4816,"lng":-3.1791}"#);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{GeocodeError, Result};
pub use traits::*;
pub use types::*;
