//! # Cymru Geocoder
//!
//! Resolves rugby organisation names to coordinates, consulting a durable
//! cache before calling the external provider.
//!
//! - A name is sent to the provider at most once per cache lifetime.
//! - Failed or empty lookups are cached as negative entries and never retried.
//! - Batches fetch uncached names in sequential groups of bounded size and
//!   write the snapshot once at the end.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cymru_geocoder::{Geocoder, GeocoderConfig};
//!
//! let geocoder = Geocoder::google(GeocoderConfig::default(), Some(api_key))?;
//! let outcome = geocoder.resolve_batch(&["Cardiff RFC".to_string()]).await?;
//! println!("{:?}", outcome.results["Cardiff RFC"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod geocoder;
mod plan;

pub use config::GeocoderConfig;
pub use geocoder::{BatchOutcome, BatchReport, Geocoder};
pub use plan::group_ranges;
