//! # Cymru Google
//!
//! Google Geocoding API client implementing [`GeocodingProvider`].

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod google;

pub use google::{GoogleConfig, GoogleGeocoder};
pub use cymru_core::traits::GeocodingProvider;
