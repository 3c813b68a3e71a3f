//! # geocache service
//!
//! Cache-aside orchestration for forward and reverse geocoding:
//! validate, check the namespace cache, call the provider on a miss and
//! populate the cache with successful results only.
//!
//! Concurrent misses on one key share a single provider call.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod service;
mod single_flight;

pub use config::LookupConfig;
pub use service::{GeoLookupService, LookupStats};
pub use single_flight::SingleFlight;
