//! # geocache upstream
//!
//! HTTP client for the PositionStack forward and reverse geocoding API,
//! implementing [`geocache_core::UpstreamClient`].

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod positionstack;

pub use positionstack::{PositionStackClient, UpstreamConfig};
