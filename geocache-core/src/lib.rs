//! # geocache core
//!
//! Core types, errors, validation and traits shared by every geocache crate.
//!
//! - **Types**: queries, results and the cache keys derived from them
//! - **Errors**: the `GeoError` hierarchy surfaced to callers
//! - **Validation**: address and coordinate checks run before any lookup
//! - **Traits**: the upstream provider interface
//!
//! ## Example
//!
//! ```rust
//! use geocache_core::{CacheKey, GeoQuery};
//!
//! let query = GeoQuery::forward("  Paris ");
//! assert_eq!(query.cache_key(), CacheKey::Forward("paris".into()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{GeoError, Result};
pub use traits::*;
pub use types::*;
