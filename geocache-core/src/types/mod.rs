//! Domain types for geocache.
//!
//! - [`GeoQuery`]: a forward or reverse lookup request
//! - [`Coordinates`] / [`AddressLabel`] / [`GeoResult`]: normalized provider results
//! - [`ForwardKey`] / [`ReverseKey`] / [`CacheKey`]: cache keys derived from queries

mod key;
mod query;
mod result;

pub use key::*;
pub use query::*;
pub use result::*;
