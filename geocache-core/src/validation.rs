//! Input validation run before any cache access or upstream call.
//!
//! Messages name the offending field and the accepted range so they can be
//! returned to API clients verbatim.

use crate::constants::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};
use crate::error::{GeoError, Result};

/// Rejects empty and all-whitespace addresses.
pub fn validate_address(address: &str) -> Result<()> {
    if address.trim().is_empty() {
        return Err(GeoError::invalid("address must not be empty"));
    }
    Ok(())
}

/// Rejects a latitude outside `[-90, 90]` or a longitude outside `[-180, 180]`.
///
/// Bounds are inclusive. NaN is never in range.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    check_range("latitude", latitude, MIN_LATITUDE, MAX_LATITUDE)?;
    check_range("longitude", longitude, MIN_LONGITUDE, MAX_LONGITUDE)
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GeoError::invalid(format!(
            "{} must be within {}..{}, got {}",
            field, min, max, value
        )))
    }
}
