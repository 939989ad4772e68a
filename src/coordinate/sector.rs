//! Geographic bounding box used for footprints and tile requests

use crate::sampler::errors::{SamplingError, SamplingResult};

/// An immutable lat/lon bounding box
///
/// Invariant: `min_lat <= max_lat` and `min_lon <= max_lon`. The
/// constructors enforce it; fields are private so it cannot be broken later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl Sector {
    /// Create a new sector
    ///
    /// # Arguments
    /// * `min_lat` - Southern edge
    /// * `max_lat` - Northern edge
    /// * `min_lon` - Western edge
    /// * `max_lon` - Eastern edge
    ///
    /// # Returns
    /// The sector, or an error if the bounds are inverted or not finite
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> SamplingResult<Self> {
        let all_finite = [min_lat, max_lat, min_lon, max_lon].iter().all(|v| v.is_finite());
        if !all_finite {
            return Err(SamplingError::InvalidRequest("Sector bounds must be finite".to_string()));
        }
        if min_lat > max_lat || min_lon > max_lon {
            return Err(SamplingError::InvalidRequest(format!(
                "Inverted sector: lat [{}, {}], lon [{}, {}]",
                min_lat, max_lat, min_lon, max_lon
            )));
        }

        Ok(Sector { min_lat, max_lat, min_lon, max_lon })
    }

    /// Build a sector from two arbitrary corners, ordering the bounds
    ///
    /// Fails like [`Sector::new`] when any coordinate is not finite.
    pub fn from_corners(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> SamplingResult<Self> {
        // f64::min drops a NaN operand, so check before ordering
        if ![lat_a, lon_a, lat_b, lon_b].iter().all(|v| v.is_finite()) {
            return Err(SamplingError::InvalidRequest("Sector corners must be finite".to_string()));
        }
        Sector::new(lat_a.min(lat_b), lat_a.max(lat_b), lon_a.min(lon_b), lon_a.max(lon_b))
    }

    /// Parse a sector from a string (format: "minlon,minlat,maxlon,maxlat")
    ///
    /// Uses the same axis order as a GIS bbox so it can be passed straight
    /// from the command line.
    pub fn from_bbox_string(bbox_str: &str) -> SamplingResult<Self> {
        let parts: Vec<&str> = bbox_str.split(',').collect();
        if parts.len() != 4 {
            return Err(SamplingError::InvalidRequest(
                "Bounding box must have 4 comma-separated values".to_string()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(parts.iter()) {
            *slot = part.trim().parse::<f64>()
                .map_err(|_| SamplingError::InvalidRequest(format!("Invalid bbox value '{}'", part.trim())))?;
        }

        Sector::new(values[1], values[3], values[0], values[2])
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Longitude extent in degrees
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude extent in degrees
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Area in square degrees
    pub fn area(&self) -> f64 {
        self.lon_span() * self.lat_span()
    }

    /// Check if this sector contains a lon/lat location
    pub fn contains_location(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon &&
            lat >= self.min_lat && lat <= self.max_lat
    }

    /// Check if `other` lies entirely inside this sector
    pub fn contains(&self, other: &Sector) -> bool {
        other.min_lon >= self.min_lon && other.max_lon <= self.max_lon &&
            other.min_lat >= self.min_lat && other.max_lat <= self.max_lat
    }

    /// Check if the two sectors share a region of non-zero area
    pub fn intersects(&self, other: &Sector) -> bool {
        self.min_lon < other.max_lon && self.max_lon > other.min_lon &&
            self.min_lat < other.max_lat && self.max_lat > other.min_lat
    }

    /// Overlap of the two sectors, if any
    pub fn intersection(&self, other: &Sector) -> Option<Sector> {
        if !self.intersects(other) {
            return None;
        }

        Some(Sector {
            min_lat: self.min_lat.max(other.min_lat),
            max_lat: self.max_lat.min(other.max_lat),
            min_lon: self.min_lon.max(other.min_lon),
            max_lon: self.max_lon.min(other.max_lon),
        })
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lon [{:.6}, {:.6}] lat [{:.6}, {:.6}]",
               self.min_lon, self.max_lon, self.min_lat, self.max_lat)
    }
}
