//! Running min/max accumulators used while probing footprints

use super::pixel_rect::PixelRect;
use super::sector::Sector;

/// Accumulates the lat/lon envelope of a set of probed locations
#[derive(Debug, Clone, Copy)]
pub struct GeoBoundsAccumulator {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
    count: usize,
}

impl GeoBoundsAccumulator {
    pub fn new() -> Self {
        GeoBoundsAccumulator {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            count: 0,
        }
    }

    /// Add one location; non-finite values are ignored
    pub fn add(&mut self, lon: f64, lat: f64) {
        if !lon.is_finite() || !lat.is_finite() {
            return;
        }
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
        self.count += 1;
    }

    /// Number of locations accumulated so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// The envelope, or `None` if nothing was added
    pub fn sector(&self) -> Option<Sector> {
        if self.count == 0 {
            return None;
        }
        Sector::from_corners(self.min_lat, self.min_lon, self.max_lat, self.max_lon).ok()
    }
}

impl Default for GeoBoundsAccumulator {
    fn default() -> Self {
        GeoBoundsAccumulator::new()
    }
}

/// Accumulates the fractional pixel envelope of a set of locations
#[derive(Debug, Clone, Copy)]
pub struct PixelBoundsAccumulator {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    count: usize,
}

impl PixelBoundsAccumulator {
    pub fn new() -> Self {
        PixelBoundsAccumulator {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
            count: 0,
        }
    }

    pub fn add(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Smallest integer rectangle covering every added location
    pub fn rect(&self) -> Option<PixelRect> {
        if self.count == 0 {
            return None;
        }
        Some(PixelRect::new(
            self.min_x.floor() as i64,
            self.min_y.floor() as i64,
            self.max_x.ceil() as i64,
            self.max_y.ceil() as i64,
        ))
    }
}

impl Default for PixelBoundsAccumulator {
    fn default() -> Self {
        PixelBoundsAccumulator::new()
    }
}
