//! Six-coefficient affine geotransform

use crate::sampler::errors::{SamplingError, SamplingResult};

/// Relative tolerance below which shear terms count as zero
///
/// Transforms that come out of a least-squares fit carry rounding noise in
/// terms that are exactly zero for the source data.
const NORTH_UP_TOLERANCE: f64 = 1e-9;

/// Affine mapping from pixel `(x,y)` to geographic `(lon,lat)`
///
/// `lon = c0 + c1*x + c2*y`, `lat = c3 + c4*x + c5*y`, i.e. the usual
/// `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub coefficients: [f64; 6],
}

impl AffineTransform {
    /// Create a transform from its six coefficients
    pub fn new(coefficients: [f64; 6]) -> Self {
        AffineTransform { coefficients }
    }

    /// Transform for a north-up raster with the given origin and pixel size
    pub fn north_up(origin_lon: f64, origin_lat: f64, pixel_width: f64, pixel_height: f64) -> Self {
        AffineTransform::new([origin_lon, pixel_width, 0.0, origin_lat, 0.0, pixel_height])
    }

    /// The identity mapping, which rasters without georeferencing report
    pub fn identity() -> Self {
        AffineTransform::new([0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    /// Apply the forward transform: pixel -> (lon, lat)
    pub fn forward(&self, x: f64, y: f64) -> (f64, f64) {
        let c = &self.coefficients;
        (c[0] + c[1] * x + c[2] * y, c[3] + c[4] * x + c[5] * y)
    }

    /// Apply the inverse transform: (lon, lat) -> pixel
    pub fn inverse(&self, lon: f64, lat: f64) -> SamplingResult<(f64, f64)> {
        let c = &self.coefficients;
        let det = self.determinant();
        let scale = self.scale();
        if det.abs() <= f64::EPSILON * scale * scale {
            return Err(SamplingError::DegenerateTransform(
                "Singular affine transform (determinant is zero)".to_string()));
        }

        let dx = lon - c[0];
        let dy = lat - c[3];
        let x = (c[5] * dx - c[2] * dy) / det;
        let y = (c[1] * dy - c[4] * dx) / det;
        Ok((x, y))
    }

    pub fn determinant(&self) -> f64 {
        let c = &self.coefficients;
        c[1] * c[5] - c[2] * c[4]
    }

    /// True when rows and columns are aligned with the lat/lon axes
    pub fn is_north_up(&self) -> bool {
        let c = &self.coefficients;
        let tolerance = NORTH_UP_TOLERANCE * self.scale();
        c[2].abs() <= tolerance && c[4].abs() <= tolerance
    }

    /// True when all six coefficients are zero
    pub fn is_degenerate(&self) -> bool {
        self.coefficients.iter().all(|c| *c == 0.0)
    }

    /// Copy with shear terms that are zero up to fitting noise set to exactly zero
    pub fn snapped(&self) -> Self {
        if !self.is_north_up() {
            return *self;
        }
        let mut coefficients = self.coefficients;
        coefficients[2] = 0.0;
        coefficients[4] = 0.0;
        AffineTransform { coefficients }
    }

    fn scale(&self) -> f64 {
        let c = &self.coefficients;
        c[1].abs().max(c[5].abs())
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        AffineTransform::identity()
    }
}
