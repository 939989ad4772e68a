//! Pixel <-> geographic coordinate transformation
//!
//! A raster is geocoded either by a plain affine geotransform or by a
//! polynomial fitted to ground control points. Both are wrapped in
//! [`CoordinateTransform`] so the sampler can treat them uniformly and
//! still detect the cheap north-up case.

use super::affine::AffineTransform;
use super::polynomial::PolynomialTransform;
use crate::sampler::errors::SamplingResult;

/// Geocoding transform of an opened raster
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateTransform {
    /// Order-1 mapping with an analytic inverse
    Affine(AffineTransform),
    /// Fitted polynomial of order 1 to 3
    Polynomial(PolynomialTransform),
}

impl CoordinateTransform {
    /// Map pixel `(x, y)` to `(lon, lat)`
    pub fn forward(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            CoordinateTransform::Affine(affine) => affine.forward(x, y),
            CoordinateTransform::Polynomial(poly) => poly.forward.evaluate(x, y),
        }
    }

    /// Map `(lon, lat)` to pixel `(x, y)`
    ///
    /// Exact for affine transforms; for polynomials this evaluates the
    /// reverse fit, which is only an approximation of the true inverse.
    pub fn inverse(&self, lon: f64, lat: f64) -> SamplingResult<(f64, f64)> {
        match self {
            CoordinateTransform::Affine(affine) => affine.inverse(lon, lat),
            CoordinateTransform::Polynomial(poly) => Ok(poly.reverse.evaluate(lon, lat)),
        }
    }

    pub fn order(&self) -> u8 {
        match self {
            CoordinateTransform::Affine(_) => 1,
            CoordinateTransform::Polynomial(poly) => poly.order(),
        }
    }

    /// The affine coefficients, when this is an order-1 affine transform
    pub fn as_affine(&self) -> Option<&AffineTransform> {
        match self {
            CoordinateTransform::Affine(affine) => Some(affine),
            CoordinateTransform::Polynomial(_) => None,
        }
    }

    /// True for order-1 transforms without rotation or shear
    pub fn is_north_up(&self) -> bool {
        self.as_affine().map_or(false, |a| a.is_north_up())
    }

    /// Short description for logs and the CLI
    pub fn describe(&self) -> String {
        match self {
            CoordinateTransform::Affine(a) => {
                let c = &a.coefficients;
                format!("affine [{}, {}, {}, {}, {}, {}]{}",
                        c[0], c[1], c[2], c[3], c[4], c[5],
                        if a.is_north_up() { " (north-up)" } else { "" })
            },
            CoordinateTransform::Polynomial(p) => format!("polynomial order {}", p.order()),
        }
    }
}
