//! Coordinate handling for geo-referenced rasters
//!
//! This module provides the geographic and pixel-space primitives the
//! sampler works with, along with the transforms between the two spaces.

mod sector;
mod pixel_rect;
mod affine;
mod gcp;
mod polynomial;
mod transform;
mod bounds;
#[cfg(test)]
mod tests;

// Re-export key types
pub use self::sector::Sector;
pub use self::pixel_rect::PixelRect;
pub use self::affine::AffineTransform;
pub use self::gcp::{GroundControlPoint, spans_area};
pub use self::polynomial::{monomials, term_count, Normalization, PolynomialMapping, PolynomialTransform};
pub use self::transform::CoordinateTransform;
pub use self::bounds::{GeoBoundsAccumulator, PixelBoundsAccumulator};
