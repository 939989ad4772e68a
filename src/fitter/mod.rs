//! Transform fitting from ground control points
//!
//! The fitter is a seam: the engine only relies on [`TransformFitter`], and
//! ships a least-squares polynomial implementation as the default.

mod least_squares;

pub use least_squares::{fit_mapping, PolynomialFitter, MAX_ORDER};

use crate::coordinate::{CoordinateTransform, GroundControlPoint};
use crate::sampler::errors::SamplingResult;

/// Produces a best-fit transform for a set of control points
pub trait TransformFitter: Send + Sync {
    /// Fit a transform to `gcps`
    ///
    /// # Arguments
    /// * `gcps` - At least three non-collinear control points
    ///
    /// # Returns
    /// The fitted transform, or `DegenerateTransform` if the points cannot
    /// support one
    fn fit_best_fit(&self, gcps: &[GroundControlPoint]) -> SamplingResult<CoordinateTransform>;
}
