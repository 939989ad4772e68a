//! Least-squares polynomial fit of ground control points

use log::{debug, info, warn};

use crate::coordinate::{
    monomials, spans_area, term_count, AffineTransform, CoordinateTransform, GroundControlPoint,
    Normalization, PolynomialMapping, PolynomialTransform,
};
use crate::sampler::errors::{SamplingError, SamplingResult};

use super::TransformFitter;

/// Highest polynomial order the fitter supports
pub const MAX_ORDER: u8 = 3;

/// Fits forward and reverse polynomials to a GCP set
///
/// The order is picked from the number of points (3 for order 1, 6 for
/// order 2, 10 for order 3) and capped by `max_order`. A singular system
/// is retried one order lower. Order-1 fits are returned as plain affine
/// transforms.
#[derive(Debug, Clone, Copy)]
pub struct PolynomialFitter {
    max_order: u8,
}

impl PolynomialFitter {
    /// Create a fitter that never goes above `max_order` (clamped to 1..=3)
    pub fn new(max_order: u8) -> Self {
        PolynomialFitter { max_order: max_order.clamp(1, MAX_ORDER) }
    }

    /// Order used for a given number of control points
    pub fn order_for(&self, gcp_count: usize) -> u8 {
        let order = if gcp_count >= term_count(3) {
            3
        } else if gcp_count >= term_count(2) {
            2
        } else {
            1
        };
        order.min(self.max_order)
    }

    /// Fit both directions at exactly `order`
    fn fit_order(order: u8, pixels: &[(f64, f64)], locations: &[(f64, f64)]) -> SamplingResult<CoordinateTransform> {
        let forward = fit_mapping(order, pixels, locations)?;
        if order == 1 {
            let affine = affine_from_mapping(&forward).snapped();
            debug!("Order 1 fit reduced to affine {:?}", affine.coefficients);
            return Ok(CoordinateTransform::Affine(affine));
        }

        let reverse = fit_mapping(order, locations, pixels)?;
        Ok(CoordinateTransform::Polynomial(PolynomialTransform { forward, reverse }))
    }
}

impl Default for PolynomialFitter {
    fn default() -> Self {
        PolynomialFitter::new(MAX_ORDER)
    }
}

impl TransformFitter for PolynomialFitter {
    fn fit_best_fit(&self, gcps: &[GroundControlPoint]) -> SamplingResult<CoordinateTransform> {
        if gcps.len() < 3 {
            return Err(SamplingError::DegenerateTransform(format!(
                "At least 3 ground control points are required, got {}", gcps.len())));
        }
        if !spans_area(gcps) {
            return Err(SamplingError::DegenerateTransform(
                "Ground control points are collinear".to_string()));
        }

        let start = self.order_for(gcps.len());
        let pixels: Vec<(f64, f64)> = gcps.iter().map(|g| (g.pixel, g.line)).collect();
        let locations: Vec<(f64, f64)> = gcps.iter().map(|g| (g.lon, g.lat)).collect();

        // A point layout that cannot pin down the higher terms still supports a lower order
        let mut order = start;
        loop {
            info!("Fitting order {} polynomial to {} GCPs", order, gcps.len());
            match Self::fit_order(order, &pixels, &locations) {
                Ok(transform) => return Ok(transform),
                Err(SamplingError::DegenerateTransform(reason)) if order > 1 => {
                    warn!("Order {} fit failed ({}); retrying at order {}", order, reason, order - 1);
                    order -= 1;
                },
                Err(e) => return Err(e),
            }
        }
    }
}

/// Fit a polynomial of `order` mapping `inputs[i]` onto `outputs[i]`
pub fn fit_mapping(order: u8, inputs: &[(f64, f64)], outputs: &[(f64, f64)]) -> SamplingResult<PolynomialMapping> {
    let terms = term_count(order);
    if inputs.len() < terms {
        return Err(SamplingError::DegenerateTransform(format!(
            "Order {} fit needs {} points, got {}", order, terms, inputs.len())));
    }

    let normalization = Normalization::from_points(inputs);

    // Accumulate the normal equations A^T A c = A^T b for both outputs at once
    let mut normal = vec![vec![0.0f64; terms]; terms];
    let mut rhs_x = vec![0.0f64; terms];
    let mut rhs_y = vec![0.0f64; terms];

    for (input, output) in inputs.iter().zip(outputs) {
        let (u, v) = normalization.apply(input.0, input.1);
        let row = monomials(order, u, v);
        for i in 0..terms {
            for j in 0..terms {
                normal[i][j] += row[i] * row[j];
            }
            rhs_x[i] += row[i] * output.0;
            rhs_y[i] += row[i] * output.1;
        }
    }

    let x_coefficients = solve_linear_system(normal.clone(), rhs_x)?;
    let y_coefficients = solve_linear_system(normal, rhs_y)?;

    Ok(PolynomialMapping { order, normalization, x_coefficients, y_coefficients })
}

/// Collapse an order-1 mapping back into raw affine coefficients
fn affine_from_mapping(mapping: &PolynomialMapping) -> AffineTransform {
    let n = &mapping.normalization;
    let expand = |c: &[f64]| {
        let dx = c[1] / n.x_scale;
        let dy = c[2] / n.y_scale;
        (c[0] - dx * n.x_offset - dy * n.y_offset, dx, dy)
    };

    let (c0, c1, c2) = expand(&mapping.x_coefficients);
    let (c3, c4, c5) = expand(&mapping.y_coefficients);
    AffineTransform::new([c0, c1, c2, c3, c4, c5])
}

/// Solve a square linear system using Gaussian elimination with partial pivoting
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> SamplingResult<Vec<f64>> {
    let n = b.len();
    let magnitude = a.iter().flat_map(|row| row.iter()).fold(0.0f64, |m, v| m.max(v.abs()));
    let singular_below = 1e-12 * magnitude.max(1.0);

    // Forward elimination
    for col in 0..n {
        let mut max_row = col;
        let mut max_val = a[col][col].abs();
        for row in (col + 1)..n {
            if a[row][col].abs() > max_val {
                max_val = a[row][col].abs();
                max_row = row;
            }
        }

        if max_row != col {
            a.swap(col, max_row);
            b.swap(col, max_row);
        }

        let pivot = a[col][col];
        if pivot.abs() < singular_below {
            return Err(SamplingError::DegenerateTransform(
                "Control point system is singular".to_string()));
        }

        for row in (col + 1)..n {
            let factor = a[row][col] / pivot;
            for j in col..n {
                a[row][j] -= factor * a[col][j];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution
    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let tail: f64 = ((i + 1)..n).map(|j| a[i][j] * x[j]).sum();
        x[i] = (b[i] - tail) / a[i][i];
    }

    Ok(x)
}
