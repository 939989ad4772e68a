//! Bivariate polynomial mappings produced by a GCP fit

/// Number of terms in a full bivariate polynomial of the given order
pub fn term_count(order: u8) -> usize {
    let n = order as usize;
    (n + 1) * (n + 2) / 2
}

/// Evaluate the monomials `x^i * y^j` with `i + j <= order`
///
/// Terms are ordered by total degree, then by descending power of `x`:
/// `1, x, y, x², xy, y², x³, x²y, xy², y³`.
pub fn monomials(order: u8, x: f64, y: f64) -> Vec<f64> {
    let mut terms = Vec::with_capacity(term_count(order));
    for degree in 0..=order as i32 {
        for y_power in 0..=degree {
            let x_power = degree - y_power;
            terms.push(x.powi(x_power) * y.powi(y_power));
        }
    }
    terms
}

/// Offset/scale applied to inputs before evaluating a polynomial
///
/// Fitting in raw pixel or degree units leaves the normal equations badly
/// conditioned for orders above one, so inputs are centred and scaled to
/// roughly `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub x_offset: f64,
    pub y_offset: f64,
    pub x_scale: f64,
    pub y_scale: f64,
}

impl Normalization {
    /// Normalization that leaves inputs untouched
    pub fn identity() -> Self {
        Normalization { x_offset: 0.0, y_offset: 0.0, x_scale: 1.0, y_scale: 1.0 }
    }

    /// Centre on the mean of the points and scale by their half extent
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        if points.is_empty() {
            return Normalization::identity();
        }

        let count = points.len() as f64;
        let x_offset = points.iter().map(|p| p.0).sum::<f64>() / count;
        let y_offset = points.iter().map(|p| p.1).sum::<f64>() / count;
        let x_extent = points.iter().map(|p| (p.0 - x_offset).abs()).fold(0.0, f64::max);
        let y_extent = points.iter().map(|p| (p.1 - y_offset).abs()).fold(0.0, f64::max);

        Normalization {
            x_offset,
            y_offset,
            x_scale: if x_extent > 0.0 { x_extent } else { 1.0 },
            y_scale: if y_extent > 0.0 { y_extent } else { 1.0 },
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.x_offset) / self.x_scale, (y - self.y_offset) / self.y_scale)
    }
}

/// One direction of a polynomial fit: two output polynomials over a shared input
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialMapping {
    pub order: u8,
    pub normalization: Normalization,
    /// Coefficients of the first output (longitude or pixel)
    pub x_coefficients: Vec<f64>,
    /// Coefficients of the second output (latitude or line)
    pub y_coefficients: Vec<f64>,
}

impl PolynomialMapping {
    /// Evaluate both output polynomials at `(x, y)`
    pub fn evaluate(&self, x: f64, y: f64) -> (f64, f64) {
        let (u, v) = self.normalization.apply(x, y);
        let terms = monomials(self.order, u, v);
        let out_x = terms.iter().zip(&self.x_coefficients).map(|(t, c)| t * c).sum();
        let out_y = terms.iter().zip(&self.y_coefficients).map(|(t, c)| t * c).sum();
        (out_x, out_y)
    }
}

/// Forward and reverse polynomial fits of one GCP set
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialTransform {
    /// pixel/line -> lon/lat
    pub forward: PolynomialMapping,
    /// lon/lat -> pixel/line
    pub reverse: PolynomialMapping,
}

impl PolynomialTransform {
    pub fn order(&self) -> u8 {
        self.forward.order
    }
}
