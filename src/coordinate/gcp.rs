//! Ground control points

/// Correspondence between a raster pixel/line and a lon/lat location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundControlPoint {
    /// Column coordinate
    pub pixel: f64,
    /// Row coordinate
    pub line: f64,
    /// Longitude (x in geographic systems)
    pub lon: f64,
    /// Latitude (y in geographic systems)
    pub lat: f64,
}

impl GroundControlPoint {
    pub fn new(pixel: f64, line: f64, lon: f64, lat: f64) -> Self {
        GroundControlPoint { pixel, line, lon, lat }
    }

    /// True when the geo coordinate is numerically the pixel coordinate,
    /// which is what an absent georeference produces
    pub fn is_identity(&self) -> bool {
        self.pixel == self.lon && self.line == self.lat
    }
}

/// Check if a set of control points spans a 2D area in pixel space
///
/// Three or more points are needed and they must not all lie on a line.
pub fn spans_area(gcps: &[GroundControlPoint]) -> bool {
    if gcps.len() < 3 {
        return false;
    }

    let origin = gcps[0];
    let extent = gcps.iter().fold(0.0f64, |acc, g| {
        acc.max((g.pixel - origin.pixel).abs()).max((g.line - origin.line).abs())
    });
    if extent == 0.0 {
        return false;
    }

    let tolerance = 1e-9 * extent * extent;
    gcps.iter().skip(1).any(|a| {
        gcps.iter().skip(1).any(|b| {
            let cross = (a.pixel - origin.pixel) * (b.line - origin.line)
                - (a.line - origin.line) * (b.pixel - origin.pixel);
            cross.abs() > tolerance
        })
    })
}
