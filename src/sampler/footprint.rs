//! Geographic envelope of a raster

use log::debug;

use crate::coordinate::{CoordinateTransform, GeoBoundsAccumulator, Sector};
use crate::sampler::errors::{SamplingError, SamplingResult};

/// Default number of steps each raster edge is split into when probing
pub const DEFAULT_PROBE_STEPS: u32 = 10;

/// Computes the lat/lon envelope of a raster under a transform
///
/// North-up affine rasters are handled analytically from the four corners.
/// Anything else is probed along its four edges, which assumes the
/// transform is monotonic along each edge: a strongly warped transform can
/// bulge outside the probed envelope and will be under-estimated.
#[derive(Debug, Clone, Copy)]
pub struct FootprintFinder {
    probe_steps: u32,
}

impl FootprintFinder {
    pub fn new(probe_steps: u32) -> Self {
        FootprintFinder { probe_steps: probe_steps.max(1) }
    }

    pub fn probe_steps(&self) -> u32 {
        self.probe_steps
    }

    /// Envelope of `[0,width] x [0,height]` under `transform`
    pub fn footprint(&self, transform: &CoordinateTransform, width: u32, height: u32) -> SamplingResult<Sector> {
        let (w, h) = (width as f64, height as f64);
        let mut bounds = GeoBoundsAccumulator::new();

        if transform.order() == 1 && transform.is_north_up() {
            for (x, y) in [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)] {
                let (lon, lat) = transform.forward(x, y);
                bounds.add(lon, lat);
            }
        } else {
            let steps = self.probe_steps;
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                for (x, y) in [(t * w, 0.0), (t * w, h), (0.0, t * h), (w, t * h)] {
                    let (lon, lat) = transform.forward(x, y);
                    bounds.add(lon, lat);
                }
            }
            debug!("Probed {} edge locations for footprint", bounds.count());
        }

        bounds.sector().ok_or_else(|| SamplingError::DegenerateTransform(
            "Transform produced no finite footprint locations".to_string()))
    }
}

impl Default for FootprintFinder {
    fn default() -> Self {
        FootprintFinder::new(DEFAULT_PROBE_STEPS)
    }
}
