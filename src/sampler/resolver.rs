//! Transform selection at raster-open time and its publication to samplers
//!
//! [`TransformResolver`] decides which geocoding transform an opened raster
//! uses. [`TransformCell`] holds the resolved transform as an immutable
//! [`TransformSnapshot`] behind an `Arc`; readers clone the `Arc` and work
//! on that snapshot for the whole call, so re-resolving the raster while
//! tiles are being sampled never mixes two transforms in one result.

use std::sync::{Arc, RwLock};

use log::{debug, info, warn};

use crate::coordinate::{AffineTransform, CoordinateTransform, GroundControlPoint, Sector};
use crate::fitter::TransformFitter;
use crate::sampler::errors::{SamplingError, SamplingResult};
use crate::sampler::footprint::FootprintFinder;

/// Chooses between GCP fits, the native affine and a backup sector
pub struct TransformResolver<'a> {
    fitter: &'a dyn TransformFitter,
}

impl<'a> TransformResolver<'a> {
    pub fn new(fitter: &'a dyn TransformFitter) -> Self {
        TransformResolver { fitter }
    }

    /// Resolve the transform for a raster
    ///
    /// Priority: a best fit over all GCPs when there are at least three;
    /// otherwise three GCPs synthesized from the native affine's upper-left,
    /// upper-right and lower-left corners. When the affine is absent (all
    /// zero, or mapping every corner onto its own pixel coordinate) the
    /// backup sector's corners are used instead.
    ///
    /// # Arguments
    /// * `gcps` - Control points reported by the raster
    /// * `native_affine` - The raster's own geotransform
    /// * `backup_sector` - Fallback extent when the raster carries no georeference
    /// * `raster_width`, `raster_height` - Raster size in pixels
    ///
    /// # Returns
    /// The resolved transform, or `DegenerateTransform`
    pub fn resolve(&self,
                   gcps: &[GroundControlPoint],
                   native_affine: &AffineTransform,
                   backup_sector: Option<&Sector>,
                   raster_width: u32,
                   raster_height: u32) -> SamplingResult<CoordinateTransform> {
        if gcps.len() >= 3 {
            info!("Resolving transform from {} GCPs", gcps.len());
            return self.checked(self.fitter.fit_best_fit(gcps)?);
        }
        if !gcps.is_empty() {
            warn!("Ignoring {} GCPs; at least 3 are needed for a fit", gcps.len());
        }

        let mut corners = Self::corner_gcps(native_affine, raster_width, raster_height);
        let absent = native_affine.is_degenerate() || corners.iter().all(|g| g.is_identity());

        if absent {
            match backup_sector {
                Some(sector) => {
                    info!("Native transform is absent, georeferencing from backup sector {}", sector);
                    corners[0].lon = sector.min_lon();
                    corners[0].lat = sector.max_lat();
                    corners[1].lon = sector.max_lon();
                    corners[1].lat = sector.max_lat();
                    corners[2].lon = sector.min_lon();
                    corners[2].lat = sector.min_lat();
                },
                None => {
                    return Err(SamplingError::DegenerateTransform(
                        "No GCPs, no usable geotransform and no backup sector".to_string()));
                },
            }
        } else {
            debug!("Synthesized corner GCPs from native transform {:?}", native_affine.coefficients);
        }

        self.checked(self.fitter.fit_best_fit(&corners)?)
    }

    /// Control points at the upper-left, upper-right and lower-left pixel corners
    fn corner_gcps(affine: &AffineTransform, width: u32, height: u32) -> [GroundControlPoint; 3] {
        let (w, h) = (width as f64, height as f64);
        let corner = |x: f64, y: f64| {
            let (lon, lat) = affine.forward(x, y);
            GroundControlPoint::new(x, y, lon, lat)
        };
        [corner(0.0, 0.0), corner(w, 0.0), corner(0.0, h)]
    }

    // An order-1 fit must stay invertible for the sampler to use it
    fn checked(&self, transform: CoordinateTransform) -> SamplingResult<CoordinateTransform> {
        if let Some(affine) = transform.as_affine() {
            let c = &affine.coefficients;
            affine.inverse(c[0], c[3])?;
        }
        Ok(transform)
    }
}

/// An immutable resolved transform with everything derived from it
#[derive(Debug, Clone)]
pub struct TransformSnapshot {
    pub transform: CoordinateTransform,
    /// Geographic envelope of the raster under `transform`
    pub footprint: Sector,
    /// Increases by one with every publication
    pub version: u64,
}

/// The current transform of an opened raster
#[derive(Debug)]
pub struct TransformCell {
    current: RwLock<Arc<TransformSnapshot>>,
    finder: FootprintFinder,
    raster_width: u32,
    raster_height: u32,
}

impl TransformCell {
    /// Create the cell with its first snapshot (version 1)
    pub fn new(transform: CoordinateTransform,
               finder: FootprintFinder,
               raster_width: u32,
               raster_height: u32) -> SamplingResult<Self> {
        let footprint = finder.footprint(&transform, raster_width, raster_height)?;
        let snapshot = TransformSnapshot { transform, footprint, version: 1 };

        Ok(TransformCell {
            current: RwLock::new(Arc::new(snapshot)),
            finder,
            raster_width,
            raster_height,
        })
    }

    /// The snapshot in effect right now
    ///
    /// The lock is held only while the `Arc` is cloned.
    pub fn snapshot(&self) -> Arc<TransformSnapshot> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    /// Replace the transform, recomputing the footprint
    ///
    /// # Returns
    /// The version number of the new snapshot
    pub fn publish(&self, transform: CoordinateTransform) -> SamplingResult<u64> {
        let footprint = self.finder.footprint(&transform, self.raster_width, self.raster_height)?;

        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let version = guard.version + 1;
        *guard = Arc::new(TransformSnapshot { transform, footprint, version });
        debug!("Published transform version {}", version);
        Ok(version)
    }
}
