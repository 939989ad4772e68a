//! Extraction of an arbitrary geographic region from a raster
//!
//! Three paths, chosen from the transform and the overlap between the
//! requested sector and the raster footprint:
//!
//! - **Direct**: north-up affine raster that fully contains the request.
//!   The affine is inverted analytically and one decimated window is read
//!   straight into the output size. Rasters stored east-to-west or
//!   south-to-north have the read buffer mirrored back into map order.
//! - **Clipped**: north-up affine raster that only partly covers the
//!   request. Only the overlap is read, at a proportionally smaller size,
//!   and the result records where it sits on the full canvas.
//! - **Warped**: anything rotated, sheared or polynomial. The request's
//!   perimeter is walked through the inverse transform to find a source
//!   window, that window is read into a request-sized buffer, and every
//!   output pixel is then looked up through the transform (nearest sample,
//!   no interpolation).

use log::{debug, info, warn};

use crate::coordinate::{AffineTransform, PixelBoundsAccumulator, PixelRect, Sector};
use crate::sampler::buffer::{Grid, SampleBuffer};
use crate::sampler::errors::{SamplingError, SamplingResult};
use crate::sampler::request::{BandSamples, IntersectionDescriptor, SamplePath, SampleRequest, SampleResult};
use crate::sampler::resolver::TransformSnapshot;
use crate::source::RasterSource;

/// Pixels added on every side of the perimeter-walk window
const WARP_PADDING: i64 = 1;

/// Geometry shared by every band of one sampling call
struct SamplePlan {
    path: SamplePath,
    window: PixelRect,
    read_width: u32,
    read_height: u32,
    descriptor: IntersectionDescriptor,
    /// Reverse columns and rows of each read so output rows run north to south
    mirror: (bool, bool),
}

/// Samples tiles from a raster source
#[derive(Debug, Clone, Copy, Default)]
pub struct TileSampler;

impl TileSampler {
    pub fn new() -> Self {
        TileSampler
    }

    /// Sample `request` from `source` using one transform snapshot
    ///
    /// # Arguments
    /// * `request` - Sector, output size and band count
    /// * `snapshot` - Transform and footprint to use for the whole call
    /// * `source` - Raster to read from
    ///
    /// # Returns
    /// Per-band raw samples plus placement information, or
    /// `EmptyIntersection` when the request misses the raster (no read is
    /// issued in that case)
    pub fn sample(&self,
                  request: &SampleRequest,
                  snapshot: &TransformSnapshot,
                  source: &dyn RasterSource) -> SamplingResult<SampleResult> {
        request.validate()?;
        let footprint = &snapshot.footprint;

        if !footprint.intersects(&request.sector) {
            debug!("Request {} misses footprint {}", request.sector, footprint);
            return Err(SamplingError::EmptyIntersection);
        }

        match Self::axis_aligned(snapshot) {
            Some(affine) => {
                let plan = Self::plan_axis_aligned(request, affine, footprint, source)?;
                info!("Sampling {:?} window {} into {}x{}",
                      plan.path, plan.window, plan.read_width, plan.read_height);
                let bands = (0..request.band_count)
                    .map(|band| Self::read_band(source, band, &plan))
                    .collect();

                Ok(SampleResult {
                    bands,
                    descriptor: plan.descriptor,
                    path: plan.path,
                    window: plan.window,
                    coverage: None,
                    transform_version: snapshot.version,
                })
            },
            None => self.sample_warped(request, snapshot, source),
        }
    }

    /// The affine when the fast paths apply: order 1 with no rotation or shear
    fn axis_aligned(snapshot: &TransformSnapshot) -> Option<&AffineTransform> {
        snapshot.transform.as_affine().filter(|a| {
            let c = &a.coefficients;
            a.is_north_up() && c[1] != 0.0 && c[5] != 0.0
        })
    }

    /// Columns run west when `c1 < 0`, rows run north when `c5 > 0`
    fn mirror_for(affine: &AffineTransform) -> (bool, bool) {
        let c = &affine.coefficients;
        (c[1] < 0.0, c[5] > 0.0)
    }

    /// Exact source window of a sector under a north-up affine
    fn window_for(affine: &AffineTransform, sector: &Sector, source: &dyn RasterSource) -> SamplingResult<PixelRect> {
        let (x_a, y_a) = affine.inverse(sector.min_lon(), sector.max_lat())?;
        let (x_b, y_b) = affine.inverse(sector.max_lon(), sector.min_lat())?;
        let window = PixelRect::covering(x_a.min(x_b), y_a.min(y_b), x_a.max(x_b), y_a.max(y_b))
            .clamped(source.width(), source.height());

        if window.is_empty() {
            return Err(SamplingError::EmptyIntersection);
        }
        Ok(window)
    }

    fn plan_axis_aligned(request: &SampleRequest,
                         affine: &AffineTransform,
                         footprint: &Sector,
                         source: &dyn RasterSource) -> SamplingResult<SamplePlan> {
        let mirror = Self::mirror_for(affine);
        if footprint.contains(&request.sector) {
            return Ok(SamplePlan {
                path: SamplePath::Direct,
                window: Self::window_for(affine, &request.sector, source)?,
                read_width: request.width,
                read_height: request.height,
                descriptor: IntersectionDescriptor::Full,
                mirror,
            });
        }

        let intersect = footprint.intersection(&request.sector).ok_or(SamplingError::EmptyIntersection)?;
        let window = Self::window_for(affine, &intersect, source)?;

        let lon_ratio = intersect.lon_span() / request.sector.lon_span();
        let lat_ratio = intersect.lat_span() / request.sector.lat_span();
        let width = scaled_extent(request.width, lon_ratio);
        let height = scaled_extent(request.height, lat_ratio);

        let offset_x = placement(request.width, width,
            (intersect.min_lon() - request.sector.min_lon()) / request.sector.lon_span());
        let offset_y = placement(request.height, height,
            (request.sector.max_lat() - intersect.max_lat()) / request.sector.lat_span());

        debug!("Partial intersection {}: {}x{} at ({}, {})", intersect, width, height, offset_x, offset_y);

        Ok(SamplePlan {
            path: SamplePath::Clipped,
            window,
            read_width: width,
            read_height: height,
            descriptor: IntersectionDescriptor::Partial { offset_x, offset_y, width, height },
            mirror,
        })
    }

    fn read_band(source: &dyn RasterSource, band: usize, plan: &SamplePlan) -> BandSamples {
        if band >= source.band_count() {
            return Err(SamplingError::ReadFailure {
                band,
                message: format!("Raster has only {} bands", source.band_count()),
            });
        }

        let data_type = source.data_type(band)?;
        if data_type.is_complex() {
            return Err(SamplingError::UnsupportedRasterFormat { band, data_type });
        }

        let samples = source.read_window(band, plan.window, plan.read_width, plan.read_height)
            .map_err(|e| {
                warn!("Read of band {} failed: {}", band, e);
                match e {
                    SamplingError::ReadFailure { .. } => e,
                    other => SamplingError::ReadFailure { band, message: other.to_string() },
                }
            })?;

        match plan.mirror {
            (false, false) => Ok(samples),
            (columns, rows) => Ok(samples.mirrored(columns, rows)),
        }
    }

    fn sample_warped(&self,
                     request: &SampleRequest,
                     snapshot: &TransformSnapshot,
                     source: &dyn RasterSource) -> SamplingResult<SampleResult> {
        let transform = &snapshot.transform;
        let sector = &request.sector;
        let (width, height) = (request.width, request.height);
        let lon_delta = request.lon_delta();
        let lat_delta = request.lat_delta();

        // Walk the request perimeter through the inverse mapping
        let mut bounds = PixelBoundsAccumulator::new();
        for i in 0..=width {
            let lon = sector.min_lon() + i as f64 * lon_delta;
            for lat in [sector.max_lat(), sector.min_lat()] {
                let (x, y) = transform.inverse(lon, lat)?;
                bounds.add(x, y);
            }
        }
        for j in 0..=height {
            let lat = sector.max_lat() - j as f64 * lat_delta;
            for lon in [sector.min_lon(), sector.max_lon()] {
                let (x, y) = transform.inverse(lon, lat)?;
                bounds.add(x, y);
            }
        }

        let window = bounds.rect()
            .ok_or(SamplingError::EmptyIntersection)?
            .padded(WARP_PADDING)
            .clamped(source.width(), source.height());
        if window.is_empty() {
            debug!("Perimeter walk of {} produced no window inside the raster", sector);
            return Err(SamplingError::EmptyIntersection);
        }

        info!("Sampling Warped window {} into {}x{} ({})", window, width, height, transform.describe());

        // Output pixel -> position in the oversample buffer
        let x_scale = width as f64 / window.width() as f64;
        let y_scale = height as f64 / window.height() as f64;
        let mut lookup: Vec<Option<(u32, u32)>> = Vec::with_capacity(width as usize * height as usize);
        let mut coverage = Grid::new(width, height);

        for j in 0..height {
            let lat = sector.max_lat() - (j as f64 + 0.5) * lat_delta;
            for i in 0..width {
                let lon = sector.min_lon() + (i as f64 + 0.5) * lon_delta;
                let (x, y) = transform.inverse(lon, lat)?;
                let bx = (x - window.x1 as f64) * x_scale;
                let by = (y - window.y1 as f64) * y_scale;

                let inside = bx >= 0.0 && by >= 0.0 && bx < width as f64 && by < height as f64;
                if inside {
                    lookup.push(Some((bx as u32, by as u32)));
                    coverage.set(i, j, 255u8);
                } else {
                    lookup.push(None);
                }
            }
        }

        let plan = SamplePlan {
            path: SamplePath::Warped,
            window,
            read_width: width,
            read_height: height,
            descriptor: IntersectionDescriptor::Full,
            mirror: (false, false),
        };

        let bands = (0..request.band_count)
            .map(|band| {
                let oversample = Self::read_band(source, band, &plan)?;
                Ok(warp_band(&oversample, width, height, &lookup))
            })
            .collect();

        Ok(SampleResult {
            bands,
            descriptor: plan.descriptor,
            path: plan.path,
            window,
            coverage: Some(coverage),
            transform_version: snapshot.version,
        })
    }
}

fn warp_band(oversample: &SampleBuffer, width: u32, height: u32, lookup: &[Option<(u32, u32)>]) -> SampleBuffer {
    oversample.remap(width, height, |i, j| {
        lookup.get(j as usize * width as usize + i as usize).copied().flatten()
    })
}

/// `full * ratio` rounded, kept within `1..=full`
fn scaled_extent(full: u32, ratio: f64) -> u32 {
    ((full as f64 * ratio).round() as u32).clamp(1, full)
}

/// Offset of a `part`-sized span starting at `fraction` of a `full` canvas
fn placement(full: u32, part: u32, fraction: f64) -> u32 {
    let offset = (full as f64 * fraction).round().max(0.0) as u32;
    offset.min(full - part)
}
