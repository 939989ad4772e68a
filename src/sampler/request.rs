//! Sample requests and raw sampling results

use crate::coordinate::{PixelRect, Sector};
use crate::sampler::buffer::{Grid, SampleBuffer};
use crate::sampler::errors::{SamplingError, SamplingResult};

/// Maximum number of bands one tile can carry
pub const MAX_TILE_BANDS: usize = 4;

/// A geographic region to render at a given output size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRequest {
    pub sector: Sector,
    pub width: u32,
    pub height: u32,
    pub band_count: usize,
    /// Multiplier applied after stretching, when set
    pub brightening: Option<f64>,
}

impl SampleRequest {
    /// Create and validate a request
    ///
    /// # Arguments
    /// * `sector` - Region to sample
    /// * `width`, `height` - Output size in pixels (non-zero)
    /// * `band_count` - Number of leading bands to sample (1..=4)
    ///
    /// # Returns
    /// The request or `InvalidRequest`
    pub fn new(sector: Sector, width: u32, height: u32, band_count: usize) -> SamplingResult<Self> {
        let request = SampleRequest { sector, width, height, band_count, brightening: None };
        request.validate()?;
        Ok(request)
    }

    /// Set the brightening factor (must be positive)
    pub fn with_brightening(mut self, factor: f64) -> SamplingResult<Self> {
        self.brightening = Some(factor);
        self.validate()?;
        Ok(self)
    }

    /// Check the request invariants
    pub fn validate(&self) -> SamplingResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SamplingError::InvalidRequest(format!(
                "Output size {}x{} must be non-zero", self.width, self.height)));
        }
        if self.band_count == 0 || self.band_count > MAX_TILE_BANDS {
            return Err(SamplingError::InvalidRequest(format!(
                "Band count {} outside 1..={}", self.band_count, MAX_TILE_BANDS)));
        }
        if let Some(factor) = self.brightening {
            if !(factor > 0.0 && factor.is_finite()) {
                return Err(SamplingError::InvalidRequest(format!(
                    "Brightening factor {} must be positive", factor)));
            }
        }
        if self.sector.lon_span() <= 0.0 || self.sector.lat_span() <= 0.0 {
            return Err(SamplingError::InvalidRequest("Requested sector has zero area".to_string()));
        }
        Ok(())
    }

    /// Longitude covered by one output pixel
    pub fn lon_delta(&self) -> f64 {
        self.sector.lon_span() / self.width as f64
    }

    /// Latitude covered by one output pixel
    pub fn lat_delta(&self) -> f64 {
        self.sector.lat_span() / self.height as f64
    }
}

/// How much of the requested sector the raster covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionDescriptor {
    /// The samples fill the whole requested canvas
    Full,
    /// The samples cover a sub-rectangle of the canvas
    Partial {
        offset_x: u32,
        offset_y: u32,
        width: u32,
        height: u32,
    },
}

/// Which sampling algorithm produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplePath {
    /// North-up raster fully containing the request: one exact window
    Direct,
    /// North-up raster partially covering the request
    Clipped,
    /// Rotated, sheared or polynomial raster: perimeter walk and remap
    Warped,
}

/// Raw samples for one band, or why the band could not be sampled
pub type BandSamples = SamplingResult<SampleBuffer>;

/// Output of one sampling call
#[derive(Debug)]
pub struct SampleResult {
    /// One entry per requested band
    pub bands: Vec<BandSamples>,
    pub descriptor: IntersectionDescriptor,
    pub path: SamplePath,
    /// Source window read for every band
    pub window: PixelRect,
    /// Warped path only: 255 where a sample was taken, 0 where zero-filled
    pub coverage: Option<Grid<u8>>,
    /// Version of the transform snapshot the result was computed from
    pub transform_version: u64,
}

impl SampleResult {
    /// Size of the sampled buffers (the sub-rectangle for partial results)
    pub fn sample_size(&self, request: &SampleRequest) -> (u32, u32) {
        match self.descriptor {
            IntersectionDescriptor::Full => (request.width, request.height),
            IntersectionDescriptor::Partial { width, height, .. } => (width, height),
        }
    }
}
