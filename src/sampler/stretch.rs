//! Conversion of raw band samples to 8-bit display values
//!
//! | Format | Rule |
//! |---|---|
//! | Byte | unchanged |
//! | Int16, Float32, Float64 | linear stretch from `min` to `max` |
//! | UInt16 | linear stretch from `max(0, min - 1)` to `max` |
//! | Int32, UInt32 | raw values kept as 32-bit planes |
//! | complex | `UnsupportedRasterFormat` |
//!
//! The 32-bit integer formats are treated as analytic bands: their values
//! are handed to the caller untouched rather than squeezed into a byte.

use crate::sampler::buffer::{Grid, Sample, SampleBuffer};
use crate::sampler::errors::{SamplingError, SamplingResult};
use crate::sampler::statistics::BandStatistics;
use crate::sampler::tile_image::BandPlane;
use crate::source::RasterDataType;

/// How one data type is turned into display values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StretchRule {
    /// Samples already are display bytes
    PassThrough,
    /// Linear mapping of `[floor, max]` onto `[0, 255]`
    Linear { floor: f64, max: f64 },
    /// Samples are kept at full precision
    Raw,
}

/// Stretches bands using their statistics and an optional brightening factor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadiometricStretcher {
    brightening: Option<f64>,
}

impl RadiometricStretcher {
    pub fn new(brightening: Option<f64>) -> Self {
        RadiometricStretcher { brightening }
    }

    /// Rule for `data_type` under `stats`
    ///
    /// Only the linear rules read statistics; Byte and the raw 32-bit
    /// formats resolve without them.
    ///
    /// # Arguments
    /// * `band` - Band index, reported in errors
    /// * `data_type` - Numeric format of the band
    /// * `stats` - Statistics of the band, if they could be computed
    pub fn rule(band: usize,
                data_type: RasterDataType,
                stats: Option<&BandStatistics>) -> SamplingResult<StretchRule> {
        let needs_stats = || stats.ok_or(SamplingError::StatisticsUnavailable(band));
        let rule = match data_type {
            RasterDataType::Byte => StretchRule::PassThrough,
            RasterDataType::Int16 | RasterDataType::Float32 | RasterDataType::Float64 => {
                let stats = needs_stats()?;
                StretchRule::Linear { floor: stats.min, max: stats.max }
            },
            // Statistics that skip true zeros would otherwise crush the darkest values to black
            RasterDataType::UInt16 => {
                let stats = needs_stats()?;
                StretchRule::Linear { floor: (stats.min - 1.0).max(0.0), max: stats.max }
            },
            RasterDataType::Int32 | RasterDataType::UInt32 => StretchRule::Raw,
            RasterDataType::CInt16 | RasterDataType::CFloat32 => {
                return Err(SamplingError::UnsupportedRasterFormat { band, data_type });
            },
        };
        Ok(rule)
    }

    /// Display value of a single sample
    ///
    /// Raw 32-bit formats have no stretch; their display value is the
    /// sample saturated to `[0, 255]`.
    pub fn stretch_value(&self,
                         data_type: RasterDataType,
                         value: f64,
                         stats: Option<&BandStatistics>) -> SamplingResult<u8> {
        let display = match Self::rule(0, data_type, stats)? {
            StretchRule::PassThrough | StretchRule::Raw => saturate(value),
            StretchRule::Linear { floor, max } => linear(value, floor, max, self.brightening),
        };
        Ok(display)
    }

    /// Stretch a whole band
    ///
    /// # Arguments
    /// * `band` - Band index, reported in errors
    /// * `samples` - Raw samples as read from the source
    /// * `stats` - Statistics of the band, if they could be computed
    ///
    /// # Returns
    /// A byte plane, or a raw 32-bit plane for Int32/UInt32 bands
    pub fn stretch(&self,
                   band: usize,
                   samples: &SampleBuffer,
                   stats: Option<&BandStatistics>) -> SamplingResult<BandPlane> {
        let rule = Self::rule(band, samples.data_type(), stats)?;

        let plane = match (samples, rule) {
            (SampleBuffer::Byte(grid), _) => BandPlane::Byte(grid.clone()),
            (SampleBuffer::Int32(grid), _) => BandPlane::Int32(grid.clone()),
            (SampleBuffer::UInt32(grid), _) => BandPlane::UInt32(grid.clone()),
            (SampleBuffer::Int16(grid), StretchRule::Linear { floor, max }) => self.linear_plane(grid, floor, max),
            (SampleBuffer::UInt16(grid), StretchRule::Linear { floor, max }) => self.linear_plane(grid, floor, max),
            (SampleBuffer::Float32(grid), StretchRule::Linear { floor, max }) => self.linear_plane(grid, floor, max),
            (SampleBuffer::Float64(grid), StretchRule::Linear { floor, max }) => self.linear_plane(grid, floor, max),
            (other, rule) => {
                return Err(SamplingError::GenericError(format!(
                    "No {:?} stretch for {} samples", rule, other.data_type())));
            },
        };
        Ok(plane)
    }

    fn linear_plane<T: Sample>(&self, grid: &Grid<T>, floor: f64, max: f64) -> BandPlane {
        BandPlane::Byte(grid.map(|v| linear(v.to_f64(), floor, max, self.brightening)))
    }
}

/// `(value - floor) / (max - floor) * 255`, brightened and clamped
///
/// Values below `floor` map to 0. A non-positive range is treated as 1 so
/// constant bands do not divide by zero.
pub fn linear(value: f64, floor: f64, max: f64, brightening: Option<f64>) -> u8 {
    if value.is_nan() {
        return 0;
    }

    let range = if max - floor > 0.0 { max - floor } else { 1.0 };
    let mut scaled = (value.max(floor) - floor) / range * 255.0;
    if let Some(factor) = brightening {
        scaled *= factor;
    }
    scaled.clamp(0.0, 255.0) as u8
}

fn saturate(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}
