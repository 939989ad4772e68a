//! Raster source abstraction
//!
//! Everything that decodes pixels lives behind [`RasterSource`]. The
//! sampler only issues windowed, decimated reads and statistics queries
//! through this trait. An in-memory implementation is provided, along with
//! loaders that fill it from image files and raw band-sequential dumps.

mod memory;
mod descriptor;
mod world_file;
mod image_loader;
mod raw_loader;
#[cfg(test)]
mod tests;

pub use memory::{MemoryRaster, WindowRead};
pub use descriptor::{RasterDescriptor, RawLayout, descriptor_path_for};
pub use world_file::{find_world_file, load_world_file, parse_world_file};
pub use image_loader::{load_image_raster, split_bands};
pub use raw_loader::{load_raw_raster, read_bands};

use std::fmt;

use crate::coordinate::{AffineTransform, GroundControlPoint, PixelRect};
use crate::sampler::buffer::SampleBuffer;
use crate::sampler::errors::{SamplingError, SamplingResult};

/// Numeric format of a raster band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RasterDataType {
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
    /// Complex 16-bit integer pairs
    CInt16,
    /// Complex 32-bit float pairs
    CFloat32,
}

impl RasterDataType {
    /// Parse a data type name as used in descriptors (case-insensitive)
    pub fn from_name(name: &str) -> SamplingResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "byte" | "uint8" | "u8" => Ok(RasterDataType::Byte),
            "int16" | "i16" => Ok(RasterDataType::Int16),
            "uint16" | "u16" => Ok(RasterDataType::UInt16),
            "int32" | "i32" => Ok(RasterDataType::Int32),
            "uint32" | "u32" => Ok(RasterDataType::UInt32),
            "float32" | "f32" => Ok(RasterDataType::Float32),
            "float64" | "f64" => Ok(RasterDataType::Float64),
            "cint16" => Ok(RasterDataType::CInt16),
            "cfloat32" => Ok(RasterDataType::CFloat32),
            other => Err(SamplingError::ConfigError(format!("Unknown data type '{}'", other))),
        }
    }

    /// Bytes per sample as stored on disk
    pub fn size_in_bytes(&self) -> usize {
        match self {
            RasterDataType::Byte => 1,
            RasterDataType::Int16 | RasterDataType::UInt16 => 2,
            RasterDataType::Int32 | RasterDataType::UInt32 | RasterDataType::Float32 => 4,
            RasterDataType::CInt16 => 4,
            RasterDataType::Float64 | RasterDataType::CFloat32 => 8,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, RasterDataType::CInt16 | RasterDataType::CFloat32)
    }
}

impl fmt::Display for RasterDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RasterDataType::Byte => "Byte",
            RasterDataType::Int16 => "Int16",
            RasterDataType::UInt16 => "UInt16",
            RasterDataType::Int32 => "Int32",
            RasterDataType::UInt32 => "UInt32",
            RasterDataType::Float32 => "Float32",
            RasterDataType::Float64 => "Float64",
            RasterDataType::CInt16 => "CInt16",
            RasterDataType::CFloat32 => "CFloat32",
        };
        write!(f, "{}", name)
    }
}

/// Answer to a band statistics query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatisticsResponse {
    Computed {
        min: f64,
        max: f64,
        mean: f64,
        stddev: f64,
    },
    /// Approximate statistics are not available; ask again with `approximate = false`
    NeedsFullScan,
}

/// An opened raster dataset
///
/// Band indices are 0-based. Implementations must be safe to share across
/// the worker threads that sample tiles concurrently.
pub trait RasterSource: Send + Sync {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn band_count(&self) -> usize;

    /// Numeric format of `band`
    fn data_type(&self, band: usize) -> SamplingResult<RasterDataType>;

    /// Whether band 0 is palette-indexed
    fn has_color_table(&self) -> bool {
        false
    }

    /// Control points attached to the raster, possibly empty
    fn ground_control_points(&self) -> Vec<GroundControlPoint>;

    /// The raster's own geotransform (identity when it has none)
    fn native_transform(&self) -> AffineTransform;

    /// Read `window` of `band`, resampled to `out_width` x `out_height`
    ///
    /// # Returns
    /// The samples in the band's native format, or `ReadFailure`
    fn read_window(&self, band: usize, window: PixelRect, out_width: u32, out_height: u32) -> SamplingResult<SampleBuffer>;

    /// Min/max/mean/stddev of `band`
    fn band_statistics(&self, band: usize, approximate: bool) -> SamplingResult<StatisticsResponse>;

    /// Histogram of `band` with `bucket_count` equal-width buckets over `[min, max]`
    fn band_histogram(&self, band: usize, bucket_count: usize) -> SamplingResult<Vec<u64>>;
}
