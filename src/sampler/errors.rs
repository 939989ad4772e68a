//! Custom error types for tile sampling

use std::fmt;
use std::io;

use crate::source::RasterDataType;

/// Sampling-specific error types
#[derive(Debug)]
pub enum SamplingError {
    /// No usable GCPs, affine transform or backup sector
    DegenerateTransform(String),
    /// Requested sector does not overlap the raster footprint
    EmptyIntersection,
    /// The raster source reported an unsuccessful windowed read
    ReadFailure {
        /// Band index (0-based)
        band: usize,
        /// Source-provided description
        message: String,
    },
    /// No stretch rule exists for the band's numeric type
    UnsupportedRasterFormat {
        /// Band index (0-based)
        band: usize,
        /// The offending data type
        data_type: RasterDataType,
    },
    /// Statistics could not be computed when the raster was opened
    StatisticsUnavailable(usize),
    /// Malformed sample request
    InvalidRequest(String),
    /// I/O error
    IoError(io::Error),
    /// Configuration could not be parsed
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::DegenerateTransform(msg) => write!(f, "Degenerate transform: {}", msg),
            SamplingError::EmptyIntersection => write!(f, "Requested sector does not intersect the raster"),
            SamplingError::ReadFailure { band, message } => {
                write!(f, "Windowed read failed for band {}: {}", band, message)
            },
            SamplingError::UnsupportedRasterFormat { band, data_type } => {
                write!(f, "Unsupported raster format {} in band {}", data_type, band)
            },
            SamplingError::StatisticsUnavailable(band) => write!(f, "No statistics for band {}", band),
            SamplingError::InvalidRequest(msg) => write!(f, "Invalid sample request: {}", msg),
            SamplingError::IoError(e) => write!(f, "I/O error: {}", e),
            SamplingError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            SamplingError::GenericError(msg) => write!(f, "Sampling error: {}", msg),
        }
    }
}

impl std::error::Error for SamplingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SamplingError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SamplingError {
    fn from(error: io::Error) -> Self {
        SamplingError::IoError(error)
    }
}

impl From<String> for SamplingError {
    fn from(msg: String) -> Self {
        SamplingError::GenericError(msg)
    }
}

impl From<image::ImageError> for SamplingError {
    fn from(error: image::ImageError) -> Self {
        SamplingError::GenericError(format!("Image error: {}", error))
    }
}

impl SamplingError {
    /// Whether the error only affects a single band of a tile
    pub fn is_band_local(&self) -> bool {
        matches!(self,
            SamplingError::ReadFailure { .. }
            | SamplingError::UnsupportedRasterFormat { .. }
            | SamplingError::StatisticsUnavailable(_))
    }
}

/// Result type for sampling operations
pub type SamplingResult<T> = Result<T, SamplingError>;
