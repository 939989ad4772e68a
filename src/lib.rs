pub mod coordinate;
pub mod fitter;
pub mod source;
pub mod sampler;
pub mod config;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::{ImageHandle, TileEngine};
pub use crate::config::EngineConfig;

pub use coordinate::{AffineTransform, CoordinateTransform, GroundControlPoint, PixelRect, Sector};
pub use fitter::{PolynomialFitter, TransformFitter};
pub use source::{MemoryRaster, RasterDataType, RasterSource};
pub use sampler::{SampleRequest, SamplingError, SamplingResult, TileImage};
