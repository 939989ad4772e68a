//! Tile sampling
//!
//! The pipeline run for every tile: the [`TileSampler`] reads raw samples
//! using one [`TransformSnapshot`], the [`RadiometricStretcher`] turns them
//! into display values, and the [`Compositor`] places them on the
//! requested canvas.

pub mod errors;
pub mod buffer;
pub mod request;
pub mod resolver;
pub mod footprint;
pub mod statistics;
pub mod stretch;
pub mod tile_sampler;
pub mod compositor;
pub mod tile_image;
#[cfg(test)]
mod tests;

pub use errors::{SamplingError, SamplingResult};
pub use buffer::{Grid, Sample, SampleBuffer};
pub use request::{BandSamples, IntersectionDescriptor, SamplePath, SampleRequest, SampleResult, MAX_TILE_BANDS};
pub use resolver::{TransformCell, TransformResolver, TransformSnapshot};
pub use footprint::{FootprintFinder, DEFAULT_PROBE_STEPS};
pub use statistics::{compute_band_statistics, BandStatistics, StatisticsOptions, DEFAULT_HISTOGRAM_BUCKETS};
pub use stretch::{RadiometricStretcher, StretchRule};
pub use tile_sampler::TileSampler;
pub use compositor::{Compositor, StretchedTile};
pub use tile_image::{BandPlane, ColorInterpretation, TileBand, TileImage};
