//! Per-band statistics gathered once when a raster is opened

use log::{debug, info, warn};

use crate::sampler::errors::{SamplingError, SamplingResult};
use crate::source::{RasterSource, StatisticsResponse};

/// Bucket count used when no configuration says otherwise
pub const DEFAULT_HISTOGRAM_BUCKETS: usize = 256;

/// Summary statistics of one band
#[derive(Debug, Clone, PartialEq)]
pub struct BandStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
    /// Equal-width buckets over `[min, max]`, when the source could provide one
    pub histogram: Option<Vec<u64>>,
}

impl BandStatistics {
    /// Build statistics, enforcing `min <= mean <= max` and `stddev >= 0`
    ///
    /// Sources that report slightly inconsistent values (approximate
    /// statistics from overviews, for instance) are clamped into range.
    pub fn new(min: f64, max: f64, mean: f64, stddev: f64) -> SamplingResult<Self> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(SamplingError::GenericError(format!(
                "Invalid statistics range [{}, {}]", min, max)));
        }

        let mean = if mean.is_finite() { mean.clamp(min, max) } else { min + (max - min) / 2.0 };
        let stddev = if stddev.is_finite() { stddev.abs() } else { 0.0 };

        Ok(BandStatistics { min, max, mean, stddev, histogram: None })
    }

    pub fn with_histogram(mut self, histogram: Vec<u64>) -> Self {
        self.histogram = Some(histogram);
        self
    }

    /// Width of the value range
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Options controlling statistics gathering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsOptions {
    /// Ask the source for approximate statistics first
    pub approximate_first: bool,
    /// Histogram size; 0 disables the histogram
    pub histogram_buckets: usize,
}

impl Default for StatisticsOptions {
    fn default() -> Self {
        StatisticsOptions {
            approximate_first: true,
            histogram_buckets: DEFAULT_HISTOGRAM_BUCKETS,
        }
    }
}

/// Compute the statistics of one band
///
/// An approximate request answered with `NeedsFullScan` is repeated with
/// `approximate = false`. A failing histogram query only drops the
/// histogram.
///
/// # Arguments
/// * `source` - Raster to query
/// * `band` - Band index (0-based)
/// * `options` - Approximation and histogram settings
///
/// # Returns
/// The band's statistics or `StatisticsUnavailable`
pub fn compute_band_statistics(source: &dyn RasterSource,
                               band: usize,
                               options: &StatisticsOptions) -> SamplingResult<BandStatistics> {
    let mut response = source.band_statistics(band, options.approximate_first)
        .map_err(|e| unavailable(band, e))?;

    if response == StatisticsResponse::NeedsFullScan {
        if !options.approximate_first {
            warn!("Source asked for a full scan of band {} after a full scan", band);
            return Err(SamplingError::StatisticsUnavailable(band));
        }
        info!("Approximate statistics unavailable for band {}, running full scan", band);
        response = source.band_statistics(band, false).map_err(|e| unavailable(band, e))?;
    }

    let stats = match response {
        StatisticsResponse::Computed { min, max, mean, stddev } => {
            BandStatistics::new(min, max, mean, stddev).map_err(|e| unavailable(band, e))?
        },
        StatisticsResponse::NeedsFullScan => return Err(SamplingError::StatisticsUnavailable(band)),
    };

    if options.histogram_buckets == 0 {
        return Ok(stats);
    }

    match source.band_histogram(band, options.histogram_buckets) {
        Ok(histogram) => {
            debug!("Band {}: {} histogram buckets", band, histogram.len());
            Ok(stats.with_histogram(histogram))
        },
        Err(e) => {
            warn!("Histogram for band {} unavailable: {}", band, e);
            Ok(stats)
        },
    }
}

fn unavailable(band: usize, error: SamplingError) -> SamplingError {
    warn!("Statistics for band {} failed: {}", band, error);
    SamplingError::StatisticsUnavailable(band)
}
