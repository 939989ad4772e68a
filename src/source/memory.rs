//! In-memory raster source

use std::collections::HashSet;
use std::sync::Mutex;

use log::debug;

use crate::coordinate::{AffineTransform, GroundControlPoint, PixelRect};
use crate::sampler::buffer::SampleBuffer;
use crate::sampler::errors::{SamplingError, SamplingResult};

use super::{RasterDataType, RasterSource, StatisticsResponse};

/// One recorded `read_window` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRead {
    pub band: usize,
    pub window: PixelRect,
    pub out_width: u32,
    pub out_height: u32,
}

/// Raster held entirely in memory
///
/// Windowed reads use nearest-neighbour decimation: output sample `(i, j)`
/// comes from source pixel `x1 + floor((i + 0.5) * w / out_w)` and the
/// analogous row. Every read is recorded so callers can inspect the
/// windows a sampler asked for.
#[derive(Debug)]
pub struct MemoryRaster {
    width: u32,
    height: u32,
    bands: Vec<SampleBuffer>,
    reported_types: Vec<Option<RasterDataType>>,
    transform: AffineTransform,
    gcps: Vec<GroundControlPoint>,
    color_table: bool,
    approximate_needs_full_scan: bool,
    failing_bands: HashSet<usize>,
    reads: Mutex<Vec<WindowRead>>,
}

impl MemoryRaster {
    /// Create a raster from band buffers that all share one size
    ///
    /// # Arguments
    /// * `bands` - One buffer per band
    /// * `transform` - Native geotransform
    ///
    /// # Returns
    /// The raster, or an error if there are no bands or sizes differ
    pub fn new(bands: Vec<SampleBuffer>, transform: AffineTransform) -> SamplingResult<Self> {
        let first = bands.first()
            .ok_or_else(|| SamplingError::GenericError("A raster needs at least one band".to_string()))?;
        let (width, height) = (first.width(), first.height());
        if bands.iter().any(|b| b.width() != width || b.height() != height) {
            return Err(SamplingError::GenericError("All bands must have the same size".to_string()));
        }

        let band_count = bands.len();
        Ok(MemoryRaster {
            width,
            height,
            bands,
            reported_types: vec![None; band_count],
            transform,
            gcps: Vec::new(),
            color_table: false,
            approximate_needs_full_scan: false,
            failing_bands: HashSet::new(),
            reads: Mutex::new(Vec::new()),
        })
    }

    /// Attach ground control points
    pub fn with_gcps(mut self, gcps: Vec<GroundControlPoint>) -> Self {
        self.gcps = gcps;
        self
    }

    /// Mark band 0 as palette-indexed
    pub fn with_color_table(mut self, color_table: bool) -> Self {
        self.color_table = color_table;
        self
    }

    /// Answer approximate statistics queries with `NeedsFullScan`
    pub fn with_full_scan_required(mut self, required: bool) -> Self {
        self.approximate_needs_full_scan = required;
        self
    }

    /// Make every windowed read of `band` fail
    pub fn with_failing_band(mut self, band: usize) -> Self {
        self.failing_bands.insert(band);
        self
    }

    /// Report `band` as `data_type` regardless of the buffer it holds
    pub fn with_reported_type(mut self, band: usize, data_type: RasterDataType) -> Self {
        if let Some(slot) = self.reported_types.get_mut(band) {
            *slot = Some(data_type);
        }
        self
    }

    /// Replace the native geotransform
    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }

    /// Windows read so far, in call order
    pub fn read_log(&self) -> Vec<WindowRead> {
        match self.reads.lock() {
            Ok(reads) => reads.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Forget previously recorded reads
    pub fn clear_read_log(&self) {
        match self.reads.lock() {
            Ok(mut reads) => reads.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    fn band(&self, band: usize) -> SamplingResult<&SampleBuffer> {
        self.bands.get(band).ok_or_else(|| SamplingError::ReadFailure {
            band,
            message: format!("Band {} does not exist ({} bands)", band, self.bands.len()),
        })
    }

    fn record(&self, read: WindowRead) {
        match self.reads.lock() {
            Ok(mut reads) => reads.push(read),
            Err(poisoned) => poisoned.into_inner().push(read),
        }
    }

    fn band_values(&self, band: usize) -> SamplingResult<Vec<f64>> {
        let buffer = self.band(band)?;
        let mut values = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(v) = buffer.value_f64(x, y) {
                    if v.is_finite() {
                        values.push(v);
                    }
                }
            }
        }
        Ok(values)
    }
}

impl RasterSource for MemoryRaster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn data_type(&self, band: usize) -> SamplingResult<RasterDataType> {
        let buffer = self.band(band)?;
        Ok(self.reported_types[band].unwrap_or_else(|| buffer.data_type()))
    }

    fn has_color_table(&self) -> bool {
        self.color_table
    }

    fn ground_control_points(&self) -> Vec<GroundControlPoint> {
        self.gcps.clone()
    }

    fn native_transform(&self) -> AffineTransform {
        self.transform
    }

    fn read_window(&self, band: usize, window: PixelRect, out_width: u32, out_height: u32) -> SamplingResult<SampleBuffer> {
        self.record(WindowRead { band, window, out_width, out_height });
        let buffer = self.band(band)?;

        if self.failing_bands.contains(&band) {
            return Err(SamplingError::ReadFailure { band, message: "Simulated read failure".to_string() });
        }
        if window.is_empty() || !window.fits_within(self.width, self.height) {
            return Err(SamplingError::ReadFailure {
                band,
                message: format!("Window {} outside {}x{} raster", window, self.width, self.height),
            });
        }
        if out_width == 0 || out_height == 0 {
            return Err(SamplingError::ReadFailure { band, message: "Empty output size".to_string() });
        }

        debug!("Reading band {} window {} into {}x{}", band, window, out_width, out_height);

        let x_ratio = window.width() as f64 / out_width as f64;
        let y_ratio = window.height() as f64 / out_height as f64;
        let x1 = window.x1 as u32;
        let y1 = window.y1 as u32;
        let max_x = window.x2 as u32 - 1;
        let max_y = window.y2 as u32 - 1;

        Ok(buffer.remap(out_width, out_height, |i, j| {
            let sx = x1 + ((i as f64 + 0.5) * x_ratio).floor() as u32;
            let sy = y1 + ((j as f64 + 0.5) * y_ratio).floor() as u32;
            Some((sx.min(max_x), sy.min(max_y)))
        }))
    }

    fn band_statistics(&self, band: usize, approximate: bool) -> SamplingResult<StatisticsResponse> {
        if approximate && self.approximate_needs_full_scan {
            return Ok(StatisticsResponse::NeedsFullScan);
        }

        let values = self.band_values(band)?;
        if values.is_empty() {
            return Err(SamplingError::StatisticsUnavailable(band));
        }

        let count = values.len() as f64;
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count;

        Ok(StatisticsResponse::Computed { min, max, mean, stddev: variance.sqrt() })
    }

    fn band_histogram(&self, band: usize, bucket_count: usize) -> SamplingResult<Vec<u64>> {
        if bucket_count == 0 {
            return Err(SamplingError::GenericError("Histogram needs at least one bucket".to_string()));
        }

        let values = self.band_values(band)?;
        let mut histogram = vec![0u64; bucket_count];
        if values.is_empty() {
            return Ok(histogram);
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        for v in values {
            let bucket = if span > 0.0 {
                (((v - min) / span) * bucket_count as f64) as usize
            } else {
                0
            };
            histogram[bucket.min(bucket_count - 1)] += 1;
        }

        Ok(histogram)
    }
}
