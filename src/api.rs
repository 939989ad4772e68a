use std::path::Path;
use std::sync::Arc;

use log::{info, warn};

use crate::config::{EngineConfig, IMAGE_DRIVER, RAW_DRIVER};
use crate::coordinate::Sector;
use crate::fitter::{PolynomialFitter, TransformFitter};
use crate::sampler::{
    compute_band_statistics, BandStatistics, ColorInterpretation, Compositor, FootprintFinder,
    RadiometricStretcher, SampleRequest, SampleResult, SamplingError, SamplingResult, StretchedTile,
    TileBand, TileImage, TileSampler, TransformCell, TransformResolver, TransformSnapshot,
};
use crate::source::{load_image_raster, load_raw_raster, RasterSource};

/// Main interface to the geotile library
///
/// Owns the configuration and the transform fitter; every raster opened
/// through it gets the same settings.
pub struct TileEngine {
    config: EngineConfig,
    fitter: Arc<dyn TransformFitter>,
}

impl TileEngine {
    /// Create an engine with the default least-squares fitter
    pub fn new(config: EngineConfig) -> Self {
        TileEngine {
            config,
            fitter: Arc::new(PolynomialFitter::default()),
        }
    }

    /// Replace the transform fitter
    pub fn with_fitter(mut self, fitter: Arc<dyn TransformFitter>) -> Self {
        self.fitter = fitter;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Open a raster file
    ///
    /// The driver is chosen from the file extension. A backup sector given
    /// here takes precedence over one found in the raster's descriptor.
    ///
    /// # Arguments
    /// * `path` - Raster file to open
    /// * `backup_sector` - Extent to use when the raster carries no georeference
    ///
    /// # Returns
    /// An opened image or an error
    pub fn open_image<P: AsRef<Path>>(&self, path: P, backup_sector: Option<Sector>) -> SamplingResult<ImageHandle> {
        let path = path.as_ref();
        let driver = self.config.driver_for_path(path).ok_or_else(|| SamplingError::ConfigError(
            format!("No driver registered for {}", path.display())))?;
        info!("Opening {} with the {} driver", path.display(), driver);

        let (raster, descriptor) = match driver {
            IMAGE_DRIVER => load_image_raster(path)?,
            RAW_DRIVER => load_raw_raster(path)?,
            other => return Err(SamplingError::ConfigError(format!("Driver '{}' is not available", other))),
        };

        self.open_source(Arc::new(raster), backup_sector.or(descriptor.backup_sector))
    }

    /// Open an already constructed raster source
    ///
    /// Resolves the transform and computes every band's statistics.
    pub fn open_source(&self, source: Arc<dyn RasterSource>, backup_sector: Option<Sector>) -> SamplingResult<ImageHandle> {
        let (width, height) = (source.width(), source.height());
        let transform = TransformResolver::new(self.fitter.as_ref()).resolve(
            &source.ground_control_points(),
            &source.native_transform(),
            backup_sector.as_ref(),
            width,
            height,
        )?;
        info!("Resolved {} for {}x{} raster", transform.describe(), width, height);

        let finder = FootprintFinder::new(self.config.footprint_probe_steps());
        let cell = TransformCell::new(transform, finder, width, height)?;

        let statistics = (0..source.band_count())
            .map(|band| match compute_band_statistics(source.as_ref(), band, self.config.statistics()) {
                Ok(stats) => Some(stats),
                Err(e) => {
                    warn!("Band {} will not be stretchable: {}", band, e);
                    None
                },
            })
            .collect();

        Ok(ImageHandle {
            source,
            transform: cell,
            statistics,
            backup_sector,
        })
    }

    /// Re-run transform resolution for an opened image and publish the result
    ///
    /// # Returns
    /// The version of the newly published transform
    pub fn reresolve(&self, handle: &ImageHandle) -> SamplingResult<u64> {
        let source = handle.source();
        let transform = TransformResolver::new(self.fitter.as_ref()).resolve(
            &source.ground_control_points(),
            &source.native_transform(),
            handle.backup_sector.as_ref(),
            source.width(),
            source.height(),
        )?;
        handle.transform.publish(transform)
    }

    /// Raw samples for a request, before stretching and compositing
    pub fn sample_raw(&self, handle: &ImageHandle, request: &SampleRequest) -> SamplingResult<SampleResult> {
        let snapshot = handle.snapshot();
        TileSampler::new().sample(request, &snapshot, handle.source())
    }

    /// Render one tile
    ///
    /// Bands that fail to read or stretch are returned as
    /// [`TileBand::Failed`]. Statistics are only consulted for bands that
    /// need a linear stretch. Errors that are not local to one band fail
    /// the whole tile.
    pub fn sample_tile(&self, handle: &ImageHandle, request: &SampleRequest) -> SamplingResult<TileImage> {
        let result = self.sample_raw(handle, request)?;
        let stretcher = RadiometricStretcher::new(request.brightening);

        let bands = result.bands.into_iter()
            .enumerate()
            .map(|(band, samples)| {
                let stretched = samples.and_then(|buffer| {
                    stretcher.stretch(band, &buffer, handle.statistics(band).ok())
                });
                match stretched {
                    Ok(plane) => Ok(TileBand::Ready(plane)),
                    Err(e) if e.is_band_local() => {
                        warn!("Band {} of tile {} failed: {}", band, request.sector, e);
                        Ok(TileBand::Failed(e))
                    },
                    Err(e) => Err(e),
                }
            })
            .collect::<SamplingResult<Vec<TileBand>>>()?;

        let color = ColorInterpretation::for_bands(request.band_count, handle.source().has_color_table());
        let stretched = StretchedTile {
            bands,
            descriptor: result.descriptor,
            coverage: result.coverage,
            transform_version: result.transform_version,
        };

        Ok(Compositor::new().compose(stretched, request.width, request.height, color))
    }

    /// Geographic envelope of an opened image
    pub fn footprint(&self, handle: &ImageHandle) -> Sector {
        handle.footprint()
    }
}

impl Default for TileEngine {
    fn default() -> Self {
        TileEngine::new(EngineConfig::default())
    }
}

/// An opened raster with its resolved transform and band statistics
///
/// Shareable across threads; sampling only needs `&ImageHandle`.
pub struct ImageHandle {
    source: Arc<dyn RasterSource>,
    transform: TransformCell,
    statistics: Vec<Option<BandStatistics>>,
    backup_sector: Option<Sector>,
}

impl ImageHandle {
    pub fn source(&self) -> &dyn RasterSource {
        self.source.as_ref()
    }

    /// The transform snapshot in effect right now
    pub fn snapshot(&self) -> Arc<TransformSnapshot> {
        self.transform.snapshot()
    }

    /// The cell publishing this image's transform
    pub fn transform_cell(&self) -> &TransformCell {
        &self.transform
    }

    pub fn footprint(&self) -> Sector {
        self.snapshot().footprint
    }

    /// Statistics of `band`, or `StatisticsUnavailable`
    pub fn statistics(&self, band: usize) -> SamplingResult<&BandStatistics> {
        self.statistics.get(band)
            .and_then(Option::as_ref)
            .ok_or(SamplingError::StatisticsUnavailable(band))
    }

    pub fn backup_sector(&self) -> Option<&Sector> {
        self.backup_sector.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.source.width()
    }

    pub fn height(&self) -> u32 {
        self.source.height()
    }

    pub fn band_count(&self) -> usize {
        self.source.band_count()
    }
}
