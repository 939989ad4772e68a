//! Single tile rendering command

use clap::ArgMatches;
use log::{info, warn};

use crate::commands::command_traits::Command;
use crate::commands::OpenOptions;
use crate::coordinate::Sector;
use crate::sampler::errors::{SamplingError, SamplingResult};
use crate::sampler::{SampleRequest, MAX_TILE_BANDS};
use crate::utils::logger::Logger;
use crate::utils::parse_utils::{parse_dimensions, parse_factor};

/// Command rendering one geographic region to an image file
pub struct SampleCommand<'a> {
    options: OpenOptions,
    /// Region to render
    sector: Sector,
    /// Output size in pixels
    size: (u32, u32),
    /// Optional brightening factor
    brightening: Option<f64>,
    /// Path to the output image
    output_file: String,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> SampleCommand<'a> {
    /// Create a new sample command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new SampleCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SamplingResult<Self> {
        let options = OpenOptions::from_args(args)?;

        let bbox = args.get_one::<String>("bbox")
            .ok_or_else(|| SamplingError::InvalidRequest("--sample needs --bbox".to_string()))?;
        let sector = Sector::from_bbox_string(bbox)?;

        let size = match args.get_one::<String>("size") {
            Some(size) => parse_dimensions(size, "size")?,
            None => (256, 256),
        };

        let brightening = match args.get_one::<String>("brighten") {
            Some(value) => Some(parse_factor(value, "brighten")?),
            None => None,
        };

        let output_file = args.get_one::<String>("output")
            .ok_or_else(|| SamplingError::InvalidRequest("Missing output file path".to_string()))?
            .clone();

        Ok(SampleCommand { options, sector, size, brightening, output_file, logger })
    }
}

impl<'a> Command for SampleCommand<'a> {
    fn execute(&self) -> SamplingResult<()> {
        let (engine, handle) = self.options.open()?;

        let band_count = handle.band_count().min(MAX_TILE_BANDS);
        let mut request = SampleRequest::new(self.sector, self.size.0, self.size.1, band_count)?;
        if let Some(factor) = self.brightening {
            request = request.with_brightening(factor)?;
        }

        info!("Rendering {} at {}x{}", self.sector, self.size.0, self.size.1);
        let tile = engine.sample_tile(&handle, &request)?;
        if tile.failed_band_count() > 0 {
            warn!("{} of {} bands failed", tile.failed_band_count(), tile.bands.len());
        }

        tile.save(&self.output_file)?;
        self.logger.log_tile(&self.output_file, &tile)?;
        Ok(())
    }
}
