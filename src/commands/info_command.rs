//! Raster information command
//!
//! Prints the size, bands, resolved transform, footprint and band
//! statistics of a raster.

use clap::ArgMatches;
use log::info;

use crate::api::ImageHandle;
use crate::commands::command_traits::Command;
use crate::commands::OpenOptions;
use crate::sampler::errors::SamplingResult;
use crate::utils::logger::Logger;

/// Command for describing a raster
pub struct InfoCommand<'a> {
    options: OpenOptions,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> InfoCommand<'a> {
    /// Create a new info command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SamplingResult<Self> {
        Ok(InfoCommand {
            options: OpenOptions::from_args(args)?,
            logger,
        })
    }

    fn display_bands(&self, handle: &ImageHandle) -> SamplingResult<()> {
        let source = handle.source();
        info!("  Bands: {}{}", source.band_count(),
              if source.has_color_table() { " (palette)" } else { "" });

        for band in 0..source.band_count() {
            let data_type = source.data_type(band)?;
            match handle.statistics(band) {
                Ok(stats) => {
                    info!("    Band {}: {} min={} max={} mean={:.3} stddev={:.3}",
                          band, data_type, stats.min, stats.max, stats.mean, stats.stddev);
                    if let Some(histogram) = &stats.histogram {
                        let peak = histogram.iter().enumerate().max_by_key(|(_, count)| **count);
                        if let Some((bucket, count)) = peak {
                            info!("      Histogram: {} buckets, peak at bucket {} ({} samples)",
                                  histogram.len(), bucket, count);
                        }
                    }
                },
                Err(e) => info!("    Band {}: {} ({})", band, data_type, e),
            }
        }
        Ok(())
    }
}

impl<'a> Command for InfoCommand<'a> {
    fn execute(&self) -> SamplingResult<()> {
        info!("Describing raster: {}", self.options.input_file);
        let (_, handle) = self.options.open()?;
        let snapshot = handle.snapshot();

        info!("Raster Information:");
        info!("  Size: {}x{}", handle.width(), handle.height());
        self.display_bands(&handle)?;
        info!("  Transform: {}", snapshot.transform.describe());
        info!("  Footprint: {}", snapshot.footprint);
        if let Some(backup) = handle.backup_sector() {
            info!("  Backup sector: {}", backup);
        }

        self.logger.log(&format!("Described {}: footprint {}", self.options.input_file, snapshot.footprint))?;
        Ok(())
    }
}
