//! Batch rendering of a tile grid covering the whole raster

use std::fs;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use log::{debug, info};

use crate::commands::command_traits::Command;
use crate::commands::OpenOptions;
use crate::coordinate::Sector;
use crate::sampler::errors::{SamplingError, SamplingResult};
use crate::sampler::{SampleRequest, MAX_TILE_BANDS};
use crate::utils::logger::Logger;
use crate::utils::parse_utils::{parse_dimensions, parse_factor};
use crate::utils::progress::ProgressTracker;

/// Command rendering a `columns` x `rows` grid over the raster footprint
pub struct TilesCommand<'a> {
    options: OpenOptions,
    grid: (u32, u32),
    size: (u32, u32),
    brightening: Option<f64>,
    output_dir: PathBuf,
    logger: &'a Logger,
}

impl<'a> TilesCommand<'a> {
    /// Create a new tiles command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SamplingResult<Self> {
        let options = OpenOptions::from_args(args)?;

        let grid = match args.get_one::<String>("grid") {
            Some(grid) => parse_dimensions(grid, "grid")?,
            None => (2, 2),
        };
        let size = match args.get_one::<String>("size") {
            Some(size) => parse_dimensions(size, "size")?,
            None => (256, 256),
        };
        let brightening = match args.get_one::<String>("brighten") {
            Some(value) => Some(parse_factor(value, "brighten")?),
            None => None,
        };
        let output_dir = args.get_one::<String>("output-dir")
            .map(PathBuf::from)
            .ok_or_else(|| SamplingError::InvalidRequest("--tiles needs --output-dir".to_string()))?;

        Ok(TilesCommand { options, grid, size, brightening, output_dir, logger })
    }

    fn tile_path(&self, column: u32, row: u32) -> PathBuf {
        Path::new(&self.output_dir).join(format!("tile_{}_{}.png", row, column))
    }
}

/// Split `footprint` into `columns` x `rows` sectors, row 0 northmost
pub fn grid_sectors(footprint: &Sector, columns: u32, rows: u32) -> SamplingResult<Vec<(u32, u32, Sector)>> {
    if columns == 0 || rows == 0 {
        return Err(SamplingError::InvalidRequest(format!("Tile grid {}x{} is empty", columns, rows)));
    }
    let lon_step = footprint.lon_span() / columns as f64;
    let lat_step = footprint.lat_span() / rows as f64;

    let mut sectors = Vec::with_capacity(columns as usize * rows as usize);
    for row in 0..rows {
        for column in 0..columns {
            let min_lon = footprint.min_lon() + column as f64 * lon_step;
            let max_lat = footprint.max_lat() - row as f64 * lat_step;
            let sector = Sector::new(max_lat - lat_step, max_lat, min_lon, min_lon + lon_step)?;
            sectors.push((column, row, sector));
        }
    }
    Ok(sectors)
}

impl<'a> Command for TilesCommand<'a> {
    fn execute(&self) -> SamplingResult<()> {
        let (engine, handle) = self.options.open()?;
        fs::create_dir_all(&self.output_dir)?;

        let footprint = engine.footprint(&handle);
        let sectors = grid_sectors(&footprint, self.grid.0, self.grid.1)?;
        let band_count = handle.band_count().min(MAX_TILE_BANDS);
        info!("Rendering {} tiles over {}", sectors.len(), footprint);

        let progress = ProgressTracker::new(sectors.len() as u64, "Rendering tiles");
        let mut rendered = 0;
        let mut empty = 0;

        for (column, row, sector) in sectors {
            let mut request = SampleRequest::new(sector, self.size.0, self.size.1, band_count)?;
            if let Some(factor) = self.brightening {
                request = request.with_brightening(factor)?;
            }

            match engine.sample_tile(&handle, &request) {
                Ok(tile) => {
                    let path = self.tile_path(column, row);
                    tile.save(&path)?;
                    self.logger.log_tile(&path.display().to_string(), &tile)?;
                    rendered += 1;
                },
                Err(SamplingError::EmptyIntersection) => {
                    debug!("Tile ({}, {}) has no data", column, row);
                    empty += 1;
                },
                Err(e) => return Err(e),
            }
            progress.increment(1);
        }

        progress.finish(rendered, empty);
        self.logger.log(&format!("Rendered {} tiles ({} empty) into {}",
                                 rendered, empty, self.output_dir.display()))?;
        Ok(())
    }
}
