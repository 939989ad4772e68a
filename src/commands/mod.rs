//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod info_command;
pub mod sample_command;
pub mod tiles_command;

pub use command_traits::{Command, CommandFactory};
pub use info_command::InfoCommand;
pub use sample_command::SampleCommand;
pub use tiles_command::TilesCommand;

use clap::ArgMatches;
use log::info;

use crate::api::{ImageHandle, TileEngine};
use crate::config::EngineConfig;
use crate::coordinate::Sector;
use crate::sampler::errors::{SamplingError, SamplingResult};
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
pub struct GeotileCommandFactory;

impl GeotileCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        GeotileCommandFactory
    }
}

impl Default for GeotileCommandFactory {
    fn default() -> Self {
        GeotileCommandFactory::new()
    }
}

impl<'a> CommandFactory<'a> for GeotileCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> SamplingResult<Box<dyn Command + 'a>> {
        if args.get_flag("sample") {
            Ok(Box::new(SampleCommand::new(args, logger)?))
        } else if args.get_flag("tiles") {
            Ok(Box::new(TilesCommand::new(args, logger)?))
        } else {
            // Default to info command
            Ok(Box::new(InfoCommand::new(args, logger)?))
        }
    }
}

/// Arguments every command shares
pub(crate) struct OpenOptions {
    pub input_file: String,
    pub config_file: Option<String>,
    pub backup_sector: Option<Sector>,
}

impl OpenOptions {
    pub fn from_args(args: &ArgMatches) -> SamplingResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| SamplingError::GenericError("Missing input file".to_string()))?
            .clone();

        let backup_sector = match args.get_one::<String>("backup-bbox") {
            Some(bbox) => Some(Sector::from_bbox_string(bbox)?),
            None => None,
        };

        Ok(OpenOptions {
            input_file,
            config_file: args.get_one::<String>("config").cloned(),
            backup_sector,
        })
    }

    /// Build the engine and open the input raster
    pub fn open(&self) -> SamplingResult<(TileEngine, ImageHandle)> {
        let config = match &self.config_file {
            Some(path) => {
                info!("Loading configuration from {}", path);
                EngineConfig::from_file(path)?
            },
            None => EngineConfig::default(),
        };

        let engine = TileEngine::new(config);
        let handle = engine.open_image(&self.input_file, self.backup_sector)?;
        Ok((engine, handle))
    }
}
