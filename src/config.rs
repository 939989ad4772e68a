//! Engine configuration
//!
//! An immutable value built once and owned by the [`TileEngine`](crate::api::TileEngine).
//! The defaults are embedded from `formats.toml` at the crate root.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::sampler::errors::{SamplingError, SamplingResult};
use crate::sampler::footprint::DEFAULT_PROBE_STEPS;
use crate::sampler::statistics::{StatisticsOptions, DEFAULT_HISTOGRAM_BUCKETS};

const DEFAULT_CONFIG: &str = include_str!("../formats.toml");

/// Driver decoding ordinary image files
pub const IMAGE_DRIVER: &str = "image";
/// Driver decoding headerless band-sequential dumps
pub const RAW_DRIVER: &str = "raw";

/// Settings shared by every raster an engine opens
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Driver name -> lower-case file extensions
    drivers: BTreeMap<String, Vec<String>>,
    footprint_probe_steps: u32,
    statistics: StatisticsOptions,
}

impl EngineConfig {
    /// Parse a configuration from TOML
    ///
    /// Missing sections keep their built-in defaults.
    pub fn from_str(content: &str) -> SamplingResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(SamplingError::ConfigError(format!("Failed to parse TOML: {}", e))),
        };

        let mut config = EngineConfig::built_in();

        if let Some(drivers) = toml_value.get("drivers") {
            let table = drivers.as_table()
                .ok_or_else(|| SamplingError::ConfigError("[drivers] must be a table".to_string()))?;
            config.drivers.clear();

            for (driver, extensions) in table {
                let list = extensions.as_array().ok_or_else(|| SamplingError::ConfigError(
                    format!("drivers.{} must be an array of extensions", driver)))?;
                let mut names = Vec::with_capacity(list.len());
                for ext in list {
                    let ext = ext.as_str().ok_or_else(|| SamplingError::ConfigError(
                        format!("drivers.{} contains a non-string extension", driver)))?;
                    names.push(ext.trim_start_matches('.').to_lowercase());
                }
                config.drivers.insert(driver.clone(), names);
            }
        }

        if let Some(sampling) = toml_value.get("sampling") {
            if let Some(steps) = sampling.get("footprint_probe_steps") {
                config.footprint_probe_steps = Self::positive(steps, "sampling.footprint_probe_steps")? as u32;
            }
        }

        if let Some(statistics) = toml_value.get("statistics") {
            if let Some(buckets) = statistics.get("histogram_buckets") {
                let buckets = buckets.as_integer().filter(|b| *b >= 0).ok_or_else(|| SamplingError::ConfigError(
                    "statistics.histogram_buckets must be a non-negative integer".to_string()))?;
                config.statistics.histogram_buckets = buckets as usize;
            }
            if let Some(approximate) = statistics.get("approximate_first") {
                config.statistics.approximate_first = approximate.as_bool().ok_or_else(|| SamplingError::ConfigError(
                    "statistics.approximate_first must be a boolean".to_string()))?;
            }
        }

        debug!("Loaded configuration with {} drivers", config.drivers.len());
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SamplingResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_str(&contents)
    }

    /// Driver registered for the extension of `path`, compared case-insensitively
    pub fn driver_for_path(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.drivers.iter()
            .find(|(_, extensions)| extensions.iter().any(|e| *e == ext))
            .map(|(driver, _)| driver.as_str())
    }

    /// Extensions registered for `driver`
    pub fn extensions(&self, driver: &str) -> &[String] {
        self.drivers.get(driver).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn footprint_probe_steps(&self) -> u32 {
        self.footprint_probe_steps
    }

    pub fn statistics(&self) -> &StatisticsOptions {
        &self.statistics
    }

    fn built_in() -> Self {
        let mut drivers = BTreeMap::new();
        drivers.insert(IMAGE_DRIVER.to_string(),
                       ["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff"].iter().map(|s| s.to_string()).collect());
        drivers.insert(RAW_DRIVER.to_string(), vec!["raw".to_string(), "bin".to_string()]);

        EngineConfig {
            drivers,
            footprint_probe_steps: DEFAULT_PROBE_STEPS,
            statistics: StatisticsOptions {
                approximate_first: true,
                histogram_buckets: DEFAULT_HISTOGRAM_BUCKETS,
            },
        }
    }

    fn positive(value: &toml::Value, key: &str) -> SamplingResult<i64> {
        value.as_integer()
            .filter(|v| *v > 0 && *v <= u32::MAX as i64)
            .ok_or_else(|| SamplingError::ConfigError(format!("{} must be a positive integer", key)))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        match EngineConfig::from_str(DEFAULT_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                warn!("Embedded configuration is invalid ({}); using built-in defaults", e);
                EngineConfig::built_in()
            },
        }
    }
}
