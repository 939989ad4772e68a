//! TOML sidecar describing a raster's georeferencing and layout
//!
//! A descriptor lives next to the raster as `<file>.geo.toml`:
//!
//! ```toml
//! geotransform = [-122.5, 0.01, 0.0, 37.8, 0.0, -0.01]
//! backup_bbox = [-122.5, 35.8, -120.5, 37.8]
//!
//! [layout]
//! width = 200
//! height = 200
//! bands = 1
//! data_type = "uint16"
//! byte_order = "little"
//!
//! [[gcp]]
//! pixel = 0.0
//! line = 0.0
//! lon = -122.5
//! lat = 37.8
//! ```
//!
//! Every key is optional for image rasters; `layout` is required for raw ones.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::coordinate::{AffineTransform, GroundControlPoint, Sector};
use crate::sampler::errors::{SamplingError, SamplingResult};

use super::RasterDataType;

/// Byte layout of a headerless band-sequential raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawLayout {
    pub width: u32,
    pub height: u32,
    pub bands: usize,
    pub data_type: RasterDataType,
    pub big_endian: bool,
}

/// Parsed sidecar contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterDescriptor {
    pub geotransform: Option<AffineTransform>,
    pub gcps: Vec<GroundControlPoint>,
    pub backup_sector: Option<Sector>,
    pub layout: Option<RawLayout>,
}

/// Conventional descriptor location for a raster file
pub fn descriptor_path_for(raster_path: &Path) -> PathBuf {
    let mut name = raster_path.as_os_str().to_os_string();
    name.push(".geo.toml");
    PathBuf::from(name)
}

impl RasterDescriptor {
    /// Parse a descriptor from a TOML string
    pub fn from_str(content: &str) -> SamplingResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(SamplingError::ConfigError(format!("Failed to parse TOML: {}", e))),
        };

        let mut descriptor = RasterDescriptor::default();

        if let Some(values) = toml_value.get("geotransform") {
            let c = Self::float_array(values, "geotransform", 6)?;
            descriptor.geotransform = Some(AffineTransform::new([c[0], c[1], c[2], c[3], c[4], c[5]]));
        }

        if let Some(values) = toml_value.get("backup_bbox") {
            let b = Self::float_array(values, "backup_bbox", 4)?;
            descriptor.backup_sector = Some(Sector::new(b[1], b[3], b[0], b[2])?);
        }

        if let Some(entries) = toml_value.get("gcp").and_then(|v| v.as_array()) {
            for entry in entries {
                descriptor.gcps.push(GroundControlPoint::new(
                    Self::float_key(entry, "pixel")?,
                    Self::float_key(entry, "line")?,
                    Self::float_key(entry, "lon")?,
                    Self::float_key(entry, "lat")?,
                ));
            }
        }

        if let Some(layout) = toml_value.get("layout") {
            descriptor.layout = Some(Self::parse_layout(layout)?);
        }

        debug!("Parsed descriptor with {} GCPs, geotransform: {}",
               descriptor.gcps.len(), descriptor.geotransform.is_some());
        Ok(descriptor)
    }

    /// Load a descriptor from a TOML file
    pub fn from_file(path: &Path) -> SamplingResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Load the sidecar for `raster_path` if one exists
    pub fn find_for(raster_path: &Path) -> SamplingResult<Option<Self>> {
        let path = descriptor_path_for(raster_path);
        if !path.exists() {
            return Ok(None);
        }
        Self::from_file(&path).map(Some)
    }

    fn parse_layout(layout: &toml::Value) -> SamplingResult<RawLayout> {
        let int_key = |key: &str| -> SamplingResult<i64> {
            layout.get(key).and_then(|v| v.as_integer())
                .filter(|v| *v > 0)
                .ok_or_else(|| SamplingError::ConfigError(format!("layout.{} must be a positive integer", key)))
        };

        let data_type = layout.get("data_type").and_then(|v| v.as_str())
            .ok_or_else(|| SamplingError::ConfigError("layout.data_type is required".to_string()))?;
        let byte_order = layout.get("byte_order").and_then(|v| v.as_str()).unwrap_or("little");
        let big_endian = match byte_order.to_lowercase().as_str() {
            "little" | "ii" => false,
            "big" | "mm" => true,
            other => return Err(SamplingError::ConfigError(format!("Unknown byte order '{}'", other))),
        };

        Ok(RawLayout {
            width: int_key("width")? as u32,
            height: int_key("height")? as u32,
            bands: layout.get("bands").and_then(|v| v.as_integer()).unwrap_or(1).max(1) as usize,
            data_type: RasterDataType::from_name(data_type)?,
            big_endian,
        })
    }

    fn float_key(table: &toml::Value, key: &str) -> SamplingResult<f64> {
        table.get(key).and_then(Self::as_float)
            .ok_or_else(|| SamplingError::ConfigError(format!("Missing or non-numeric '{}'", key)))
    }

    fn float_array(value: &toml::Value, name: &str, len: usize) -> SamplingResult<Vec<f64>> {
        let values: Option<Vec<f64>> = value.as_array()
            .map(|items| items.iter().filter_map(Self::as_float).collect());
        match values {
            Some(v) if v.len() == len => Ok(v),
            _ => Err(SamplingError::ConfigError(format!("'{}' must be an array of {} numbers", name, len))),
        }
    }

    // TOML keeps integers and floats apart; accept both
    fn as_float(value: &toml::Value) -> Option<f64> {
        value.as_float().or_else(|| value.as_integer().map(|i| i as f64))
    }
}
