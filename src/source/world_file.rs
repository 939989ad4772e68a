//! ESRI world file sidecars (`.pgw`, `.jgw`, `.tfw`, `.wld`, ...)

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::coordinate::AffineTransform;
use crate::sampler::errors::{SamplingError, SamplingResult};

/// Parse world file contents into a pixel-corner affine transform
///
/// A world file holds six lines `A, D, B, E, C, F` where `C, F` locate the
/// centre of the upper-left pixel. The returned transform is shifted by
/// half a pixel so that `forward(0, 0)` is the outer corner.
pub fn parse_world_file(content: &str) -> SamplingResult<AffineTransform> {
    let values: Vec<f64> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.parse::<f64>()
            .map_err(|_| SamplingError::ConfigError(format!("Invalid world file value '{}'", line))))
        .collect::<SamplingResult<Vec<f64>>>()?;

    if values.len() != 6 {
        return Err(SamplingError::ConfigError(format!(
            "World file must contain 6 values, found {}", values.len())));
    }

    let (a, d, b, e, c, f) = (values[0], values[1], values[2], values[3], values[4], values[5]);
    let origin_lon = c - a / 2.0 - b / 2.0;
    let origin_lat = f - d / 2.0 - e / 2.0;

    Ok(AffineTransform::new([origin_lon, a, b, origin_lat, d, e]))
}

/// Locate the world file belonging to `raster_path`, if any
///
/// Tries the short form (`png` -> `pgw`), the long form (`pngw`) and `wld`.
pub fn find_world_file(raster_path: &Path) -> Option<PathBuf> {
    let extension = raster_path.extension()?.to_string_lossy().to_lowercase();
    let mut candidates = Vec::new();

    let chars: Vec<char> = extension.chars().collect();
    if let (Some(first), Some(last)) = (chars.first(), chars.last()) {
        candidates.push(format!("{}{}w", first, last));
    }
    candidates.push(format!("{}w", extension));
    candidates.push("wld".to_string());

    candidates.into_iter()
        .map(|ext| raster_path.with_extension(ext))
        .find(|path| path.exists())
        .map(|path| {
            debug!("Found world file {}", path.display());
            path
        })
}

/// Load the world file for `raster_path` if one exists
pub fn load_world_file(raster_path: &Path) -> SamplingResult<Option<AffineTransform>> {
    match find_world_file(raster_path) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            parse_world_file(&content).map(Some)
        },
        None => Ok(None),
    }
}
