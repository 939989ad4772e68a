//! Load ordinary image files (PNG, JPEG, TIFF, ...) as rasters
//!
//! Pixels are decoded by the `image` crate; georeferencing comes from the
//! `.geo.toml` descriptor when it has a geotransform, otherwise from a
//! world file, otherwise the raster is left with an identity transform.

use std::path::Path;

use image::DynamicImage;
use log::{info, warn};

use crate::coordinate::AffineTransform;
use crate::sampler::buffer::{Grid, SampleBuffer};
use crate::sampler::errors::SamplingResult;

use super::descriptor::RasterDescriptor;
use super::memory::MemoryRaster;
use super::world_file::load_world_file;

/// Decode `path` into an in-memory raster
///
/// # Arguments
/// * `path` - Image file readable by the `image` crate
///
/// # Returns
/// The raster and the descriptor it was georeferenced with (empty if none)
pub fn load_image_raster(path: &Path) -> SamplingResult<(MemoryRaster, RasterDescriptor)> {
    info!("Decoding image raster {}", path.display());
    let image = image::open(path)?;
    let bands = split_bands(image)?;

    let descriptor = RasterDescriptor::find_for(path)?.unwrap_or_default();
    let transform = match descriptor.geotransform {
        Some(transform) => transform,
        None => match load_world_file(path)? {
            Some(transform) => transform,
            None => {
                if descriptor.gcps.is_empty() {
                    warn!("{} has no georeferencing; using identity transform", path.display());
                }
                AffineTransform::identity()
            },
        },
    };

    let raster = MemoryRaster::new(bands, transform)?.with_gcps(descriptor.gcps.clone());
    Ok((raster, descriptor))
}

/// Split an interleaved image into one buffer per channel
pub fn split_bands(image: DynamicImage) -> SamplingResult<Vec<SampleBuffer>> {
    let (width, height) = (image.width(), image.height());

    let bands = match image {
        DynamicImage::ImageLuma8(img) => deinterleave(img.as_raw(), 1, width, height)?
            .into_iter().map(SampleBuffer::Byte).collect(),
        DynamicImage::ImageLumaA8(img) => deinterleave(img.as_raw(), 2, width, height)?
            .into_iter().map(SampleBuffer::Byte).collect(),
        DynamicImage::ImageRgb8(img) => deinterleave(img.as_raw(), 3, width, height)?
            .into_iter().map(SampleBuffer::Byte).collect(),
        DynamicImage::ImageRgba8(img) => deinterleave(img.as_raw(), 4, width, height)?
            .into_iter().map(SampleBuffer::Byte).collect(),
        DynamicImage::ImageLuma16(img) => deinterleave(img.as_raw(), 1, width, height)?
            .into_iter().map(SampleBuffer::UInt16).collect(),
        DynamicImage::ImageLumaA16(img) => deinterleave(img.as_raw(), 2, width, height)?
            .into_iter().map(SampleBuffer::UInt16).collect(),
        DynamicImage::ImageRgb16(img) => deinterleave(img.as_raw(), 3, width, height)?
            .into_iter().map(SampleBuffer::UInt16).collect(),
        DynamicImage::ImageRgba16(img) => deinterleave(img.as_raw(), 4, width, height)?
            .into_iter().map(SampleBuffer::UInt16).collect(),
        DynamicImage::ImageRgb32F(img) => deinterleave(img.as_raw(), 3, width, height)?
            .into_iter().map(SampleBuffer::Float32).collect(),
        DynamicImage::ImageRgba32F(img) => deinterleave(img.as_raw(), 4, width, height)?
            .into_iter().map(SampleBuffer::Float32).collect(),
        other => {
            let rgba = other.to_rgba8();
            deinterleave(rgba.as_raw(), 4, width, height)?
                .into_iter().map(SampleBuffer::Byte).collect()
        },
    };

    Ok(bands)
}

fn deinterleave<T: Copy + Default>(raw: &[T], channels: usize, width: u32, height: u32) -> SamplingResult<Vec<Grid<T>>> {
    (0..channels)
        .map(|channel| {
            let plane = raw.iter().skip(channel).step_by(channels).copied().collect();
            Grid::from_vec(width, height, plane)
        })
        .collect()
}
