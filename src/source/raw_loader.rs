//! Load headerless band-sequential binary rasters
//!
//! The layout (size, band count, sample type, byte order) must come from
//! the `.geo.toml` descriptor next to the file.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use log::info;

use crate::coordinate::AffineTransform;
use crate::sampler::buffer::{Grid, SampleBuffer};
use crate::sampler::errors::{SamplingError, SamplingResult};

use super::descriptor::{RasterDescriptor, RawLayout};
use super::memory::MemoryRaster;
use super::RasterDataType;

/// Decode `path` into an in-memory raster using its descriptor
pub fn load_raw_raster(path: &Path) -> SamplingResult<(MemoryRaster, RasterDescriptor)> {
    let descriptor = RasterDescriptor::find_for(path)?.ok_or_else(|| {
        SamplingError::ConfigError(format!("Raw raster {} needs a .geo.toml descriptor", path.display()))
    })?;
    let layout = descriptor.layout.ok_or_else(|| {
        SamplingError::ConfigError("Descriptor for a raw raster must have a [layout] table".to_string())
    })?;

    info!("Decoding raw raster {} ({}x{}, {} bands of {})",
          path.display(), layout.width, layout.height, layout.bands, layout.data_type);

    let mut reader = BufReader::new(File::open(path)?);
    let bands = if layout.big_endian {
        read_bands::<BigEndian, _>(&mut reader, &layout)?
    } else {
        read_bands::<LittleEndian, _>(&mut reader, &layout)?
    };

    let transform = descriptor.geotransform.unwrap_or_else(AffineTransform::identity);
    let raster = MemoryRaster::new(bands, transform)?.with_gcps(descriptor.gcps.clone());
    Ok((raster, descriptor))
}

/// Read every band of `layout` from `reader`
pub fn read_bands<B: ByteOrder, R: Read>(reader: &mut R, layout: &RawLayout) -> SamplingResult<Vec<SampleBuffer>> {
    let (w, h) = (layout.width, layout.height);
    let count = w as usize * h as usize;

    (0..layout.bands)
        .map(|_| -> SamplingResult<SampleBuffer> {
            let buffer = match layout.data_type {
                RasterDataType::Byte => {
                    let mut data = vec![0u8; count];
                    reader.read_exact(&mut data)?;
                    SampleBuffer::Byte(Grid::from_vec(w, h, data)?)
                },
                RasterDataType::Int16 => {
                    let mut data = vec![0i16; count];
                    reader.read_i16_into::<B>(&mut data)?;
                    SampleBuffer::Int16(Grid::from_vec(w, h, data)?)
                },
                RasterDataType::UInt16 => {
                    let mut data = vec![0u16; count];
                    reader.read_u16_into::<B>(&mut data)?;
                    SampleBuffer::UInt16(Grid::from_vec(w, h, data)?)
                },
                RasterDataType::Int32 => {
                    let mut data = vec![0i32; count];
                    reader.read_i32_into::<B>(&mut data)?;
                    SampleBuffer::Int32(Grid::from_vec(w, h, data)?)
                },
                RasterDataType::UInt32 => {
                    let mut data = vec![0u32; count];
                    reader.read_u32_into::<B>(&mut data)?;
                    SampleBuffer::UInt32(Grid::from_vec(w, h, data)?)
                },
                RasterDataType::Float32 => {
                    let mut data = vec![0f32; count];
                    reader.read_f32_into::<B>(&mut data)?;
                    SampleBuffer::Float32(Grid::from_vec(w, h, data)?)
                },
                RasterDataType::Float64 => {
                    let mut data = vec![0f64; count];
                    reader.read_f64_into::<B>(&mut data)?;
                    SampleBuffer::Float64(Grid::from_vec(w, h, data)?)
                },
                complex => {
                    return Err(SamplingError::ConfigError(format!(
                        "Raw rasters of type {} cannot be loaded", complex)));
                },
            };
            Ok(buffer)
        })
        .collect()
}
