//! Rendered tiles

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};
use log::info;

use crate::sampler::buffer::Grid;
use crate::sampler::errors::{SamplingError, SamplingResult};

/// How the bands of a tile are to be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorInterpretation {
    Grayscale,
    /// Band 0 holds palette indices
    Indexed,
    Rgb,
    Rgba,
}

impl ColorInterpretation {
    /// Interpretation for a tile with `band_count` bands
    pub fn for_bands(band_count: usize, has_color_table: bool) -> Self {
        match band_count {
            1 if has_color_table => ColorInterpretation::Indexed,
            3 => ColorInterpretation::Rgb,
            4 => ColorInterpretation::Rgba,
            _ => ColorInterpretation::Grayscale,
        }
    }
}

/// Display-ready samples of one band
#[derive(Debug, Clone, PartialEq)]
pub enum BandPlane {
    Byte(Grid<u8>),
    /// Unstretched signed 32-bit samples
    Int32(Grid<i32>),
    /// Unstretched unsigned 32-bit samples
    UInt32(Grid<u32>),
}

impl BandPlane {
    pub fn width(&self) -> u32 {
        match self {
            BandPlane::Byte(g) => g.width(),
            BandPlane::Int32(g) => g.width(),
            BandPlane::UInt32(g) => g.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            BandPlane::Byte(g) => g.height(),
            BandPlane::Int32(g) => g.height(),
            BandPlane::UInt32(g) => g.height(),
        }
    }

    /// The byte plane, if this band was stretched
    pub fn as_bytes(&self) -> Option<&Grid<u8>> {
        match self {
            BandPlane::Byte(g) => Some(g),
            _ => None,
        }
    }

    /// Byte view of the plane; 32-bit samples saturate at 0 and 255
    pub fn to_display(&self) -> Grid<u8> {
        match self {
            BandPlane::Byte(g) => g.clone(),
            BandPlane::Int32(g) => g.map(|v| v.clamp(0, 255) as u8),
            BandPlane::UInt32(g) => g.map(|v| v.min(255) as u8),
        }
    }

    /// Copy into a zeroed `width` x `height` canvas at `(offset_x, offset_y)`
    ///
    /// # Returns
    /// The placed plane and the number of samples that fell off the canvas
    pub fn placed(&self, width: u32, height: u32, offset_x: u32, offset_y: u32) -> (BandPlane, usize) {
        match self {
            BandPlane::Byte(g) => {
                let (grid, skipped) = place_grid(g, width, height, offset_x, offset_y);
                (BandPlane::Byte(grid), skipped)
            },
            BandPlane::Int32(g) => {
                let (grid, skipped) = place_grid(g, width, height, offset_x, offset_y);
                (BandPlane::Int32(grid), skipped)
            },
            BandPlane::UInt32(g) => {
                let (grid, skipped) = place_grid(g, width, height, offset_x, offset_y);
                (BandPlane::UInt32(grid), skipped)
            },
        }
    }
}

pub(crate) fn place_grid<T: Copy + Default>(source: &Grid<T>,
                                             width: u32,
                                             height: u32,
                                             offset_x: u32,
                                             offset_y: u32) -> (Grid<T>, usize) {
    let mut canvas = Grid::new(width, height);
    let mut skipped = 0;
    for j in 0..source.height() {
        for i in 0..source.width() {
            let target = offset_x.checked_add(i).zip(offset_y.checked_add(j));
            let placed = source.get(i, j)
                .zip(target)
                .map(|(v, (x, y))| canvas.set(x, y, v))
                .unwrap_or(false);
            if !placed {
                skipped += 1;
            }
        }
    }
    (canvas, skipped)
}

/// One band of a tile: its plane, or why it could not be produced
#[derive(Debug)]
pub enum TileBand {
    Ready(BandPlane),
    Failed(SamplingError),
}

impl TileBand {
    pub fn plane(&self) -> Option<&BandPlane> {
        match self {
            TileBand::Ready(plane) => Some(plane),
            TileBand::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SamplingError> {
        match self {
            TileBand::Ready(_) => None,
            TileBand::Failed(e) => Some(e),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, TileBand::Ready(_))
    }
}

/// A rendered tile of exactly the requested size
#[derive(Debug)]
pub struct TileImage {
    pub width: u32,
    pub height: u32,
    pub bands: Vec<TileBand>,
    pub color: ColorInterpretation,
    /// 0 where the tile has no data, 255 where it does; absent when every pixel is covered
    pub alpha: Option<Grid<u8>>,
    /// Version of the transform the tile was sampled with
    pub transform_version: u64,
}

impl TileImage {
    /// Number of bands that failed
    pub fn failed_band_count(&self) -> usize {
        self.bands.iter().filter(|b| !b.is_ready()).count()
    }

    /// Alpha at `(x, y)`; 255 when the tile has no alpha mask
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        match &self.alpha {
            Some(alpha) => alpha.get(x, y),
            None if x < self.width && y < self.height => Some(255),
            None => None,
        }
    }

    /// Convert to an `image` crate buffer
    ///
    /// Failed bands render as zero. Indexed tiles render their palette
    /// indices as gray levels.
    pub fn to_dynamic_image(&self) -> SamplingResult<DynamicImage> {
        let zero = Grid::new(self.width, self.height);
        let planes: Vec<Grid<u8>> = self.bands.iter()
            .map(|band| band.plane()
                .filter(|p| p.width() == self.width && p.height() == self.height)
                .map(BandPlane::to_display)
                .unwrap_or_else(|| zero.clone()))
            .collect();
        let channel = |i: usize| planes.get(i).unwrap_or(&zero);
        let pixel_count = self.width as usize * self.height as usize;

        let image = match (self.color, &self.alpha) {
            (ColorInterpretation::Grayscale | ColorInterpretation::Indexed, None) => {
                let data = channel(0).as_slice().to_vec();
                DynamicImage::ImageLuma8(buffer::<Luma<u8>>(self.width, self.height, data)?)
            },
            (ColorInterpretation::Grayscale | ColorInterpretation::Indexed, Some(alpha)) => {
                let gray = channel(0).as_slice();
                let mut data = Vec::with_capacity(pixel_count * 2);
                for (g, a) in gray.iter().zip(alpha.as_slice()) {
                    data.extend_from_slice(&[*g, *a]);
                }
                DynamicImage::ImageLumaA8(buffer::<LumaA<u8>>(self.width, self.height, data)?)
            },
            (ColorInterpretation::Rgb, None) => {
                let (r, g, b) = (channel(0).as_slice(), channel(1).as_slice(), channel(2).as_slice());
                let mut data = Vec::with_capacity(pixel_count * 3);
                for i in 0..pixel_count {
                    data.extend_from_slice(&[r[i], g[i], b[i]]);
                }
                DynamicImage::ImageRgb8(buffer::<Rgb<u8>>(self.width, self.height, data)?)
            },
            (ColorInterpretation::Rgb | ColorInterpretation::Rgba, alpha) => {
                let (r, g, b) = (channel(0).as_slice(), channel(1).as_slice(), channel(2).as_slice());
                let band_alpha = (self.color == ColorInterpretation::Rgba).then(|| channel(3).as_slice());
                let mut data = Vec::with_capacity(pixel_count * 4);
                for i in 0..pixel_count {
                    let mask = alpha.as_ref().map(|a| a.as_slice().get(i).copied().unwrap_or(0)).unwrap_or(255);
                    let a = match band_alpha {
                        Some(values) => ((values[i] as u16 * mask as u16) / 255) as u8,
                        None => mask,
                    };
                    data.extend_from_slice(&[r[i], g[i], b[i], a]);
                }
                DynamicImage::ImageRgba8(buffer::<Rgba<u8>>(self.width, self.height, data)?)
            },
        };
        Ok(image)
    }

    /// Write the tile to `path`, format chosen from the extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> SamplingResult<()> {
        let path = path.as_ref();
        self.to_dynamic_image()?.save(path)?;
        info!("Wrote {}x{} tile to {}", self.width, self.height, path.display());
        Ok(())
    }
}

fn buffer<P: image::Pixel<Subpixel = u8>>(width: u32, height: u32, data: Vec<u8>) -> SamplingResult<ImageBuffer<P, Vec<u8>>> {
    ImageBuffer::from_raw(width, height, data)
        .ok_or_else(|| SamplingError::GenericError(format!("Pixel data does not fill {}x{}", width, height)))
}
