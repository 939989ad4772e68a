//! Placement of sampled bands onto the requested canvas

use log::debug;

use crate::sampler::buffer::Grid;
use crate::sampler::request::IntersectionDescriptor;
use crate::sampler::tile_image::{place_grid, ColorInterpretation, TileBand, TileImage};

/// Stretched bands of one sampling call, before placement
#[derive(Debug)]
pub struct StretchedTile {
    pub bands: Vec<TileBand>,
    pub descriptor: IntersectionDescriptor,
    /// Per-pixel coverage of the sampled area (warped path)
    pub coverage: Option<Grid<u8>>,
    pub transform_version: u64,
}

/// Builds full-size tiles from stretched bands
#[derive(Debug, Clone, Copy, Default)]
pub struct Compositor;

impl Compositor {
    pub fn new() -> Self {
        Compositor
    }

    /// Produce a `width` x `height` tile
    ///
    /// Full results are returned as they are, with the coverage mask (if
    /// any) as alpha. Partial results are copied onto a transparent canvas
    /// at their offset; samples that would land outside the canvas are
    /// skipped.
    ///
    /// # Arguments
    /// * `tile` - Stretched bands and their placement
    /// * `width`, `height` - Requested canvas size
    /// * `color` - Color interpretation of the bands
    pub fn compose(&self, tile: StretchedTile, width: u32, height: u32, color: ColorInterpretation) -> TileImage {
        let StretchedTile { bands, descriptor, coverage, transform_version } = tile;

        match descriptor {
            IntersectionDescriptor::Full => TileImage {
                width,
                height,
                bands,
                color,
                alpha: coverage,
                transform_version,
            },
            IntersectionDescriptor::Partial { offset_x, offset_y, width: part_width, height: part_height } => {
                let coverage = coverage.unwrap_or_else(|| Grid::filled(part_width, part_height, 255u8));
                let (alpha, _) = place_grid(&coverage, width, height, offset_x, offset_y);

                let bands = bands.into_iter()
                    .enumerate()
                    .map(|(index, band)| match band {
                        TileBand::Ready(plane) => {
                            let (placed, skipped) = plane.placed(width, height, offset_x, offset_y);
                            if skipped > 0 {
                                debug!("Band {}: skipped {} samples outside the {}x{} canvas",
                                       index, skipped, width, height);
                            }
                            TileBand::Ready(placed)
                        },
                        failed => failed,
                    })
                    .collect();

                TileImage {
                    width,
                    height,
                    bands,
                    color,
                    alpha: Some(alpha),
                    transform_version,
                }
            },
        }
    }
}
