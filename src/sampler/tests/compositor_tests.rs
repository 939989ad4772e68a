//! Tests for tile composition

use image::GenericImageView;

use crate::sampler::buffer::Grid;
use crate::sampler::{
    BandPlane, ColorInterpretation, Compositor, IntersectionDescriptor, SamplingError, StretchedTile, TileBand,
};

fn byte_plane(width: u32, height: u32, value: u8) -> TileBand {
    TileBand::Ready(BandPlane::Byte(Grid::filled(width, height, value)))
}

#[test]
fn test_partial_tile_is_placed_on_full_canvas() {
    let tile = StretchedTile {
        bands: vec![byte_plane(100, 50, 9)],
        descriptor: IntersectionDescriptor::Partial { offset_x: 0, offset_y: 50, width: 100, height: 50 },
        coverage: None,
        transform_version: 4,
    };

    let image = Compositor::new().compose(tile, 150, 100, ColorInterpretation::Grayscale);

    assert_eq!((image.width, image.height), (150, 100));
    assert_eq!(image.transform_version, 4);
    let plane = image.bands[0].plane().and_then(BandPlane::as_bytes).unwrap();
    assert_eq!((plane.width(), plane.height()), (150, 100));

    // Outside the sub-rectangle: transparent and zero
    assert_eq!(image.alpha_at(0, 0), Some(0));
    assert_eq!(plane.get(0, 0), Some(0));
    assert_eq!(image.alpha_at(120, 70), Some(0));
    // Inside
    assert_eq!(image.alpha_at(0, 50), Some(255));
    assert_eq!(plane.get(99, 99), Some(9));
}

#[test]
fn test_overhanging_samples_are_skipped() {
    let tile = StretchedTile {
        bands: vec![byte_plane(10, 10, 1)],
        descriptor: IntersectionDescriptor::Partial { offset_x: 5, offset_y: 5, width: 10, height: 10 },
        coverage: None,
        transform_version: 1,
    };

    let image = Compositor::new().compose(tile, 10, 10, ColorInterpretation::Grayscale);

    let plane = image.bands[0].plane().and_then(BandPlane::as_bytes).unwrap();
    assert_eq!(plane.as_slice().iter().filter(|v| **v == 1).count(), 25);
    assert_eq!((plane.width(), plane.height()), (10, 10));
}

#[test]
fn test_offsets_near_u32_max_are_skipped() {
    let plane = BandPlane::Byte(Grid::filled(3, 2, 7));

    let (placed, skipped) = plane.placed(4, 4, u32::MAX - 1, 1);
    assert_eq!(skipped, 6);
    assert!(placed.as_bytes().unwrap().as_slice().iter().all(|v| *v == 0));

    let (placed, skipped) = plane.placed(4, 4, 2, u32::MAX);
    assert_eq!(skipped, 6);
    assert_eq!((placed.as_bytes().unwrap().width(), placed.as_bytes().unwrap().height()), (4, 4));

    let tile = StretchedTile {
        bands: vec![byte_plane(3, 2, 7)],
        descriptor: IntersectionDescriptor::Partial { offset_x: u32::MAX, offset_y: u32::MAX, width: 3, height: 2 },
        coverage: None,
        transform_version: 1,
    };
    let image = Compositor::new().compose(tile, 4, 4, ColorInterpretation::Grayscale);
    assert_eq!(image.alpha_at(0, 0), Some(0));
    assert_eq!(image.alpha_at(3, 3), Some(0));
}

#[test]
fn test_full_tile_uses_coverage_as_alpha() {
    let mut coverage = Grid::filled(4, 4, 255u8);
    coverage.set(0, 0, 0);
    let tile = StretchedTile {
        bands: vec![byte_plane(4, 4, 200)],
        descriptor: IntersectionDescriptor::Full,
        coverage: Some(coverage),
        transform_version: 1,
    };

    let image = Compositor::new().compose(tile, 4, 4, ColorInterpretation::Grayscale);

    assert_eq!(image.alpha_at(0, 0), Some(0));
    assert_eq!(image.alpha_at(1, 0), Some(255));

    let rendered = image.to_dynamic_image().unwrap();
    assert_eq!(rendered.dimensions(), (4, 4));
    assert_eq!(rendered.get_pixel(1, 0).0, [200, 200, 200, 255]);
    assert_eq!(rendered.get_pixel(0, 0).0[3], 0);
}

#[test]
fn test_full_tile_without_coverage_is_opaque() {
    let tile = StretchedTile {
        bands: vec![byte_plane(3, 2, 10), byte_plane(3, 2, 20), byte_plane(3, 2, 30)],
        descriptor: IntersectionDescriptor::Full,
        coverage: None,
        transform_version: 1,
    };

    let image = Compositor::new().compose(tile, 3, 2, ColorInterpretation::Rgb);

    assert!(image.alpha.is_none());
    assert_eq!(image.alpha_at(2, 1), Some(255));
    assert_eq!(image.alpha_at(3, 1), None);
    let rendered = image.to_dynamic_image().unwrap();
    assert_eq!(rendered.get_pixel(2, 1).0, [10, 20, 30, 255]);
}

#[test]
fn test_failed_bands_are_kept() {
    let tile = StretchedTile {
        bands: vec![
            byte_plane(2, 2, 50),
            TileBand::Failed(SamplingError::ReadFailure { band: 1, message: "bad block".to_string() }),
            byte_plane(2, 2, 70),
        ],
        descriptor: IntersectionDescriptor::Partial { offset_x: 1, offset_y: 1, width: 2, height: 2 },
        coverage: None,
        transform_version: 1,
    };

    let image = Compositor::new().compose(tile, 4, 4, ColorInterpretation::Rgb);

    assert_eq!(image.failed_band_count(), 1);
    assert!(matches!(image.bands[1].error(), Some(SamplingError::ReadFailure { band: 1, .. })));

    let rendered = image.to_dynamic_image().unwrap();
    assert_eq!(rendered.get_pixel(1, 1).0, [50, 0, 70, 255]);
    assert_eq!(rendered.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[test]
fn test_color_interpretation() {
    assert_eq!(ColorInterpretation::for_bands(1, false), ColorInterpretation::Grayscale);
    assert_eq!(ColorInterpretation::for_bands(1, true), ColorInterpretation::Indexed);
    assert_eq!(ColorInterpretation::for_bands(2, true), ColorInterpretation::Grayscale);
    assert_eq!(ColorInterpretation::for_bands(3, false), ColorInterpretation::Rgb);
    assert_eq!(ColorInterpretation::for_bands(4, false), ColorInterpretation::Rgba);
}
