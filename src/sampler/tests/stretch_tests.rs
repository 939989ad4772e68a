//! Tests for radiometric stretching

use proptest::prelude::*;

use crate::sampler::buffer::{Grid, SampleBuffer};
use crate::sampler::stretch::linear;
use crate::sampler::{BandPlane, BandStatistics, RadiometricStretcher, SamplingError, StretchRule};
use crate::source::RasterDataType;

fn stats(min: f64, max: f64) -> BandStatistics {
    BandStatistics::new(min, max, (min + max) / 2.0, 1.0).unwrap()
}

#[test]
fn test_uint16_stretch_lifts_floor_below_min() {
    let stretcher = RadiometricStretcher::new(None);
    let stats = stats(100.0, 4000.0);

    assert_eq!(RadiometricStretcher::rule(0, RasterDataType::UInt16, Some(&stats)).unwrap(),
               StretchRule::Linear { floor: 99.0, max: 4000.0 });
    assert_eq!(stretcher.stretch_value(RasterDataType::UInt16, 50.0, Some(&stats)).unwrap(), 0);
    assert_eq!(stretcher.stretch_value(RasterDataType::UInt16, 4000.0, Some(&stats)).unwrap(), 255);

    let mid = stretcher.stretch_value(RasterDataType::UInt16, 2050.0, Some(&stats)).unwrap();
    assert!((125..=131).contains(&mid), "mid value {}", mid);
}

#[test]
fn test_uint16_floor_never_goes_negative() {
    let rule = RadiometricStretcher::rule(0, RasterDataType::UInt16, Some(&stats(0.5, 10.0))).unwrap();
    assert_eq!(rule, StretchRule::Linear { floor: 0.0, max: 10.0 });
}

#[test]
fn test_signed_and_float_types_stretch_from_min() {
    let stats = stats(-100.0, 100.0);
    for data_type in [RasterDataType::Int16, RasterDataType::Float32, RasterDataType::Float64] {
        assert_eq!(RadiometricStretcher::rule(0, data_type, Some(&stats)).unwrap(),
                   StretchRule::Linear { floor: -100.0, max: 100.0 });
    }

    let stretcher = RadiometricStretcher::new(None);
    assert_eq!(stretcher.stretch_value(RasterDataType::Int16, -100.0, Some(&stats)).unwrap(), 0);
    assert_eq!(stretcher.stretch_value(RasterDataType::Int16, 0.0, Some(&stats)).unwrap(), 127);
    assert_eq!(stretcher.stretch_value(RasterDataType::Float32, 250.0, Some(&stats)).unwrap(), 255);
}

#[test]
fn test_byte_passes_through() {
    let grid = Grid::from_vec(2, 2, vec![0u8, 17, 200, 255]).unwrap();
    let plane = RadiometricStretcher::new(Some(3.0))
        .stretch(0, &SampleBuffer::Byte(grid.clone()), Some(&stats(17.0, 200.0)))
        .unwrap();
    assert_eq!(plane, BandPlane::Byte(grid));
}

#[test]
fn test_32_bit_integers_stay_raw() {
    let grid = Grid::from_vec(2, 1, vec![-5i32, 70_000]).unwrap();
    let stretcher = RadiometricStretcher::new(None);
    let stats = stats(-5.0, 70_000.0);

    let plane = stretcher.stretch(0, &SampleBuffer::Int32(grid.clone()), Some(&stats)).unwrap();
    assert_eq!(plane, BandPlane::Int32(grid));
    assert!(plane.as_bytes().is_none());
    assert_eq!(plane.to_display().into_vec(), vec![0, 255]);

    assert_eq!(RadiometricStretcher::rule(0, RasterDataType::UInt32, Some(&stats)).unwrap(), StretchRule::Raw);
    assert_eq!(stretcher.stretch_value(RasterDataType::UInt32, 70_000.0, Some(&stats)).unwrap(), 255);
}

#[test]
fn test_missing_statistics_only_block_linear_rules() {
    let stretcher = RadiometricStretcher::new(None);

    let bytes = Grid::from_vec(2, 1, vec![3u8, 250]).unwrap();
    let plane = stretcher.stretch(0, &SampleBuffer::Byte(bytes.clone()), None).unwrap();
    assert_eq!(plane, BandPlane::Byte(bytes));

    let raw = Grid::from_vec(1, 1, vec![42u32]).unwrap();
    let plane = stretcher.stretch(1, &SampleBuffer::UInt32(raw.clone()), None).unwrap();
    assert_eq!(plane, BandPlane::UInt32(raw));

    let result = stretcher.stretch(2, &SampleBuffer::UInt16(Grid::from_vec(1, 1, vec![9u16]).unwrap()), None);
    assert!(matches!(result, Err(SamplingError::StatisticsUnavailable(2))));
    let result = RadiometricStretcher::rule(3, RasterDataType::Float64, None);
    assert!(matches!(result, Err(SamplingError::StatisticsUnavailable(3))));
}

#[test]
fn test_complex_types_are_unsupported() {
    let result = RadiometricStretcher::rule(2, RasterDataType::CInt16, Some(&stats(0.0, 1.0)));
    assert!(matches!(result,
        Err(SamplingError::UnsupportedRasterFormat { band: 2, data_type: RasterDataType::CInt16 })));

    let result = RadiometricStretcher::new(None).stretch_value(RasterDataType::CFloat32, 0.5, Some(&stats(0.0, 1.0)));
    assert!(matches!(result, Err(SamplingError::UnsupportedRasterFormat { .. })));
}

#[test]
fn test_brightening_scales_and_saturates() {
    assert_eq!(linear(50.0, 0.0, 200.0, None), 63);
    assert_eq!(linear(50.0, 0.0, 200.0, Some(2.0)), 127);
    assert_eq!(linear(150.0, 0.0, 200.0, Some(2.0)), 255);
}

#[test]
fn test_degenerate_inputs() {
    // Constant band: range treated as 1
    assert_eq!(linear(7.0, 7.0, 7.0, None), 0);
    assert_eq!(linear(8.0, 7.0, 7.0, None), 255);
    assert_eq!(linear(f64::NAN, 0.0, 10.0, None), 0);
}

#[test]
fn test_uint16_plane_stretch() {
    let grid = Grid::from_vec(3, 1, vec![50u16, 2050, 4000]).unwrap();
    let plane = RadiometricStretcher::new(None)
        .stretch(0, &SampleBuffer::UInt16(grid), Some(&stats(100.0, 4000.0)))
        .unwrap();
    let bytes = plane.as_bytes().unwrap();
    assert_eq!(bytes.get(0, 0), Some(0));
    assert_eq!(bytes.get(2, 0), Some(255));
}

proptest! {
    #[test]
    fn linear_stretch_is_monotonic(floor in -1000.0f64..1000.0,
                                   range in 0.1f64..5000.0,
                                   a in -10_000.0f64..10_000.0,
                                   b in -10_000.0f64..10_000.0) {
        let max = floor + range;
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(linear(low, floor, max, None) <= linear(high, floor, max, None));
    }

    #[test]
    fn linear_stretch_maps_range_ends(floor in -1000.0f64..1000.0, range in 0.1f64..5000.0) {
        prop_assert_eq!(linear(floor, floor, floor + range, None), 0);
        prop_assert_eq!(linear(floor + range * 2.0, floor, floor + range, None), 255);
    }
}
