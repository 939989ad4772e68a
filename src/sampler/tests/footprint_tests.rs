//! Tests for footprint computation

use approx::assert_abs_diff_eq;

use crate::coordinate::{
    AffineTransform, CoordinateTransform, Normalization, PolynomialMapping, PolynomialTransform,
};
use crate::sampler::footprint::{FootprintFinder, DEFAULT_PROBE_STEPS};

use super::test_utils::reference_affine;

/// Order-2 transform whose horizontal edges bulge by `a * x * (w - x)` in latitude
fn bulging_transform(width: f64, a: f64) -> CoordinateTransform {
    let mapping = PolynomialMapping {
        order: 2,
        normalization: Normalization::identity(),
        x_coefficients: vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        y_coefficients: vec![0.0, a * width, 1.0, -a, 0.0, 0.0],
    };
    CoordinateTransform::Polynomial(PolynomialTransform { forward: mapping.clone(), reverse: mapping })
}

#[test]
fn test_north_up_footprint_is_exact() {
    let footprint = FootprintFinder::default()
        .footprint(&CoordinateTransform::Affine(reference_affine()), 200, 200)
        .unwrap();

    assert_abs_diff_eq!(footprint.min_lon(), -122.5, epsilon = 1e-9);
    assert_abs_diff_eq!(footprint.max_lon(), -120.5, epsilon = 1e-9);
    assert_abs_diff_eq!(footprint.min_lat(), 35.8, epsilon = 1e-9);
    assert_abs_diff_eq!(footprint.max_lat(), 37.8, epsilon = 1e-9);
}

#[test]
fn test_rotated_footprint_covers_corners() {
    let affine = AffineTransform::new([0.0, 0.01, 0.001, 0.0, 0.001, -0.01]);
    let footprint = FootprintFinder::default()
        .footprint(&CoordinateTransform::Affine(affine), 100, 100)
        .unwrap();

    assert_abs_diff_eq!(footprint.min_lon(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(footprint.max_lon(), 1.1, epsilon = 1e-9);
    assert_abs_diff_eq!(footprint.min_lat(), -1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(footprint.max_lat(), 0.1, epsilon = 1e-9);
}

#[test]
fn test_probing_finds_edge_bulge() {
    let transform = bulging_transform(100.0, 0.001);
    let footprint = FootprintFinder::new(DEFAULT_PROBE_STEPS).footprint(&transform, 100, 100).unwrap();

    // The y = 100 edge peaks at x = 50, 0.001 * 50 * 50 = 2.5 past the corners
    assert_abs_diff_eq!(footprint.min_lat(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(footprint.max_lat(), 102.5, epsilon = 1e-9);
}

#[test]
fn test_coarse_probing_underestimates_bulge() {
    // Known limit: with one step per edge only the corners are probed
    let transform = bulging_transform(100.0, 0.001);
    let footprint = FootprintFinder::new(1).footprint(&transform, 100, 100).unwrap();
    assert_abs_diff_eq!(footprint.max_lat(), 100.0, epsilon = 1e-9);
}

#[test]
fn test_probe_steps_are_at_least_one() {
    assert_eq!(FootprintFinder::new(0).probe_steps(), 1);
    assert_eq!(FootprintFinder::default().probe_steps(), 10);
}
