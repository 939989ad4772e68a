//! Tests for transform resolution and publication

use std::sync::Mutex;

use approx::assert_abs_diff_eq;

use crate::coordinate::{AffineTransform, CoordinateTransform, GroundControlPoint, Sector};
use crate::fitter::{PolynomialFitter, TransformFitter};
use crate::sampler::errors::{SamplingError, SamplingResult};
use crate::sampler::footprint::FootprintFinder;
use crate::sampler::resolver::{TransformCell, TransformResolver};

use super::test_utils::reference_affine;

/// Fitter that records the points it was given and returns a fixed transform
struct RecordingFitter {
    calls: Mutex<Vec<Vec<GroundControlPoint>>>,
}

impl RecordingFitter {
    fn new() -> Self {
        RecordingFitter { calls: Mutex::new(Vec::new()) }
    }
}

impl TransformFitter for RecordingFitter {
    fn fit_best_fit(&self, gcps: &[GroundControlPoint]) -> SamplingResult<CoordinateTransform> {
        self.calls.lock().unwrap().push(gcps.to_vec());
        Ok(CoordinateTransform::Affine(reference_affine()))
    }
}

fn warped_gcps() -> Vec<GroundControlPoint> {
    let mut gcps = Vec::new();
    for i in 0..3 {
        for j in 0..3 {
            let (x, y) = (i as f64 * 100.0, j as f64 * 100.0);
            gcps.push(GroundControlPoint::new(x, y, 10.0 + 0.001 * x + 1e-8 * x * y, 45.0 - 0.001 * y + 1e-8 * x * x));
        }
    }
    gcps
}

fn backup() -> Sector {
    Sector::new(35.8, 37.8, -122.5, -120.5).unwrap()
}

#[test]
fn test_gcps_take_priority() {
    let fitter = RecordingFitter::new();
    let gcps = warped_gcps();
    TransformResolver::new(&fitter)
        .resolve(&gcps, &reference_affine(), Some(&backup()), 200, 200)
        .unwrap();

    let calls = fitter.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], gcps);
}

#[test]
fn test_gcps_fit_polynomial() {
    let fitter = PolynomialFitter::default();
    let transform = TransformResolver::new(&fitter)
        .resolve(&warped_gcps(), &AffineTransform::identity(), None, 200, 200)
        .unwrap();
    assert_eq!(transform.order(), 2);
}

#[test]
fn test_two_row_gcp_grid_resolves() {
    let mut gcps = Vec::new();
    for &x in &[0.0, 100.0, 200.0] {
        for &y in &[0.0, 200.0] {
            let (lon, lat) = reference_affine().forward(x, y);
            gcps.push(GroundControlPoint::new(x, y, lon, lat));
        }
    }

    let fitter = PolynomialFitter::default();
    let transform = TransformResolver::new(&fitter)
        .resolve(&gcps, &AffineTransform::identity(), None, 200, 200)
        .unwrap();
    assert_eq!(transform.order(), 1);
    assert!(transform.is_north_up());
}

#[test]
fn test_native_affine_synthesizes_corners() {
    let fitter = RecordingFitter::new();
    TransformResolver::new(&fitter)
        .resolve(&[], &reference_affine(), None, 200, 100)
        .unwrap();

    let calls = fitter.calls.lock().unwrap();
    let corners = &calls[0];
    assert_eq!(corners.len(), 3);
    assert_eq!((corners[0].pixel, corners[0].line), (0.0, 0.0));
    assert_eq!((corners[1].pixel, corners[1].line), (200.0, 0.0));
    assert_eq!((corners[2].pixel, corners[2].line), (0.0, 100.0));
    assert_abs_diff_eq!(corners[1].lon, -120.5, epsilon = 1e-9);
    assert_abs_diff_eq!(corners[2].lat, 36.8, epsilon = 1e-9);
}

#[test]
fn test_native_affine_is_reproduced() {
    let fitter = PolynomialFitter::default();
    let transform = TransformResolver::new(&fitter)
        .resolve(&[], &reference_affine(), None, 200, 200)
        .unwrap();

    let affine = transform.as_affine().unwrap();
    assert!(affine.is_north_up());
    for (actual, expected) in affine.coefficients.iter().zip(reference_affine().coefficients.iter()) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = 1e-9);
    }
}

#[test]
fn test_too_few_gcps_fall_back_to_affine() {
    let fitter = RecordingFitter::new();
    let gcps = vec![GroundControlPoint::new(0.0, 0.0, 1.0, 1.0), GroundControlPoint::new(5.0, 5.0, 2.0, 2.0)];
    TransformResolver::new(&fitter)
        .resolve(&gcps, &reference_affine(), None, 200, 200)
        .unwrap();

    let calls = fitter.calls.lock().unwrap();
    assert_eq!(calls[0][0].lon, -122.5);
}

#[test]
fn test_identity_affine_uses_backup_sector() {
    let fitter = PolynomialFitter::default();
    let transform = TransformResolver::new(&fitter)
        .resolve(&[], &AffineTransform::identity(), Some(&backup()), 200, 200)
        .unwrap();

    let (lon, lat) = transform.forward(0.0, 0.0);
    assert_abs_diff_eq!(lon, -122.5, epsilon = 1e-9);
    assert_abs_diff_eq!(lat, 37.8, epsilon = 1e-9);
    let (lon, lat) = transform.forward(200.0, 200.0);
    assert_abs_diff_eq!(lon, -120.5, epsilon = 1e-9);
    assert_abs_diff_eq!(lat, 35.8, epsilon = 1e-9);
}

#[test]
fn test_zero_affine_uses_backup_sector() {
    let fitter = PolynomialFitter::default();
    let transform = TransformResolver::new(&fitter)
        .resolve(&[], &AffineTransform::new([0.0; 6]), Some(&backup()), 100, 100)
        .unwrap();
    assert!(transform.is_north_up());
}

#[test]
fn test_origin_affine_is_not_absent() {
    // Maps pixel (0, 0) onto (0, 0) but is a real georeference
    let affine = AffineTransform::north_up(0.0, 0.0, 0.5, -0.5);
    let fitter = PolynomialFitter::default();
    let transform = TransformResolver::new(&fitter)
        .resolve(&[], &affine, Some(&backup()), 100, 100)
        .unwrap();

    let (lon, lat) = transform.forward(100.0, 100.0);
    assert_abs_diff_eq!(lon, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(lat, -50.0, epsilon = 1e-9);
}

#[test]
fn test_no_georeference_is_degenerate() {
    let fitter = PolynomialFitter::default();
    let result = TransformResolver::new(&fitter).resolve(&[], &AffineTransform::identity(), None, 200, 200);
    assert!(matches!(result, Err(SamplingError::DegenerateTransform(_))));

    let result = TransformResolver::new(&fitter).resolve(&[], &AffineTransform::new([0.0; 6]), None, 200, 200);
    assert!(matches!(result, Err(SamplingError::DegenerateTransform(_))));
}

#[test]
fn test_cell_publishes_new_versions() {
    let cell = TransformCell::new(CoordinateTransform::Affine(reference_affine()),
                                  FootprintFinder::default(), 200, 200).unwrap();
    let first = cell.snapshot();
    assert_eq!(first.version, 1);
    assert_abs_diff_eq!(first.footprint.min_lon(), -122.5, epsilon = 1e-9);

    let shifted = AffineTransform::north_up(10.0, 50.0, 0.01, -0.01);
    let version = cell.publish(CoordinateTransform::Affine(shifted)).unwrap();
    assert_eq!(version, 2);

    let second = cell.snapshot();
    assert_eq!(second.version, 2);
    assert_abs_diff_eq!(second.footprint.min_lon(), 10.0, epsilon = 1e-9);

    // Earlier snapshots are unaffected
    assert_eq!(first.version, 1);
    assert_abs_diff_eq!(first.footprint.min_lon(), -122.5, epsilon = 1e-9);
}
