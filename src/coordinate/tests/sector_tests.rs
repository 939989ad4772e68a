//! Tests for geographic sectors

use approx::assert_abs_diff_eq;

use crate::coordinate::Sector;
use crate::sampler::SamplingError;

#[test]
fn test_inverted_sector_is_rejected() {
    assert!(Sector::new(10.0, 5.0, 0.0, 1.0).is_err());
    assert!(Sector::new(0.0, 1.0, 3.0, 2.0).is_err());
    assert!(Sector::new(0.0, f64::NAN, 0.0, 1.0).is_err());
}

#[test]
fn test_from_bbox_string() {
    let sector = Sector::from_bbox_string("-122, 36.8, -121, 37.3").unwrap();
    assert_eq!(sector.min_lon(), -122.0);
    assert_eq!(sector.min_lat(), 36.8);
    assert_eq!(sector.max_lon(), -121.0);
    assert_eq!(sector.max_lat(), 37.3);

    assert!(Sector::from_bbox_string("1,2,3").is_err());
    assert!(Sector::from_bbox_string("a,2,3,4").is_err());
}

#[test]
fn test_contains_and_intersects() {
    let outer = Sector::new(35.8, 37.8, -122.5, -120.5).unwrap();
    let inner = Sector::new(36.8, 37.3, -122.0, -121.0).unwrap();
    let straddling = Sector::new(37.0, 38.0, -121.0, -120.0).unwrap();
    let outside = Sector::new(40.0, 41.0, -100.0, -99.0).unwrap();
    let touching = Sector::new(37.8, 38.8, -122.5, -120.5).unwrap();

    assert!(outer.contains(&inner));
    assert!(outer.contains(&outer));
    assert!(!outer.contains(&straddling));
    assert!(outer.intersects(&straddling));
    assert!(!outer.intersects(&outside));
    assert!(!outer.intersects(&touching));
}

#[test]
fn test_intersection() {
    let a = Sector::new(35.8, 37.8, -122.5, -120.5).unwrap();
    let b = Sector::new(37.0, 38.0, -121.0, -120.0).unwrap();

    let overlap = a.intersection(&b).unwrap();
    assert_abs_diff_eq!(overlap.min_lat(), 37.0);
    assert_abs_diff_eq!(overlap.max_lat(), 37.8);
    assert_abs_diff_eq!(overlap.min_lon(), -121.0);
    assert_abs_diff_eq!(overlap.max_lon(), -120.5);
    assert_abs_diff_eq!(overlap.area(), 0.8 * 0.5, epsilon = 1e-12);

    let far = Sector::new(0.0, 1.0, 0.0, 1.0).unwrap();
    assert!(a.intersection(&far).is_none());
}

#[test]
fn test_from_corners_orders_bounds() {
    let sector = Sector::from_corners(37.8, -120.5, 35.8, -122.5).unwrap();
    assert_eq!(sector.min_lat(), 35.8);
    assert_eq!(sector.max_lon(), -120.5);
    assert!(sector.contains_location(-121.0, 36.0));
    assert!(!sector.contains_location(-123.0, 36.0));
}

#[test]
fn test_from_corners_rejects_non_finite() {
    assert!(matches!(Sector::from_corners(f64::NAN, -120.5, 35.8, -122.5),
                     Err(SamplingError::InvalidRequest(_))));
    assert!(Sector::from_corners(37.8, f64::INFINITY, 35.8, -122.5).is_err());
    assert!(Sector::from_corners(37.8, -120.5, 35.8, f64::NEG_INFINITY).is_err());
}
