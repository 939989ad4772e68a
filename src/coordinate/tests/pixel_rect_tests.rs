//! Tests for pixel rectangles

use crate::coordinate::PixelRect;

#[test]
fn test_new_orders_corners() {
    let rect = PixelRect::new(10, 20, 5, 2);
    assert_eq!(rect, PixelRect { x1: 5, y1: 2, x2: 10, y2: 20 });
    assert_eq!(rect.width(), 5);
    assert_eq!(rect.height(), 18);
}

#[test]
fn test_covering_snaps_edges() {
    let rect = PixelRect::covering(49.9999999999, 50.0000000001, 150.0000000001, 99.9999999999);
    assert_eq!(rect, PixelRect::new(50, 50, 150, 100));

    let rect = PixelRect::covering(10.4, 3.2, 20.6, 7.0);
    assert_eq!(rect, PixelRect::new(10, 3, 21, 7));
}

#[test]
fn test_pad_and_clamp() {
    let rect = PixelRect::new(0, 5, 100, 50).padded(1);
    assert_eq!(rect, PixelRect::new(-1, 4, 101, 51));

    let clamped = rect.clamped(100, 40);
    assert_eq!(clamped, PixelRect::new(0, 4, 100, 40));
    assert!(clamped.fits_within(100, 40));
    assert!(!rect.fits_within(100, 40));
}

#[test]
fn test_empty_after_clamp() {
    let rect = PixelRect::new(150, 150, 180, 180).clamped(100, 100);
    assert!(rect.is_empty());
    assert!(!PixelRect::full(3, 3).is_empty());
}
