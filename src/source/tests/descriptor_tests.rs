//! Tests for descriptor and world file parsing

use std::path::Path;

use approx::assert_abs_diff_eq;

use crate::source::{descriptor_path_for, parse_world_file, RasterDataType, RasterDescriptor};

#[test]
fn test_parse_full_descriptor() {
    let content = r#"
        geotransform = [-122.5, 0.01, 0, 37.8, 0, -0.01]
        backup_bbox = [-122.5, 35.8, -120.5, 37.8]

        [layout]
        width = 200
        height = 100
        bands = 2
        data_type = "UInt16"
        byte_order = "big"

        [[gcp]]
        pixel = 0
        line = 0
        lon = -122.5
        lat = 37.8

        [[gcp]]
        pixel = 200.0
        line = 0.0
        lon = -120.5
        lat = 37.8
    "#;

    let descriptor = RasterDescriptor::from_str(content).unwrap();
    let transform = descriptor.geotransform.unwrap();
    assert_eq!(transform.coefficients, [-122.5, 0.01, 0.0, 37.8, 0.0, -0.01]);

    let backup = descriptor.backup_sector.unwrap();
    assert_eq!(backup.min_lon(), -122.5);
    assert_eq!(backup.min_lat(), 35.8);
    assert_eq!(backup.max_lon(), -120.5);
    assert_eq!(backup.max_lat(), 37.8);

    assert_eq!(descriptor.gcps.len(), 2);
    assert_eq!(descriptor.gcps[1].pixel, 200.0);

    let layout = descriptor.layout.unwrap();
    assert_eq!((layout.width, layout.height, layout.bands), (200, 100, 2));
    assert_eq!(layout.data_type, RasterDataType::UInt16);
    assert!(layout.big_endian);
}

#[test]
fn test_empty_descriptor() {
    let descriptor = RasterDescriptor::from_str("").unwrap();
    assert!(descriptor.geotransform.is_none());
    assert!(descriptor.gcps.is_empty());
    assert!(descriptor.layout.is_none());
}

#[test]
fn test_invalid_descriptors() {
    assert!(RasterDescriptor::from_str("geotransform = [1, 2, 3]").is_err());
    assert!(RasterDescriptor::from_str("[layout]\nwidth = 10\nheight = 10").is_err());
    assert!(RasterDescriptor::from_str("[layout]\nwidth = 0\nheight = 10\ndata_type = \"byte\"").is_err());
    assert!(RasterDescriptor::from_str("[[gcp]]\npixel = 1\nline = 2\nlon = 3").is_err());
    assert!(RasterDescriptor::from_str("not = [valid").is_err());
}

#[test]
fn test_descriptor_path() {
    let path = descriptor_path_for(Path::new("/data/scene.png"));
    assert_eq!(path, Path::new("/data/scene.png.geo.toml"));
}

#[test]
fn test_world_file_shifts_to_pixel_corner() {
    let content = "0.01\n0.0\n0.0\n-0.01\n-122.495\n37.795\n";
    let transform = parse_world_file(content).unwrap();

    assert_abs_diff_eq!(transform.coefficients[0], -122.5, epsilon = 1e-12);
    assert_abs_diff_eq!(transform.coefficients[3], 37.8, epsilon = 1e-12);
    assert_eq!(transform.coefficients[1], 0.01);
    assert_eq!(transform.coefficients[5], -0.01);
}

#[test]
fn test_world_file_needs_six_values() {
    assert!(parse_world_file("1\n2\n3\n").is_err());
    assert!(parse_world_file("1\n2\n3\n4\n5\nsix\n").is_err());
}
