//! Tests for the image and raw loaders

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

use crate::source::{load_image_raster, load_raw_raster, read_bands, split_bands};
use crate::source::{RasterDataType, RasterSource, RawLayout};

/// Fresh scratch directory for one test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("geotile_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_read_bands_little_endian_int16() {
    let mut bytes = Vec::new();
    for v in [-5i16, 0, 7, 300, -32768, 32767] {
        bytes.write_i16::<LittleEndian>(v).unwrap();
    }
    let layout = RawLayout { width: 3, height: 2, bands: 1, data_type: RasterDataType::Int16, big_endian: false };

    let bands = read_bands::<LittleEndian, _>(&mut Cursor::new(bytes), &layout).unwrap();
    assert_eq!(bands.len(), 1);
    assert_eq!(bands[0].value_f64(0, 0), Some(-5.0));
    assert_eq!(bands[0].value_f64(0, 1), Some(300.0));
    assert_eq!(bands[0].value_f64(2, 1), Some(32767.0));
}

#[test]
fn test_read_bands_big_endian_two_float_bands() {
    let mut bytes = Vec::new();
    for v in [1.5f32, 2.5, 3.5, 4.5, 10.0, 20.0, 30.0, 40.0] {
        bytes.write_f32::<BigEndian>(v).unwrap();
    }
    let layout = RawLayout { width: 2, height: 2, bands: 2, data_type: RasterDataType::Float32, big_endian: true };

    let bands = read_bands::<BigEndian, _>(&mut Cursor::new(bytes), &layout).unwrap();
    assert_eq!(bands.len(), 2);
    assert_eq!(bands[0].value_f64(1, 1), Some(4.5));
    assert_eq!(bands[1].value_f64(0, 0), Some(10.0));
}

#[test]
fn test_read_bands_short_input_fails() {
    let layout = RawLayout { width: 4, height: 4, bands: 1, data_type: RasterDataType::UInt16, big_endian: false };
    assert!(read_bands::<LittleEndian, _>(&mut Cursor::new(vec![0u8; 10]), &layout).is_err());
}

#[test]
fn test_split_rgb_image() {
    let mut image = RgbImage::new(2, 1);
    image.put_pixel(0, 0, Rgb([10, 20, 30]));
    image.put_pixel(1, 0, Rgb([40, 50, 60]));

    let bands = split_bands(DynamicImage::ImageRgb8(image)).unwrap();
    assert_eq!(bands.len(), 3);
    assert_eq!(bands[0].value_f64(1, 0), Some(40.0));
    assert_eq!(bands[2].value_f64(0, 0), Some(30.0));
    assert_eq!(bands[1].data_type(), RasterDataType::Byte);
}

#[test]
fn test_load_png_with_world_file() {
    let dir = scratch_dir("png_world");
    let path = dir.join("scene.png");
    let image = GrayImage::from_fn(20, 10, |x, y| Luma([(x + y) as u8]));
    image.save(&path).unwrap();
    fs::write(dir.join("scene.pgw"), "0.1\n0\n0\n-0.1\n5.05\n50.95\n").unwrap();

    let (raster, descriptor) = load_image_raster(&path).unwrap();
    assert_eq!((raster.width(), raster.height(), raster.band_count()), (20, 10, 1));
    assert!(descriptor.geotransform.is_none());

    let transform = raster.native_transform();
    assert!((transform.coefficients[0] - 5.0).abs() < 1e-9);
    assert!((transform.coefficients[3] - 51.0).abs() < 1e-9);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_load_raw_with_descriptor() {
    let dir = scratch_dir("raw_descriptor");
    let path = dir.join("scene.raw");

    let mut bytes = Vec::new();
    for v in 0u16..12 {
        bytes.write_u16::<BigEndian>(v * 100).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    fs::write(dir.join("scene.raw.geo.toml"), r#"
        geotransform = [0.0, 1.0, 0.0, 3.0, 0.0, -1.0]

        [layout]
        width = 4
        height = 3
        data_type = "uint16"
        byte_order = "big"
    "#).unwrap();

    let (raster, _) = load_raw_raster(&path).unwrap();
    assert_eq!((raster.width(), raster.height()), (4, 3));
    assert_eq!(raster.data_type(0).unwrap(), RasterDataType::UInt16);
    assert_eq!(raster.native_transform().coefficients[3], 3.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_raw_without_descriptor_fails() {
    let dir = scratch_dir("raw_missing");
    let path = dir.join("orphan.bin");
    fs::write(&path, [0u8; 16]).unwrap();

    assert!(load_raw_raster(&path).is_err());
    let _ = fs::remove_dir_all(&dir);
}
