//! Typed 2D sample buffers
//!
//! [`Grid`] is a bounds-checked row-major buffer generic over the sample
//! type, so callers never compute byte offsets from a bytes-per-pixel
//! value. [`SampleBuffer`] tags a grid with the raster numeric format it
//! was read as.

use crate::sampler::errors::{SamplingError, SamplingResult};
use crate::source::RasterDataType;

/// Numeric types a band can be read as
pub trait Sample: Copy + Default + PartialOrd + Send + Sync + 'static {
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(impl Sample for $t {
            fn to_f64(self) -> f64 {
                self as f64
            }
        })*
    };
}

impl_sample!(u8, i16, u16, i32, u32, f32, f64);

/// Row-major 2D buffer with checked access
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Create a grid filled with `T::default()`
    pub fn new(width: u32, height: u32) -> Self {
        Grid::filled(width, height, T::default())
    }

    /// Create a grid filled with `value`
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Grid { width, height, data: vec![value; width as usize * height as usize] }
    }

    /// Wrap existing row-major data
    ///
    /// # Returns
    /// The grid, or an error if `data.len() != width * height`
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> SamplingResult<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(SamplingError::GenericError(format!(
                "Buffer of {} samples does not match {}x{}", data.len(), width, height)));
        }
        Ok(Grid { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Sample at `(x, y)`, or `None` outside the grid
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Write a sample; returns `false` if `(x, y)` is outside the grid
    pub fn set(&mut self, x: u32, y: u32, value: T) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.data[i] = value;
                true
            },
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every sample, keeping the shape
    pub fn map<U: Copy + Default>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|v| f(*v)).collect(),
        }
    }
}

/// A band's samples in their native numeric format
#[derive(Debug, Clone, PartialEq)]
pub enum SampleBuffer {
    Byte(Grid<u8>),
    Int16(Grid<i16>),
    UInt16(Grid<u16>),
    Int32(Grid<i32>),
    UInt32(Grid<u32>),
    Float32(Grid<f32>),
    Float64(Grid<f64>),
}

/// Run `$body` with `$grid` bound to whichever grid the buffer holds
macro_rules! with_grid {
    ($buffer:expr, $grid:ident => $body:expr) => {
        match $buffer {
            SampleBuffer::Byte($grid) => $body,
            SampleBuffer::Int16($grid) => $body,
            SampleBuffer::UInt16($grid) => $body,
            SampleBuffer::Int32($grid) => $body,
            SampleBuffer::UInt32($grid) => $body,
            SampleBuffer::Float32($grid) => $body,
            SampleBuffer::Float64($grid) => $body,
        }
    };
}

/// Rebuild a buffer of the same variant with `$body` producing the new grid
macro_rules! map_grid {
    ($buffer:expr, $grid:ident => $body:expr) => {
        match $buffer {
            SampleBuffer::Byte($grid) => SampleBuffer::Byte($body),
            SampleBuffer::Int16($grid) => SampleBuffer::Int16($body),
            SampleBuffer::UInt16($grid) => SampleBuffer::UInt16($body),
            SampleBuffer::Int32($grid) => SampleBuffer::Int32($body),
            SampleBuffer::UInt32($grid) => SampleBuffer::UInt32($body),
            SampleBuffer::Float32($grid) => SampleBuffer::Float32($body),
            SampleBuffer::Float64($grid) => SampleBuffer::Float64($body),
        }
    };
}

impl SampleBuffer {
    /// Zero-filled buffer of the given format
    ///
    /// # Returns
    /// The buffer, or `None` for formats that cannot be held as samples
    pub fn zeroed(data_type: RasterDataType, width: u32, height: u32) -> Option<Self> {
        let buffer = match data_type {
            RasterDataType::Byte => SampleBuffer::Byte(Grid::new(width, height)),
            RasterDataType::Int16 => SampleBuffer::Int16(Grid::new(width, height)),
            RasterDataType::UInt16 => SampleBuffer::UInt16(Grid::new(width, height)),
            RasterDataType::Int32 => SampleBuffer::Int32(Grid::new(width, height)),
            RasterDataType::UInt32 => SampleBuffer::UInt32(Grid::new(width, height)),
            RasterDataType::Float32 => SampleBuffer::Float32(Grid::new(width, height)),
            RasterDataType::Float64 => SampleBuffer::Float64(Grid::new(width, height)),
            RasterDataType::CInt16 | RasterDataType::CFloat32 => return None,
        };
        Some(buffer)
    }

    pub fn data_type(&self) -> RasterDataType {
        match self {
            SampleBuffer::Byte(_) => RasterDataType::Byte,
            SampleBuffer::Int16(_) => RasterDataType::Int16,
            SampleBuffer::UInt16(_) => RasterDataType::UInt16,
            SampleBuffer::Int32(_) => RasterDataType::Int32,
            SampleBuffer::UInt32(_) => RasterDataType::UInt32,
            SampleBuffer::Float32(_) => RasterDataType::Float32,
            SampleBuffer::Float64(_) => RasterDataType::Float64,
        }
    }

    pub fn width(&self) -> u32 {
        with_grid!(self, g => g.width())
    }

    pub fn height(&self) -> u32 {
        with_grid!(self, g => g.height())
    }

    /// Sample at `(x, y)` widened to `f64`
    pub fn value_f64(&self, x: u32, y: u32) -> Option<f64> {
        with_grid!(self, g => g.get(x, y).map(Sample::to_f64))
    }

    /// Copy samples from `self` into a new buffer of the same format
    ///
    /// `pick(x, y)` returns the source coordinate for output `(x, y)`, or
    /// `None` to leave the output sample at zero.
    pub fn remap(&self, width: u32, height: u32, pick: impl Fn(u32, u32) -> Option<(u32, u32)>) -> SampleBuffer {
        map_grid!(self, g => remap_grid(g, width, height, &pick))
    }

    /// Reverse the column order, the row order, or both
    pub fn mirrored(&self, columns: bool, rows: bool) -> SampleBuffer {
        let (width, height) = (self.width(), self.height());
        self.remap(width, height, |i, j| {
            let x = if columns { width - 1 - i } else { i };
            let y = if rows { height - 1 - j } else { j };
            Some((x, y))
        })
    }
}

fn remap_grid<T: Copy + Default>(
    source: &Grid<T>,
    width: u32,
    height: u32,
    pick: &impl Fn(u32, u32) -> Option<(u32, u32)>,
) -> Grid<T> {
    let mut out = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if let Some(value) = pick(x, y).and_then(|(sx, sy)| source.get(sx, sy)) {
                out.set(x, y, value);
            }
        }
    }
    out
}
