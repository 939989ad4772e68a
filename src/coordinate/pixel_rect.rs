//! Integer pixel rectangle used for windowed reads
//!
//! Coordinates follow the image convention where (0,0) is the top-left
//! corner. The rectangle is half-open: `x2` and `y2` are the first column
//! and row past the window, so `width() == x2 - x1`.

/// Pixel bounding box for a windowed read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Left column (inclusive)
    pub x1: i64,
    /// Top row (inclusive)
    pub y1: i64,
    /// Right column (exclusive)
    pub x2: i64,
    /// Bottom row (exclusive)
    pub y2: i64,
}

impl PixelRect {
    /// Create a new rectangle, ordering the corners so that `x1 <= x2` and `y1 <= y2`
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        PixelRect {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Rectangle covering a whole raster
    pub fn full(width: u32, height: u32) -> Self {
        PixelRect::new(0, 0, width as i64, height as i64)
    }

    /// Build the window that covers fractional pixel bounds
    ///
    /// The start edges are floored and the end edges are ceiled after
    /// nudging by `1e-9`, so bounds that land on a pixel edge up to
    /// floating-point noise do not pick up an extra row or column.
    pub fn covering(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        const EDGE_SNAP: f64 = 1e-9;
        PixelRect::new(
            (x_min + EDGE_SNAP).floor() as i64,
            (y_min + EDGE_SNAP).floor() as i64,
            (x_max - EDGE_SNAP).ceil() as i64,
            (y_max - EDGE_SNAP).ceil() as i64,
        )
    }

    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }

    /// True if the rectangle contains no pixels
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Grow the rectangle by `pad` pixels on every side
    pub fn padded(&self, pad: i64) -> Self {
        PixelRect::new(self.x1 - pad, self.y1 - pad, self.x2 + pad, self.y2 + pad)
    }

    /// Clamp the rectangle to `[0,width] x [0,height]`
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let w = width as i64;
        let h = height as i64;
        PixelRect {
            x1: self.x1.clamp(0, w),
            y1: self.y1.clamp(0, h),
            x2: self.x2.clamp(0, w),
            y2: self.y2.clamp(0, h),
        }
    }

    /// Check whether the rectangle lies inside a raster of the given size
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x1 >= 0 && self.y1 >= 0 && self.x2 <= width as i64 && self.y2 <= height as i64
    }
}

impl std::fmt::Display for PixelRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}) x [{}, {})", self.x1, self.x2, self.y1, self.y2)
    }
}
