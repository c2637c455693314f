/// A rectangle in raster space, specified by two opposite corners. (0, 0) is the
/// top-left pixel of the page; `x2` and `y2` are exclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Rect {
    /// The x-coordinate of the top-left corner.
    pub x1: u32,
    /// The y-coordinate of the top-left corner.
    pub y1: u32,
    /// The x-coordinate of the bottom-right corner.
    pub x2: u32,
    /// The y-coordinate of the bottom-right corner.
    pub y2: u32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and its size
    pub fn from_origin(x: u32, y: u32, width: u32, height: u32) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Whether the rectangle lies entirely within a `width` x `height` raster
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x2 <= width && self.y2 <= height
    }
}
