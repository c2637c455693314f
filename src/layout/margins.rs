/// Blank insets around the printable area of a page, in pixels. Nothing stops content
/// from being painted into the margins; they only steer where the grid is placed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: u32, right: u32, bottom: u32, left: u32) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all(value: u32) -> Margins {
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: u32, horizontal: u32) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Width left over once the side margins are taken from `width`
    pub fn inner_width(&self, width: u32) -> u32 {
        width.saturating_sub(self.left + self.right)
    }

    /// Height left over once the top and bottom margins are taken from `height`
    pub fn inner_height(&self, height: u32) -> u32 {
        height.saturating_sub(self.top + self.bottom)
    }
}
