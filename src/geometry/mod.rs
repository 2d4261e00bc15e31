//! Box geometry in image and grid-cell space.

mod iou;

pub use iou::iou;

/// Axis-aligned box as `{x, y, width, height}`.
///
/// `x`/`y` is the box origin; the rectangle spans `[x, x + width]` by
/// `[y, y + height]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxDimensions {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoxDimensions {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }
}

/// Grid-scaled geometry of one anchor before it is turned into a box.
///
/// `x`/`y` are the predicted center in pixels, `width`/`height` the
/// predicted extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellDimensions {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CellDimensions {
    /// Converts to the box convention consumed by renderers.
    ///
    /// The origin is `(center - size) / 2`, not `center - size / 2`.
    /// Downstream drawing code relies on this exact placement.
    pub fn to_box(self) -> BoxDimensions {
        BoxDimensions {
            x: (self.x - self.width) / 2.0,
            y: (self.y - self.height) / 2.0,
            width: self.width,
            height: self.height,
        }
    }
}
