/// An axis-aligned rectangle in page units. `(x, y)` is the bottom-left
/// corner; page coordinates grow up and to the right.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Uniformly scales both axes.
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Largest size with the same aspect ratio that fits inside `bounds`.
    pub fn scale_to_fit(self, bounds: Size) -> Self {
        if self.width <= 0.0 || self.height <= 0.0 {
            return self;
        }
        let factor = (bounds.width / self.width).min(bounds.height / self.height);
        self.scaled(factor)
    }
}
