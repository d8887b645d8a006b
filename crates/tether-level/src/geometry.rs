//! Plain geometry records shared by the level sections.

/// A point in world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position (grows downwards).
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle: top-left corner plus size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle with the given top-left corner and size vector.
    pub const fn from_vecs(position: Point, size: Point) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }
}

/// RGBA colour, components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Create a colour.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgba(0.0, 0.0, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vecs_matches_new() {
        let r = Rect::from_vecs(Point::new(1.0, 2.0), Point::new(3.0, 4.0));
        assert_eq!(r, Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn default_colour_is_opaque_black() {
        assert_eq!(Color::default(), Color::rgba(0.0, 0.0, 0.0, 1.0));
    }
}
