use super::color::Rgb;

/// Paint properties of one rendered shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub stroke: Rgb,
    pub weight: f64,
    pub fill: Rgb,
    pub fill_opacity: f64,
}

impl ShapeStyle {
    /// Plain boundary style used when no attribute is selected.
    pub const BOUNDARY: ShapeStyle = ShapeStyle {
        stroke: Rgb::from_u32(0x2e7d32),
        weight: 2.0,
        fill: Rgb::from_u32(0x81c784),
        fill_opacity: 0.4,
    };

    /// Choropleth style: white outlines, fill from the attribute class.
    pub const fn choropleth(fill: Rgb) -> ShapeStyle {
        ShapeStyle { stroke: Rgb::WHITE, weight: 2.0, fill, fill_opacity: 0.7 }
    }

    /// Highlight applied while the pointer is over a shape.
    pub const fn hovered(self) -> ShapeStyle {
        ShapeStyle {
            stroke: Rgb::from_u32(0x1b9e20),
            weight: 3.0,
            fill: self.fill,
            fill_opacity: 0.6,
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self { Self::BOUNDARY }
}
