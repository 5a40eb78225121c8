mod attribute;
mod color;
mod shape;

pub use attribute::{AttributeSelection, AttributeSpec, AttributeStyler, Category, LegendEntry, ATTRIBUTES, NO_DATA};
pub use color::Rgb;
pub use shape::ShapeStyle;
