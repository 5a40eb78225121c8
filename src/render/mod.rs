mod svg;

use geo::Rect;

use crate::{geom::FeatureCollection, style::ShapeStyle};

pub use svg::SvgRenderer;

/// Opaque handle to a mounted layer. Not `Clone`: whoever holds it owns the layer.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct LayerHandle(u64);

impl LayerHandle {
    pub fn new(id: u64) -> Self { Self(id) }

    #[inline] pub fn id(&self) -> u64 { self.0 }
}

/// The map-drawing capability: render a shape collection with per-shape
/// styles, update those styles in place, and move the camera.
pub trait MapRenderer {
    /// Draw `features`; `styles[i]` paints `features.get(i)`.
    fn mount(&mut self, features: &FeatureCollection, styles: &[ShapeStyle]) -> LayerHandle;

    /// Remove a mounted layer.
    fn unmount(&mut self, handle: LayerHandle);

    /// Replace the styles of a mounted layer without touching its geometry.
    fn restyle(&mut self, handle: &LayerHandle, styles: &[ShapeStyle]);

    /// Fit the viewport to `bounds` (lon/lat) with `padding` pixels on each side.
    fn fit_bounds(&mut self, bounds: Rect<f64>, padding: f64);
}

impl<R: MapRenderer + ?Sized> MapRenderer for &mut R {
    fn mount(&mut self, features: &FeatureCollection, styles: &[ShapeStyle]) -> LayerHandle {
        (**self).mount(features, styles)
    }

    fn unmount(&mut self, handle: LayerHandle) { (**self).unmount(handle) }

    fn restyle(&mut self, handle: &LayerHandle, styles: &[ShapeStyle]) { (**self).restyle(handle, styles) }

    fn fit_bounds(&mut self, bounds: Rect<f64>, padding: f64) { (**self).fit_bounds(bounds, padding) }
}
