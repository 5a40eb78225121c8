use geo::Rect;
use geodrill_core::{FeatureCollection, LayerHandle, MapRenderer, ShapeStyle};
use serde::Serialize;
use serde_json::Value;

/// Style in the option names browser map libraries use.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsStyle {
    color: String,
    weight: f64,
    fill_color: String,
    fill_opacity: f64,
}

impl From<&ShapeStyle> for JsStyle {
    fn from(style: &ShapeStyle) -> Self {
        Self {
            color: style.stroke.to_string(),
            weight: style.weight,
            fill_color: style.fill.to_string(),
            fill_opacity: style.fill_opacity,
        }
    }
}

/// A drawing instruction for the host page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum RenderOp {
    Mount { id: u64, geojson: Value, styles: Vec<JsStyle> },
    Unmount { id: u64 },
    Restyle { id: u64, styles: Vec<JsStyle> },
    FitBounds { bounds: [f64; 4], padding: f64 }, // [min_lon, min_lat, max_lon, max_lat]
}

/// Renderer that queues drawing instructions for JS to replay in order.
#[derive(Debug, Default)]
pub(crate) struct OpsRenderer {
    next_id: u64,
    ops: Vec<RenderOp>,
}

impl OpsRenderer {
    pub(crate) fn take_ops(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.ops)
    }
}

fn js_styles(styles: &[ShapeStyle]) -> Vec<JsStyle> {
    styles.iter().map(JsStyle::from).collect()
}

impl MapRenderer for OpsRenderer {
    fn mount(&mut self, features: &FeatureCollection, styles: &[ShapeStyle]) -> LayerHandle {
        self.next_id += 1;
        self.ops.push(RenderOp::Mount { id: self.next_id, geojson: features.to_geojson(), styles: js_styles(styles) });
        LayerHandle::new(self.next_id)
    }

    fn unmount(&mut self, handle: LayerHandle) {
        self.ops.push(RenderOp::Unmount { id: handle.id() });
    }

    fn restyle(&mut self, handle: &LayerHandle, styles: &[ShapeStyle]) {
        self.ops.push(RenderOp::Restyle { id: handle.id(), styles: js_styles(styles) });
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>, padding: f64) {
        let (min, max) = (bounds.min(), bounds.max());
        self.ops.push(RenderOp::FitBounds { bounds: [min.x, min.y, max.x, max.y], padding });
    }
}
