#![allow(dead_code)]

use geo::{polygon, MultiPolygon, Rect};
use geodrill::{
    BoundaryLevel, Feature, FeatureCollection, LayerHandle, MapRenderer, MemoryGeometrySource, Properties, ShapeStyle,
};
use serde_json::json;

/// One call made on the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Mount { id: u64, features: usize },
    Unmount { id: u64 },
    Restyle { id: u64, styles: Vec<ShapeStyle> },
    Fit { bounds: Rect<f64> },
}

/// Renderer that records every call and tracks which layers are live.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_id: u64,
    pub ops: Vec<Op>,
    pub live: Vec<u64>,
}

impl RecordingRenderer {
    pub fn mounts(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Mount { .. })).count()
    }

    pub fn fits(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Fit { .. })).count()
    }
}

impl MapRenderer for RecordingRenderer {
    fn mount(&mut self, features: &FeatureCollection, _styles: &[ShapeStyle]) -> LayerHandle {
        self.next_id += 1;
        self.ops.push(Op::Mount { id: self.next_id, features: features.len() });
        self.live.push(self.next_id);
        LayerHandle::new(self.next_id)
    }

    fn unmount(&mut self, handle: LayerHandle) {
        self.ops.push(Op::Unmount { id: handle.id() });
        self.live.retain(|&id| id != handle.id());
    }

    fn restyle(&mut self, handle: &LayerHandle, styles: &[ShapeStyle]) {
        self.ops.push(Op::Restyle { id: handle.id(), styles: styles.to_vec() });
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>, _padding: f64) {
        self.ops.push(Op::Fit { bounds });
    }
}

/// A one-degree square at `(x, y)` whose name sits under `key`, plus extra properties.
pub fn square(key: &str, name: &str, x: f64, y: f64, extra: serde_json::Value) -> Feature {
    let mut props = Properties::new();
    props.insert(key.into(), json!(name));
    if let serde_json::Value::Object(extra) = extra {
        props.extend(extra);
    }
    let shape = polygon![(x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0)];
    Feature::new(MultiPolygon(vec![shape]), props)
}

pub fn row(key: &str, names: &[&str], y: f64) -> FeatureCollection {
    names.iter().enumerate()
        .map(|(i, name)| square(key, name, 70.0 + i as f64, y, json!({})))
        .collect()
}

pub fn states() -> FeatureCollection {
    row("ST_NM", &["Punjab", "Haryana", "Uttar Pradesh"], 30.0)
}

pub fn punjab_districts() -> FeatureCollection {
    row("DISTRICT", &["Amritsar", "Ludhiana", "Moga"], 31.0)
}

pub fn haryana_districts() -> FeatureCollection {
    row("dtname", &["Ambala", "Karnal"], 29.0)
}

/// Amritsar's tehsils, with soil values under short codes.
pub fn amritsar_tehsils() -> FeatureCollection {
    FeatureCollection::new(vec![
        square("TEHSIL", "Ajnala", 74.0, 31.5, json!({"N": 80.0, "ph": 6.0})),
        square("TEHSIL", "Tarn Taran", 75.0, 31.5, json!({"N": 260.0, "ph": 7.0})),
        square("sub_dist", "Baba Bakala", 76.0, 31.5, json!({"ph": "8.1"})),
    ])
}

pub fn source() -> MemoryGeometrySource {
    let mut source = MemoryGeometrySource::new();
    source
        .insert(BoundaryLevel::State, &[], states())
        .insert(BoundaryLevel::District, &["Punjab"], punjab_districts())
        .insert(BoundaryLevel::District, &["Haryana"], haryana_districts())
        .insert(BoundaryLevel::District, &["Uttar Pradesh"], FeatureCollection::default())
        .insert(BoundaryLevel::Subdistrict, &["Punjab", "Amritsar"], amritsar_tehsils());
    source
}

pub fn props(key: &str, name: &str) -> Properties {
    let mut props = Properties::new();
    props.insert(key.into(), json!(name));
    props
}
