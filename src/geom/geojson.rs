use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Value};

use super::features::{Feature, FeatureCollection, Properties};

impl FeatureCollection {
    /// Read a FeatureCollection from GeoJSON bytes.
    pub fn from_geojson_bytes(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).context("[geojson] Failed to parse GeoJSON bytes")?;
        Self::from_geojson_value(&value)
    }

    /// Read a FeatureCollection from a GeoJSON string.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("[geojson] Failed to parse GeoJSON text")?;
        Self::from_geojson_value(&value)
    }

    /// Read a FeatureCollection from a parsed GeoJSON value.
    /// A bare Feature is accepted as a one-element collection.
    pub fn from_geojson_value(value: &Value) -> Result<Self> {
        match value["type"].as_str() {
            Some("FeatureCollection") => {
                let features = value["features"].as_array()
                    .ok_or_else(|| anyhow!("[geojson] FeatureCollection has no features array"))?;
                features.iter().enumerate()
                    .map(|(idx, feature)| parse_feature(feature)
                        .with_context(|| format!("[geojson] Invalid feature at index {idx}")))
                    .collect::<Result<Vec<_>>>()
                    .map(FeatureCollection::new)
            }
            Some("Feature") => Ok(FeatureCollection::new(vec![parse_feature(value)?])),
            Some(other) => bail!("[geojson] Expected a FeatureCollection, found type {other:?}"),
            None => match value.get("error") {
                Some(err) => bail!("[geojson] Service returned an error: {err}"),
                None => bail!("[geojson] Missing \"type\" member"),
            },
        }
    }

    /// Export as a GeoJSON FeatureCollection value.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self.iter().map(Feature::to_geojson).collect::<Vec<_>>(),
        })
    }
}

impl Feature {
    /// Export as a GeoJSON Feature value with a MultiPolygon geometry.
    pub fn to_geojson(&self) -> Value {
        let mut feature = json!({
            "type": "Feature",
            "geometry": if self.shape.0.is_empty() { Value::Null } else { multipolygon_to_geojson(&self.shape) },
            "properties": Value::Object(self.properties.clone()),
        });
        if let Some(id) = &self.id {
            feature["id"] = id.clone();
        }
        feature
    }
}

fn parse_feature(value: &Value) -> Result<Feature> {
    let properties = match &value["properties"] {
        Value::Object(map) => map.clone(),
        Value::Null => Properties::new(),
        other => bail!("properties must be an object, found {other}"),
    };

    let shape = match &value["geometry"] {
        Value::Null => MultiPolygon(vec![]),
        geometry => parse_geometry(geometry)?,
    };

    Ok(Feature { id: value.get("id").cloned(), shape, properties })
}

/// Normalize Polygon and MultiPolygon geometries to a MultiPolygon.
/// Other geometry types carry no area and become empty shapes.
fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let coords = &geometry["coordinates"];
    match geometry["type"].as_str() {
        Some("Polygon") => {
            let rings = coords.as_array().ok_or_else(|| anyhow!("Polygon coordinates must be an array"))?;
            Ok(MultiPolygon(vec![parse_polygon(rings)?]))
        }
        Some("MultiPolygon") => {
            let polygons = coords.as_array().ok_or_else(|| anyhow!("MultiPolygon coordinates must be an array"))?;
            polygons.iter()
                .filter_map(|p| p.as_array())
                .filter(|rings| !rings.is_empty())
                .map(|rings| parse_polygon(rings))
                .collect::<Result<Vec<_>>>()
                .map(MultiPolygon)
        }
        Some("GeometryCollection") => {
            let mut polygons = Vec::new();
            for member in geometry["geometries"].as_array().into_iter().flatten() {
                polygons.extend(parse_geometry(member)?.0);
            }
            Ok(MultiPolygon(polygons))
        }
        _ => Ok(MultiPolygon(vec![])),
    }
}

/// Parse `[exterior, hole, hole, ...]` into a Polygon.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let exterior = rings.first()
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))?;

    let interiors = rings[1..].iter()
        .filter_map(|ring| ring.as_array())
        .map(|ring| parse_ring_coords(ring))
        .collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(parse_ring_coords(exterior)?, interiors))
}

/// Parse a ring (exterior or interior) from GeoJSON coordinates.
/// Format: [[x, y], [x, y], ...]
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());

    for coord_pair in coords {
        if let Some(coord_array) = coord_pair.as_array() {
            if coord_array.len() >= 2 {
                let x = coord_array[0].as_f64()
                    .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
                let y = coord_array[1].as_f64()
                    .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
                points.push(Coord { x, y });
            }
        }
    }

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}

/// Helper to convert a MultiPolygon to a serde_json::Value representing GeoJSON Geometry.
fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let polygons: Vec<Vec<Vec<[f64; 2]>>> = mp.0.iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
                .collect()
        })
        .collect();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}
