use serde::Serialize;

use crate::style::{AttributeStyler, Rgb, NO_DATA};
use super::records::FarmRecord;

/// A circle marker for one farm record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lon: f64,
    pub lat: f64,
    #[serde(serialize_with = "serialize_rgb")]
    pub fill: Rgb,
    pub value: Option<f64>,
    pub farmer_id: Option<String>,
}

impl Marker {
    pub const RADIUS: f64 = 6.0;
    pub const FILL_OPACITY: f64 = 0.9;
}

/// Markers for every record with coordinates, colored by `attribute`
/// (no-data gray when the record lacks the value or no attribute is chosen).
pub fn point_overlay(records: &[FarmRecord], styler: &AttributeStyler, attribute: Option<&str>) -> Vec<Marker> {
    let spec = attribute.and_then(|key| styler.spec(key));
    records.iter()
        .filter_map(|record| {
            let (lon, lat) = record.position()?;
            let value = spec.and_then(|spec| record.value(spec.key));
            let fill = spec.map_or(NO_DATA, |spec| styler.color_for(spec.key, value));
            Some(Marker { lon, lat, fill, value, farmer_id: record.farmer_id.clone() })
        })
        .collect()
}

fn serialize_rgb<S: serde::Serializer>(rgb: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(rgb)
}
