//! Choropleth classification of soil attributes.

use serde::Serialize;

use crate::geom::Feature;
use super::color::Rgb;

/// Fill for features whose attribute value is missing or not a finite number.
pub const NO_DATA: Rgb = Rgb::from_u32(0x808080);

const VERY_LOW: Rgb = Rgb::from_u32(0xd73027);
const LOW: Rgb = Rgb::from_u32(0xfc8d59);
const MEDIUM: Rgb = Rgb::from_u32(0xfee08b);
const HIGH: Rgb = Rgb::from_u32(0x1a9850);
const ALKALINE: Rgb = Rgb::from_u32(0x4575b4);

/// One class of an attribute. `upper_bound` is exclusive; `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Category {
    pub upper_bound: Option<f64>,
    pub color: Rgb,
    pub label: &'static str,
}

const fn below(bound: f64, color: Rgb, label: &'static str) -> Category {
    Category { upper_bound: Some(bound), color, label }
}

const fn above(color: Rgb, label: &'static str) -> Category {
    Category { upper_bound: None, color, label }
}

/// A soil attribute that can drive the choropleth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeSpec {
    pub key: &'static str,   // Display key, e.g. "nitrogen"
    pub code: &'static str,  // Short code used in boundary properties, e.g. "N"
    pub label: &'static str,
    pub unit: &'static str,
    pub categories: &'static [Category], // Ascending
}

impl AttributeSpec {
    /// Class of `value`: the first category whose upper bound exceeds it,
    /// else the unbounded top category.
    pub fn classify(&self, value: f64) -> Option<&Category> {
        if !value.is_finite() { return None }
        self.categories.iter()
            .find(|c| c.upper_bound.is_none_or(|bound| value < bound))
            .or_else(|| self.categories.last())
    }

    fn range_text(&self, lower: Option<f64>, upper: Option<f64>) -> String {
        let unit = match self.unit {
            "" => String::new(),
            "%" => "%".to_string(),
            other => format!(" {other}"),
        };
        match (lower, upper) {
            (None, Some(hi)) => format!("< {hi}{unit}"),
            (Some(lo), Some(hi)) => format!("{lo} - {hi}{unit}"),
            (Some(lo), None) => format!("> {lo}{unit}"),
            (None, None) => "all values".to_string(),
        }
    }
}

pub const ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec {
        key: "nitrogen", code: "N", label: "Nitrogen (N)", unit: "kg/ha",
        categories: &[below(75.0, VERY_LOW, "Very Low"), below(150.0, LOW, "Low"), below(225.0, MEDIUM, "Medium"), above(HIGH, "High")],
    },
    AttributeSpec {
        key: "phosphorus", code: "P", label: "Phosphorus (P)", unit: "kg/ha",
        categories: &[below(35.0, VERY_LOW, "Very Low"), below(75.0, LOW, "Low"), below(110.0, MEDIUM, "Medium"), above(HIGH, "High")],
    },
    AttributeSpec {
        key: "potassium", code: "K", label: "Potassium (K)", unit: "kg/ha",
        categories: &[below(100.0, VERY_LOW, "Very Low"), below(200.0, LOW, "Low"), below(300.0, MEDIUM, "Medium"), above(HIGH, "High")],
    },
    AttributeSpec {
        key: "ph", code: "ph", label: "Soil pH", unit: "",
        categories: &[below(5.5, VERY_LOW, "Strongly Acidic"), below(6.5, LOW, "Moderately Acidic"), below(7.5, HIGH, "Neutral"), above(ALKALINE, "Alkaline")],
    },
    AttributeSpec {
        key: "organic_carbon", code: "oc", label: "Organic Carbon", unit: "%",
        categories: &[below(0.6, VERY_LOW, "Very Low"), below(1.0, LOW, "Low"), below(1.5, MEDIUM, "Medium"), above(HIGH, "High")],
    },
    AttributeSpec {
        key: "moisture", code: "moisture", label: "Soil Moisture", unit: "%",
        categories: &[below(13.0, VERY_LOW, "Very Low"), below(22.0, LOW, "Low"), below(31.0, MEDIUM, "Medium"), above(HIGH, "High")],
    },
];

/// One row of a legend: everything below `upper_bound` (or above the previous
/// bound, for the last row) is drawn in `color`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub upper_bound: Option<f64>,
    pub color: String,
    pub label: String,
}

/// The attribute currently driving the choropleth, with its legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSelection {
    pub attribute_key: String,
    pub legend_ranges: Vec<LegendEntry>,
}

/// Pure mapping from attribute values to colors. Holds no geometry and
/// performs no I/O; restyling never needs a fetch.
#[derive(Debug, Clone, Copy)]
pub struct AttributeStyler {
    specs: &'static [AttributeSpec],
}

impl Default for AttributeStyler {
    fn default() -> Self { Self { specs: ATTRIBUTES } }
}

impl AttributeStyler {
    pub fn new() -> Self { Self::default() }

    /// Look up an attribute by display key or short code (case-insensitive).
    pub fn spec(&self, key: &str) -> Option<&'static AttributeSpec> {
        let specs: &'static [AttributeSpec] = self.specs;
        specs.iter().find(|s| s.key.eq_ignore_ascii_case(key) || s.code.eq_ignore_ascii_case(key))
    }

    pub fn attributes(&self) -> &'static [AttributeSpec] { self.specs }

    /// Fill color for `value` of `attribute_key`. Missing, non-finite values and
    /// unknown attributes map to [`NO_DATA`].
    pub fn color_for(&self, attribute_key: &str, value: Option<f64>) -> Rgb {
        self.spec(attribute_key)
            .zip(value)
            .and_then(|(spec, v)| spec.classify(v))
            .map_or(NO_DATA, |category| category.color)
    }

    /// Legend rows for `attribute_key`, lowest class first. Empty for unknown attributes.
    pub fn legend_for(&self, attribute_key: &str) -> Vec<LegendEntry> {
        let Some(spec) = self.spec(attribute_key) else { return Vec::new() };
        let mut lower = None;
        spec.categories.iter()
            .map(|category| {
                let entry = LegendEntry {
                    upper_bound: category.upper_bound,
                    color: category.color.to_string(),
                    label: format!("{} ({})", category.label, spec.range_text(lower, category.upper_bound)),
                };
                lower = category.upper_bound;
                entry
            })
            .collect()
    }

    /// Selection record for `attribute_key`, `None` if it is not a known attribute.
    pub fn select(&self, attribute_key: &str) -> Option<AttributeSelection> {
        let spec = self.spec(attribute_key)?;
        Some(AttributeSelection {
            attribute_key: spec.key.to_string(),
            legend_ranges: self.legend_for(spec.key),
        })
    }

    /// Value of `attribute_key` on a boundary feature: short code first, then display key.
    pub fn value_of(&self, attribute_key: &str, feature: &Feature) -> Option<f64> {
        let spec = self.spec(attribute_key)?;
        feature.number(spec.code).or_else(|| feature.number(spec.key))
    }

    /// Fill color of a boundary feature for `attribute_key`.
    pub fn feature_color(&self, attribute_key: &str, feature: &Feature) -> Rgb {
        self.color_for(attribute_key, self.value_of(attribute_key, feature))
    }
}
