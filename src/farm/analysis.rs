use serde::{Deserialize, Serialize};

use crate::types::SelectionPath;

const UNKNOWN: &str = "Unknown";

/// Field and soil values entered for one analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldInput {
    pub farmer_name: Option<String>,
    pub field_id: Option<String>,
    pub field_area: Option<f64>,
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub ph: Option<f64>,
    pub coordinates: Option<(f64, f64)>, // (lat, lon)
}

/// Payload accepted by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub farmer_name: String,
    pub field_id: String,
    pub state: String,
    pub district: String,
    pub sub_district: String,
    pub crop_type: String,
    pub season: String,
    pub field_area: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
    pub coordinates: Option<[f64; 2]>,
}

impl AnalysisRequest {
    /// Build a payload from the current selection and the entered values.
    /// Unselected levels are sent as "Unknown"; a missing pH is neutral (7.0).
    pub fn new(path: &SelectionPath, input: &FieldInput) -> Self {
        let or_unknown = |name: Option<&str>| name.unwrap_or(UNKNOWN).to_string();
        Self {
            farmer_name: input.farmer_name.clone().unwrap_or_else(|| "Unknown Farmer".into()),
            field_id: input.field_id.clone().unwrap_or_else(|| "F-001".into()),
            state: or_unknown(path.state()),
            district: or_unknown(path.district()),
            sub_district: or_unknown(path.subdistrict()),
            crop_type: "Wheat".into(),
            season: "Rabi".into(),
            field_area: input.field_area.unwrap_or(0.0),
            nitrogen: input.nitrogen.unwrap_or(0.0),
            phosphorus: input.phosphorus.unwrap_or(0.0),
            potassium: input.potassium.unwrap_or(0.0),
            ph: input.ph.unwrap_or(7.0),
            coordinates: input.coordinates.map(|(lat, lon)| [lat, lon]),
        }
    }
}

/// Result returned by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis_id: String,
    pub message: String,
    pub suitability_score: f64,
    pub sub_district: String,
}
