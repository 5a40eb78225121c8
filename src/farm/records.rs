use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{BoundaryLevel, SelectionPath};

/// Location hierarchy served by `GET /locations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locations {
    pub states: Vec<String>,
    pub districts: BTreeMap<String, Vec<String>>,    // state -> districts
    pub subdistricts: BTreeMap<String, Vec<String>>, // district -> sub-districts
}

impl Locations {
    pub fn districts_of(&self, state: &str) -> &[String] {
        self.districts.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn subdistricts_of(&self, district: &str) -> &[String] {
        self.subdistricts.get(district).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// One soil sample from `GET /data`. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmRecord {
    pub farmer_id: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub subdistrict: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub ph: Option<f64>,
    pub organic_carbon: Option<f64>,
    pub moisture: Option<f64>,
    pub soil_type: Option<String>,
    pub recommended_fertilizer: Option<String>,
}

impl FarmRecord {
    /// Value of the attribute with display key `key`.
    pub fn value(&self, key: &str) -> Option<f64> {
        match key {
            "nitrogen" => self.nitrogen,
            "phosphorus" => self.phosphorus,
            "potassium" => self.potassium,
            "ph" => self.ph,
            "organic_carbon" => self.organic_carbon,
            "moisture" => self.moisture,
            _ => None,
        }
    }

    /// `(lon, lat)` if both coordinates are present.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.longitude?, self.latitude?))
    }
}

/// Filter for `GET /data`, one optional field per level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FarmQuery {
    pub state: Option<String>,
    pub district: Option<String>,
    pub subdistrict: Option<String>,
}

impl FarmQuery {
    pub fn from_path(path: &SelectionPath) -> Self {
        Self {
            state: path.state().map(str::to_string),
            district: path.district().map(str::to_string),
            subdistrict: path.subdistrict().map(str::to_string),
        }
    }

    /// Query pairs for the set fields, top-down.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            (BoundaryLevel::State, &self.state),
            (BoundaryLevel::District, &self.district),
            (BoundaryLevel::Subdistrict, &self.subdistrict),
        ]
        .into_iter()
        .filter_map(|(level, value)| Some((level.query_key(), value.as_deref()?)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionModel;

    #[test]
    fn query_from_partial_path() {
        let mut model = SelectionModel::new();
        model.set_state("Punjab").unwrap();
        model.set_district("Amritsar").unwrap();
        let query = FarmQuery::from_path(model.path());
        assert_eq!(query.pairs(), vec![("state", "Punjab"), ("district", "Amritsar")]);
        assert!(FarmQuery::default().pairs().is_empty());
    }

    #[test]
    fn decodes_sparse_records() {
        let records: Vec<FarmRecord> = serde_json::from_str(r#"[
            {"farmer_id": "F1", "latitude": 31.6, "longitude": 74.9, "ph": 7.1},
            {"farmer_id": "F2", "nitrogen": null}
        ]"#).unwrap();
        assert_eq!(records[0].position(), Some((74.9, 31.6)));
        assert_eq!(records[0].value("ph"), Some(7.1));
        assert_eq!(records[1].position(), None);
        assert_eq!(records[1].value("nitrogen"), None);

        let locations: Locations = serde_json::from_str(
            r#"{"states": ["Punjab"], "districts": {"Punjab": ["Amritsar"]}, "subdistricts": {}}"#
        ).unwrap();
        assert_eq!(locations.districts_of("Punjab"), &["Amritsar".to_string()]);
        assert!(locations.subdistricts_of("Amritsar").is_empty());
    }
}
