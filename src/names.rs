//! Region-name extraction from heterogeneous property bags.
//!
//! Each dataset spells the same field differently (`DISTRICT`, `DIST_NAME`,
//! `dtname`, ...). All lookups go through one ordered precedence list per level.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::geom::{FeatureCollection, Properties};
use crate::types::BoundaryLevel;

const STATE_KEYS: &[&str] = &["STATE", "ST_NM", "ST_NAME", "State", "State_Name", "StateName", "stname"];
const DISTRICT_KEYS: &[&str] = &["DISTRICT", "DIST_NAME", "dtname", "District", "District_Name", "DistName"];
const SUBDISTRICT_KEYS: &[&str] = &["TEHSIL", "TEHSIL_NAM", "SUB_DIST", "sub_dist", "SubDistrict", "Tehsil", "sdtname"];

#[derive(Debug, Clone)]
pub struct NameResolver {
    state: Vec<String>,
    district: Vec<String>,
    subdistrict: Vec<String>,
}

impl Default for NameResolver {
    fn default() -> Self {
        let owned = |keys: &[&str]| keys.iter().map(|k| k.to_string()).collect();
        Self {
            state: owned(STATE_KEYS),
            district: owned(DISTRICT_KEYS),
            subdistrict: owned(SUBDISTRICT_KEYS),
        }
    }
}

impl NameResolver {
    pub fn new() -> Self { Self::default() }

    /// Candidate property keys for `level`, highest precedence first.
    pub fn keys(&self, level: BoundaryLevel) -> &[String] {
        match level {
            BoundaryLevel::State => &self.state,
            BoundaryLevel::District => &self.district,
            BoundaryLevel::Subdistrict => &self.subdistrict,
        }
    }

    /// Put `key` ahead of the existing candidates for `level`.
    pub fn with_key_first(mut self, level: BoundaryLevel, key: impl Into<String>) -> Self {
        let key = key.into();
        let keys = match level {
            BoundaryLevel::State => &mut self.state,
            BoundaryLevel::District => &mut self.district,
            BoundaryLevel::Subdistrict => &mut self.subdistrict,
        };
        keys.retain(|k| *k != key);
        keys.insert(0, key);
        self
    }

    /// Name of the `level` region described by `props`.
    ///
    /// Exact key matches are tried in precedence order, then the same order
    /// case-insensitively. The first non-empty value wins.
    pub fn resolve(&self, level: BoundaryLevel, props: &Properties) -> Option<String> {
        let keys = self.keys(level);

        let exact = keys.iter().find_map(|key| props.get(key.as_str()).and_then(name_value));
        if exact.is_some() { return exact }

        keys.iter().find_map(|key| {
            props.iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case(key))
                .find_map(|(_, v)| name_value(v))
        })
    }

    /// Sorted, de-duplicated names of every feature in `collection`.
    pub fn distinct_names(&self, level: BoundaryLevel, collection: &FeatureCollection) -> Vec<String> {
        collection.iter()
            .filter_map(|feature| self.resolve(level, &feature.properties))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Indices of the features named `name` at `level` (exact match).
    pub fn matching(&self, level: BoundaryLevel, collection: &FeatureCollection, name: &str) -> Vec<usize> {
        collection.iter().enumerate()
            .filter(|(_, feature)| self.resolve(level, &feature.properties).as_deref() == Some(name))
            .map(|(i, _)| i)
            .collect()
    }
}

fn name_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
