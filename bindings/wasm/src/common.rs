use anyhow::{anyhow, Result};
use geodrill_core::{BoundaryLevel, Properties};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Serialize through a JSON string and parse it on the JS side, so numbers
/// and maps come out as plain JS values.
pub(crate) fn to_js(value: &impl Serialize) -> Result<JsValue, JsValue> {
    let json_string = serde_json::to_string(value)
        .map_err(|e| js_err(format!("Failed to serialize to JSON: {e}")))?;
    js_sys::JSON::parse(&json_string)
        .map_err(|e| js_err(format!("Failed to parse JSON string: {e:?}")))
}

/// Feature properties handed over by the map library on click.
pub(crate) fn js_to_properties(props: JsValue) -> Result<Properties> {
    let value: serde_json::Value = serde_wasm_bindgen::from_value(props)
        .map_err(|e| anyhow!("properties must be a plain object: {e}"))?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(anyhow!("properties must be an object, got {other}")),
    }
}

pub(crate) fn parse_level(level: &str) -> Result<BoundaryLevel> {
    BoundaryLevel::from_str(level).ok_or_else(|| {
        anyhow!("Unknown level {:?}. Expected one of: state, district, subdistrict", level)
    })
}
