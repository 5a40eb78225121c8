use anyhow::anyhow;
use geodrill_core::{Config, FeatureCollection, MapSession, UserAction};
use serde_json::{json, Value};
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};

use crate::{common::*, renderer::OpsRenderer};

#[wasm_bindgen]
pub struct WasmSession {
    inner: MapSession<OpsRenderer>,
}

#[wasm_bindgen]
impl WasmSession {
    /// Construct a session from an optional JSON configuration string.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<WasmSession, JsValue> {
        let config = match config.as_deref() {
            Some(text) => Config::from_json_str(text).map_err(|e| js_err(format!("{e:#}")))?,
            None => Config::default(),
        };
        Ok(WasmSession { inner: MapSession::with_config(OpsRenderer::default(), &config) })
    }

    /// Queue the initial country-level fetch.
    pub fn start(&mut self) {
        self.inner.start();
    }

    pub fn set_state(&mut self, name: String) -> Result<(), JsValue> {
        self.inner.apply(UserAction::SelectState(name)).map_err(js_err)
    }

    pub fn set_district(&mut self, name: String) -> Result<(), JsValue> {
        self.inner.apply(UserAction::SelectDistrict(name)).map_err(js_err)
    }

    pub fn set_subdistrict(&mut self, name: String) -> Result<(), JsValue> {
        self.inner.apply(UserAction::SelectSubdistrict(name)).map_err(js_err)
    }

    /// Clear `level` ("state", "district" or "subdistrict") and everything below it.
    pub fn clear(&mut self, level: String) -> Result<(), JsValue> {
        let level = parse_level(&level).map_err(js_err)?;
        self.inner.apply(UserAction::Clear(level)).map_err(js_err)
    }

    /// Select the attribute driving the fill; `undefined` returns to plain boundaries.
    pub fn set_attribute(&mut self, key: Option<String>) -> Result<(), JsValue> {
        let action = key.map_or(UserAction::ClearAttribute, UserAction::SelectAttribute);
        self.inner.apply(action).map_err(js_err)
    }

    /// Route a click on a rendered feature. Returns true if the selection changed.
    pub fn click(&mut self, properties: JsValue) -> Result<bool, JsValue> {
        let props = js_to_properties(properties).map_err(js_err)?;
        Ok(self.inner.click(&props).is_some())
    }

    /// Highlight the rendered feature at `index` (as in `rendered()`), or clear
    /// the highlight. Returns true if a restyle op was queued.
    pub fn hover(&mut self, index: Option<u32>) -> bool {
        self.inner.hover(index.map(|i| i as usize))
    }

    /// Highlight whatever rendered feature lies under `lon`/`lat`.
    pub fn hover_at(&mut self, lon: f64, lat: f64) -> bool {
        self.inner.hover_at(geo::Point::new(lon, lat))
    }

    /// Fetches for the host to perform: `[{tag, level, parents}]`.
    pub fn take_requests(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.take_requests())
    }

    /// Deliver the GeoJSON text returned for fetch `tag`.
    pub fn complete(&mut self, tag: f64, geojson: &str) -> Result<String, JsValue> {
        let result = FeatureCollection::from_geojson_str(geojson);
        self.finish(tag, result)
    }

    /// Report that fetch `tag` failed.
    pub fn fail(&mut self, tag: f64, message: &str) -> Result<String, JsValue> {
        self.finish(tag, Err(anyhow!("{message}")))
    }

    /// Drawing instructions accumulated since the last call.
    pub fn take_render_ops(&mut self) -> Result<JsValue, JsValue> {
        let ops = self.inner.renderer_mut().take_ops();
        to_js(&ops)
    }

    /// The rendered layer as GeoJSON, each feature carrying its `_fill` color.
    pub fn rendered(&self) -> Result<JsValue, JsValue> {
        let mut geojson = self.inner.rendered().to_geojson();
        let styles = self.inner.controller().rendered_styles();
        if let Some(Value::Array(features)) = geojson.get_mut("features") {
            for (feature, style) in features.iter_mut().zip(&styles) {
                if let Some(Value::Object(props)) = feature.get_mut("properties") {
                    props.insert("_fill".into(), Value::String(style.fill.to_string()));
                }
            }
        }
        to_js(&geojson)
    }

    /// Current path, view and option lists.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let path = self.inner.path();
        let options = self.inner.options();
        to_js(&json!({
            "view": self.inner.view().to_str(),
            "state": path.state(),
            "district": path.district(),
            "subdistrict": path.subdistrict(),
            "states": options.states(),
            "districts": options.districts(),
            "subdistricts": options.subdistricts(),
        }))
    }

    pub fn legend(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.legend())
    }

    /// Pending notices as messages; the list is emptied.
    pub fn take_notices(&mut self) -> Result<JsValue, JsValue> {
        let messages: Vec<String> = self.inner.take_notices().iter().map(ToString::to_string).collect();
        to_js(&messages)
    }
}

impl WasmSession {
    fn finish(&mut self, tag: f64, result: anyhow::Result<FeatureCollection>) -> Result<String, JsValue> {
        if !(tag.is_finite() && tag >= 0.0) {
            return Err(js_err(format!("invalid fetch tag {tag}")));
        }
        match self.inner.complete(tag as u64, result) {
            Ok(completion) => Ok(format!("{completion:?}").to_lowercase()),
            Err(err) => Ok(format!("error: {err}")),
        }
    }
}
