use anyhow::Result;
use geo::Point;
use tracing::{debug, info, warn};

use crate::{
    error::SyncError,
    geom::FeatureCollection,
    names::NameResolver,
    render::{LayerHandle, MapRenderer},
    selection::{ChangeKind, SelectionChange, SelectionModel},
    style::{AttributeSelection, AttributeStyler, ShapeStyle},
    types::{BoundaryLevel, ParentKeys, SelectionPath},
};
use super::{fetch::FetchRequest, view::ViewState};

/// A fetched FeatureCollection with the `(level, parents)` that produced it.
#[derive(Debug, Clone)]
pub struct BoundarySet {
    pub level: BoundaryLevel,
    pub parents: ParentKeys,
    pub features: FeatureCollection,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// Owns the fetch lifecycle for the current level, the rendered layer handle,
/// and the viewport. Nothing else mounts or unmounts layers.
#[derive(Debug)]
pub struct BoundaryLayerController {
    names: NameResolver,
    styler: AttributeStyler,
    attribute: Option<AttributeSelection>,
    fit_padding: f64,
    last_issued: u64,
    last_applied: u64,
    published: [u64; 3],       // Tag of the last option list published per level
    hovered: Option<usize>,    // Index into the rendered layer
    held: Option<BoundarySet>, // Unfiltered set behind the rendered layer
    shown: Vec<usize>,         // Indices of `held` that are rendered
    layer: Option<LayerHandle>,
}

impl Default for BoundaryLayerController {
    fn default() -> Self { Self::new(NameResolver::default(), 20.0) }
}

impl BoundaryLayerController {
    pub fn new(names: NameResolver, fit_padding: f64) -> Self {
        Self {
            names,
            styler: AttributeStyler::default(),
            attribute: None,
            fit_padding,
            last_issued: 0,
            last_applied: 0,
            published: [0; 3],
            hovered: None,
            held: None,
            shown: Vec::new(),
            layer: None,
        }
    }

    #[inline] pub fn names(&self) -> &NameResolver { &self.names }

    #[inline] pub fn styler(&self) -> &AttributeStyler { &self.styler }

    #[inline] pub fn attribute(&self) -> Option<&AttributeSelection> { self.attribute.as_ref() }

    #[inline] pub fn held(&self) -> Option<&BoundarySet> { self.held.as_ref() }

    #[inline] pub fn is_mounted(&self) -> bool { self.layer.is_some() }

    /// Level of the rendered layer, if any set was accepted yet.
    pub fn rendered_level(&self) -> Option<BoundaryLevel> {
        self.held.as_ref().map(|set| set.level)
    }

    /// The features currently drawn, in render order.
    pub fn rendered(&self) -> FeatureCollection {
        self.held.as_ref()
            .map(|set| set.features.subset(&self.shown))
            .unwrap_or_default()
    }

    /// Styles of the features currently drawn, aligned with [`Self::rendered`].
    /// The hovered shape carries the hover highlight.
    pub fn rendered_styles(&self) -> Vec<ShapeStyle> {
        let mut styles = self.styles_for(&self.rendered());
        if let Some(style) = self.hovered.and_then(|i| styles.get_mut(i)) {
            *style = style.hovered();
        }
        styles
    }

    #[inline] pub fn hovered(&self) -> Option<usize> { self.hovered }

    /// Index into [`Self::rendered`] of the shape under `point` (lon/lat).
    pub fn hit_test(&self, point: Point<f64>) -> Option<usize> {
        self.rendered().feature_at(point)
    }

    /// Issue the fetch for the view `path` implies.
    pub fn request_for(&mut self, path: &SelectionPath) -> Option<FetchRequest> {
        let level = ViewState::from_path(path).boundary_level();
        let parents = path.parents_of(level)?;
        self.last_issued += 1;
        debug!(tag = self.last_issued, %level, ?parents, "fetch issued");
        Some(FetchRequest { tag: self.last_issued, level, parents })
    }

    /// React to a selection change. Returns the fetch to run, if any.
    /// Sub-district changes are served from the held set when it belongs to
    /// the current district; otherwise they wait for the pending fetch.
    pub fn on_change<R: MapRenderer>(&mut self, change: &SelectionChange, renderer: &mut R) -> Option<FetchRequest> {
        if change.requires_fetch() {
            return self.request_for(&change.path);
        }

        if !self.holds_current(&change.path) {
            return match change.kind {
                ChangeKind::Set => None,
                ChangeKind::Cleared => self.request_for(&change.path),
            };
        }

        match (change.kind, change.path.subdistrict()) {
            (ChangeKind::Set, Some(name)) => self.filter_to(name, renderer),
            _ => self.show_all(renderer),
        }
        None
    }

    /// Apply a completed fetch if it still belongs to the live selection.
    ///
    /// Stale results are discarded without touching anything. A failure for
    /// the live selection keeps the current layer and options. An empty result
    /// replaces the layer, keeps the viewport and empties the option list.
    pub fn complete<R: MapRenderer>(
        &mut self,
        request: &FetchRequest,
        result: Result<FeatureCollection>,
        model: &mut SelectionModel,
        renderer: &mut R,
    ) -> Result<Completion, SyncError> {
        // Option lists follow the parent path, not the rendered level: a set
        // for the live parents fills its list even if the view moved deeper.
        if let Ok(features) = &result {
            self.publish(request, features, model);
        }

        if !self.is_live(request, model.path()) {
            debug!(tag = request.tag, level = %request.level, parents = ?request.parents, "stale fetch discarded");
            return Ok(Completion::Stale);
        }

        let features = match result {
            Ok(features) => features,
            Err(err) => {
                warn!(tag = request.tag, level = %request.level, "boundary fetch failed: {err:#}");
                return Err(SyncError::TransientFetch {
                    level: request.level,
                    parents: request.parent_names(),
                    reason: format!("{err:#}"),
                });
            }
        };

        self.last_applied = request.tag;
        let empty = features.is_empty();
        self.held = Some(BoundarySet { level: request.level, parents: request.parents.clone(), features });
        let shown = self.visible(model.path());
        self.show(shown, renderer);

        if empty {
            warn!(level = %request.level, parents = ?request.parents, "no boundaries for selection");
            return Err(SyncError::EmptyResult { level: request.level, parents: request.parent_names() });
        }
        info!(tag = request.tag, level = %request.level, features = self.shown.len(), "boundary layer applied");
        Ok(Completion::Applied)
    }

    /// Change the attribute driving the fill. Restyles the mounted layer in
    /// place; never fetches or re-mounts. Unknown keys leave the style as is.
    pub fn set_attribute<R: MapRenderer>(&mut self, key: Option<&str>, renderer: &mut R) -> Option<&AttributeSelection> {
        match key {
            None => self.attribute = None,
            Some(key) => match self.styler.select(key) {
                Some(selection) => self.attribute = Some(selection),
                None => {
                    warn!(key, "unknown attribute ignored");
                    return self.attribute.as_ref();
                }
            },
        }
        if let Some(handle) = &self.layer {
            renderer.restyle(handle, &self.rendered_styles());
        }
        self.attribute.as_ref()
    }

    /// Highlight the rendered shape at `index` (into [`Self::rendered`]), or
    /// none. Restyles the mounted layer in place. Returns whether the
    /// highlight changed; out-of-range indices clear it.
    pub fn hover<R: MapRenderer>(&mut self, index: Option<usize>, renderer: &mut R) -> bool {
        let index = index.filter(|&i| i < self.shown.len());
        if index == self.hovered { return false }
        self.hovered = index;
        if let Some(handle) = &self.layer {
            renderer.restyle(handle, &self.rendered_styles());
        }
        true
    }

    /// Unmount the layer and forget the held set.
    pub fn teardown<R: MapRenderer>(&mut self, renderer: &mut R) {
        if let Some(handle) = self.layer.take() {
            renderer.unmount(handle);
        }
        self.held = None;
        self.shown.clear();
        self.hovered = None;
    }

    /// Publish the names of `features` as the option list of the request's
    /// level, unless the path moved off its parents or a newer list is out.
    fn publish(&mut self, request: &FetchRequest, features: &FeatureCollection, model: &mut SelectionModel) {
        let slot = &mut self.published[request.level.depth()];
        if request.tag <= *slot || !request.matches(model.path()) { return }
        let names = self.names.distinct_names(request.level, features);
        if model.publish_options(request.level, &request.parents, names) {
            *slot = request.tag;
        }
    }

    fn is_live(&self, request: &FetchRequest, path: &SelectionPath) -> bool {
        request.tag > self.last_applied
            && request.level == ViewState::from_path(path).boundary_level()
            && request.matches(path)
    }

    fn holds_current(&self, path: &SelectionPath) -> bool {
        self.held.as_ref().is_some_and(|set| {
            set.level == BoundaryLevel::Subdistrict && path.parents_of(set.level).as_ref() == Some(&set.parents)
        })
    }

    /// Indices of the held set to draw for `path`.
    fn visible(&self, path: &SelectionPath) -> Vec<usize> {
        let Some(set) = &self.held else { return Vec::new() };
        let all = || -> Vec<usize> { (0..set.features.len()).collect() };
        match path.subdistrict() {
            Some(name) if set.level == BoundaryLevel::Subdistrict => {
                let matching = self.names.matching(set.level, &set.features, name);
                if matching.is_empty() { all() } else { matching }
            }
            _ => all(),
        }
    }

    fn filter_to<R: MapRenderer>(&mut self, name: &str, renderer: &mut R) {
        let Some(set) = &self.held else { return };
        let matching = self.names.matching(set.level, &set.features, name);
        if matching.is_empty() {
            debug!(name, "no held feature matches; layer unchanged");
            return;
        }
        debug!(name, count = matching.len(), "filtered held set locally");
        self.show(matching, renderer);
    }

    fn show_all<R: MapRenderer>(&mut self, renderer: &mut R) {
        let count = self.held.as_ref().map_or(0, |set| set.features.len());
        self.show((0..count).collect(), renderer);
    }

    /// Swap the rendered layer for `shown` of the held set: unmount the old
    /// handle and mount the new one in one step, then fit the viewport if the
    /// new layer has any extent.
    fn show<R: MapRenderer>(&mut self, shown: Vec<usize>, renderer: &mut R) {
        let Some(set) = &self.held else { return };
        let subset = set.features.subset(&shown);
        let styles = self.styles_for(&subset);

        if let Some(old) = self.layer.take() {
            renderer.unmount(old);
        }
        self.layer = Some(renderer.mount(&subset, &styles));
        self.shown = shown;
        self.hovered = None;

        if let Some(bounds) = subset.bounds() {
            renderer.fit_bounds(bounds, self.fit_padding);
        }
    }

    fn styles_for(&self, features: &FeatureCollection) -> Vec<ShapeStyle> {
        match &self.attribute {
            None => vec![ShapeStyle::BOUNDARY; features.len()],
            Some(selection) => features.iter()
                .map(|feature| ShapeStyle::choropleth(self.styler.feature_color(&selection.attribute_key, feature)))
                .collect(),
        }
    }
}
