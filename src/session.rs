//! One user's map session: the single selection model plus everything that
//! observes it. Dropdowns and map clicks both enter through here.

use std::collections::VecDeque;

use ahash::AHashMap;
use anyhow::Result;
use geo::Point;
use tracing::debug;

use crate::{
    config::Config,
    controller::{BoundaryLayerController, Completion, FetchRequest, ViewState},
    error::SyncError,
    geom::{FeatureCollection, Properties},
    names::NameResolver,
    render::MapRenderer,
    router::{ClickRoute, RegionClickRouter},
    selection::{OptionLists, SelectionChange, SelectionModel},
    source::GeometrySource,
    style::{AttributeSelection, LegendEntry},
    types::{BoundaryLevel, SelectionPath},
};

/// Input from either surface (dropdowns, legend picker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SelectState(String),
    SelectDistrict(String),
    SelectSubdistrict(String),
    Clear(BoundaryLevel),
    SelectAttribute(String),
    ClearAttribute,
}

pub struct MapSession<R: MapRenderer> {
    model: SelectionModel,
    controller: BoundaryLayerController,
    router: RegionClickRouter,
    renderer: R,
    queued: VecDeque<FetchRequest>,
    in_flight: AHashMap<u64, FetchRequest>,
    notices: Vec<SyncError>,
}

impl<R: MapRenderer> MapSession<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_config(renderer, &Config::default())
    }

    pub fn with_config(renderer: R, config: &Config) -> Self {
        let names = NameResolver::default();
        let mut session = Self {
            model: SelectionModel::new(),
            controller: BoundaryLayerController::new(names.clone(), config.view.fit_padding),
            router: RegionClickRouter::new(names, config.view.known_states.clone()),
            renderer,
            queued: VecDeque::new(),
            in_flight: AHashMap::new(),
            notices: Vec::new(),
        };
        if let Some(key) = &config.attribute {
            session.controller.set_attribute(Some(key.as_str()), &mut session.renderer);
        }
        session
    }

    /// Issue the initial `Country` fetch.
    pub fn start(&mut self) {
        if let Some(request) = self.controller.request_for(self.model.path()) {
            self.enqueue(request);
        }
    }

    #[inline] pub fn path(&self) -> &SelectionPath { self.model.path() }

    #[inline] pub fn options(&self) -> &OptionLists { self.model.options() }

    #[inline] pub fn view(&self) -> ViewState { ViewState::from_path(self.model.path()) }

    #[inline] pub fn controller(&self) -> &BoundaryLayerController { &self.controller }

    #[inline] pub fn renderer(&self) -> &R { &self.renderer }

    /// Host-side access to the renderer (e.g. to drain queued draw calls).
    /// Layers it holds still belong to the controller.
    #[inline] pub fn renderer_mut(&mut self) -> &mut R { &mut self.renderer }

    pub fn into_renderer(self) -> R { self.renderer }

    /// Features currently drawn.
    pub fn rendered(&self) -> FeatureCollection { self.controller.rendered() }

    #[inline] pub fn attribute(&self) -> Option<&AttributeSelection> { self.controller.attribute() }

    /// Legend of the selected attribute; empty in plain boundary mode.
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.attribute().map(|a| a.legend_ranges.clone()).unwrap_or_default()
    }

    /// Apply a user action. Invalid selections are rejected before any fetch
    /// and leave the session untouched.
    pub fn apply(&mut self, action: UserAction) -> Result<(), SyncError> {
        match action {
            UserAction::SelectState(name) => self.select(BoundaryLevel::State, &name).map(drop),
            UserAction::SelectDistrict(name) => self.select(BoundaryLevel::District, &name).map(drop),
            UserAction::SelectSubdistrict(name) => self.select(BoundaryLevel::Subdistrict, &name).map(drop),
            UserAction::Clear(level) => {
                let change = self.model.clear(level);
                self.observe(&change);
                Ok(())
            }
            UserAction::SelectAttribute(key) => {
                self.controller.set_attribute(Some(key.as_str()), &mut self.renderer);
                Ok(())
            }
            UserAction::ClearAttribute => {
                self.controller.set_attribute(None, &mut self.renderer);
                Ok(())
            }
        }
    }

    /// Route a click on a rendered feature with properties `props`.
    /// Returns the resulting change, or `None` if the click was a no-op.
    pub fn click(&mut self, props: &Properties) -> Option<SelectionChange> {
        let view = self.view();
        let level = self.controller.rendered_level().unwrap_or(view.boundary_level());
        let name = self.router.resolve_click(level, props);
        match self.router.route_click(name.as_deref(), view, self.model.options()) {
            ClickRoute::Select { level, name } => self.select(level, &name).ok(),
            ClickRoute::Inert => {
                debug!(%view, "click at leaf ignored");
                None
            }
            ClickRoute::Ignored(_) => None,
        }
    }

    /// Route a click at a lon/lat position by hit-testing the rendered layer.
    pub fn click_at(&mut self, point: Point<f64>) -> Option<SelectionChange> {
        let rendered = self.controller.rendered();
        let Some(feature) = rendered.feature_at(point).and_then(|i| rendered.get(i)) else {
            debug!(x = point.x(), y = point.y(), "click outside rendered shapes");
            return None;
        };
        self.click(&feature.properties)
    }

    /// Highlight the rendered shape at `index`, or clear the highlight.
    pub fn hover(&mut self, index: Option<usize>) -> bool {
        self.controller.hover(index, &mut self.renderer)
    }

    /// Highlight the rendered shape under a lon/lat position, if any.
    pub fn hover_at(&mut self, point: Point<f64>) -> bool {
        let index = self.controller.hit_test(point);
        self.controller.hover(index, &mut self.renderer)
    }

    /// Hand queued fetches to the host. They stay in flight until completed.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        self.queued.drain(..).collect()
    }

    #[inline] pub fn has_pending(&self) -> bool { !self.in_flight.is_empty() }

    /// Deliver the result of fetch `tag`. Completions may arrive in any order;
    /// stale ones are discarded. Surfaced errors are also kept as notices.
    pub fn complete(&mut self, tag: u64, result: Result<FeatureCollection>) -> Result<Completion, SyncError> {
        let Some(request) = self.in_flight.remove(&tag) else {
            debug!(tag, "completion for unknown fetch ignored");
            return Ok(Completion::Stale);
        };
        self.queued.retain(|queued| queued.tag != tag);

        let outcome = self.controller.complete(&request, result, &mut self.model, &mut self.renderer);
        if let Err(err) = &outcome {
            self.notices.push(err.clone());
        }
        outcome
    }

    /// Run every queued fetch against `source`, in issue order.
    /// Returns the number of fetches run.
    pub fn pump<S: GeometrySource + ?Sized>(&mut self, source: &S) -> usize {
        let mut count = 0;
        while let Some(request) = self.queued.pop_front() {
            let result = source.fetch(request.level, &request.parents);
            let _ = self.complete(request.tag, result);
            count += 1;
        }
        count
    }

    #[inline] pub fn notices(&self) -> &[SyncError] { &self.notices }

    /// Dismiss the notice at `index`.
    pub fn dismiss(&mut self, index: usize) -> Option<SyncError> {
        (index < self.notices.len()).then(|| self.notices.remove(index))
    }

    pub fn take_notices(&mut self) -> Vec<SyncError> {
        std::mem::take(&mut self.notices)
    }

    fn select(&mut self, level: BoundaryLevel, name: &str) -> Result<SelectionChange, SyncError> {
        let change = self.model.set(level, name)?;
        self.observe(&change);
        Ok(change)
    }

    fn observe(&mut self, change: &SelectionChange) {
        if let Some(request) = self.controller.on_change(change, &mut self.renderer) {
            self.enqueue(request);
        }
    }

    /// Queue `request`, dropping queued requests the selection has moved past
    /// and those it replaces at the same level. A parent-level request that
    /// still matches stays queued; it fills that level's option list.
    fn enqueue(&mut self, request: FetchRequest) {
        let path = self.model.path();
        let in_flight = &mut self.in_flight;
        self.queued.retain(|queued| {
            let keep = queued.matches(path) && queued.level != request.level;
            if !keep { in_flight.remove(&queued.tag); }
            keep
        });
        self.in_flight.insert(request.tag, request.clone());
        self.queued.push_back(request);
    }
}
