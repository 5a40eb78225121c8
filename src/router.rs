//! Map clicks back into selection mutations.

use tracing::debug;

use crate::{
    controller::ViewState,
    error::SyncError,
    geom::Properties,
    names::NameResolver,
    selection::{canonical_in, OptionLists},
    types::BoundaryLevel,
};

/// Where a click should go.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickRoute {
    /// Select `name` (canonical option spelling) at `level`.
    Select { level: BoundaryLevel, name: String },
    /// The view is already at the leaf.
    Inert,
    /// Nothing selectable was clicked. Carries the diagnostic.
    Ignored(SyncError),
}

#[derive(Debug, Clone)]
pub struct RegionClickRouter {
    names: NameResolver,
    known_states: Vec<String>,
}

impl RegionClickRouter {
    /// `known_states` is consulted in `Country` before any State-level set is accepted.
    pub fn new(names: NameResolver, known_states: Vec<String>) -> Self {
        Self { names, known_states }
    }

    /// Region name in a clicked feature's properties, read with the key
    /// precedence of the rendered layer's level.
    pub fn resolve_click(&self, level: BoundaryLevel, props: &Properties) -> Option<String> {
        self.names.resolve(level, props)
    }

    /// Route a resolved name according to the current view. Names outside the
    /// current option set are ignored so the selection never desynchronizes.
    pub fn route_click(&self, name: Option<&str>, view: ViewState, options: &OptionLists) -> ClickRoute {
        let Some(level) = view.click_level() else { return ClickRoute::Inert };
        let unresolved = || {
            let err = SyncError::UnresolvedClick { level, name: name.map(str::to_string) };
            debug!(%view, "{err}");
            ClickRoute::Ignored(err)
        };

        let Some(name) = name else { return unresolved() };
        let candidates = match options.get(level) {
            [] if level == BoundaryLevel::State => self.known_states.as_slice(),
            other => other,
        };
        match canonical_in(candidates, name) {
            Some(canonical) => ClickRoute::Select { level, name: canonical.to_string() },
            None => unresolved(),
        }
    }
}

impl Default for RegionClickRouter {
    fn default() -> Self { Self::new(NameResolver::default(), Vec::new()) }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{selection::SelectionModel, types::ParentKeys};

    fn props(key: &str, name: &str) -> Properties {
        let mut props = Properties::new();
        props.insert(key.into(), json!(name));
        props
    }

    #[test]
    fn resolves_with_level_keys() {
        let router = RegionClickRouter::default();
        assert_eq!(router.resolve_click(BoundaryLevel::Subdistrict, &props("sdtname", "Ajnala")).as_deref(), Some("Ajnala"));
        assert_eq!(router.resolve_click(BoundaryLevel::District, &props("sdtname", "Ajnala")), None);
    }

    #[test]
    fn country_falls_back_to_known_states() {
        let router = RegionClickRouter::new(NameResolver::default(), vec!["Punjab".into(), "Haryana".into()]);
        let model = SelectionModel::new();
        assert_eq!(
            router.route_click(Some("punjab"), ViewState::Country, model.options()),
            ClickRoute::Select { level: BoundaryLevel::State, name: "Punjab".into() },
        );
        assert!(matches!(router.route_click(Some("Kerala"), ViewState::Country, model.options()), ClickRoute::Ignored(_)));
    }

    #[test]
    fn district_clicks_need_an_option() {
        let router = RegionClickRouter::default();
        let mut model = SelectionModel::new();
        model.set_state("Punjab").unwrap();
        let parents: ParentKeys = std::iter::once(std::sync::Arc::<str>::from("Punjab")).collect();
        model.publish_options(BoundaryLevel::District, &parents, vec!["Amritsar".into(), "Moga".into()]);

        assert_eq!(
            router.route_click(Some("Moga"), ViewState::StateChosen, model.options()),
            ClickRoute::Select { level: BoundaryLevel::District, name: "Moga".into() },
        );
        assert!(matches!(
            router.route_click(Some("Ambala"), ViewState::StateChosen, model.options()),
            ClickRoute::Ignored(SyncError::UnresolvedClick { level: BoundaryLevel::District, .. }),
        ));
        assert!(matches!(router.route_click(None, ViewState::StateChosen, model.options()), ClickRoute::Ignored(_)));
        assert_eq!(router.route_click(Some("Moga"), ViewState::SubdistrictChosen, model.options()), ClickRoute::Inert);
    }

    #[test]
    fn ignored_route_carries_the_unresolved_name() {
        let router = RegionClickRouter::default();
        let model = SelectionModel::new();
        assert_eq!(
            router.route_click(Some("Kerala"), ViewState::Country, model.options()),
            ClickRoute::Ignored(SyncError::UnresolvedClick { level: BoundaryLevel::State, name: Some("Kerala".into()) }),
        );
    }
}
