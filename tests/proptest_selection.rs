//! Property-based invariants of the selection/boundary subsystem.
//!
//! 1. The path never holds a lower field while a higher one is empty.
//! 2. With a source that serves every path, whatever order fetches complete
//!    in, the held set is the live selection's once every fetch has resolved.
//! 3. With failing fetches, the held set may stay at a shallower level, but
//!    a set at the live level always belongs to the live parents.

mod common;

use common::RecordingRenderer;
use geodrill::{
    BoundaryLevel, GeometrySource, MapSession, MemoryGeometrySource, SelectionModel, UserAction,
};
use proptest::prelude::*;

const STATES: [&str; 3] = ["Punjab", "Haryana", "Uttar Pradesh"];
const DISTRICTS: [&str; 3] = ["Amritsar", "Moga", "Ambala"];

/// Serves every (state, district) pair the action strategy can reach.
fn total_source() -> MemoryGeometrySource {
    let mut source = common::source();
    for state in STATES {
        for district in DISTRICTS {
            let tehsils = if (state, district) == ("Punjab", "Amritsar") {
                common::amritsar_tehsils()
            } else {
                common::row("TEHSIL", &[district, "Other"], 32.0)
            };
            source.insert(BoundaryLevel::Subdistrict, &[state, district], tehsils);
        }
    }
    source
}

/// Run `actions`, then complete every issued fetch: first in `order`, then
/// the remainder in issue order.
fn run<S: GeometrySource>(source: &S, actions: Vec<UserAction>, order: Vec<prop::sample::Index>) -> MapSession<RecordingRenderer> {
    let mut session = MapSession::new(RecordingRenderer::default());
    session.start();
    session.pump(source);

    let mut pending = Vec::new();
    for action in actions {
        let _ = session.apply(action);
        pending.extend(session.take_requests());
    }
    for index in order {
        if pending.is_empty() { break }
        let request = pending.remove(index.index(pending.len()));
        let _ = session.complete(request.tag, source.fetch(request.level, &request.parents));
    }
    for request in pending {
        let _ = session.complete(request.tag, source.fetch(request.level, &request.parents));
    }
    session
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Punjab".to_string()),
        Just("Haryana".to_string()),
        Just("Amritsar".to_string()),
        Just("Tarn Taran".to_string()),
        Just(String::new()),
        "[A-Za-z ]{0,8}",
    ]
}

fn arb_level() -> impl Strategy<Value = BoundaryLevel> {
    prop_oneof![Just(BoundaryLevel::State), Just(BoundaryLevel::District), Just(BoundaryLevel::Subdistrict)]
}

#[derive(Debug, Clone)]
enum Step {
    Set(BoundaryLevel, String),
    Clear(BoundaryLevel),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (arb_level(), arb_name()).prop_map(|(level, name)| Step::Set(level, name)),
        1 => arb_level().prop_map(Step::Clear),
    ]
}

fn arb_action() -> impl Strategy<Value = UserAction> {
    prop_oneof![
        prop::sample::select(STATES.to_vec()).prop_map(|s| UserAction::SelectState(s.into())),
        prop::sample::select(DISTRICTS.to_vec()).prop_map(|s| UserAction::SelectDistrict(s.into())),
        prop_oneof![Just("Ajnala"), Just("Tarn Taran")].prop_map(|s| UserAction::SelectSubdistrict(s.into())),
        arb_level().prop_map(UserAction::Clear),
    ]
}

proptest! {
    #[test]
    fn path_stays_hierarchical(steps in prop::collection::vec(arb_step(), 0..40)) {
        let mut model = SelectionModel::new();
        for step in steps {
            let before = model.clone();
            match step {
                Step::Set(level, name) => {
                    if model.set(level, &name).is_err() {
                        prop_assert_eq!(&model, &before);
                    }
                }
                Step::Clear(level) => { model.clear(level); }
            }
            prop_assert!(model.path().is_valid(), "invalid path {}", model.path());
        }
    }

    #[test]
    fn held_set_is_live_once_all_fetches_resolve(
        actions in prop::collection::vec(arb_action(), 1..12),
        order in prop::collection::vec(any::<prop::sample::Index>(), 0..24),
    ) {
        let session = run(&total_source(), actions, order);
        let path = session.path();
        let expected = session.view().boundary_level();

        prop_assert!(path.is_valid());
        prop_assert_eq!(session.renderer().live.len(), 1);
        let held = session.controller().held();
        prop_assert!(held.is_some());
        if let Some(held) = held {
            prop_assert_eq!(held.level, expected);
            prop_assert_eq!(Some(held.parents.clone()), path.parents_of(expected));
        }
        let only_empty_results = session.notices().iter().all(|n| matches!(n, geodrill::SyncError::EmptyResult { .. }));
        prop_assert!(only_empty_results);
    }

    #[test]
    fn held_set_never_from_another_branch_of_the_live_level(
        actions in prop::collection::vec(arb_action(), 1..12),
        order in prop::collection::vec(any::<prop::sample::Index>(), 0..24),
    ) {
        let session = run(&common::source(), actions, order);
        let path = session.path();
        let expected = session.view().boundary_level();

        prop_assert!(path.is_valid());
        prop_assert!(session.renderer().live.len() <= 1);
        if let Some(held) = session.controller().held() {
            // Never deeper than the view; a failed fetch may leave a shallower set up.
            prop_assert!(held.level <= expected);
            if held.level == expected {
                prop_assert_eq!(Some(held.parents.clone()), path.parents_of(expected));
            }
            prop_assert!(session.rendered().len() <= held.features.len());
        }
    }
}
