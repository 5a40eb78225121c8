mod common;

use anyhow::anyhow;
use common::{props, source, Op, RecordingRenderer};
use geodrill::{
    AttributeStyler, BoundaryLevel, Completion, MapSession, NameResolver, ShapeStyle, SyncError, UserAction, ViewState,
    NO_DATA,
};

fn session() -> MapSession<RecordingRenderer> {
    let mut session = MapSession::new(RecordingRenderer::default());
    session.start();
    session.pump(&source());
    session
}

fn rendered_names(session: &MapSession<RecordingRenderer>) -> Vec<String> {
    let level = session.controller().rendered_level().unwrap_or(BoundaryLevel::State);
    NameResolver::default().distinct_names(level, &session.rendered())
}

#[test]
fn end_to_end_click_on_subdistrict() {
    let mut session = session();
    assert_eq!(session.view(), ViewState::Country);

    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    assert_eq!(session.pump(&source()), 1);
    session.apply(UserAction::SelectDistrict("Amritsar".into())).unwrap();
    assert_eq!(session.pump(&source()), 1);
    assert!(session.options().contains(BoundaryLevel::Subdistrict, "Tarn Taran"));

    let change = session.click(&props("TEHSIL", "Tarn Taran")).unwrap();
    assert!(!change.requires_fetch());
    assert!(session.take_requests().is_empty());

    let path = session.path();
    assert_eq!((path.state(), path.district(), path.subdistrict()), (Some("Punjab"), Some("Amritsar"), Some("Tarn Taran")));
    assert_eq!(session.rendered().len(), 1);
    assert_eq!(rendered_names(&session), vec!["Tarn Taran"]);
    assert_eq!(session.view(), ViewState::SubdistrictChosen);

    // Leaf: further clicks are inert.
    assert!(session.click(&props("TEHSIL", "Ajnala")).is_none());
    assert_eq!(session.path().subdistrict(), Some("Tarn Taran"));
}

#[test]
fn changing_state_clears_lower_fields_despite_in_flight_fetch() {
    let mut session = session();
    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    session.pump(&source());
    session.apply(UserAction::SelectDistrict("Amritsar".into())).unwrap();
    let in_flight = session.take_requests();
    assert_eq!(in_flight.len(), 1);

    session.apply(UserAction::SelectState("Haryana".into())).unwrap();
    assert_eq!(session.path().district(), None);
    assert_eq!(session.path().subdistrict(), None);
    assert!(session.options().districts().is_empty());
    assert!(session.options().subdistricts().is_empty());

    // The Amritsar response lands late and is dropped.
    let late = session.complete(in_flight[0].tag, Ok(common::amritsar_tehsils()));
    assert_eq!(late, Ok(Completion::Stale));
    assert!(session.options().subdistricts().is_empty());
}

#[test]
fn slow_punjab_response_never_overwrites_haryana() {
    let mut session = session();
    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    let punjab = session.take_requests().remove(0);
    session.apply(UserAction::SelectState("Haryana".into())).unwrap();
    let haryana = session.take_requests().remove(0);
    assert!(haryana.tag > punjab.tag);

    assert_eq!(session.complete(haryana.tag, Ok(common::haryana_districts())), Ok(Completion::Applied));
    assert_eq!(session.complete(punjab.tag, Ok(common::punjab_districts())), Ok(Completion::Stale));

    assert_eq!(rendered_names(&session), vec!["Ambala", "Karnal"]);
    assert_eq!(session.options().districts(), &["Ambala".to_string(), "Karnal".to_string()]);
    assert!(session.notices().is_empty());
}

#[test]
fn stale_failure_is_silent() {
    let mut session = session();
    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    let punjab = session.take_requests().remove(0);
    session.apply(UserAction::SelectState("Haryana".into())).unwrap();
    session.pump(&source());

    assert_eq!(session.complete(punjab.tag, Err(anyhow!("timeout"))), Ok(Completion::Stale));
    assert!(session.notices().is_empty());
}

#[test]
fn subdistrict_filter_uses_held_set() {
    let mut session = session();
    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    session.pump(&source());
    session.apply(UserAction::SelectDistrict("Amritsar".into())).unwrap();
    session.pump(&source());

    session.apply(UserAction::SelectSubdistrict("Ajnala".into())).unwrap();
    assert!(session.take_requests().is_empty());
    assert_eq!(rendered_names(&session), vec!["Ajnala"]);

    session.apply(UserAction::SelectSubdistrict("Nowhere".into())).unwrap();
    assert!(session.take_requests().is_empty());
    assert_eq!(rendered_names(&session), vec!["Ajnala"]);

    session.apply(UserAction::Clear(BoundaryLevel::Subdistrict)).unwrap();
    assert!(session.take_requests().is_empty());
    assert_eq!(session.rendered().len(), 3);
}

#[test]
fn attribute_change_restyles_without_refetch_or_remount() {
    let mut session = session();
    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    session.pump(&source());
    session.apply(UserAction::SelectDistrict("Amritsar".into())).unwrap();
    session.pump(&source());

    session.apply(UserAction::SelectAttribute("nitrogen".into())).unwrap();
    let before = session.rendered();
    let mounts = session.renderer().mounts();

    session.apply(UserAction::SelectAttribute("ph".into())).unwrap();
    assert!(session.take_requests().is_empty());
    assert_eq!(session.renderer().mounts(), mounts);
    assert_eq!(session.rendered().features(), before.features());

    let Some(Op::Restyle { styles, .. }) = session.renderer().ops.last() else { panic!("expected restyle") };
    let styler = AttributeStyler::new();
    assert_eq!(styles.len(), 3);
    assert_eq!(styles[0].fill, styler.color_for("ph", Some(6.0)));
    assert_eq!(styles[1].fill, styler.color_for("ph", Some(7.0)));
    assert_eq!(styles[2].fill, styler.color_for("ph", Some(8.1)));
    assert!(styles.iter().all(|s| s.fill != NO_DATA));

    assert_eq!(session.legend().len(), 4);
    assert_eq!(session.legend()[2].label, "Neutral (6.5 - 7.5)");
}

#[test]
fn unknown_click_is_bit_for_bit_noop() {
    let mut session = session();
    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    session.pump(&source());

    let path = session.path().clone();
    let options = session.options().clone();
    let ops = session.renderer().ops.len();

    assert!(session.click(&props("DISTRICT", "Ambala")).is_none());
    assert!(session.click(&props("unrelated", "Moga")).is_none());
    assert!(session.click(&props("DISTRICT", "   ")).is_none());

    assert_eq!(session.path(), &path);
    assert_eq!(session.options(), &options);
    assert_eq!(session.renderer().ops.len(), ops);
    assert!(session.take_requests().is_empty());
    assert!(session.notices().is_empty());
}

#[test]
fn old_layer_is_unmounted_before_new_one_mounts() {
    let mut session = session();
    for state in ["Punjab", "Haryana", "Punjab"] {
        session.apply(UserAction::SelectState(state.into())).unwrap();
        session.pump(&source());
        assert_eq!(session.renderer().live.len(), 1);
    }

    let ops = &session.renderer().ops;
    for (i, op) in ops.iter().enumerate().skip(1) {
        if let Op::Mount { .. } = op {
            assert!(matches!(ops[i - 1], Op::Unmount { .. }), "mount at {i} not preceded by unmount");
        }
    }
}

#[test]
fn empty_result_keeps_viewport_and_empties_options() {
    let mut session = session();
    let fits = session.renderer().fits();

    session.apply(UserAction::SelectState("Uttar Pradesh".into())).unwrap();
    session.pump(&source());

    assert_eq!(session.renderer().fits(), fits);
    assert!(session.rendered().is_empty());
    assert!(session.options().districts().is_empty());
    assert!(matches!(session.notices(), [SyncError::EmptyResult { level: BoundaryLevel::District, .. }]));
    assert_eq!(session.path().state(), Some("Uttar Pradesh"));
}

#[test]
fn transient_failure_can_be_retried() {
    let mut session = session();
    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    let request = session.take_requests().remove(0);
    session.complete(request.tag, Err(anyhow!("connection reset"))).unwrap_err();

    // Previous (state) layer and options survive.
    assert_eq!(session.rendered().len(), 3);
    assert_eq!(session.options().states().len(), 3);
    assert_eq!(session.take_notices().len(), 1);

    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    session.pump(&source());
    assert_eq!(session.options().districts().len(), 3);
    assert!(session.notices().is_empty());
}

#[test]
fn clearing_state_returns_to_country() {
    let mut session = session();
    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    session.pump(&source());
    session.apply(UserAction::Clear(BoundaryLevel::State)).unwrap();
    let requests = session.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].level, BoundaryLevel::State);
    assert!(requests[0].parents.is_empty());
    session.complete(requests[0].tag, Ok(common::states())).unwrap();
    assert_eq!(session.view(), ViewState::Country);
    assert_eq!(session.rendered().len(), 3);
}

#[test]
fn click_at_point_hits_rendered_shape() {
    let mut session = session();
    // Haryana is the second square of the state row: x in [71, 72], y in [30, 31].
    let change = session.click_at(geo::Point::new(71.5, 30.5)).unwrap();
    assert_eq!(change.path.state(), Some("Haryana"));
    assert!(session.click_at(geo::Point::new(0.0, 0.0)).is_none());
}

#[test]
fn early_district_pick_still_fills_district_options() {
    let mut session = session();
    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    session.apply(UserAction::SelectDistrict("Amritsar".into())).unwrap();
    let requests = session.take_requests();
    assert_eq!(requests.len(), 2);

    let (districts, tehsils) = (&requests[0], &requests[1]);
    assert_eq!(districts.level, BoundaryLevel::District);
    assert_eq!(session.complete(districts.tag, Ok(common::punjab_districts())), Ok(Completion::Stale));
    assert_eq!(session.complete(tehsils.tag, Ok(common::amritsar_tehsils())), Ok(Completion::Applied));

    assert_eq!(session.path().district(), Some("Amritsar"));
    assert_eq!(session.options().districts().len(), 3);
    assert!(session.options().contains(BoundaryLevel::District, "Amritsar"));
    assert_eq!(session.options().subdistricts().len(), 3);
    assert_eq!(session.controller().rendered_level(), Some(BoundaryLevel::Subdistrict));
}

#[test]
fn late_district_list_for_abandoned_state_is_not_published() {
    let mut session = session();
    session.apply(UserAction::SelectState("Punjab".into())).unwrap();
    let punjab = session.take_requests().remove(0);
    session.apply(UserAction::SelectState("Haryana".into())).unwrap();
    session.apply(UserAction::SelectDistrict("Ambala".into())).unwrap();
    session.take_requests();

    assert_eq!(session.complete(punjab.tag, Ok(common::punjab_districts())), Ok(Completion::Stale));
    assert!(session.options().districts().is_empty());
}

#[test]
fn hover_restyles_without_remount() {
    let mut session = session();
    let mounts = session.renderer().mounts();

    assert!(session.hover_at(geo::Point::new(71.5, 30.5)));
    let Some(Op::Restyle { styles, .. }) = session.renderer().ops.last() else { panic!("expected restyle") };
    assert_eq!(styles[1], ShapeStyle::BOUNDARY.hovered());
    assert_eq!(styles[0], ShapeStyle::BOUNDARY);

    assert!(session.hover_at(geo::Point::new(0.0, 0.0)));
    assert!(session.controller().rendered_styles().iter().all(|s| *s == ShapeStyle::BOUNDARY));
    assert!(!session.hover(None));
    assert_eq!(session.renderer().mounts(), mounts);
}
