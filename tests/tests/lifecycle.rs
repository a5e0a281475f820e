mod common;
use anyhow::Result;
use common::*;
use featurematch::core::host::memory::{Faults, MemoryFeature};
use featurematch::core::host::ScreenPoint;
use featurematch::error::{ConfigurationError, ExtractionError};
use featurematch::notice::Notice;
use featurematch::{ErrorKind, FeatureId, FieldRef, FieldType, Mode, Operator, SessionError, SessionState, ToolId, Value};

#[test]
fn test_null_reference_never_engages() -> Result<()> {
    let fixture = lanes()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), lanes_field(), Operator::Equal)?;
    session.activate();

    let err = session.click(point(3)).unwrap_err();
    assert_eq!(err, SessionError::Extraction(ExtractionError::NullValue { field: "lanes".to_string(), feature: FeatureId(3) }));
    assert_eq!(session.state(), SessionState::Armed);
    assert!(fixture.selection().is_empty());
    assert_eq!(session.status().last_error, Some(ErrorKind::Extraction));

    // while Engaged, a null click keeps the previous match
    session.click(point(2))?;
    assert!(session.click(point(3)).is_err());
    assert_eq!(session.state(), SessionState::Engaged);
    assert_eq!(fixture.selection(), ids(&[2]));
    assert_eq!(session.reference().map(|r| r.feature()), Some(FeatureId(2)));
    Ok(())
}

#[test]
fn test_missing_field_on_clicked_feature() -> Result<()> {
    let fixture = names()?;
    fixture.store.add_feature(&fixture.layer, MemoryFeature::new(9))?;
    fixture.clicks.place(&fixture.layer, point(9), FeatureId(9));
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;
    session.activate();

    assert_eq!(session.click(point(9)), Err(SessionError::Extraction(ExtractionError::FieldMissing("name".to_string()))));
    assert_eq!(session.state(), SessionState::Armed);
    Ok(())
}

#[test]
fn test_click_miss_changes_nothing() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;
    session.activate();
    session.click(point(1))?;

    session.click(ScreenPoint::new(-5, 400))?;
    assert_eq!(session.state(), SessionState::Engaged);
    assert_eq!(fixture.selection(), ids(&[1, 3]));
    assert_eq!(fixture.sink.last(), Some(Notice::NoFeatureAtPoint { layer: fixture.layer.clone() }));
    Ok(())
}

#[test]
fn test_operator_change_rescans_with_retained_reference() -> Result<()> {
    let fixture = lanes()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), lanes_field(), Operator::Equal)?;
    session.activate();
    session.click(point(2))?;
    assert_eq!(fixture.selection(), ids(&[2]));

    session.set_operator(Operator::GreaterThan)?;
    assert_eq!(session.state(), SessionState::Engaged);
    assert_eq!(fixture.selection(), ids(&[4]));

    session.set_operator(Operator::NotEqual)?;
    assert_eq!(fixture.selection(), ids(&[1, 3, 4]));

    // set_target with the same field is an operator change too
    session.set_target(fixture.layer.clone(), lanes_field(), Operator::LessOrEqual)?;
    assert_eq!(fixture.selection(), ids(&[1, 2]));
    assert_eq!(session.reference().map(|r| r.value().clone()), Some(Value::from(20i64)));
    Ok(())
}

#[test]
fn test_relational_operator_on_text_is_rejected_up_front() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    let err = session.set_target(fixture.layer.clone(), name_field(), Operator::GreaterThan).unwrap_err();
    assert_eq!(err, SessionError::Configuration(ConfigurationError::UnsupportedOperator { operator: Operator::GreaterThan, field_type: FieldType::Text }));
    assert!(session.target().is_none());

    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;
    session.activate();
    session.click(point(1))?;
    assert!(session.set_operator(Operator::LessThan).is_err());
    assert_eq!(session.target().map(|t| t.operator), Some(Operator::Equal));
    assert_eq!(session.state(), SessionState::Engaged);
    assert_eq!(fixture.selection(), ids(&[1, 3]));
    Ok(())
}

#[test]
fn test_target_validated_against_layer_schema() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    assert_eq!(
        session.set_target(fixture.layer.clone(), FieldRef::new("width", FieldType::Real), Operator::Equal),
        Err(SessionError::Configuration(ConfigurationError::UnknownField { layer: fixture.layer.clone(), field: "width".to_string() }))
    );
    assert_eq!(
        session.set_target(fixture.layer.clone(), FieldRef::new("name", FieldType::Integer), Operator::Equal),
        Err(SessionError::Configuration(ConfigurationError::FieldTypeMismatch {
            field: "name".to_string(),
            declared: FieldType::Integer,
            actual: FieldType::Text
        }))
    );
    assert_eq!(
        session.set_target("nowhere", name_field(), Operator::Equal),
        Err(SessionError::Configuration(ConfigurationError::UnknownLayer("nowhere".into())))
    );
    assert_eq!(session.set_target("", name_field(), Operator::Equal), Err(SessionError::Configuration(ConfigurationError::MissingLayer)));
    Ok(())
}

#[test]
fn test_layer_change_drops_to_armed() -> Result<()> {
    let fixture = names()?;
    let parcels = fixture.add_layer("parcels", vec![("name", FieldType::Text)], vec![MemoryFeature::new(1).with("name", "A")])?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;
    session.set_mode(Mode::Filter)?;
    session.activate();
    session.click(point(1))?;
    assert!(fixture.filter().is_some());

    session.set_target(parcels.clone(), name_field(), Operator::Equal)?;
    assert_eq!(session.state(), SessionState::Armed);
    assert!(session.matches().is_none());
    // the old layer is left showing everything
    assert_eq!(fixture.filter(), None);
    assert_eq!(fixture.store.filter(&parcels), None);

    session.click(point(1))?;
    assert_eq!(fixture.store.filter(&parcels).as_deref(), Some(r#""name" = 'A'"#));
    Ok(())
}

#[test]
fn test_host_failure_reverts_to_armed() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;
    session.activate();
    session.click(point(2))?;
    assert_eq!(fixture.selection(), ids(&[2]));

    fixture.store.set_faults(Faults { select: true, ..Default::default() });
    let err = session.click(point(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HostApplyFailure);
    assert_eq!(session.state(), SessionState::Armed);
    assert!(session.matches().is_none());
    assert!(fixture.selection().is_empty());
    assert_eq!(session.status().last_error, Some(ErrorKind::HostApplyFailure));
    assert!(matches!(fixture.sink.last(), Some(Notice::Failed { kind: ErrorKind::HostApplyFailure, .. })));

    fixture.store.set_faults(Faults::default());
    session.click(point(1))?;
    assert_eq!(session.state(), SessionState::Engaged);
    assert_eq!(session.last_error(), None);
    Ok(())
}

#[test]
fn test_filter_install_failure_reverts_to_armed() -> Result<()> {
    let fixture = names()?;
    fixture.store.set_faults(Faults { install_filter: true, ..Default::default() });
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;
    session.activate();
    session.click(point(1))?;

    let err = session.set_mode(Mode::Filter).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HostApplyFailure);
    assert_eq!(session.state(), SessionState::Armed);
    assert!(fixture.selection().is_empty());
    assert_eq!(fixture.filter(), None);
    Ok(())
}

#[test]
fn test_deactivate_reports_failed_cleanup_but_still_stops() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;
    session.activate();
    session.click(point(1))?;

    fixture.store.set_faults(Faults { clear: true, ..Default::default() });
    let err = session.deactivate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HostApplyFailure);
    assert_eq!(session.state(), SessionState::Inactive);
    assert!(session.matches().is_none());
    Ok(())
}

#[test]
fn test_foreign_tool_interrupts() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;

    for start in [SessionState::Inactive, SessionState::Armed, SessionState::Engaged] {
        if start != SessionState::Inactive {
            session.activate();
        }
        if start == SessionState::Engaged {
            session.click(point(1))?;
        }
        assert_eq!(session.state(), start);

        // our own tool being re-selected is not an interruption
        session.on_tool_changed(session.tool_id())?;
        assert_eq!(session.state(), start);

        session.on_tool_changed(ToolId::new())?;
        assert_eq!(session.state(), SessionState::Inactive);
        assert!(fixture.selection().is_empty());
    }

    // reactivation works after an interruption
    session.activate();
    session.click(point(2))?;
    assert_eq!(fixture.selection(), ids(&[2]));
    Ok(())
}

#[test]
fn test_click_without_target() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    session.activate();
    assert_eq!(session.click(point(1)), Err(SessionError::NoTarget));
    assert_eq!(session.status().last_error, Some(ErrorKind::NoTarget));
    Ok(())
}

#[test]
fn test_skipped_rows_are_reported() -> Result<()> {
    let fixture = names()?;
    fixture.store.add_feature(&fixture.layer, MemoryFeature::new(4).with("name", 4i64))?;
    fixture.store.add_feature(&fixture.layer, MemoryFeature::new(5).with("name", Value::Null))?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;
    session.activate();
    session.click(point(1))?;

    let status = session.status();
    assert_eq!((status.match_count, status.skipped_count), (Some(2), 1));
    match fixture.sink.last() {
        Some(notice @ Notice::Matched { .. }) => assert_eq!(notice.level(), featurematch::notice::Level::Warning),
        other => panic!("expected a match notice, got {:?}", other),
    }
    Ok(())
}
