mod common;
use anyhow::Result;
use common::*;
use featurematch::{Mode, Operator, SessionState};

#[test]
fn test_reapplying_is_idempotent() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;
    session.activate();

    for mode in [Mode::Select, Mode::Filter] {
        session.set_mode(mode)?;
        session.click(point(1))?;
        let once = (fixture.selection(), fixture.filter());
        session.reapply()?;
        session.set_mode(mode)?;
        assert_eq!((fixture.selection(), fixture.filter()), once, "{:?}", mode);

        // clicking the same reference again is also a full replace, not a union
        session.click(point(3))?;
        assert_eq!((fixture.selection(), fixture.filter()), once, "{:?}", mode);
    }
    Ok(())
}

#[test]
fn test_mode_round_trip_restores_selection() -> Result<()> {
    let fixture = lanes()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), lanes_field(), Operator::LessThan)?;
    session.activate();
    session.click(point(4))?;
    let original = fixture.selection();
    assert_eq!(original, ids(&[1, 2]));

    session.set_mode(Mode::Filter)?;
    assert!(fixture.selection().is_empty());
    assert_eq!(fixture.filter().as_deref(), Some(r#""lanes" < 30"#));
    assert_eq!(fixture.store.visible(&fixture.layer)?, original);

    session.set_mode(Mode::Select)?;
    assert_eq!(fixture.selection(), original);
    assert_eq!(fixture.filter(), None);
    assert_eq!(session.state(), SessionState::Engaged);
    Ok(())
}

#[test]
fn test_mode_switch_does_not_rescan() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;
    session.activate();
    session.click(point(1))?;

    // the layer changes underneath, but switching mode reuses the computed match
    fixture.store.set_attribute(&fixture.layer, featurematch::FeatureId(2), "name", "A")?;
    session.set_mode(Mode::Filter)?;
    session.set_mode(Mode::Select)?;
    assert_eq!(fixture.selection(), ids(&[1, 3]));

    // a new click rescans
    session.click(point(1))?;
    assert_eq!(fixture.selection(), ids(&[1, 2, 3]));
    Ok(())
}

#[test]
fn test_clear_always_resets_the_layer() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::Equal)?;

    // Inactive
    session.clear()?;
    assert_eq!(session.state(), SessionState::Inactive);

    // Armed
    session.activate();
    session.clear()?;
    assert_eq!(session.state(), SessionState::Armed);

    // Engaged, both modes
    for mode in [Mode::Select, Mode::Filter] {
        session.set_mode(mode)?;
        session.click(point(2))?;
        assert_eq!(session.state(), SessionState::Engaged);
        session.clear()?;
        assert_eq!(session.state(), SessionState::Armed);
        assert!(session.matches().is_none());
        assert!(fixture.selection().is_empty());
        assert_eq!(fixture.filter(), None);
    }
    assert_eq!(session.status().match_count, None);
    Ok(())
}

#[test]
fn test_mode_change_while_armed_applies_on_next_click() -> Result<()> {
    let fixture = names()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), name_field(), Operator::NotEqual)?;
    session.activate();
    session.set_mode(Mode::Filter)?;
    assert_eq!(fixture.filter(), None);

    session.click(point(2))?;
    assert_eq!(fixture.filter().as_deref(), Some(r#"("name" <> 'B' OR "name" IS NULL)"#));
    assert!(fixture.selection().is_empty());
    Ok(())
}
