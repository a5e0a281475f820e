mod common;
use anyhow::Result;
use common::*;
use featurematch::error::ConfigurationError;
use featurematch::settings::{MemorySettingsStore, SettingsStore, ToolSettings};
use featurematch::{Mode, Operator, SessionError, SessionState};

#[test]
fn test_apply_settings_configures_the_session() -> Result<()> {
    let fixture = lanes()?;
    let mut session = fixture.session();

    let mut settings = ToolSettings { mode: Mode::Filter, operator: Operator::GreaterThan, ..Default::default() };
    settings.set_layer(fixture.layer.clone());
    settings.set_field("lanes");
    session.apply_settings(&settings)?;

    // the advanced section is collapsed, so matching is by equality
    assert_eq!(session.target().map(|t| t.operator), Some(Operator::Equal));
    assert_eq!(session.mode(), Mode::Filter);

    settings.advanced_collapsed = false;
    session.apply_settings(&settings)?;
    assert_eq!(session.target().map(|t| t.operator), Some(Operator::GreaterThan));

    session.activate();
    session.click(point(1))?;
    assert_eq!(fixture.store.visible(&fixture.layer)?, ids(&[2, 4]));
    Ok(())
}

#[test]
fn test_settings_survive_a_store_round_trip() -> Result<()> {
    let fixture = lanes()?;
    let mut session = fixture.session();
    session.set_target(fixture.layer.clone(), lanes_field(), Operator::LessOrEqual)?;
    session.set_mode(Mode::Filter)?;

    let store = MemorySettingsStore::new();
    store.save(&session.current_settings())?;

    let mut restored = fixture.session();
    restored.apply_settings(&store.load()?)?;
    assert_eq!(restored.target(), session.target());
    assert_eq!(restored.mode(), Mode::Filter);
    assert_eq!(restored.state(), SessionState::Inactive);
    Ok(())
}

#[test]
fn test_settings_naming_an_unknown_field() -> Result<()> {
    let fixture = lanes()?;
    let mut session = fixture.session();
    let settings = ToolSettings::from_json(&format!(r#"{{"layer": "{}", "field": "width"}}"#, fixture.layer))?;
    assert_eq!(
        session.apply_settings(&settings),
        Err(SessionError::Configuration(ConfigurationError::UnknownField { layer: fixture.layer.clone(), field: "width".to_string() }))
    );
    assert!(session.target().is_none());
    Ok(())
}
