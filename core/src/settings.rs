//! Persistable tool configuration: which layer and field to match on, and how.

use crate::error::SettingsError;
use crate::field::LayerId;
use crate::operator::Operator;
use crate::session::Mode;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSettings {
    pub layer: Option<LayerId>,
    pub field: Option<String>,
    pub mode: Mode,
    pub operator: Operator,
    /// While collapsed, the operator picker is hidden and matching is always by equality
    pub advanced_collapsed: bool,
}

impl Default for ToolSettings {
    fn default() -> Self { Self { layer: None, field: None, mode: Mode::Select, operator: Operator::Equal, advanced_collapsed: true } }
}

impl ToolSettings {
    pub fn effective_operator(&self) -> Operator {
        if self.advanced_collapsed {
            Operator::Equal
        } else {
            self.operator
        }
    }

    /// Empty ids are ignored
    pub fn set_layer(&mut self, layer: impl Into<LayerId>) {
        let layer = layer.into();
        if !layer.is_empty() {
            self.layer = Some(layer);
        }
    }

    /// Empty names are ignored
    pub fn set_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        if !field.is_empty() {
            self.field = Some(field);
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> { Ok(serde_json::to_string_pretty(self)?) }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> { Ok(serde_json::from_str(json)?) }
}

pub trait SettingsStore {
    /// Stored settings, or the defaults if nothing was saved
    fn load(&self) -> Result<ToolSettings, SettingsError>;
    fn save(&self, settings: &ToolSettings) -> Result<(), SettingsError>;
    fn reset(&self) -> Result<(), SettingsError>;
}

/// Keeps the serialized document in memory
#[derive(Default)]
pub struct MemorySettingsStore(RwLock<Option<String>>);

impl MemorySettingsStore {
    pub fn new() -> Self { Self::default() }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<ToolSettings, SettingsError> {
        match self.0.read().unwrap_or_else(PoisonError::into_inner).as_deref() {
            Some(json) => ToolSettings::from_json(json),
            None => Ok(ToolSettings::default()),
        }
    }

    fn save(&self, settings: &ToolSettings) -> Result<(), SettingsError> {
        let json = settings.to_json()?;
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(json);
        Ok(())
    }

    fn reset(&self) -> Result<(), SettingsError> {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
