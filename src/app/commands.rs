//! Stil-Befehle auf einer vom Aufrufer gelieferten Auswahl von Beziehungen.
//!
//! Die Auswahl selbst lebt außerhalb; Befehle bekommen nur die Ziel-IDs.
//! Nach `apply` muss der Aufrufer betroffene Beziehungen neu ableiten.

use anyhow::Context;
use serde_json::{json, Value};

use crate::core::RelationStore;
use crate::shared::RelationOptions;

/// Befehle auf ausgewählten Beziehungen.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationCommand {
    /// Linien-Eigenschaft setzen (`line-width`, `line-color`, `line-style`, Marker)
    UpdateLine { key: String, value: Value },
    /// Text-Eigenschaft setzen (`text`, `color`, `font-size`, …)
    UpdateText { key: String, value: Value },
    /// Textstil auf Standardwerte zurücksetzen
    ClearTextStyle,
    /// Schriftgröße um `diff` ändern (begrenzt auf den Options-Bereich)
    StepFontSize { diff: f32 },
    /// Kontrollpunkt-Overrides verwerfen
    ClearControlPoints,
}

/// Ausführbarkeit eines Befehls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Disabled,
    Enabled,
}

/// Aktueller Wert einer Eigenschaft über die Auswahl.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Genau eine Beziehung ausgewählt
    Single(Value),
    /// Keine oder mehrere Beziehungen ausgewählt
    Mixed,
}

impl RelationCommand {
    /// Aktiv genau dann, wenn mindestens ein Ziel ausgewählt ist.
    pub fn state(targets: &[String]) -> CommandState {
        if targets.is_empty() {
            CommandState::Disabled
        } else {
            CommandState::Enabled
        }
    }

    /// Wendet den Befehl auf alle vorhandenen Ziele an; gibt deren IDs zurück.
    ///
    /// Unbekannte IDs werden übersprungen. Schlägt ein Merge fehl, bleiben
    /// bereits bearbeitete Ziele geändert und der Fehler wird weitergereicht.
    pub fn apply(
        &self,
        store: &mut RelationStore,
        targets: &[String],
        options: &RelationOptions,
    ) -> anyhow::Result<Vec<String>> {
        let mut touched = Vec::with_capacity(targets.len());
        for id in targets {
            let Some(relation) = store.get_mut(id) else {
                log::warn!("Befehl {:?}: Beziehung '{}' nicht gefunden", self, id);
                continue;
            };
            match self {
                RelationCommand::UpdateLine { key, value }
                | RelationCommand::UpdateText { key, value } => {
                    let mut patch = serde_json::Map::new();
                    patch.insert(key.clone(), value.clone());
                    relation
                        .set_data(Value::Object(patch))
                        .with_context(|| format!("'{}' für Beziehung '{}' ungültig", key, id))?;
                }
                RelationCommand::ClearTextStyle => relation.set_default_text_style(),
                RelationCommand::StepFontSize { diff } => {
                    let size = options.clamp_font_size(relation.text_style().font_size + diff);
                    relation.set_data(json!({ "font-size": size }))?;
                }
                RelationCommand::ClearControlPoints => relation.clear_controllers(),
            }
            touched.push(id.clone());
        }
        log::debug!("Befehl {:?} auf {} Beziehung(en) angewendet", self, touched.len());
        Ok(touched)
    }
}

/// Wert von `key` in der einzigen Auswahl, sonst [`QueryValue::Mixed`].
pub fn query_value(store: &RelationStore, targets: &[String], key: &str) -> QueryValue {
    let [id] = targets else {
        return QueryValue::Mixed;
    };
    let Some(relation) = store.get(id) else {
        return QueryValue::Mixed;
    };
    match serde_json::to_value(relation.data()) {
        Ok(Value::Object(mut fields)) => {
            QueryValue::Single(fields.remove(key).unwrap_or(Value::Null))
        }
        _ => QueryValue::Mixed,
    }
}
