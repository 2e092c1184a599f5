//! Zentrale Konfiguration für Beziehungslinien.
//!
//! `RelationOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{GeometryResolver, RouteParams};

// ── Vertex-Drag ─────────────────────────────────────────────────────

/// Halbe Kantenlänge des Suchquadrats um den Zeiger beim Vertex-Drag.
pub const SNAP_HALF_EXTENT: f32 = 15.0;
/// Abstand, unter dem ein Handle als deckungsgleich mit dem Vertex gilt.
pub const OVERLAP_THRESHOLD: f32 = 5.0;

// ── Text ────────────────────────────────────────────────────────────

/// Kleinste Schriftgröße für `StepFontSize`.
pub const FONT_SIZE_MIN: f32 = 9.0;
/// Größte Schriftgröße für `StepFontSize`.
pub const FONT_SIZE_MAX: f32 = 96.0;
/// Geschätzte Zeichenbreite relativ zur Schriftgröße (ohne Text-Layout).
pub const LABEL_CHAR_WIDTH_FACTOR: f32 = 0.6;
/// Zeilenhöhe relativ zur Schriftgröße.
pub const LABEL_LINE_HEIGHT_FACTOR: f32 = 1.2;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Beziehungs-Optionen.
/// Wird als `relation_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationOptions {
    // ── Vertex-Drag ─────────────────────────────────────────────
    /// Halbe Kantenlänge des Snap-Quadrats
    pub snap_half_extent: f32,
    /// Überdeckungs-Schwelle für Handle-Ausblendung
    pub overlap_threshold: f32,

    // ── Text ────────────────────────────────────────────────────
    pub font_size_min: f32,
    pub font_size_max: f32,
    /// Zeichenbreiten-Faktor für die Label-Schätzung
    #[serde(default = "default_label_char_width_factor")]
    pub label_char_width_factor: f32,
    /// Zeilenhöhen-Faktor für die Label-Schätzung
    #[serde(default = "default_label_line_height_factor")]
    pub label_line_height_factor: f32,

    // ── Routing ─────────────────────────────────────────────────
    /// Schwellwerte der Standard-Routing-Heuristik (eigene TOML-Tabelle)
    #[serde(default)]
    pub routing: RouteParams,
}

impl Default for RelationOptions {
    fn default() -> Self {
        Self {
            snap_half_extent: SNAP_HALF_EXTENT,
            overlap_threshold: OVERLAP_THRESHOLD,
            font_size_min: FONT_SIZE_MIN,
            font_size_max: FONT_SIZE_MAX,
            label_char_width_factor: LABEL_CHAR_WIDTH_FACTOR,
            label_line_height_factor: LABEL_LINE_HEIGHT_FACTOR,
            routing: RouteParams::default(),
        }
    }
}

/// Serde-Default für `label_char_width_factor` (ältere TOML-Dateien).
fn default_label_char_width_factor() -> f32 {
    LABEL_CHAR_WIDTH_FACTOR
}

/// Serde-Default für `label_line_height_factor` (ältere TOML-Dateien).
fn default_label_line_height_factor() -> f32 {
    LABEL_LINE_HEIGHT_FACTOR
}

impl RelationOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("relation-inspect"))
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("relation_editor.toml")
    }

    /// Resolver mit den konfigurierten Routing-Parametern.
    pub fn resolver(&self) -> GeometryResolver {
        GeometryResolver::new(self.routing)
    }

    /// Schriftgröße auf den erlaubten Bereich begrenzen.
    pub fn clamp_font_size(&self, size: f32) -> f32 {
        size.clamp(self.font_size_min, self.font_size_max)
    }

    /// Geschätzte Label-Größe für einzeiligen Text.
    pub fn estimate_label_size(&self, text: &str, font_size: f32) -> glam::Vec2 {
        let chars = text.chars().count() as f32;
        glam::Vec2::new(
            chars * font_size * self.label_char_width_factor,
            font_size * self.label_line_height_factor,
        )
    }
}
