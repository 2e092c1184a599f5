//! Relation Inspector.
//!
//! Lädt ein Diagramm-Dokument, leitet alle Beziehungen ab und gibt die
//! Render-Frames als JSON auf stdout aus.
//!
//! Aufruf: `relation-inspect <dokument.json> [optionen.toml]`
//! Fehlt die Optionen-Datei, werden dort die Standardwerte abgelegt.

use std::path::PathBuf;

use anyhow::Context;
use glam::Vec2;
use mindmap_relation_editor::{Document, Relation, RelationFrame, RelationOptions, RelationSurface};
use serde::Serialize;

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Relation Inspector v{} startet...", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let document_path = args
        .next()
        .map(PathBuf::from)
        .context("Aufruf: relation-inspect <dokument.json> [optionen.toml]")?;
    let options_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(RelationOptions::config_path);

    let options = RelationOptions::load_from_file(&options_path);
    if !options_path.exists() {
        // Standardwerte als editierbare Vorlage ablegen
        if let Err(e) = options.save_to_file(&options_path) {
            log::warn!("Optionen-Vorlage nicht geschrieben: {:#}", e);
        }
    }
    let document = Document::load_from_file(&document_path)?;

    let mut surface = JsonSurface::new(&options);
    let visible = document.refresh_all(&options.resolver(), &mut surface);
    log::info!(
        "{} von {} Beziehungen sichtbar",
        visible,
        document.relations.len()
    );

    let output = serde_json::to_string_pretty(&surface.entries)
        .context("Frames nicht serialisierbar")?;
    println!("{}", output);
    Ok(())
}

/// Ein Eintrag der Ausgabe pro Beziehung.
#[derive(Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
enum FrameEntry {
    Visible(RelationFrame<'static>),
    Hidden { relation_id: String },
}

/// Sammelt Frames; Label-Größen werden aus den Schrift-Optionen geschätzt.
struct JsonSurface<'a> {
    options: &'a RelationOptions,
    entries: Vec<FrameEntry>,
}

impl<'a> JsonSurface<'a> {
    fn new(options: &'a RelationOptions) -> Self {
        Self {
            options,
            entries: Vec::new(),
        }
    }
}

impl RelationSurface for JsonSurface<'_> {
    fn label_size(&self, relation: &Relation) -> Vec2 {
        self.options
            .estimate_label_size(relation.text(), relation.text_style().font_size)
    }

    fn show(&mut self, _relation: &Relation, frame: &RelationFrame<'_>) {
        self.entries
            .push(FrameEntry::Visible(frame.clone().into_owned()));
    }

    fn hide(&mut self, relation_id: &str) {
        self.entries.push(FrameEntry::Hidden {
            relation_id: relation_id.to_string(),
        });
    }
}
