//! Integrationstests für den Bearbeitungsfluss auf Dokument-Ebene:
//! - Vertex-Drag mit Neubindung, Speichern und Wiederladen
//! - Sichtbarkeit bei eingeklapptem Eltern-Knoten
//! - Stil-Befehle mit anschließendem Neuableiten

use glam::Vec2;
use mindmap_relation_editor::app::ChangeCounter;
use mindmap_relation_editor::{
    ControlPointEditor, Document, EditOutcome, EditableRelation, EditorEvent, Endpoint,
    GeometryProvider, HandleKind, Relation, RelationCommand, RelationFrame, RelationOptions,
    RelationSurface,
};
use serde_json::json;

const DOCUMENT: &str = r#"{
    "nodes": [
        { "id": "root", "x": 0, "y": 0, "width": 100, "height": 40 },
        { "id": "a", "parent": "root", "x": 500, "y": 0, "width": 100, "height": 40 },
        { "id": "n", "x": 200, "y": 300, "width": 100, "height": 40 }
    ],
    "relations": [
        { "id": "r1", "from": "root", "to": "a", "created": 1700000000000 }
    ]
}"#;

#[derive(Default)]
struct RecordingSurface {
    shown: Vec<RelationFrame<'static>>,
    hidden: Vec<String>,
}

impl RelationSurface for RecordingSurface {
    fn label_size(&self, _relation: &Relation) -> Vec2 {
        Vec2::new(40.0, 16.0)
    }

    fn show(&mut self, _relation: &Relation, frame: &RelationFrame<'_>) {
        self.shown.push(frame.clone().into_owned());
    }

    fn hide(&mut self, relation_id: &str) {
        self.hidden.push(relation_id.to_string());
    }
}

fn send(
    editor: &mut ControlPointEditor,
    doc: &mut Document,
    surface: &mut RecordingSurface,
    counter: &mut ChangeCounter,
    event: EditorEvent,
) -> EditOutcome {
    let mut ctx = doc.edit_context(surface, counter);
    editor.dispatch(event, &mut ctx)
}

// ── Vertex-Drag ────────────────────────────────────────────────

#[test]
fn rebound_endpoint_survives_save_and_reload() {
    let mut doc = Document::load_from_str(DOCUMENT).expect("Dokument gültig");
    let mut editor = ControlPointEditor::default();
    let mut surface = RecordingSurface::default();
    let mut counter = ChangeCounter::default();

    doc.relations.get_mut("r1").expect("r1").enable_edit();
    let down = EditorEvent::PointerDown {
        relation_id: "r1".into(),
        point_index: 0,
        handle: HandleKind::Vertex,
        position: Vec2::ZERO,
    };
    assert_eq!(
        send(&mut editor, &mut doc, &mut surface, &mut counter, down),
        EditOutcome::Started
    );

    let drop = EditorEvent::PointerMove {
        point_index: 0,
        handle: HandleKind::Vertex,
        position: Vec2::new(270.0, 330.0),
    };
    assert_eq!(
        send(&mut editor, &mut doc, &mut surface, &mut counter, drop),
        EditOutcome::Rebound {
            node_id: "n".into()
        }
    );
    assert_eq!(
        send(&mut editor, &mut doc, &mut surface, &mut counter, EditorEvent::PointerUp),
        EditOutcome::Released
    );
    assert_eq!(counter.changes, 1);

    let json = doc.to_json().expect("serialisierbar");
    let value: serde_json::Value = serde_json::from_str(&json).expect("JSON");
    let saved = &value["relations"][0];
    assert_eq!(saved["from"], json!("n"));
    assert!(saved["fromPoint"].is_number());
    assert!(saved.get("editable").is_none());

    let reloaded = Document::load_from_str(&json).expect("wieder ladbar");
    let resolver = editor.resolver();
    let before = doc
        .relations
        .get("r1")
        .and_then(|r| r.geometry(&doc.tree, resolver, None))
        .expect("Geometrie vorher");
    let after = reloaded
        .relations
        .get("r1")
        .and_then(|r| r.geometry(&reloaded.tree, resolver, None))
        .expect("Geometrie nachher");
    assert_eq!(before, after);

    let rel = reloaded.relations.get("r1").expect("r1");
    assert!(!rel.is_editable());
    assert_eq!(
        rel.percent(Endpoint::From),
        doc.relations.get("r1").and_then(|r| r.percent(Endpoint::From))
    );
}

#[test]
fn removing_a_bound_node_disables_the_relation() {
    let mut doc = Document::load_from_str(DOCUMENT).expect("Dokument gültig");
    let mut surface = RecordingSurface::default();

    doc.remove_node("a");
    assert_eq!(doc.refresh_all(&RelationOptions::default().resolver(), &mut surface), 0);
    assert_eq!(surface.hidden, vec!["r1".to_string()]);

    let swept = doc.sweep();
    assert_eq!(swept.len(), 1);
    assert!(doc.relations.is_empty());
}

// ── Sichtbarkeit ───────────────────────────────────────────────

#[test]
fn collapsed_parent_hides_relation_until_expanded() {
    let mut doc = Document::load_from_str(DOCUMENT).expect("Dokument gültig");
    let resolver = RelationOptions::default().resolver();
    let mut surface = RecordingSurface::default();

    assert!(doc.tree.set_collapsed("root", true));
    assert_eq!(doc.refresh_all(&resolver, &mut surface), 0);
    assert!(surface.shown.is_empty());
    assert_eq!(surface.hidden, vec!["r1".to_string()]);

    assert!(doc.tree.set_collapsed("root", false));
    assert_eq!(doc.refresh_all(&resolver, &mut surface), 1);
    let frame = surface.shown.last().expect("Frame erwartet");
    assert_eq!(frame.points[0].vertex, Vec2::new(100.0, 20.0));
    assert_eq!(frame.points[1].vertex, Vec2::new(500.0, 20.0));
}

// ── Befehle ────────────────────────────────────────────────────

#[test]
fn style_command_is_visible_after_refresh() {
    let mut doc = Document::load_from_str(DOCUMENT).expect("Dokument gültig");
    let options = RelationOptions::default();
    let mut surface = RecordingSurface::default();
    let targets = vec!["r1".to_string(), "fehlt".to_string()];

    let touched = RelationCommand::UpdateLine {
        key: "line-width".into(),
        value: json!("3"),
    }
    .apply(&mut doc.relations, &targets, &options)
    .expect("Befehl erwartet");
    assert_eq!(touched, vec!["r1".to_string()]);

    RelationCommand::UpdateText {
        key: "text".into(),
        value: json!("hängt ab von"),
    }
    .apply(&mut doc.relations, &targets, &options)
    .expect("Befehl erwartet");

    doc.refresh_all(&options.resolver(), &mut surface);
    let frame = surface.shown.last().expect("Frame erwartet");
    assert_eq!(frame.line_width, 3.0);
    assert_eq!(frame.text, "hängt ab von");
    assert_eq!(frame.dash_array, "2");
}
