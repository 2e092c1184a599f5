//! Render-Frame einer Beziehung als Übergabevertrag zwischen Core und Renderer.
//!
//! Lebt im shared-Modul, da `core` ihn baut und der Renderer ihn konsumiert.
//! Gezeichnet wird ausschließlich auf Seite des Renderers.

use std::borrow::Cow;

use glam::Vec2;
use serde::Serialize;

use crate::core::{BezierPoint, Marker, Relation, RelationGeometry};

/// Read-only Daten für die Darstellung einer sichtbaren Beziehung.
///
/// Texte werden aus der Beziehung geliehen; wer den Frame über den
/// `show`-Aufruf hinaus hält, nimmt [`RelationFrame::into_owned`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationFrame<'a> {
    pub relation_id: Cow<'a, str>,
    /// Start- und End-Punkt mit Handles
    pub points: [BezierPoint; 2],
    /// Linke obere Ecke des Labels
    pub text_position: Vec2,
    pub text: Cow<'a, str>,
    pub line_width: f32,
    pub line_color: Cow<'a, str>,
    /// SVG-`stroke-dasharray`
    pub dash_array: &'static str,
    pub from_marker: Marker,
    pub to_marker: Marker,
}

impl<'a> RelationFrame<'a> {
    pub fn new(relation: &'a Relation, geometry: &RelationGeometry, label_size: Vec2) -> Self {
        let line = relation.line_style();
        Self {
            relation_id: Cow::Borrowed(relation.id()),
            points: geometry.points,
            text_position: geometry.text_position(label_size),
            text: Cow::Borrowed(relation.text()),
            line_width: line.width,
            line_color: Cow::Borrowed(line.color.as_str()),
            dash_array: line.dash.dash_array(),
            from_marker: line.from_marker,
            to_marker: line.to_marker,
        }
    }

    /// Löst den Frame von der Beziehung.
    pub fn into_owned(self) -> RelationFrame<'static> {
        RelationFrame {
            relation_id: Cow::Owned(self.relation_id.into_owned()),
            points: self.points,
            text_position: self.text_position,
            text: Cow::Owned(self.text.into_owned()),
            line_width: self.line_width,
            line_color: Cow::Owned(self.line_color.into_owned()),
            dash_array: self.dash_array,
            from_marker: self.from_marker,
            to_marker: self.to_marker,
        }
    }
}

/// Renderer-Collaborator: misst Labels und nimmt Frames entgegen.
pub trait RelationSurface {
    /// Gemessene Inhaltsbox des Labels (Breite, Höhe).
    fn label_size(&self, relation: &Relation) -> Vec2;
    fn show(&mut self, relation: &Relation, frame: &RelationFrame<'_>);
    /// Blendet den Render-Container der Beziehung aus.
    fn hide(&mut self, relation_id: &str);
}
