//! Beziehungs-Entität: persistierter Datensatz plus Geometrie-Ableitung.
//!
//! Eine Beziehung hält nur Knoten-IDs und löst sie bei jeder Ableitung
//! über [`DiagramTree`] auf. Vorrang pro Endpunkt: expliziter
//! Kontrollpunkt-Override, dann Prozent-Anker, dann Routing-Heuristik.

mod record;
mod style;


pub use record::{
    coerce_field, coerce_number, coerce_point, normalize_percent, RelationData, CONTROLLER_KEYS,
    NUMBER_KEYS,
};
pub use style::{
    FontStyle, FontWeight, LineDash, LineStyle, Marker, TextDecoration, TextStyle,
    DEFAULT_FONT_SIZE, DEFAULT_LINE_COLOR, DEFAULT_LINE_WIDTH, DEFAULT_TEXT_COLOR,
};

use anyhow::{bail, Context};
use glam::Vec2;
use serde::Serialize;
use serde_json::Value;

use super::{anchor, BezierPoint, CubicSegment, DiagramTree, GeometryResolver, LayoutBox, NodeKey};
use crate::shared::{RelationFrame, RelationSurface};

/// Beschriftung, wenn der Datensatz keinen Text enthält.
pub const DEFAULT_RELATION_TEXT: &str = "Beziehung";

/// Endpunkt einer Beziehung (Index 0 = Start, 1 = Ziel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    From,
    To,
}

impl Endpoint {
    pub const BOTH: [Endpoint; 2] = [Endpoint::From, Endpoint::To];

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Endpoint::From),
            1 => Some(Endpoint::To),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Endpoint::From => 0,
            Endpoint::To => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Endpoint::From => Endpoint::To,
            Endpoint::To => Endpoint::From,
        }
    }
}

/// Wohin ein Endpunkt bei der Ableitung zeigt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndpointTarget {
    /// Aufgelöster Knoten
    Node(NodeKey),
    /// Freier Punkt (Zeiger während Erstellung oder Vertex-Drag)
    Floating(Vec2),
}

/// Fertige Render-Geometrie: zwei Bézier-Punkte und ihre Kontrollpunkte.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelationGeometry {
    pub points: [BezierPoint; 2],
    /// `[Vorwärts-Handle von Punkt 0, Rückwärts-Handle von Punkt 1]`
    pub controllers: [Vec2; 2],
}

impl RelationGeometry {
    pub fn new(from: Vec2, to: Vec2, from_controller: Vec2, to_controller: Vec2) -> Self {
        let mut start = BezierPoint::smooth(from);
        start.set_forward(from_controller);
        let mut end = BezierPoint::smooth(to);
        end.set_backward(to_controller);
        Self {
            points: [start, end],
            controllers: [from_controller, to_controller],
        }
    }

    pub fn segment(&self) -> CubicSegment {
        CubicSegment::between(&self.points[0], &self.points[1])
    }

    /// Punkt bei 50 % Bogenlänge.
    pub fn midpoint(&self) -> Vec2 {
        self.segment().point_at_fraction(0.5)
    }

    /// Linke obere Ecke des Labels, zentriert auf der Kurvenmitte.
    pub fn text_position(&self, label_size: Vec2) -> Vec2 {
        self.midpoint() - label_size * 0.5
    }
}

/// Liefert Sichtbarkeit und Render-Geometrie.
pub trait GeometryProvider {
    fn is_visible<T: DiagramTree + ?Sized>(&self, tree: &T) -> bool;

    /// Geometrie gegen den aktuellen Baum. Ist das Ziel nicht auflösbar,
    /// ersetzt `floating_to` es; ohne Ersatz gibt es keine Geometrie.
    fn geometry<T: DiagramTree + ?Sized>(
        &self,
        tree: &T,
        resolver: &GeometryResolver,
        floating_to: Option<Vec2>,
    ) -> Option<RelationGeometry>;

    fn geometry_between<T: DiagramTree + ?Sized>(
        &self,
        tree: &T,
        resolver: &GeometryResolver,
        from: EndpointTarget,
        to: EndpointTarget,
    ) -> RelationGeometry;
}

/// Schreibzugriff, den der Kontrollpunkt-Editor benötigt.
pub trait EditableRelation {
    fn relation_id(&self) -> &str;
    fn is_editable(&self) -> bool;
    fn enable_edit(&mut self);
    fn disable_edit(&mut self);
    fn endpoint_node(&self, end: Endpoint) -> &str;
    fn bind_endpoint(&mut self, end: Endpoint, node_id: &str);
    fn set_controller(&mut self, end: Endpoint, controller: Option<Vec2>);
    fn set_percent(&mut self, end: Endpoint, percent: Option<f32>);
}

/// Eine Beziehung zwischen zwei Knoten.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    data: RelationData,
    editable: bool,
}

impl Relation {
    pub fn new(data: RelationData) -> Self {
        Self {
            data,
            editable: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.data.id = id;
    }

    pub fn from(&self) -> &str {
        &self.data.from
    }

    pub fn to(&self) -> &str {
        &self.data.to
    }

    pub fn data(&self) -> &RelationData {
        &self.data
    }

    /// Label-Text, leer fällt auf [`DEFAULT_RELATION_TEXT`] zurück.
    pub fn text(&self) -> &str {
        if self.data.text.is_empty() {
            DEFAULT_RELATION_TEXT
        } else {
            &self.data.text
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.data.text = text.into();
    }

    pub fn line_style(&self) -> &LineStyle {
        &self.data.line
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.data.text_style
    }

    pub fn set_default_text_style(&mut self) {
        self.data.text_style = TextStyle::default();
    }

    /// Flaches Merge von `patch` in den Datensatz.
    ///
    /// `line-width`, `font-size` und Kontrollpunkt-Koordinaten werden dabei
    /// in Zahlen umgewandelt. Die ID ist nicht änderbar.
    pub fn set_data(&mut self, patch: Value) -> anyhow::Result<()> {
        let Value::Object(patch) = patch else {
            bail!("Beziehungsdaten müssen ein JSON-Objekt sein");
        };

        let mut merged = serde_json::to_value(&self.data)
            .context("Beziehungsdaten konnten nicht serialisiert werden")?;
        let Some(fields) = merged.as_object_mut() else {
            bail!("Beziehungsdaten sind kein JSON-Objekt");
        };
        for (key, value) in patch {
            if key == "id" {
                log::warn!("ID von Beziehung '{}' ist unveränderlich", self.data.id);
                continue;
            }
            let value = coerce_field(&key, value);
            fields.insert(key, value);
        }

        let data: RelationData = serde_json::from_value(merged)
            .with_context(|| format!("Ungültige Daten für Beziehung '{}'", self.data.id))?;
        self.data = data;
        Ok(())
    }

    pub fn controller(&self, end: Endpoint) -> Option<Vec2> {
        match end {
            Endpoint::From => self.data.controller0,
            Endpoint::To => self.data.controller1,
        }
    }

    /// Override nur, wenn mindestens eine Koordinate ungleich 0 ist.
    pub fn controller_override(&self, end: Endpoint) -> Option<Vec2> {
        self.controller(end).filter(|c| c.x != 0.0 || c.y != 0.0)
    }

    pub fn clear_controllers(&mut self) {
        self.data.controller0 = None;
        self.data.controller1 = None;
    }

    pub fn percent(&self, end: Endpoint) -> Option<f32> {
        match end {
            Endpoint::From => self.data.from_percent,
            Endpoint::To => self.data.to_percent,
        }
    }

    fn endpoint_target<T: DiagramTree + ?Sized>(&self, tree: &T, end: Endpoint) -> Option<NodeKey> {
        let id = self.endpoint_node(end);
        if id.is_empty() {
            return None;
        }
        tree.resolve_node(id)
    }

    fn anchor_point<T: DiagramTree + ?Sized>(
        &self,
        tree: &T,
        end: Endpoint,
        target: EndpointTarget,
    ) -> Option<Vec2> {
        match target {
            EndpointTarget::Node(key) => self
                .percent(end)
                .map(|percent| anchor::point_at(tree, key, percent)),
            EndpointTarget::Floating(point) => Some(point),
        }
    }

    /// Leitet die Geometrie neu ab und meldet sie an `surface`.
    ///
    /// Unsichtbare Beziehungen werden ausgeblendet, ohne Geometrie zu rechnen.
    /// Gibt die resultierende Sichtbarkeit zurück.
    pub fn update<T, S>(&self, tree: &T, resolver: &GeometryResolver, surface: &mut S) -> bool
    where
        T: DiagramTree + ?Sized,
        S: RelationSurface + ?Sized,
    {
        self.render(tree, resolver, surface).is_some()
    }

    /// Wie [`Relation::update`], liefert aber die gezeigte Geometrie zurück.
    pub fn render<T, S>(
        &self,
        tree: &T,
        resolver: &GeometryResolver,
        surface: &mut S,
    ) -> Option<RelationGeometry>
    where
        T: DiagramTree + ?Sized,
        S: RelationSurface + ?Sized,
    {
        let geometry = if self.is_visible(tree) {
            self.geometry(tree, resolver, None)
        } else {
            None
        };
        let Some(geometry) = geometry else {
            surface.hide(self.id());
            return None;
        };
        let label_size = surface.label_size(self);
        surface.show(self, &RelationFrame::new(self, &geometry, label_size));
        Some(geometry)
    }
}

fn target_box<T: DiagramTree + ?Sized>(tree: &T, target: EndpointTarget) -> LayoutBox {
    match target {
        EndpointTarget::Node(key) => tree.layout_box(key),
        EndpointTarget::Floating(point) => LayoutBox::from_point(point),
    }
}

impl GeometryProvider for Relation {
    /// Unsichtbar, wenn ein Endpunkt nicht auflösbar ist oder sein Eltern-Knoten
    /// eingeklappt ist. Wurzel-Knoten sind von der Einklapp-Prüfung ausgenommen.
    fn is_visible<T: DiagramTree + ?Sized>(&self, tree: &T) -> bool {
        Endpoint::BOTH.iter().all(|end| {
            self.endpoint_target(tree, *end).is_some_and(|key| {
                tree.parent(key)
                    .is_none_or(|parent| !tree.is_collapsed(parent))
            })
        })
    }

    fn geometry<T: DiagramTree + ?Sized>(
        &self,
        tree: &T,
        resolver: &GeometryResolver,
        floating_to: Option<Vec2>,
    ) -> Option<RelationGeometry> {
        let from = EndpointTarget::Node(self.endpoint_target(tree, Endpoint::From)?);
        let to = match self.endpoint_target(tree, Endpoint::To) {
            Some(key) => EndpointTarget::Node(key),
            None => EndpointTarget::Floating(floating_to?),
        };
        Some(self.geometry_between(tree, resolver, from, to))
    }

    fn geometry_between<T: DiagramTree + ?Sized>(
        &self,
        tree: &T,
        resolver: &GeometryResolver,
        from: EndpointTarget,
        to: EndpointTarget,
    ) -> RelationGeometry {
        let route = resolver.resolve(&target_box(tree, from), &target_box(tree, to));

        let from_point = self
            .anchor_point(tree, Endpoint::From, from)
            .unwrap_or(route.from_point);
        let to_point = self
            .anchor_point(tree, Endpoint::To, to)
            .unwrap_or(route.to_point);
        let from_controller = self
            .controller_override(Endpoint::From)
            .unwrap_or(route.from_controller);
        let to_controller = self
            .controller_override(Endpoint::To)
            .unwrap_or(route.to_controller);

        RelationGeometry::new(from_point, to_point, from_controller, to_controller)
    }
}

impl EditableRelation for Relation {
    fn relation_id(&self) -> &str {
        self.id()
    }

    fn is_editable(&self) -> bool {
        self.editable
    }

    fn enable_edit(&mut self) {
        self.editable = true;
    }

    fn disable_edit(&mut self) {
        self.editable = false;
    }

    fn endpoint_node(&self, end: Endpoint) -> &str {
        match end {
            Endpoint::From => &self.data.from,
            Endpoint::To => &self.data.to,
        }
    }

    fn bind_endpoint(&mut self, end: Endpoint, node_id: &str) {
        let slot = match end {
            Endpoint::From => &mut self.data.from,
            Endpoint::To => &mut self.data.to,
        };
        node_id.clone_into(slot);
    }

    fn set_controller(&mut self, end: Endpoint, controller: Option<Vec2>) {
        match end {
            Endpoint::From => self.data.controller0 = controller,
            Endpoint::To => self.data.controller1 = controller,
        }
    }

    fn set_percent(&mut self, end: Endpoint, percent: Option<f32>) {
        let percent = percent.and_then(|p| normalize_percent(p as f64));
        match end {
            Endpoint::From => self.data.from_percent = percent,
            Endpoint::To => self.data.to_percent = percent,
        }
    }
}
