//! Drag-Logik des Kontrollpunkt-Editors.

use glam::Vec2;

use super::state::{EditOutcome, EditSession, HandleKind};
use crate::core::{
    percent_at, top_reference, DiagramTree, EditableRelation, Endpoint, EndpointTarget,
    GeometryProvider, GeometryResolver, LayoutBox, Relation,
};
use crate::shared::{RelationFrame, RelationSurface};

/// Leitet die Geometrie neu ab und übernimmt sie in die Live-Kurve.
fn refresh_live<T, S>(
    session: &mut EditSession,
    relation: &Relation,
    tree: &T,
    resolver: &GeometryResolver,
    surface: &mut S,
) where
    T: DiagramTree + ?Sized,
    S: RelationSurface + ?Sized,
{
    if let Some(geometry) = relation.render(tree, resolver, surface) {
        session.live = geometry.points;
    }
}

/// Verschiebt ein Handle und schreibt den wirksamen Kontrollpunkt als Override.
///
/// Für Punkt 0 wirkt das Vorwärts-, für Punkt 1 das Rückwärts-Handle; das
/// jeweils andere ist am Vertex gespiegelt.
pub(crate) fn drag_handle<T, S>(
    session: &mut EditSession,
    relation: &mut Relation,
    tree: &T,
    resolver: &GeometryResolver,
    surface: &mut S,
    pos: Vec2,
) -> EditOutcome
where
    T: DiagramTree + ?Sized,
    S: RelationSurface + ?Sized,
{
    let end = session.endpoint;
    let point = &mut session.live[end.index()];
    match session.handle {
        HandleKind::Forward => point.set_forward(pos),
        HandleKind::Backward => point.set_backward(pos),
        HandleKind::Vertex => return EditOutcome::Ignored,
    }
    let effective = match end {
        Endpoint::From => point.forward,
        Endpoint::To => point.backward,
    };

    relation.set_controller(end, Some(effective));
    log::trace!(
        "Beziehung '{}': controller{} = ({:.1}, {:.1})",
        relation.id(),
        end.index(),
        effective.x,
        effective.y
    );
    refresh_live(session, relation, tree, resolver, surface);
    EditOutcome::Moved
}

/// Verschiebt den Anker: rastet auf einen Knoten ein oder folgt frei dem Zeiger.
pub(crate) fn drag_vertex<T, S>(
    session: &mut EditSession,
    relation: &mut Relation,
    tree: &T,
    resolver: &GeometryResolver,
    surface: &mut S,
    snap_half_extent: f32,
    pos: Vec2,
) -> EditOutcome
where
    T: DiagramTree + ?Sized,
    S: RelationSurface + ?Sized,
{
    let end = session.endpoint;
    let region = LayoutBox::from_center(pos, 2.0 * snap_half_extent, 2.0 * snap_half_extent);
    let candidate = tree
        .nearest_node(&region, pos)
        .filter(|key| tree.node_id(*key) != relation.endpoint_node(end.opposite()));

    let Some(key) = candidate else {
        return float_vertex(session, relation, tree, resolver, surface, pos);
    };

    let node_id = tree.node_id(key).to_string();
    let layout = tree.layout_box(key);
    let rebound = relation.endpoint_node(end) != node_id;

    relation.bind_endpoint(end, &node_id);
    relation.set_percent(end, Some(percent_at(&layout, top_reference(&layout), pos)));
    refresh_live(session, relation, tree, resolver, surface);

    if rebound {
        log::debug!(
            "Beziehung '{}': Endpunkt {} auf Knoten '{}' umgehängt",
            relation.id(),
            end.index(),
            node_id
        );
        EditOutcome::Rebound { node_id }
    } else {
        log::trace!(
            "Beziehung '{}': Anker {} auf '{}' verschoben",
            relation.id(),
            end.index(),
            node_id
        );
        EditOutcome::Moved
    }
}

/// Kein Knoten unter dem Zeiger: Prozent-Anker verwerfen, Bindung behalten.
fn float_vertex<T, S>(
    session: &mut EditSession,
    relation: &mut Relation,
    tree: &T,
    resolver: &GeometryResolver,
    surface: &mut S,
    pos: Vec2,
) -> EditOutcome
where
    T: DiagramTree + ?Sized,
    S: RelationSurface + ?Sized,
{
    let end = session.endpoint;
    relation.set_percent(end, None);

    let opposite = end.opposite();
    let other = match tree.resolve_node(relation.endpoint_node(opposite)) {
        Some(key) => EndpointTarget::Node(key),
        None => EndpointTarget::Floating(session.live[opposite.index()].vertex),
    };
    let floating = EndpointTarget::Floating(pos);
    let (from, to) = match end {
        Endpoint::From => (floating, other),
        Endpoint::To => (other, floating),
    };

    let geometry = relation.geometry_between(tree, resolver, from, to);
    session.live = geometry.points;
    let label_size = surface.label_size(relation);
    surface.show(relation, &RelationFrame::new(relation, &geometry, label_size));
    log::trace!(
        "Beziehung '{}': Anker {} frei bei ({:.1}, {:.1})",
        relation.id(),
        end.index(),
        pos.x,
        pos.y
    );
    EditOutcome::Floating
}
