//! Core-Domänentypen: Knotenbaum, Beziehungen, Routing, Bézier-Geometrie.

pub mod anchor;
pub mod bezier;
pub mod ids;
pub mod intersect;
mod layout_box;
pub mod node_tree;
/// Beziehungs-Entität mit Datensatz, Stilen und Geometrie-Ableitung
pub mod relation;
pub mod relation_store;
pub mod routing;
pub mod spatial;

pub use anchor::{percent_at, point_at, top_reference, OUTLINE_START_OFFSET};
pub use bezier::{cubic_bezier, BezierPoint, CubicSegment};
pub use ids::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock};
pub use intersect::{check_overlap, segment_intersect, segment_rect_intersect, Overlap};
pub use layout_box::LayoutBox;
pub use node_tree::{DiagramNode, DiagramTree, NodeKey, NodeTree};
pub use relation::{
    EditableRelation, Endpoint, EndpointTarget, GeometryProvider, LineDash, LineStyle, Marker,
    Relation, RelationData, RelationGeometry, TextStyle, DEFAULT_RELATION_TEXT,
};
pub use relation_store::RelationStore;
pub use routing::{angled_controller, GeometryResolver, RouteGeometry, RouteKind, RouteParams};
pub use spatial::{SpatialIndex, SpatialMatch};
