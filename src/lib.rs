//! Mindmap Relation Editor Library.
//! Beziehungslinien zwischen Diagramm-Knoten: Routing, Anker, interaktives Bearbeiten.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    ControlPointEditor, Document, DocumentListener, EditContext, EditOutcome, EditorEvent,
    EditorState, HandleKind, RelationCommand,
};
pub use core::{
    BezierPoint, DiagramTree, EditableRelation, Endpoint, GeometryProvider, GeometryResolver,
    LayoutBox, NodeKey, NodeTree, Relation, RelationData, RelationGeometry, RelationStore,
};
pub use shared::{RelationFrame, RelationOptions, RelationSurface};
