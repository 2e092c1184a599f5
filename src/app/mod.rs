//! Application-Layer: Kontrollpunkt-Editor, Stil-Befehle und Dokument.

pub mod commands;
pub mod document;
/// Interaktiver Zustandsautomat für Handle- und Vertex-Drags
pub mod editor;

pub use commands::{query_value, CommandState, QueryValue, RelationCommand};
pub use document::{ChangeCounter, Document, DocumentListener, DocumentRecord, NodeRecord};
pub use editor::{
    ControlPointEditor, EditContext, EditOutcome, EditSession, EditorEvent, EditorState,
    HandleKind,
};
