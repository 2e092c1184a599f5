//! Kontrollpunkt-Editor: Zeiger-Ereignisse → Handle- und Vertex-Bearbeitung.
//!
//! **Handle-Drag:** verschiebt Vorwärts-/Rückwärts-Handle der Live-Kurve und
//! schreibt den wirksamen Kontrollpunkt als `controllerN`-Override.
//!
//! **Vertex-Drag:** sucht den nächsten sichtbaren Knoten im Snap-Quadrat um
//! den Zeiger. Treffer (ungleich Gegen-Endpunkt) hängen den Endpunkt um und
//! setzen den Prozent-Anker; ohne Treffer folgt der Anker frei dem Zeiger und
//! der Prozent-Anker wird verworfen.
//!
//! **Loslassen:** `editable` zurücksetzen, finale Ableitung, Änderung melden.
//!
//! Aufgeteilt in:
//! - `state`: Zustände, Ereignisse, Ergebnisse
//! - `drag`: Handle- und Vertex-Logik

pub(crate) mod drag;
mod state;

pub use state::{EditOutcome, EditSession, EditorEvent, EditorState, HandleKind};

use glam::Vec2;

use super::DocumentListener;
use crate::core::{
    check_overlap, DiagramTree, EditableRelation, Endpoint, GeometryProvider, GeometryResolver,
    Overlap, RelationStore,
};
use crate::shared::{RelationOptions, RelationSurface};

/// Collaborators, die ein `dispatch` benötigt.
pub struct EditContext<'a, T: DiagramTree + ?Sized> {
    pub tree: &'a T,
    pub relations: &'a mut RelationStore,
    pub surface: &'a mut dyn RelationSurface,
    pub listener: &'a mut dyn DocumentListener,
}

/// Zustandsautomat für das interaktive Bearbeiten einer Beziehung.
#[derive(Debug, Clone)]
pub struct ControlPointEditor {
    state: EditorState,
    resolver: GeometryResolver,
    snap_half_extent: f32,
    overlap_threshold: f32,
}

impl Default for ControlPointEditor {
    fn default() -> Self {
        Self::new(&RelationOptions::default())
    }
}

impl ControlPointEditor {
    pub fn new(options: &RelationOptions) -> Self {
        Self {
            state: EditorState::Idle,
            resolver: options.resolver(),
            snap_half_extent: options.snap_half_extent,
            overlap_threshold: options.overlap_threshold,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn resolver(&self) -> &GeometryResolver {
        &self.resolver
    }

    /// Überdeckung der Handles beider Live-Punkte (für das Ausblenden in der UI).
    pub fn handle_overlaps(&self) -> Option<[Overlap; 2]> {
        let session = self.state.session()?;
        Some(session.live.map(|p| check_overlap(&p, self.overlap_threshold)))
    }

    /// Einziger Einstiegspunkt: verarbeitet ein Ereignis im aktuellen Zustand.
    pub fn dispatch<T: DiagramTree + ?Sized>(
        &mut self,
        event: EditorEvent,
        ctx: &mut EditContext<'_, T>,
    ) -> EditOutcome {
        match event {
            EditorEvent::PointerDown {
                relation_id,
                point_index,
                handle,
                position,
            } => self.on_pointer_down(&relation_id, point_index, handle, position, ctx),
            EditorEvent::PointerMove {
                point_index,
                handle,
                position,
            } => self.on_pointer_move(point_index, handle, position, ctx),
            EditorEvent::PointerUp => self.on_pointer_up(ctx),
        }
    }

    fn on_pointer_down<T: DiagramTree + ?Sized>(
        &mut self,
        relation_id: &str,
        point_index: usize,
        handle: HandleKind,
        position: Vec2,
        ctx: &mut EditContext<'_, T>,
    ) -> EditOutcome {
        if !self.state.is_idle() {
            return EditOutcome::Ignored;
        }
        let Some(endpoint) = Endpoint::from_index(point_index) else {
            return EditOutcome::Ignored;
        };
        let Some(relation) = ctx.relations.get(relation_id) else {
            return EditOutcome::Ignored;
        };
        if !relation.is_editable() {
            return EditOutcome::Ignored;
        }
        let Some(geometry) = relation.geometry(ctx.tree, &self.resolver, Some(position)) else {
            return EditOutcome::Ignored;
        };

        log::debug!(
            "Drag gestartet: Beziehung '{}', Punkt {}, {:?}",
            relation_id,
            point_index,
            handle
        );
        self.state = EditorState::dragging(EditSession {
            relation_id: relation_id.to_string(),
            endpoint,
            handle,
            live: geometry.points,
        });
        EditOutcome::Started
    }

    fn on_pointer_move<T: DiagramTree + ?Sized>(
        &mut self,
        point_index: usize,
        handle: HandleKind,
        position: Vec2,
        ctx: &mut EditContext<'_, T>,
    ) -> EditOutcome {
        let snap_half_extent = self.snap_half_extent;
        let resolver = self.resolver;
        let Some(session) = self.state.session_mut() else {
            return EditOutcome::Ignored;
        };
        if !session.matches(point_index, handle) {
            return EditOutcome::Ignored;
        }
        let Some(relation) = ctx.relations.get_mut(&session.relation_id) else {
            log::warn!(
                "Beziehung '{}' während des Drags entfernt, Drag abgebrochen",
                session.relation_id
            );
            self.state = EditorState::Idle;
            return EditOutcome::Ignored;
        };

        match handle {
            HandleKind::Forward | HandleKind::Backward => drag::drag_handle(
                session,
                relation,
                ctx.tree,
                &resolver,
                &mut *ctx.surface,
                position,
            ),
            HandleKind::Vertex => drag::drag_vertex(
                session,
                relation,
                ctx.tree,
                &resolver,
                &mut *ctx.surface,
                snap_half_extent,
                position,
            ),
        }
    }

    fn on_pointer_up<T: DiagramTree + ?Sized>(
        &mut self,
        ctx: &mut EditContext<'_, T>,
    ) -> EditOutcome {
        let state = std::mem::take(&mut self.state);
        let Some(session) = state.session() else {
            return EditOutcome::Ignored;
        };

        if let Some(relation) = ctx.relations.get_mut(&session.relation_id) {
            relation.disable_edit();
            relation.update(ctx.tree, &self.resolver, &mut *ctx.surface);
        }
        ctx.listener.content_changed();
        log::debug!("Drag beendet: Beziehung '{}'", session.relation_id);
        EditOutcome::Released
    }
}
