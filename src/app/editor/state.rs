//! Zustände, Ereignisse und Ergebnisse des Kontrollpunkt-Editors.

use glam::Vec2;

use crate::core::{BezierPoint, Endpoint};

/// Welcher Teil eines Bézier-Punkts wird gezogen?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Forward,
    Backward,
    /// Der Anker selbst
    Vertex,
}

/// Transienter Zustand eines laufenden Drags.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub relation_id: String,
    pub endpoint: Endpoint,
    pub handle: HandleKind,
    /// Live-Kurve, wie sie der Benutzer gerade sieht
    pub live: [BezierPoint; 2],
}

impl EditSession {
    pub fn live_point(&self) -> &BezierPoint {
        &self.live[self.endpoint.index()]
    }

    /// `true` wenn ein Move-Ereignis zu Punkt und Handle dieses Drags passt.
    pub(crate) fn matches(&self, point_index: usize, handle: HandleKind) -> bool {
        Endpoint::from_index(point_index) == Some(self.endpoint) && handle == self.handle
    }
}

/// Zustandsautomat des Editors.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    DraggingForwardHandle(EditSession),
    DraggingBackwardHandle(EditSession),
    DraggingVertex(EditSession),
}

impl EditorState {
    pub(crate) fn dragging(session: EditSession) -> Self {
        match session.handle {
            HandleKind::Forward => EditorState::DraggingForwardHandle(session),
            HandleKind::Backward => EditorState::DraggingBackwardHandle(session),
            HandleKind::Vertex => EditorState::DraggingVertex(session),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn session(&self) -> Option<&EditSession> {
        match self {
            EditorState::Idle => None,
            EditorState::DraggingForwardHandle(s)
            | EditorState::DraggingBackwardHandle(s)
            | EditorState::DraggingVertex(s) => Some(s),
        }
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut EditSession> {
        match self {
            EditorState::Idle => None,
            EditorState::DraggingForwardHandle(s)
            | EditorState::DraggingBackwardHandle(s)
            | EditorState::DraggingVertex(s) => Some(s),
        }
    }
}

/// Diskrete Eingaben des Editors.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    PointerDown {
        relation_id: String,
        /// 0 = Start, 1 = Ziel
        point_index: usize,
        handle: HandleKind,
        position: Vec2,
    },
    PointerMove {
        point_index: usize,
        handle: HandleKind,
        position: Vec2,
    },
    PointerUp,
}

/// Ergebnis eines `dispatch`-Aufrufs.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Ereignis passt nicht zum Zustand; nichts geändert
    Ignored,
    Started,
    /// Handle oder gebundener Anker verschoben
    Moved,
    /// Endpunkt auf einen anderen Knoten umgehängt
    Rebound { node_id: String },
    /// Anker folgt frei dem Zeiger
    Floating,
    Released,
}
