//! Knotenbaum des Diagramms: Collaborator-Schnittstelle und Arena-Implementierung.
//!
//! Beziehungen speichern nur Knoten-IDs und lösen sie über [`DiagramTree`]
//! auf. Die Arena ist append-only; entfernte Knoten bleiben als abgehängte
//! Slots stehen, damit bereits ausgegebene [`NodeKey`]s gültig bleiben.

use std::collections::HashMap;

use anyhow::{bail, Context};
use glam::Vec2;

use super::{LayoutBox, SpatialIndex, OUTLINE_START_OFFSET};

/// Index eines Knotens in der Arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey(pub usize);

/// Lesezugriff auf Knotenbaum und Layout, wie ihn Beziehungen benötigen.
pub trait DiagramTree {
    /// Löst eine ID auf; `None` ist ein legaler Übergangszustand.
    fn resolve_node(&self, id: &str) -> Option<NodeKey>;
    fn node_id(&self, node: NodeKey) -> &str;
    /// Absolute Layout-Box des Knotens.
    fn layout_box(&self, node: NodeKey) -> LayoutBox;
    /// Gesamtlänge der Umrisslinie.
    fn outline_length(&self, node: NodeKey) -> f32;
    /// Punkt auf der Umrisslinie in lokalen Koordinaten (relativ zu `layout_origin`).
    ///
    /// Die Länge läuft im Uhrzeigersinn; Länge 0 liegt
    /// `OUTLINE_START_OFFSET · outline_length` hinter der Mitte der Oberkante.
    fn point_at_outline_length(&self, node: NodeKey, length: f32) -> Vec2;
    fn layout_origin(&self, node: NodeKey) -> Vec2;
    /// `true` wenn der Knoten selbst oder ein Vorfahre eingeklappt ist.
    fn is_collapsed(&self, node: NodeKey) -> bool;
    fn parent(&self, node: NodeKey) -> Option<NodeKey>;
    /// Sichtbarer Knoten, dessen Box `region` schneidet und `focus` am nächsten liegt.
    fn nearest_node(&self, region: &LayoutBox, focus: Vec2) -> Option<NodeKey>;
}

/// Ein Knoten der Arena.
#[derive(Debug, Clone)]
pub struct DiagramNode {
    pub id: String,
    pub parent: Option<NodeKey>,
    pub children: Vec<NodeKey>,
    /// Layout-Ursprung (linke obere Ecke der Umriss-Box)
    pub origin: Vec2,
    pub size: Vec2,
    /// Eigener Einklapp-Zustand
    pub collapsed: bool,
    detached: bool,
}

impl DiagramNode {
    /// Umriss in lokalen Koordinaten.
    pub fn outline(&self) -> LayoutBox {
        LayoutBox::new(0.0, 0.0, self.size.x, self.size.y)
    }
}

/// Arena-basierter Knotenbaum mit Spatial-Index.
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<DiagramNode>,
    ids: HashMap<String, NodeKey>,
    spatial_index: SpatialIndex,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            ids: HashMap::new(),
            spatial_index: SpatialIndex::empty(),
        }
    }

    /// Anzahl angehängter Knoten.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Fügt einen Knoten mit absoluter Layout-Box ein.
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        parent: Option<&str>,
        layout: LayoutBox,
    ) -> anyhow::Result<NodeKey> {
        let key = self.insert_unindexed(id.into(), parent, layout, false)?;
        self.rebuild_spatial_index();
        Ok(key)
    }

    /// Fügt einen Knoten ein, ohne den Spatial-Index neu aufzubauen.
    ///
    /// Nach einer Folge solcher Aufrufe muss [`NodeTree::reindex`] laufen.
    pub(crate) fn insert_unindexed(
        &mut self,
        id: String,
        parent: Option<&str>,
        layout: LayoutBox,
        collapsed: bool,
    ) -> anyhow::Result<NodeKey> {
        if id.is_empty() {
            bail!("Knoten-ID darf nicht leer sein");
        }
        if self.ids.contains_key(&id) {
            bail!("Knoten-ID '{}' existiert bereits", id);
        }
        let parent_key = match parent {
            Some(parent_id) => Some(
                self.ids
                    .get(parent_id)
                    .copied()
                    .with_context(|| format!("Eltern-Knoten '{}' nicht gefunden", parent_id))?,
            ),
            None => None,
        };

        let key = NodeKey(self.nodes.len());
        self.nodes.push(DiagramNode {
            id: id.clone(),
            parent: parent_key,
            children: Vec::new(),
            origin: layout.min(),
            size: Vec2::new(layout.width, layout.height),
            collapsed,
            detached: false,
        });
        if let Some(parent_key) = parent_key {
            self.nodes[parent_key.0].children.push(key);
        }
        self.ids.insert(id, key);
        Ok(key)
    }

    /// Baut den Spatial-Index einmalig nach einem Batch-Import auf.
    pub(crate) fn reindex(&mut self) {
        self.rebuild_spatial_index();
    }

    /// Entfernt einen Knoten samt Teilbaum; gibt die entfernten IDs zurück.
    pub fn remove_subtree(&mut self, id: &str) -> Vec<String> {
        let Some(root) = self.ids.get(id).copied() else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            let node = &mut self.nodes[key.0];
            node.detached = true;
            stack.extend(node.children.iter().copied());
            removed.push(node.id.clone());
            self.ids.remove(&node.id);
        }
        if let Some(parent) = self.nodes[root.0].parent {
            self.nodes[parent.0].children.retain(|c| *c != root);
        }
        self.rebuild_spatial_index();
        removed
    }

    /// Setzt den eigenen Einklapp-Zustand eines Knotens.
    pub fn set_collapsed(&mut self, id: &str, collapsed: bool) -> bool {
        let Some(key) = self.ids.get(id).copied() else {
            return false;
        };
        self.nodes[key.0].collapsed = collapsed;
        self.rebuild_spatial_index();
        true
    }

    /// Verschiebt und/oder skaliert einen Knoten.
    pub fn set_layout(&mut self, id: &str, layout: LayoutBox) -> bool {
        let Some(key) = self.ids.get(id).copied() else {
            return false;
        };
        let node = &mut self.nodes[key.0];
        node.origin = layout.min();
        node.size = Vec2::new(layout.width, layout.height);
        self.rebuild_spatial_index();
        true
    }

    pub fn node(&self, key: NodeKey) -> &DiagramNode {
        &self.nodes[key.0]
    }

    /// Alle angehängten Knoten in Einfüge-Reihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &DiagramNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.detached)
            .map(|(i, n)| (NodeKey(i), n))
    }

    /// `true` wenn ein Vorfahre eingeklappt ist (Knoten damit unsichtbar).
    pub fn is_hidden(&self, key: NodeKey) -> bool {
        self.nodes[key.0]
            .parent
            .is_some_and(|parent| self.is_collapsed(parent))
    }

    fn rebuild_spatial_index(&mut self) {
        let boxes: Vec<(NodeKey, LayoutBox)> = self
            .iter()
            .map(|(key, _)| key)
            .filter(|key| !self.is_hidden(*key))
            .map(|key| (key, self.layout_box(key)))
            .collect();
        self.spatial_index = SpatialIndex::from_boxes(boxes);
    }
}

impl DiagramTree for NodeTree {
    fn resolve_node(&self, id: &str) -> Option<NodeKey> {
        self.ids.get(id).copied()
    }

    fn node_id(&self, node: NodeKey) -> &str {
        &self.nodes[node.0].id
    }

    fn layout_box(&self, node: NodeKey) -> LayoutBox {
        let n = &self.nodes[node.0];
        n.outline().translate(n.origin)
    }

    fn outline_length(&self, node: NodeKey) -> f32 {
        let size = self.nodes[node.0].size;
        2.0 * (size.x + size.y)
    }

    /// Rechteck-Umriss im Uhrzeigersinn, Start hinter der Oberkanten-Mitte.
    fn point_at_outline_length(&self, node: NodeKey, length: f32) -> Vec2 {
        let Vec2 { x: w, y: h } = self.nodes[node.0].size;
        let total = 2.0 * (w + h);
        if total <= 0.0 {
            return Vec2::ZERO;
        }
        // Abstand ab der Oberkanten-Mitte
        let l = (length + OUTLINE_START_OFFSET * total).rem_euclid(total);
        let half = 0.5 * w;
        if l <= half {
            Vec2::new(half + l, 0.0)
        } else if l <= half + h {
            Vec2::new(w, l - half)
        } else if l <= half + h + w {
            Vec2::new(w - (l - half - h), h)
        } else if l <= half + 2.0 * h + w {
            Vec2::new(0.0, h - (l - half - h - w))
        } else {
            Vec2::new(l - half - 2.0 * h - w, 0.0)
        }
    }

    fn layout_origin(&self, node: NodeKey) -> Vec2 {
        self.nodes[node.0].origin
    }

    fn is_collapsed(&self, node: NodeKey) -> bool {
        let mut current = Some(node);
        while let Some(key) = current {
            let n = &self.nodes[key.0];
            if n.collapsed {
                return true;
            }
            current = n.parent;
        }
        false
    }

    fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        self.nodes[node.0].parent
    }

    fn nearest_node(&self, region: &LayoutBox, focus: Vec2) -> Option<NodeKey> {
        self.spatial_index
            .nearest_in(region, focus)
            .map(|found| found.node)
    }
}
