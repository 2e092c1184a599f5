//! Diagramm-Dokument: Knotenbaum plus Beziehungen, als JSON ladbar und speicherbar.

use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use super::editor::EditContext;
use crate::core::{
    DiagramTree, GeometryResolver, LayoutBox, NodeTree, Relation, RelationData, RelationStore,
};
use crate::shared::RelationSurface;

/// Benachrichtigung der Dokument-Schicht über inhaltliche Änderungen.
pub trait DocumentListener {
    fn content_changed(&mut self);
}

/// Listener, der Änderungen nur zählt.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChangeCounter {
    pub changes: usize,
}

impl DocumentListener for ChangeCounter {
    fn content_changed(&mut self) {
        self.changes += 1;
    }
}

/// Persistierter Knoten (absolute Layout-Box).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
}

/// Serialisierte Form eines Dokuments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub relations: Vec<RelationData>,
}

/// Knotenbaum und Beziehungen eines Diagramms.
#[derive(Debug, Default)]
pub struct Document {
    pub tree: NodeTree,
    pub relations: RelationStore,
}

impl Document {
    pub fn new(tree: NodeTree, relations: RelationStore) -> Self {
        Self { tree, relations }
    }

    /// Baut ein Dokument aus seinem Datensatz.
    ///
    /// Knoten dürfen in beliebiger Reihenfolge stehen, solange jeder
    /// Eltern-Knoten irgendwo im Datensatz vorkommt.
    pub fn from_record(record: DocumentRecord) -> anyhow::Result<Self> {
        let mut tree = NodeTree::new();
        let mut pending = record.nodes;
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for node in pending {
                let parent_ready = node
                    .parent
                    .as_deref()
                    .is_none_or(|parent| tree.resolve_node(parent).is_some());
                if !parent_ready {
                    deferred.push(node);
                    continue;
                }
                let layout = LayoutBox::new(node.x, node.y, node.width, node.height);
                let context = format!("Knoten '{}' ungültig", node.id);
                tree.insert_unindexed(node.id, node.parent.as_deref(), layout, node.collapsed)
                    .context(context)?;
            }
            if deferred.len() == before {
                let ids: Vec<&str> = deferred.iter().map(|n| n.id.as_str()).collect();
                bail!("Eltern-Knoten fehlen für: {}", ids.join(", "));
            }
            pending = deferred;
        }
        tree.reindex();

        let mut relations = RelationStore::default();
        for data in record.relations {
            relations.attach(Relation::new(data));
        }
        Ok(Self { tree, relations })
    }

    pub fn load_from_str(json: &str) -> anyhow::Result<Self> {
        let record: DocumentRecord =
            serde_json::from_str(json).context("Dokument ist kein gültiges JSON")?;
        Self::from_record(record)
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Dokument nicht lesbar: {}", path.display()))?;
        let document = Self::load_from_str(&content)
            .with_context(|| format!("Dokument fehlerhaft: {}", path.display()))?;
        log::info!(
            "Dokument geladen aus {}: {} Knoten, {} Beziehungen",
            path.display(),
            document.tree.len(),
            document.relations.len()
        );
        Ok(document)
    }

    pub fn to_record(&self) -> DocumentRecord {
        let nodes = self
            .tree
            .iter()
            .map(|(key, node)| {
                let layout = self.tree.layout_box(key);
                NodeRecord {
                    id: node.id.clone(),
                    parent: node.parent.map(|p| self.tree.node_id(p).to_string()),
                    x: layout.x,
                    y: layout.y,
                    width: layout.width,
                    height: layout.height,
                    collapsed: node.collapsed,
                }
            })
            .collect();
        let relations = self.relations.iter().map(|r| r.data().clone()).collect();
        DocumentRecord { nodes, relations }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(&self.to_record()).context("Dokument nicht serialisierbar")
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Dokument nicht schreibbar: {}", path.display()))?;
        log::info!("Dokument gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Leitet alle Beziehungen neu ab; gibt die Anzahl sichtbarer zurück.
    pub fn refresh_all<S>(&self, resolver: &GeometryResolver, surface: &mut S) -> usize
    where
        S: RelationSurface + ?Sized,
    {
        let mut visible = 0;
        for relation in self.relations.iter() {
            if relation.update(&self.tree, resolver, &mut *surface) {
                visible += 1;
            }
        }
        visible
    }

    /// Entfernt einen Knoten samt Teilbaum und löst betroffene Endpunkte.
    pub fn remove_node(&mut self, id: &str) -> Vec<String> {
        let removed = self.tree.remove_subtree(id);
        let unbound: usize = removed
            .iter()
            .map(|node_id| self.relations.unbind_node(node_id))
            .sum();
        if !removed.is_empty() {
            log::debug!(
                "{} Knoten entfernt, {} Endpunkt(e) gelöst",
                removed.len(),
                unbound
            );
        }
        removed
    }

    /// Entfernt Beziehungen ohne vollständige Endpunkte.
    pub fn sweep(&mut self) -> Vec<Relation> {
        self.relations.remove_disabled()
    }

    /// Kontext für den Kontrollpunkt-Editor über diesem Dokument.
    pub fn edit_context<'a>(
        &'a mut self,
        surface: &'a mut dyn RelationSurface,
        listener: &'a mut dyn DocumentListener,
    ) -> EditContext<'a, NodeTree> {
        EditContext {
            tree: &self.tree,
            relations: &mut self.relations,
            surface,
            listener,
        }
    }
}
