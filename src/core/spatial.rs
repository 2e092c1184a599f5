//! Spatial-Index (KD-Tree) über Knoten-Mittelpunkte für die Nearest-Node-Suche.

use glam::Vec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::{LayoutBox, NodeKey};

/// Ergebnis einer Bereichsabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatch {
    /// Arena-Schlüssel des gefundenen Knotens
    pub node: NodeKey,
    /// Abstand vom Suchpunkt zur Knoten-Box (0 = Punkt liegt in der Box)
    pub distance: f32,
}

/// Read-only Index über die Layout-Boxen aller Kandidaten-Knoten.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    entries: Vec<(NodeKey, LayoutBox)>,
    /// Größte halbe Diagonale aller Boxen (erweitert den Suchradius)
    max_half_diagonal: f32,
}

impl SpatialIndex {
    /// Erstellt einen leeren Spatial-Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            entries: Vec::new(),
            max_half_diagonal: 0.0,
        }
    }

    /// Baut einen neuen Index aus Knoten-Boxen.
    pub fn from_boxes(boxes: impl IntoIterator<Item = (NodeKey, LayoutBox)>) -> Self {
        let entries: Vec<(NodeKey, LayoutBox)> = boxes.into_iter().collect();
        let points: Vec<[f64; 2]> = entries
            .iter()
            .map(|(_, b)| [b.cx() as f64, b.cy() as f64])
            .collect();
        let max_half_diagonal = entries
            .iter()
            .map(|(_, b)| b.half_diagonal())
            .fold(0.0f32, f32::max);

        Self {
            tree: (&points).into(),
            entries,
            max_half_diagonal,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nächster Knoten zu `focus`, dessen Box `region` schneidet.
    ///
    /// Der KD-Tree liefert über einen umschließenden Kreis Kandidaten,
    /// danach folgt die exakte Box-Prüfung. Bei gleichem Abstand gewinnt
    /// der kleinere Schlüssel.
    pub fn nearest_in(&self, region: &LayoutBox, focus: Vec2) -> Option<SpatialMatch> {
        if self.is_empty() {
            return None;
        }

        let center = region.center();
        let radius = (region.half_diagonal() + self.max_half_diagonal) as f64;

        self.tree
            .within::<SquaredEuclidean>(&[center.x as f64, center.y as f64], radius * radius)
            .into_iter()
            .filter_map(|entry| {
                let (node, node_box) = self.entries.get(entry.item as usize)?;
                node_box.intersects(region).then(|| SpatialMatch {
                    node: *node,
                    distance: node_box.distance_to(focus),
                })
            })
            .min_by(|a, b| {
                a.distance
                    .total_cmp(&b.distance)
                    .then_with(|| a.node.cmp(&b.node))
            })
    }
}
