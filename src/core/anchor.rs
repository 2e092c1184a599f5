//! Prozent-Anker: Position relativ zur Umrisslinie eines Knotens.
//!
//! `point_at` läuft die Umrisslinie längenproportional ab, `percent_at`
//! bestimmt den Prozentwert winkelbasiert. Die beiden Abbildungen sind
//! keine exakten Inversen (Rechteck-Umriss vs. Vollkreis).

use glam::Vec2;

use super::{DiagramTree, LayoutBox, NodeKey};

/// Versatz zwischen parametrischem Start der Umrisslinie und der Mitte
/// ihrer Oberkante, als Anteil der Umrisslänge.
pub const OUTLINE_START_OFFSET: f32 = 0.07;

/// Absoluter Punkt auf dem Umriss von `node` bei `percent` (0..1).
///
/// 0 liegt auf der Mitte der Oberkante, die Werte laufen im Uhrzeigersinn
/// und nehmen damit denselben Bezug wie [`percent_at`] mit [`top_reference`].
pub fn point_at<T: DiagramTree + ?Sized>(tree: &T, node: NodeKey, percent: f32) -> Vec2 {
    let total = tree.outline_length(node);
    let length = if total > 0.0 {
        (total * (percent - OUTLINE_START_OFFSET)).rem_euclid(total)
    } else {
        0.0
    };
    tree.layout_origin(node) + tree.point_at_outline_length(node, length)
}

/// Prozentwert von `point` relativ zu `layout`, gemessen als Winkel zwischen
/// `reference_center → Box-Mitte` und `Box-Mitte → point`.
///
/// Ergebnis liegt in `[0, 1)` und ist auf zwei Nachkommastellen gerundet.
pub fn percent_at(layout: &LayoutBox, reference_center: Vec2, point: Vec2) -> f32 {
    let center = layout.center();
    let reference = center - reference_center;
    let target = point - center;
    let degrees = (target.y.atan2(target.x) - reference.y.atan2(reference.x))
        .to_degrees()
        .rem_euclid(360.0);
    let rounded = (degrees / 360.0 * 100.0).round() / 100.0;
    if rounded >= 1.0 {
        0.0
    } else {
        rounded
    }
}

/// Referenzpunkt direkt unter der Box-Mitte: 0 % zeigt damit zur Oberkante,
/// die Werte laufen im Uhrzeigersinn (Bildschirmkoordinaten).
pub fn top_reference(layout: &LayoutBox) -> Vec2 {
    layout.center() + Vec2::Y
}
