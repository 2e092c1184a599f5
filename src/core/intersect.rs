//! Geometrische Prädikate: Handle-Überlappung, Strecke/Strecke, Strecke/Rechteck.

use glam::Vec2;

use super::{BezierPoint, LayoutBox};

/// Ergebnis der Handle-Vertex-Überlappungsprüfung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    /// Beide Handles liegen weiter als der Schwellwert vom Vertex entfernt
    None,
    /// Vorwärts-Handle liegt auf dem Vertex (hat Vorrang)
    Forward,
    /// Rückwärts-Handle liegt auf dem Vertex
    Backward,
}

/// Prüft, ob ein Handle mit dem Vertex zusammenfällt.
///
/// `Forward` gewinnt, wenn beide Handles innerhalb von `distance_threshold` liegen.
pub fn check_overlap(point: &BezierPoint, distance_threshold: f32) -> Overlap {
    if point.forward.distance(point.vertex) <= distance_threshold {
        Overlap::Forward
    } else if point.backward.distance(point.vertex) <= distance_threshold {
        Overlap::Backward
    } else {
        Overlap::None
    }
}

/// Schnittpunkt zweier Strecken `a1→a2` und `b1→b2`.
///
/// Parametrische Lösung; `None` bei parallelen Strecken oder wenn einer der
/// beiden Parameter außerhalb von `[0, 1]` liegt.
pub fn segment_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Vec2> {
    let ua_t = (b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x);
    let ub_t = (a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x);
    let denominator = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denominator == 0.0 {
        return None;
    }

    let ua = ua_t / denominator;
    let ub = ub_t / denominator;
    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(a1 + ua * (a2 - a1))
    } else {
        None
    }
}

/// Erster Schnittpunkt der Strecke `a1→a2` mit dem Rand von `rect`.
///
/// Kanten-Reihenfolge: oben, rechts, unten, links. Ohne Treffer wird die
/// Strecke einmalig um eine Einheit über `a2` hinaus verlängert.
pub fn segment_rect_intersect(a1: Vec2, a2: Vec2, rect: &LayoutBox) -> Option<Vec2> {
    first_edge_hit(a1, a2, rect).or_else(|| {
        let extended = a2 + (a2 - a1).normalize_or_zero();
        first_edge_hit(a1, extended, rect)
    })
}

fn first_edge_hit(a1: Vec2, a2: Vec2, rect: &LayoutBox) -> Option<Vec2> {
    let top_left = rect.min();
    let top_right = Vec2::new(rect.right(), rect.top());
    let bottom_right = rect.max();
    let bottom_left = Vec2::new(rect.left(), rect.bottom());

    [
        (top_left, top_right),
        (top_right, bottom_right),
        (bottom_right, bottom_left),
        (bottom_left, top_left),
    ]
    .into_iter()
    .find_map(|(b1, b2)| segment_intersect(a1, a2, b1, b2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn point_with_handles(forward: Vec2, backward: Vec2) -> BezierPoint {
        BezierPoint {
            vertex: Vec2::ZERO,
            forward,
            backward,
            is_corner: true,
        }
    }

    #[test]
    fn overlap_none_when_both_handles_far() {
        let p = point_with_handles(Vec2::new(10.0, 0.0), Vec2::new(-10.0, 0.0));
        assert_eq!(check_overlap(&p, 5.0), Overlap::None);
    }

    #[test]
    fn overlap_forward_when_forward_near() {
        let p = point_with_handles(Vec2::new(2.0, 0.0), Vec2::new(-10.0, 0.0));
        assert_eq!(check_overlap(&p, 5.0), Overlap::Forward);
    }

    #[test]
    fn overlap_forward_wins_when_both_near() {
        let p = point_with_handles(Vec2::new(4.0, 0.0), Vec2::new(-1.0, 0.0));
        assert_eq!(check_overlap(&p, 5.0), Overlap::Forward);
    }

    #[test]
    fn overlap_backward_when_only_backward_near() {
        let p = point_with_handles(Vec2::new(9.0, 0.0), Vec2::new(0.0, 3.0));
        assert_eq!(check_overlap(&p, 5.0), Overlap::Backward);
    }

    #[test]
    fn crossing_segments_intersect() {
        let hit = segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        )
        .expect("Schnittpunkt erwartet");
        assert_relative_eq!(hit.x, 5.0);
        assert_relative_eq!(hit.y, 5.0);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        assert!(segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        )
        .is_none());
    }

    #[test]
    fn disjoint_segments_do_not_intersect() {
        assert!(segment_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(0.0, 5.0),
        )
        .is_none());
    }

    #[test]
    fn segment_leaving_through_top_hits_boundary() {
        let rect = LayoutBox::new(0.0, 0.0, 10.0, 10.0);
        let hit = segment_rect_intersect(Vec2::new(5.0, 5.0), Vec2::new(5.0, -5.0), &rect)
            .expect("Treffer oben erwartet");
        assert_relative_eq!(hit.x, 5.0);
        assert_relative_eq!(hit.y, 0.0);
    }

    #[test]
    fn segment_leaving_through_right_hits_boundary() {
        let rect = LayoutBox::new(0.0, 0.0, 10.0, 10.0);
        let hit = segment_rect_intersect(Vec2::new(5.0, 4.0), Vec2::new(20.0, 4.0), &rect)
            .expect("Treffer rechts erwartet");
        assert_relative_eq!(hit.x, 10.0);
        assert_relative_eq!(hit.y, 4.0);
    }

    #[test]
    fn segment_short_of_corner_uses_extension() {
        // Endet knapp vor der oberen linken Ecke; erst die Verlängerung trifft
        let rect = LayoutBox::new(0.0, 0.0, 10.0, 10.0);
        let hit = segment_rect_intersect(Vec2::new(-5.0, -5.0), Vec2::new(-0.5, -0.5), &rect)
            .expect("Treffer über Verlängerung erwartet");
        assert_relative_eq!(hit.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(hit.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn extension_is_applied_only_once() {
        let rect = LayoutBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(
            segment_rect_intersect(Vec2::new(-50.0, -50.0), Vec2::new(-20.0, -20.0), &rect)
                .is_none()
        );
    }
}
