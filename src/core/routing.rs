//! Heuristisches Standard-Routing: Anker- und Kontrollpunkte zwischen zwei Boxen.
//!
//! Klassifikation nach horizontalem Abstand `x_distance` (richtungsabhängig):
//! - nah (`<= from.width + near_margin`): oben/unten bei großem Δy, sonst gleiche Seite
//! - mittel (`<= x_range`): oben/unten bei großem Δy, sonst oben/oben
//! - fern: oben/unten bei großem Δy, sonst links/rechts
//!
//! Alle Funktionen sind rein und total; identische Mittelpunkte liefern
//! Kontrollpunkte auf den Ankern.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::LayoutBox;

/// Schwellwerte und Faktoren des Routings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteParams {
    /// Obergrenze des mittleren horizontalen Abstands
    pub x_range: f32,
    /// Ab diesem |Δy| wird oben/unten verbunden
    pub y_range: f32,
    /// Zuschlag auf die Quellbreite für „nahe“ Boxen
    pub near_margin: f32,
    /// Kontrollpunkt-Länge relativ zur Mittelpunkt-Distanz
    pub controller_ratio: f32,
    /// Drehwinkel der Tangenten-Kontrollpunkte (Grad)
    pub tangent_angle_deg: f32,
}

impl Default for RouteParams {
    fn default() -> Self {
        Self {
            x_range: 300.0,
            y_range: 200.0,
            near_margin: 40.0,
            controller_ratio: 0.5,
            tangent_angle_deg: 30.0,
        }
    }
}

/// Gewählte Verbindungsart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Oben ↔ unten mit gedrehten Tangenten
    Vertical,
    /// Beide links bzw. beide rechts, horizontale Kontrollpunkte
    SameSide { left: bool },
    /// Oben ↔ oben, vertikale Kontrollpunkte
    TopTop,
    /// Links ↔ rechts mit gedrehten Tangenten
    Horizontal,
}

/// Anker und Kontrollpunkte einer gerouteten Verbindung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteGeometry {
    pub kind: RouteKind,
    pub from_point: Vec2,
    pub to_point: Vec2,
    pub from_controller: Vec2,
    pub to_controller: Vec2,
}

/// Reiner Resolver mit konfigurierbaren Parametern.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryResolver {
    pub params: RouteParams,
}

impl GeometryResolver {
    pub fn new(params: RouteParams) -> Self {
        Self { params }
    }

    /// Bestimmt die Verbindungsart zwischen zwei Boxen.
    pub fn classify(&self, from: &LayoutBox, to: &LayoutBox) -> RouteKind {
        let p = &self.params;
        let vector = to.center() - from.center();
        let x_distance = if vector.x < 0.0 {
            from.right() - to.cx()
        } else {
            to.cx() - from.left()
        };
        let vertical = vector.y.abs() > p.y_range;

        if vertical {
            RouteKind::Vertical
        } else if x_distance <= from.width + p.near_margin {
            RouteKind::SameSide {
                left: from.cx() < 0.0 && to.cx() < 0.0,
            }
        } else if x_distance <= p.x_range {
            RouteKind::TopTop
        } else {
            RouteKind::Horizontal
        }
    }

    /// Berechnet Anker und Kontrollpunkte für `from → to`.
    pub fn resolve(&self, from: &LayoutBox, to: &LayoutBox) -> RouteGeometry {
        let p = &self.params;
        let vector = to.center() - from.center();
        let length = vector.length() * p.controller_ratio;
        let kind = self.classify(from, to);

        let (from_point, to_point) = match kind {
            RouteKind::Vertical => {
                let upward = vector.y < 0.0;
                (
                    Vec2::new(from.cx(), if upward { from.top() } else { from.bottom() }),
                    Vec2::new(to.cx(), if upward { to.bottom() } else { to.top() }),
                )
            }
            RouteKind::SameSide { left } => (
                Vec2::new(if left { from.left() } else { from.right() }, from.cy()),
                Vec2::new(if left { to.left() } else { to.right() }, to.cy()),
            ),
            RouteKind::TopTop => (
                Vec2::new(from.cx(), from.top()),
                Vec2::new(to.cx(), to.top()),
            ),
            RouteKind::Horizontal => {
                let leftward = vector.x < 0.0;
                (
                    Vec2::new(if leftward { from.left() } else { from.right() }, from.cy()),
                    Vec2::new(if leftward { to.right() } else { to.left() }, to.cy()),
                )
            }
        };

        let (from_controller, to_controller) = match kind {
            RouteKind::Vertical | RouteKind::Horizontal => (
                angled_controller(from_point, to_point, p.tangent_angle_deg, length),
                angled_controller(to_point, from_point, p.tangent_angle_deg, length),
            ),
            RouteKind::SameSide { left } => {
                let dx = if left { -length } else { length };
                (
                    from_point + Vec2::new(dx, 0.0),
                    to_point + Vec2::new(dx, 0.0),
                )
            }
            RouteKind::TopTop => (
                from_point - Vec2::new(0.0, length),
                to_point - Vec2::new(0.0, length),
            ),
        };

        RouteGeometry {
            kind,
            from_point,
            to_point,
            from_controller,
            to_controller,
        }
    }
}

/// Kurzform mit Standardparametern.
pub fn resolve(from: &LayoutBox, to: &LayoutBox) -> RouteGeometry {
    GeometryResolver::default().resolve(from, to)
}

/// Kontrollpunkt im Abstand `length` von `p1`, Richtung `p1→p2` um `angle_deg` gedreht.
pub fn angled_controller(p1: Vec2, p2: Vec2, angle_deg: f32, length: f32) -> Vec2 {
    let theta = (p2.y - p1.y).atan2(p2.x - p1.x) - angle_deg.to_radians();
    p1 + Vec2::from_angle(theta) * length
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn angle_between(a: Vec2, b: Vec2) -> f32 {
        a.angle_to(b).abs().to_degrees()
    }

    #[test]
    fn far_apart_same_row_connects_right_to_left() {
        let a = LayoutBox::new(0.0, 0.0, 100.0, 40.0);
        let b = LayoutBox::new(500.0, 0.0, 100.0, 40.0);
        let route = resolve(&a, &b);

        assert_eq!(route.kind, RouteKind::Horizontal);
        assert_eq!(route.from_point, Vec2::new(100.0, 20.0));
        assert_eq!(route.to_point, Vec2::new(500.0, 20.0));
    }

    #[test]
    fn directly_above_connects_top_to_bottom() {
        let a = LayoutBox::from_center(Vec2::new(0.0, 0.0), 100.0, 40.0);
        let b = LayoutBox::from_center(Vec2::new(0.0, -300.0), 100.0, 40.0);
        let route = resolve(&a, &b);

        assert_eq!(route.kind, RouteKind::Vertical);
        assert_eq!(route.from_point, Vec2::new(a.cx(), a.top()));
        assert_eq!(route.to_point, Vec2::new(b.cx(), b.bottom()));
    }

    #[test]
    fn vertical_controllers_rotated_thirty_degrees() {
        let a = LayoutBox::from_center(Vec2::new(0.0, 0.0), 100.0, 40.0);
        let b = LayoutBox::from_center(Vec2::new(20.0, 320.0), 100.0, 40.0);
        let route = resolve(&a, &b);
        let center_distance = a.center().distance(b.center());

        assert_eq!(route.kind, RouteKind::Vertical);
        let axis = route.to_point - route.from_point;
        let from_arm = route.from_controller - route.from_point;
        let to_arm = route.to_controller - route.to_point;

        assert_relative_eq!(angle_between(axis, from_arm), 30.0, epsilon = 1e-3);
        assert_relative_eq!(angle_between(-axis, to_arm), 30.0, epsilon = 1e-3);
        assert_relative_eq!(from_arm.length(), 0.5 * center_distance, epsilon = 1e-3);
        assert_relative_eq!(to_arm.length(), 0.5 * center_distance, epsilon = 1e-3);
    }

    #[test]
    fn near_boxes_with_small_dy_use_same_side() {
        let a = LayoutBox::new(0.0, 0.0, 100.0, 40.0);
        let b = LayoutBox::new(20.0, 100.0, 100.0, 40.0);
        let route = resolve(&a, &b);
        let length = 0.5 * a.center().distance(b.center());

        assert_eq!(route.kind, RouteKind::SameSide { left: false });
        assert_eq!(route.from_point, Vec2::new(100.0, 20.0));
        assert_eq!(route.to_point, Vec2::new(120.0, 120.0));
        assert_relative_eq!(route.from_controller.x, 100.0 + length);
        assert_relative_eq!(route.from_controller.y, 20.0);
        assert_relative_eq!(route.to_controller.x, 120.0 + length);
    }

    #[test]
    fn same_side_switches_left_for_negative_centers() {
        let a = LayoutBox::from_center(Vec2::new(-200.0, 0.0), 100.0, 40.0);
        let b = LayoutBox::from_center(Vec2::new(-180.0, 90.0), 100.0, 40.0);
        let route = resolve(&a, &b);

        assert_eq!(route.kind, RouteKind::SameSide { left: true });
        assert_relative_eq!(route.from_point.x, a.left());
        assert!(route.from_controller.x < route.from_point.x);
    }

    #[test]
    fn medium_distance_connects_top_to_top() {
        let a = LayoutBox::new(0.0, 0.0, 100.0, 40.0);
        let b = LayoutBox::new(200.0, 50.0, 60.0, 40.0);
        let route = resolve(&a, &b);
        let length = 0.5 * a.center().distance(b.center());

        assert_eq!(route.kind, RouteKind::TopTop);
        assert_eq!(route.from_point, Vec2::new(50.0, 0.0));
        assert_eq!(route.to_point, Vec2::new(230.0, 50.0));
        assert_relative_eq!(route.from_controller.y, -length);
        assert_relative_eq!(route.to_controller.y, 50.0 - length);
    }

    #[test]
    fn far_leftward_connects_left_to_right() {
        let a = LayoutBox::new(600.0, 0.0, 100.0, 40.0);
        let b = LayoutBox::new(0.0, 30.0, 100.0, 40.0);
        let route = resolve(&a, &b);

        assert_eq!(route.kind, RouteKind::Horizontal);
        assert_eq!(route.from_point, Vec2::new(600.0, 20.0));
        assert_eq!(route.to_point, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn coincident_centers_put_controllers_on_anchors() {
        let a = LayoutBox::new(0.0, 0.0, 100.0, 40.0);
        let route = resolve(&a, &a);
        assert_eq!(route.from_controller, route.from_point);
        assert_eq!(route.to_controller, route.to_point);
    }

    #[test]
    fn floating_target_collapses_edges() {
        let a = LayoutBox::new(0.0, 0.0, 100.0, 40.0);
        let cursor = Vec2::new(800.0, 10.0);
        let route = resolve(&a, &LayoutBox::from_point(cursor));
        assert_eq!(route.to_point, cursor);
    }

    #[test]
    fn angled_controller_rotates_clockwise_on_screen() {
        let c = angled_controller(Vec2::ZERO, Vec2::new(10.0, 0.0), 90.0, 5.0);
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(c.y, -5.0, epsilon = 1e-5);
    }
}
