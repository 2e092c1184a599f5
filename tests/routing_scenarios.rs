//! Integrationstests für Standard-Routing und geometrische Prädikate:
//! - Klassifikation der Verbindungsart an typischen Box-Konstellationen
//! - Tangenten-Kontrollpunkte (Winkel und Länge)
//! - Handle-Überlappung und Strecke/Rechteck-Schnitt

use approx::assert_relative_eq;
use glam::Vec2;
use mindmap_relation_editor::core::{
    check_overlap, routing, segment_rect_intersect, BezierPoint, GeometryResolver, LayoutBox,
    Overlap, RouteKind, RouteParams,
};

#[test]
fn overlapping_columns_with_large_dy_use_30_degree_tangents() {
    let a = LayoutBox::new(0.0, 0.0, 100.0, 40.0);
    let b = LayoutBox::new(20.0, -300.0, 100.0, 40.0);
    let route = routing::resolve(&a, &b);

    assert_eq!(route.kind, RouteKind::Vertical);
    assert_eq!(route.from_point, Vec2::new(a.cx(), a.top()));
    assert_eq!(route.to_point, Vec2::new(b.cx(), b.bottom()));

    let center_distance = a.center().distance(b.center());
    let axis = route.to_point - route.from_point;
    let from_arm = route.from_controller - route.from_point;
    let to_arm = route.to_controller - route.to_point;

    assert_relative_eq!(from_arm.length(), 0.5 * center_distance, epsilon = 1e-3);
    assert_relative_eq!(to_arm.length(), 0.5 * center_distance, epsilon = 1e-3);
    assert_relative_eq!(
        axis.angle_to(from_arm).abs().to_degrees(),
        30.0,
        epsilon = 1e-3
    );
    assert_relative_eq!(
        (-axis).angle_to(to_arm).abs().to_degrees(),
        30.0,
        epsilon = 1e-3
    );
}

#[test]
fn same_row_far_apart_joins_facing_edges() {
    let a = LayoutBox::new(0.0, 0.0, 100.0, 40.0);
    let b = LayoutBox::new(500.0, 0.0, 100.0, 40.0);
    let route = routing::resolve(&a, &b);
    assert_eq!(route.from_point, Vec2::new(100.0, 20.0));
    assert_eq!(route.to_point, Vec2::new(500.0, 20.0));
}

#[test]
fn box_directly_above_joins_top_to_bottom() {
    let a = LayoutBox::from_center(Vec2::ZERO, 100.0, 40.0);
    let b = LayoutBox::from_center(Vec2::new(0.0, -300.0), 100.0, 40.0);
    let route = routing::resolve(&a, &b);
    assert_eq!(route.from_point, Vec2::new(0.0, a.top()));
    assert_eq!(route.to_point, Vec2::new(0.0, b.bottom()));
}

#[test]
fn medium_distance_same_height_joins_top_edges() {
    let a = LayoutBox::new(0.0, 0.0, 100.0, 40.0);
    let b = LayoutBox::new(200.0, 50.0, 100.0, 40.0);
    let route = routing::resolve(&a, &b);
    assert_eq!(route.kind, RouteKind::TopTop);
    assert_eq!(route.from_controller.x, route.from_point.x);
    assert!(route.from_controller.y < route.from_point.y);
}

#[test]
fn custom_params_shift_the_classification() {
    let a = LayoutBox::new(0.0, 0.0, 100.0, 40.0);
    let b = LayoutBox::new(500.0, 0.0, 100.0, 40.0);
    let resolver = GeometryResolver::new(RouteParams {
        x_range: 1000.0,
        ..RouteParams::default()
    });
    assert_eq!(resolver.classify(&a, &b), RouteKind::TopTop);
}

#[test]
fn overlap_reports_forward_before_backward() {
    let mut point = BezierPoint::smooth(Vec2::ZERO);
    point.is_corner = true;
    point.forward = Vec2::new(20.0, 0.0);
    point.backward = Vec2::new(-20.0, 0.0);
    assert_eq!(check_overlap(&point, 5.0), Overlap::None);

    point.forward = Vec2::new(3.0, 0.0);
    assert_eq!(check_overlap(&point, 5.0), Overlap::Forward);

    point.backward = Vec2::new(-1.0, 0.0);
    assert_eq!(check_overlap(&point, 5.0), Overlap::Forward);

    point.forward = Vec2::new(20.0, 0.0);
    assert_eq!(check_overlap(&point, 5.0), Overlap::Backward);
}

#[test]
fn segment_crossing_one_edge_hits_the_boundary() {
    let rect = LayoutBox::new(0.0, 0.0, 100.0, 100.0);
    let hit = segment_rect_intersect(Vec2::new(50.0, 50.0), Vec2::new(150.0, 60.0), &rect)
        .expect("Treffer auf rechter Kante");
    assert_relative_eq!(hit.x, 100.0, epsilon = 1e-4);
    assert_relative_eq!(hit.y, 55.0, epsilon = 1e-4);
}

#[test]
fn segment_stopping_short_of_an_edge_is_extended_once() {
    let rect = LayoutBox::new(0.0, 0.0, 100.0, 100.0);
    let hit = segment_rect_intersect(Vec2::new(5.0, -10.0), Vec2::new(5.0, -0.5), &rect)
        .expect("Treffer über Verlängerung");
    assert_relative_eq!(hit.x, 5.0, epsilon = 1e-4);
    assert_relative_eq!(hit.y, 0.0, epsilon = 1e-4);

    assert!(segment_rect_intersect(Vec2::new(5.0, -10.0), Vec2::new(5.0, -5.0), &rect).is_none());
}
