//! Bézier-Punkte und kubische Auswertung für Beziehungslinien.

use glam::Vec2;
use serde::Serialize;

/// Stützstellen für die Bogenlängen-Approximation (Stack-Array, keine Allokation).
const ARC_SAMPLES: usize = 32;

/// Ein Kurvenpunkt mit Vorwärts- und Rückwärts-Handle.
///
/// Ist `is_corner == false`, wird das jeweils andere Handle beim Setzen
/// am Vertex gespiegelt (glatter Übergang).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BezierPoint {
    pub vertex: Vec2,
    pub forward: Vec2,
    pub backward: Vec2,
    pub is_corner: bool,
}

impl BezierPoint {
    /// Glatter Punkt, beide Handles liegen auf dem Vertex.
    pub fn smooth(vertex: Vec2) -> Self {
        Self {
            vertex,
            forward: vertex,
            backward: vertex,
            is_corner: false,
        }
    }

    /// Setzt das Vorwärts-Handle (spiegelt das Rückwärts-Handle bei glatten Punkten).
    pub fn set_forward(&mut self, forward: Vec2) {
        self.forward = forward;
        if !self.is_corner {
            self.backward = 2.0 * self.vertex - forward;
        }
    }

    /// Setzt das Rückwärts-Handle (spiegelt das Vorwärts-Handle bei glatten Punkten).
    pub fn set_backward(&mut self, backward: Vec2) {
        self.backward = backward;
        if !self.is_corner {
            self.forward = 2.0 * self.vertex - backward;
        }
    }
}

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}

/// Kubisches Segment zwischen zwei Bézier-Punkten (`from.forward` → `to.backward`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicSegment {
    pub fn between(from: &BezierPoint, to: &BezierPoint) -> Self {
        Self {
            p0: from.vertex,
            p1: from.forward,
            p2: to.backward,
            p3: to.vertex,
        }
    }

    pub fn eval(&self, t: f32) -> Vec2 {
        cubic_bezier(self.p0, self.p1, self.p2, self.p3, t)
    }

    fn arc_table(&self) -> [f32; ARC_SAMPLES + 1] {
        let mut table = [0.0f32; ARC_SAMPLES + 1];
        let mut prev = self.p0;
        for i in 1..=ARC_SAMPLES {
            let p = self.eval(i as f32 / ARC_SAMPLES as f32);
            table[i] = table[i - 1] + prev.distance(p);
            prev = p;
        }
        table
    }

    /// Approximierte Kurvenlänge über Polylinien-Segmente.
    pub fn length(&self) -> f32 {
        self.arc_table()[ARC_SAMPLES]
    }

    /// Punkt bei `fraction` (0..1) der Bogenlänge.
    pub fn point_at_fraction(&self, fraction: f32) -> Vec2 {
        let table = self.arc_table();
        let total = table[ARC_SAMPLES];
        if total < f32::EPSILON {
            return self.p0;
        }
        let target = total * fraction.clamp(0.0, 1.0);
        let idx = table
            .partition_point(|&len| len < target)
            .clamp(1, ARC_SAMPLES);

        let len_before = table[idx - 1];
        let len_after = table[idx];
        let frac = if (len_after - len_before).abs() > f32::EPSILON {
            (target - len_before) / (len_after - len_before)
        } else {
            0.0
        };
        self.eval(((idx - 1) as f32 + frac) / ARC_SAMPLES as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn smooth_point_mirrors_opposite_handle() {
        let mut p = BezierPoint::smooth(Vec2::new(10.0, 10.0));
        p.set_forward(Vec2::new(20.0, 10.0));
        assert_eq!(p.backward, Vec2::new(0.0, 10.0));

        p.set_backward(Vec2::new(10.0, 0.0));
        assert_eq!(p.forward, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn corner_point_keeps_handles_independent() {
        let mut p = BezierPoint::smooth(Vec2::ZERO);
        p.is_corner = true;
        p.set_forward(Vec2::new(5.0, 0.0));
        assert_eq!(p.backward, Vec2::ZERO);
    }

    #[test]
    fn straight_segment_length_and_midpoint() {
        let seg = CubicSegment {
            p0: Vec2::ZERO,
            p1: Vec2::new(10.0, 0.0),
            p2: Vec2::new(20.0, 0.0),
            p3: Vec2::new(30.0, 0.0),
        };
        assert_relative_eq!(seg.length(), 30.0, epsilon = 1e-3);
        let mid = seg.point_at_fraction(0.5);
        assert_relative_eq!(mid.x, 15.0, epsilon = 1e-2);
        assert_relative_eq!(mid.y, 0.0);
    }

    #[test]
    fn symmetric_arc_midpoint_on_axis() {
        let seg = CubicSegment {
            p0: Vec2::new(0.0, 0.0),
            p1: Vec2::new(0.0, -50.0),
            p2: Vec2::new(100.0, -50.0),
            p3: Vec2::new(100.0, 0.0),
        };
        let mid = seg.point_at_fraction(0.5);
        assert_relative_eq!(mid.x, 50.0, epsilon = 0.05);
        assert_relative_eq!(mid.y, -37.5, epsilon = 0.05);
    }

    #[test]
    fn degenerate_segment_returns_start() {
        let p = Vec2::new(4.0, 2.0);
        let seg = CubicSegment {
            p0: p,
            p1: p,
            p2: p,
            p3: p,
        };
        assert_eq!(seg.point_at_fraction(0.5), p);
    }
}
