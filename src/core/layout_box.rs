//! Achsenparallele Layout-Box eines Knotens (Snapshot aus dem Layout).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unveränderlicher Box-Snapshot mit abgeleiteten Kanten und Mittelpunkt.
///
/// Bildschirmkoordinaten: +Y zeigt nach unten, `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    /// Erstellt eine Box aus linker oberer Ecke und Größe.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Erstellt eine Box um einen Mittelpunkt.
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width * 0.5,
            center.y - height * 0.5,
            width,
            height,
        )
    }

    /// Degenerierte Box für einen freien Punkt: alle Kanten fallen auf `point`.
    pub fn from_point(point: Vec2) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    pub fn cx(&self) -> f32 {
        self.x + self.width * 0.5
    }

    pub fn cy(&self) -> f32 {
        self.y + self.height * 0.5
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.cx(), self.cy())
    }

    /// Ecke oben links.
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }

    /// Ecke unten rechts.
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    /// Halbe Diagonale (Radius des Umkreises).
    pub fn half_diagonal(&self) -> f32 {
        Vec2::new(self.width, self.height).length() * 0.5
    }

    /// Verschiebt die Box um `offset`.
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Geschlossener Punkt-in-Box-Test (Rand zählt dazu).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Geschlossener Überlappungstest zweier Boxen (Berührung zählt).
    pub fn intersects(&self, other: &LayoutBox) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Abstand von `point` zur Box; 0 wenn der Punkt innerhalb liegt.
    pub fn distance_to(&self, point: Vec2) -> f32 {
        let clamped = point.clamp(self.min(), self.max());
        clamped.distance(point)
    }
}
