//! Percentage anchors and the layout they are resolved against

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point in percent of the container (0..100 on each axis, not clamped)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Resolve to pixels inside a container of the given size
    pub fn to_pixels(self, container: Vec2) -> Vec2 {
        self.as_vec2() * container / 100.0
    }

    /// Express a pixel position as a percentage of the container
    ///
    /// Returns `None` for a collapsed container.
    pub fn from_pixels(pos: Vec2, container: Vec2) -> Option<Self> {
        if container.x <= 0.0 || container.y <= 0.0 {
            return None;
        }
        let pct = pos / container * 100.0;
        Some(Self::new(pct.x, pct.y))
    }
}

impl From<(f32, f32)> for Anchor {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Vec2> for Anchor {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Axis-aligned box in container pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Point at a relative position, given in percent of the box
    pub fn point_at(&self, rel: Anchor) -> Vec2 {
        self.min + self.size * rel.as_vec2() / 100.0
    }
}

/// Measured scene layout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    /// Container size in pixels
    pub container: Vec2,
    /// Puller's bounding box, relative to the container origin
    pub puller: Rect,
}

impl Layout {
    /// Rope start held by the puller at `grip`
    pub fn rope_start(&self, grip: Anchor) -> Option<Anchor> {
        Anchor::from_pixels(self.puller.point_at(grip), self.container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_pixel_conversion() {
        let container = Vec2::new(400.0, 800.0);
        let a = Anchor::new(25.0, 50.0);
        assert_eq!(a.to_pixels(container), Vec2::new(100.0, 400.0));
        assert_eq!(Anchor::from_pixels(Vec2::new(100.0, 400.0), container), Some(a));
    }

    #[test]
    fn test_collapsed_container_has_no_anchor() {
        assert_eq!(Anchor::from_pixels(Vec2::ONE, Vec2::new(0.0, 10.0)), None);
    }

    #[test]
    fn test_rope_start_from_grip() {
        let layout = Layout {
            container: Vec2::new(200.0, 400.0),
            puller: Rect::new(0.0, 200.0, 100.0, 200.0),
        };
        // Middle of the puller box
        let start = layout.rope_start(Anchor::new(50.0, 50.0)).unwrap();
        assert_eq!(start, Anchor::new(25.0, 75.0));
    }
}
