//! Rope geometry
//!
//! The rope is a texture tile repeated along the line between its two anchors.
//! Nothing here holds state: the plan is rebuilt from anchors and container size
//! on every frame and on every resize.

use glam::Vec2;

use super::anchor::Anchor;

/// Natural size of the rope texture in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureSize {
    pub width: f32,
    pub height: f32,
}

impl TextureSize {
    /// Width/height ratio, `None` for a texture that has not decoded to a real size
    pub fn aspect(&self) -> Option<f32> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }
}

/// One placed rope tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Tile center in container pixels
    pub center: Vec2,
    /// Tile length along the rope
    pub length: f32,
    /// Part of the tile before the end anchor (the last tile is cropped to this)
    pub visible_length: f32,
    pub thickness: f32,
    /// Rotation in radians, shared by every tile
    pub angle: f32,
}

/// Tile the rope between two anchors
///
/// Tiles are `texture_aspect * thickness` long, laid from the start anchor in
/// steps of one tile. If a single tile would overshoot the whole distance the
/// distance itself becomes the tile length. Coincident anchors give no tiles.
pub fn segments(
    start: Anchor,
    end: Anchor,
    container: Vec2,
    texture_aspect: f32,
    thickness: f32,
) -> Vec<Segment> {
    let from = start.to_pixels(container);
    let to = end.to_pixels(container);
    let delta = to - from;
    let distance = delta.length();
    if distance <= 0.0 || !distance.is_finite() {
        return Vec::new();
    }

    let angle = delta.y.atan2(delta.x);
    let dir = delta / distance;

    let mut length = texture_aspect * thickness;
    if !(length > 0.0) || length > distance {
        length = distance;
    }

    // Rounding in the division can be off by one tile either way: every tile
    // must start before `distance` and together they must reach it
    let mut count = ((distance / length).ceil() as usize).max(1);
    while count > 1 && (count - 1) as f32 * length >= distance {
        count -= 1;
    }
    while (count as f32) * length < distance {
        count += 1;
    }
    (0..count)
        .map(|i| {
            let offset = i as f32 * length;
            Segment {
                center: from + dir * (offset + length / 2.0),
                length,
                visible_length: length.min(distance - offset),
                thickness,
                angle,
            }
        })
        .collect()
}

/// How the rope should be drawn this frame
#[derive(Debug, Clone, PartialEq)]
pub enum RopeRender {
    /// Nothing to draw (anchors coincide or container collapsed)
    Hidden,
    /// Textured tiles
    Tiled(Vec<Segment>),
    /// Straight stroke used when the texture is unavailable
    Stroke { from: Vec2, to: Vec2, width: f32 },
}

impl RopeRender {
    /// Build the render plan, falling back to a stroke without a usable texture
    pub fn plan(
        start: Anchor,
        end: Anchor,
        container: Vec2,
        texture: Option<TextureSize>,
        thickness: f32,
    ) -> Self {
        let from = start.to_pixels(container);
        let to = end.to_pixels(container);
        if from.distance(to) <= 0.0 {
            return RopeRender::Hidden;
        }

        match texture.and_then(|t| t.aspect()) {
            Some(aspect) => {
                let tiles = segments(start, end, container, aspect, thickness);
                if tiles.is_empty() {
                    RopeRender::Hidden
                } else {
                    RopeRender::Tiled(tiles)
                }
            }
            None => RopeRender::Stroke {
                from,
                to,
                width: thickness,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CONTAINER: Vec2 = Vec2::new(430.0, 932.0);

    #[test]
    fn test_coincident_anchors_give_nothing() {
        let a = Anchor::new(40.0, 40.0);
        assert!(segments(a, a, CONTAINER, 4.0, 10.0).is_empty());
        assert_eq!(
            RopeRender::plan(a, a, CONTAINER, None, 10.0),
            RopeRender::Hidden
        );
    }

    #[test]
    fn test_horizontal_rope_tiling() {
        // 100px long, tiles 30px long -> 4 tiles, last one cropped to 10px
        let container = Vec2::new(100.0, 100.0);
        let tiles = segments(
            Anchor::new(0.0, 50.0),
            Anchor::new(100.0, 50.0),
            container,
            3.0,
            10.0,
        );
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|s| s.length == 30.0 && s.angle == 0.0));
        assert_eq!(tiles[0].center, Vec2::new(15.0, 50.0));
        assert_eq!(tiles[3].center, Vec2::new(105.0, 50.0));
        assert_eq!(tiles[3].visible_length, 10.0);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tile() {
        let container = Vec2::new(100.0, 100.0);
        let start = Anchor::new(0.0, 0.0);
        let end = Anchor::new(4.0275, 0.0);
        let distance = start.to_pixels(container).distance(end.to_pixels(container));

        let tiles = segments(start, end, container, 1.3425, 1.0);
        assert!(tiles.len() <= 4);
        assert!(tiles.len() as f32 * tiles[0].length >= distance);
        assert!(tiles.iter().all(|s| s.visible_length > 0.0));
        let last_offset = (tiles.len() - 1) as f32 * tiles[0].length;
        assert!(last_offset < distance);
    }

    #[test]
    fn test_short_rope_uses_full_distance() {
        let container = Vec2::new(100.0, 100.0);
        let tiles = segments(
            Anchor::new(10.0, 10.0),
            Anchor::new(10.0, 30.0),
            container,
            8.0,
            10.0,
        );
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].length, 20.0);
        assert_eq!(tiles[0].center, Vec2::new(10.0, 20.0));
        assert!((tiles[0].angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_missing_texture_falls_back_to_stroke() {
        let start = Anchor::new(10.0, 10.0);
        let end = Anchor::new(50.0, 50.0);
        let degenerate = TextureSize {
            width: 0.0,
            height: 0.0,
        };
        for texture in [None, Some(degenerate)] {
            match RopeRender::plan(start, end, CONTAINER, texture, 12.0) {
                RopeRender::Stroke { width, .. } => assert_eq!(width, 12.0),
                other => panic!("expected stroke, got {other:?}"),
            }
        }
    }

    proptest! {
        #[test]
        fn prop_segments_cover_and_repeat(
            sx in 0.0f32..100.0, sy in 0.0f32..100.0,
            ex in 0.0f32..100.0, ey in 0.0f32..100.0,
            aspect in 0.5f32..20.0,
            thickness in 2.0f32..30.0,
        ) {
            let start = Anchor::new(sx, sy);
            let end = Anchor::new(ex, ey);
            let first = segments(start, end, CONTAINER, aspect, thickness);
            let second = segments(start, end, CONTAINER, aspect, thickness);
            prop_assert_eq!(&first, &second);

            let distance = start.to_pixels(CONTAINER).distance(end.to_pixels(CONTAINER));
            if distance > 0.0 {
                prop_assert!(!first.is_empty());
                let length = first[0].length;
                prop_assert!(first.len() as f32 * length >= distance);
                prop_assert!(first.iter().all(|s| s.visible_length > 0.0));
            }
        }
    }
}
