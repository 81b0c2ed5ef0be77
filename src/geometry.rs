//! Rectangles and 2D transforms shared between layout measurement and the
//! physics engine seam.
//!
//! Layout measurement produces [`Rect`]s in whatever coordinate space the host
//! renders in; the session converts them into container-local space before any
//! body is created, and the engine hands back [`Transform2`]s in that same
//! container-local space. Keeping both types here means neither the session
//! nor an engine binding ever depends on a host toolkit's geometry types.

use glam::Vec2;

/// An axis-aligned rectangle: top-left corner plus size.
///
/// Matches the shape a layout measurement pass produces (DOM rects, egui
/// rects, scene-graph bounds all reduce to this).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Center point of the rectangle.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Width/height as a vector.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// True when both dimensions are finite and strictly positive.
    ///
    /// Anything else is a degenerate measurement (hidden element, collapsed
    /// container, NaN from an unmounted host) and must not become a body.
    pub fn is_sound(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
            && self.w > 0.0
            && self.h > 0.0
    }

    /// This rectangle re-expressed relative to `origin`'s top-left corner.
    ///
    /// `element_rect.relative_to(container_rect)` is the measurement step that
    /// turns viewport coordinates into simulation coordinates.
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect::new(self.x - origin.x, self.y - origin.y, self.w, self.h)
    }

    /// Fraction of this rectangle's area that overlaps `clip`, in `0.0..=1.0`.
    ///
    /// Drives the scroll trigger: the session arms on the host's clip
    /// rectangle and activates once the visible fraction first reaches the
    /// threshold.
    pub fn visible_fraction(&self, clip: &Rect) -> f32 {
        if self.w <= 0.0 || self.h <= 0.0 {
            return 0.0;
        }
        let left = self.x.max(clip.x);
        let top = self.y.max(clip.y);
        let right = (self.x + self.w).min(clip.x + clip.w);
        let bottom = (self.y + self.h).min(clip.y + clip.h);
        if right <= left || bottom <= top {
            return 0.0;
        }
        ((right - left) * (bottom - top)) / self.area()
    }
}

/// Position plus rotation of a rigid body, read back once per visual frame.
///
/// `x`/`y` locate the body *center* in container-local space; `angle` is
/// radians, clockwise in a y-down coordinate system.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Transform2 {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

impl Transform2 {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self { x, y, angle }
    }

    /// Translation component as a vector.
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Rotate `v` by this transform's angle (no translation).
    pub fn rotate(&self, v: Vec2) -> Vec2 {
        Vec2::from_angle(self.angle).rotate(v)
    }

    /// The four corners of a `size`-sized box centered on this transform.
    ///
    /// Used by wireframe overlays; order is clockwise from top-left.
    pub fn box_corners(&self, size: Vec2) -> [Vec2; 4] {
        let half = size * 0.5;
        let center = self.position();
        [
            center + self.rotate(Vec2::new(-half.x, -half.y)),
            center + self.rotate(Vec2::new(half.x, -half.y)),
            center + self.rotate(Vec2::new(half.x, half.y)),
            center + self.rotate(Vec2::new(-half.x, half.y)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_size() {
        let r = Rect::new(10.0, 20.0, 40.0, 8.0);
        assert_eq!(r.center(), Vec2::new(30.0, 24.0));
        assert_eq!(r.size(), Vec2::new(40.0, 8.0));
    }

    #[test]
    fn test_relative_to() {
        let container = Rect::new(100.0, 50.0, 400.0, 200.0);
        let word = Rect::new(130.0, 60.0, 42.0, 18.0);
        let local = word.relative_to(&container);
        assert_eq!(local, Rect::new(30.0, 10.0, 42.0, 18.0));
        // Size is unaffected by the space change
        assert_eq!(local.size(), word.size());
    }

    #[test]
    fn test_soundness() {
        assert!(Rect::new(0.0, 0.0, 10.0, 5.0).is_sound());
        assert!(!Rect::new(0.0, 0.0, 0.0, 5.0).is_sound());
        assert!(!Rect::new(0.0, 0.0, 10.0, -1.0).is_sound());
        assert!(!Rect::new(0.0, 0.0, f32::NAN, 5.0).is_sound());
        assert!(!Rect::new(f32::INFINITY, 0.0, 10.0, 5.0).is_sound());
    }

    #[test]
    fn test_visible_fraction() {
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);

        // Fully inside
        assert_eq!(Rect::new(10.0, 10.0, 20.0, 20.0).visible_fraction(&clip), 1.0);
        // Fully outside (below)
        assert_eq!(Rect::new(10.0, 150.0, 20.0, 20.0).visible_fraction(&clip), 0.0);
        // Half visible: bottom half clipped away
        let half = Rect::new(0.0, 90.0, 20.0, 20.0).visible_fraction(&clip);
        assert!((half - 0.5).abs() < 1e-6);
        // Degenerate rect never reports visibility
        assert_eq!(Rect::new(0.0, 0.0, 0.0, 0.0).visible_fraction(&clip), 0.0);
    }

    #[test]
    fn test_box_corners_unrotated() {
        let t = Transform2::new(50.0, 50.0, 0.0);
        let corners = t.box_corners(Vec2::new(20.0, 10.0));
        assert_eq!(corners[0], Vec2::new(40.0, 45.0));
        assert_eq!(corners[2], Vec2::new(60.0, 55.0));
    }

    #[test]
    fn test_box_corners_rotated_quarter_turn() {
        let t = Transform2::new(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        let corners = t.box_corners(Vec2::new(20.0, 10.0));
        // Top-left (-10, -5) maps to (5, -10) after a quarter turn
        assert!((corners[0].x - 5.0).abs() < 1e-4);
        assert!((corners[0].y + 10.0).abs() < 1e-4);
    }
}
