//! Collision tests between hit-boxes
//!
//! Hit-boxes are simplified geometry, independent of sprite bounds:
//! the ship is a rotated rectangle, asteroids are circles and projectiles
//! are points. Axis-aligned bounds give a coarse overlap test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned viewport `[0, width] × [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True if the point lies inside the viewport, edges included
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// True if the point lies strictly outside the viewport
    pub fn is_outside(&self, p: Vec2) -> bool {
        !self.contains(p)
    }

    /// Clamp a point onto the viewport
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(0.0, self.width.max(0.0)), p.y.clamp(0.0, self.height.max(0.0)))
    }
}

/// A rectangle of `width × height` centred on `center`, rotated by `rotation`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRect {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

/// A circle hit-box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// Axis-aligned box from `min` spanning `size`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            size: half_extents * 2.0,
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

impl Circle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, Vec2::splat(self.radius))
    }
}

impl RotatedRect {
    /// Smallest axis-aligned box containing the rotated rectangle
    pub fn bounds(&self) -> Aabb {
        let (sin, cos) = self.rotation.sin_cos();
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let half = Vec2::new(
            hw * cos.abs() + hh * sin.abs(),
            hw * sin.abs() + hh * cos.abs(),
        );
        Aabb::from_center(self.center, half)
    }
}

/// Strict overlap of two axis-aligned boxes (touching edges do not count)
pub fn aabb_overlap(a: Aabb, b: Aabb) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    a.min.x < b_max.x && a_max.x > b.min.x && a.min.y < b_max.y && a_max.y > b.min.y
}

/// Check whether a point lies inside (or on) a circle
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Check whether a circle overlaps a rotated rectangle
///
/// The circle centre is moved into the rectangle's unrotated frame, clamped
/// to the half extents to find the closest point, and the distance to that
/// point is compared against the radius.
pub fn rotated_rect_circle_collision(circle: Circle, rect: RotatedRect) -> bool {
    let local = Vec2::from_angle(-rect.rotation).rotate(circle.center - rect.center);

    let half = Vec2::new(rect.width / 2.0, rect.height / 2.0);
    let closest = local.clamp(-half, half);

    local.distance_squared(closest) <= circle.radius * circle.radius
}

/// True if `b` lies within `buffer` of `a` on both axes
#[inline]
pub fn within_buffer(a: Vec2, b: Vec2, buffer: f32) -> bool {
    (a.x - b.x).abs() <= buffer && (a.y - b.y).abs() <= buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    fn rect(x: f32, y: f32, w: f32, h: f32, rotation: f32) -> RotatedRect {
        RotatedRect {
            center: Vec2::new(x, y),
            width: w,
            height: h,
            rotation,
        }
    }

    fn circle(x: f32, y: f32, r: f32) -> Circle {
        Circle {
            center: Vec2::new(x, y),
            radius: r,
        }
    }

    #[test]
    fn test_point_in_circle() {
        assert!(point_in_circle(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.0));
        assert!(!point_in_circle(Vec2::new(3.0, 4.1), Vec2::ZERO, 5.0));
        assert!(point_in_circle(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0), 0.0));
    }

    #[test]
    fn test_concentric_circle_and_rect_collide() {
        assert!(rotated_rect_circle_collision(circle(0.0, 0.0, 5.0), rect(0.0, 0.0, 10.0, 10.0, 0.0)));
    }

    #[test]
    fn test_distant_circle_misses() {
        assert!(!rotated_rect_circle_collision(
            circle(100.0, 100.0, 5.0),
            rect(0.0, 0.0, 10.0, 10.0, 0.0)
        ));
    }

    #[test]
    fn test_touching_edge_counts_as_hit() {
        // Right edge at x=5, circle reaches exactly to it
        assert!(rotated_rect_circle_collision(circle(8.0, 0.0, 3.0), rect(0.0, 0.0, 10.0, 10.0, 0.0)));
        assert!(!rotated_rect_circle_collision(circle(8.1, 0.0, 3.0), rect(0.0, 0.0, 10.0, 10.0, 0.0)));
    }

    #[test]
    fn test_rotation_changes_outcome() {
        // Long thin rect along x; a circle above its end misses unrotated,
        // but hits once the rect is rotated 45° toward it.
        let c = circle(14.0, 14.0, 2.0);
        assert!(!rotated_rect_circle_collision(c, rect(0.0, 0.0, 40.0, 4.0, 0.0)));
        assert!(rotated_rect_circle_collision(c, rect(0.0, 0.0, 40.0, 4.0, FRAC_PI_4)));
    }

    #[test]
    fn test_aabb_overlap_is_strict() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(5.0));
        let b = Aabb::from_center(Vec2::new(9.0, 0.0), Vec2::splat(5.0));
        let touching = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::splat(5.0));
        assert!(aabb_overlap(a, b));
        assert!(aabb_overlap(b, a));
        assert!(!aabb_overlap(a, touching));
        assert!(!aabb_overlap(a, Aabb::from_center(Vec2::new(0.0, 30.0), Vec2::splat(5.0))));
    }

    #[test]
    fn test_rotated_rect_bounds() {
        let upright = rect(0.0, 0.0, 10.0, 4.0, 0.0).bounds();
        assert_eq!(upright.min, Vec2::new(-5.0, -2.0));
        assert_eq!(upright.size, Vec2::new(10.0, 4.0));

        let quarter = rect(0.0, 0.0, 10.0, 4.0, std::f32::consts::FRAC_PI_2).bounds();
        assert!((quarter.size - Vec2::new(4.0, 10.0)).length() < 1e-4);

        assert_eq!(circle(1.0, 1.0, 2.0).bounds().max(), Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_viewport_bounds() {
        let view = Viewport::new(800.0, 600.0);
        assert!(view.contains(Vec2::new(0.0, 0.0)));
        assert!(view.contains(Vec2::new(800.0, 600.0)));
        assert!(view.is_outside(Vec2::new(-0.1, 300.0)));
        assert!(view.is_outside(Vec2::new(400.0, 600.5)));
        assert_eq!(view.clamp(Vec2::new(-20.0, 900.0)), Vec2::new(0.0, 600.0));
        assert_eq!(view.center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_within_buffer() {
        assert!(within_buffer(Vec2::new(100.0, 100.0), Vec2::new(110.0, 90.0), 10.0));
        assert!(!within_buffer(Vec2::new(100.0, 100.0), Vec2::new(111.0, 100.0), 10.0));
    }
}
