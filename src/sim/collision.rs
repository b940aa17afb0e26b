//! Collision detection between the player circle and obstacle rectangles

use glam::Vec2;

use super::state::Obstacle;

/// Closest point of an axis-aligned rectangle to `p`
#[inline]
pub fn closest_point_on_rect(p: Vec2, rect_min: Vec2, rect_size: Vec2) -> Vec2 {
    p.clamp(rect_min, rect_min + rect_size.max(Vec2::ZERO))
}

/// Circle vs axis-aligned rectangle overlap test
///
/// The circle centre is clamped onto the rectangle; the shapes touch when
/// that nearest point lies within the radius. Touching counts as a hit.
pub fn circle_rect_collision(center: Vec2, radius: f32, rect_min: Vec2, rect_size: Vec2) -> bool {
    let nearest = closest_point_on_rect(center, rect_min, rect_size);
    center.distance_squared(nearest) <= radius * radius
}

/// Index of the first obstacle overlapping the circle, if any
pub fn first_hit(center: Vec2, radius: f32, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| circle_rect_collision(center, radius, o.pos, o.size))
}
