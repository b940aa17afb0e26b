//! Shape generation for 2D primitives
//!
//! All coordinates are canvas pixels with y pointing down; the pipeline
//! maps them to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::effects::FrameEffects;
use super::vertex::{Vertex, colors};
use crate::consts::TRAIL_LENGTH;
use crate::settings::Settings;
use crate::sim::{GameState, Obstacle};

/// Spacing of the background grid (px)
pub const GRID_GAP: f32 = 26.0;
/// Dash meter size and inset from the bottom-right corner (px)
pub const METER_SIZE: Vec2 = Vec2::new(120.0, 10.0);
pub const METER_INSET: f32 = 14.0;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a rectangle outline of the given line width
pub fn rect_outline(min: Vec2, size: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    let mut vertices = Vec::with_capacity(24);
    // Top, bottom, left, right
    vertices.extend(rect(min, Vec2::new(size.x, width), color));
    vertices.extend(rect(Vec2::new(min.x, max.y - width), Vec2::new(size.x, width), color));
    vertices.extend(rect(min, Vec2::new(width, size.y), color));
    vertices.extend(rect(Vec2::new(max.x - width, min.y), Vec2::new(width, size.y), color));
    vertices
}

/// Scrolling background grid
pub fn grid(width: f32, height: f32, time_ms: f64, scrolling: bool) -> Vec<Vertex> {
    let color = colors::with_alpha(colors::GRID, 0.25);
    let (ox, oy) = if scrolling {
        (
            ((time_ms / 30.0) % GRID_GAP as f64) as f32,
            ((time_ms / 25.0) % GRID_GAP as f64) as f32,
        )
    } else {
        (0.0, 0.0)
    };

    let mut vertices = Vec::new();
    let mut x = -GRID_GAP + ox;
    while x < width + GRID_GAP {
        vertices.extend(rect(Vec2::new(x, 0.0), Vec2::new(1.0, height), color));
        x += GRID_GAP;
    }
    let mut y = -GRID_GAP + oy;
    while y < height + GRID_GAP {
        vertices.extend(rect(Vec2::new(0.0, y), Vec2::new(width, 1.0), color));
        y += GRID_GAP;
    }
    vertices
}

/// Glow trail: older points are fainter, newer ones wider
pub fn trail(points: &[Vec2], radius: f32, segments: u32) -> Vec<Vertex> {
    let len = points.len() as f32;
    let mut vertices = Vec::with_capacity(points.len() * segments as usize * 3);
    for (i, p) in points.iter().enumerate() {
        let a = i as f32 / len;
        let color = colors::with_alpha(colors::TRAIL, a * 0.18);
        vertices.extend(circle(*p, radius + i as f32 * 0.9, color, segments));
    }
    vertices
}

/// Player core: layered discs standing in for a radial gradient lit from the top-left
pub fn player(center: Vec2, radius: f32, segments: u32) -> Vec<Vertex> {
    let light = Vec2::new(-1.0, -1.0);
    let mut vertices = circle(center, radius, colors::PLAYER_RIM, segments);
    vertices.extend(circle(
        center + light * radius * 0.12,
        radius * 0.7,
        colors::PLAYER_MID,
        segments,
    ));
    vertices.extend(circle(
        center + light * radius * 0.3,
        radius * 0.3,
        colors::PLAYER_CORE,
        segments,
    ));
    vertices
}

/// Obstacle body with its shimmer and outline
pub fn obstacle(o: &Obstacle, shimmer: bool) -> Vec<Vertex> {
    let t = if shimmer {
        (((o.age + o.size.x) * 2.0).sin() + 1.0) / 2.0
    } else {
        0.5
    };
    let mut vertices = rect(o.pos, o.size, colors::with_alpha(colors::OBSTACLE, 0.25 + t * 0.25));
    vertices.extend(rect_outline(
        o.pos + Vec2::splat(0.5),
        o.size - Vec2::splat(1.0),
        1.0,
        colors::OBSTACLE_EDGE,
    ));
    vertices
}

/// Dash readiness bar in the bottom-right corner
pub fn dash_meter(width: f32, height: f32, readiness: f32) -> Vec<Vertex> {
    let min = Vec2::new(width, height) - METER_SIZE - Vec2::splat(METER_INSET);
    let mut vertices = rect(min, METER_SIZE, colors::METER_BG);
    vertices.extend(rect_outline(
        min + Vec2::splat(0.5),
        METER_SIZE - Vec2::splat(1.0),
        1.0,
        colors::METER_EDGE,
    ));
    let fill = Vec2::new(METER_SIZE.x * readiness.clamp(0.0, 1.0), METER_SIZE.y);
    if fill.x > 0.0 {
        vertices.extend(rect(min, fill, colors::METER_FILL));
    }
    vertices
}

/// Build the full frame for the current state
pub fn build_frame(
    state: &GameState,
    settings: &Settings,
    effects: &FrameEffects,
    time_ms: f64,
) -> Vec<Vertex> {
    let segments = settings.quality.circle_segments();
    let mut vertices = Vec::new();

    if settings.grid {
        vertices.extend(grid(state.width, state.height, time_ms, settings.grid_scrolls()));
    }

    let keep = settings.trail_points(TRAIL_LENGTH);
    if keep > 0 {
        let points: Vec<Vec2> = effects.trail().iter().rev().take(keep).rev().copied().collect();
        vertices.extend(trail(&points, state.player.radius, segments / 2));
    }

    vertices.extend(player(state.player.pos, state.player.radius, segments));

    for o in &state.obstacles {
        vertices.extend(obstacle(o, settings.shimmer));
    }

    vertices.extend(dash_meter(state.width, state.height, state.player.dash.readiness()));

    if settings.effective_dash_pulse() && effects.pulse() > 0.0 {
        let alpha = 0.7 * 0.08 * effects.pulse();
        vertices.extend(rect(
            Vec2::ZERO,
            Vec2::new(state.width, state.height),
            colors::with_alpha(colors::PULSE, alpha),
        ));
    }

    vertices
}
