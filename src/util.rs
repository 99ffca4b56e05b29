use std::f32::consts::{PI, TAU};

use glam::{Vec2, vec2};

const PLACEMENT_RADIUS: f32 = 10.0;
const PLACEMENT_ANGLE: f32 = PI * (3.0 - 2.236_068);

pub(crate) fn phyllotaxis_position(index: usize) -> Vec2 {
    let radius = PLACEMENT_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * PLACEMENT_ANGLE;
    vec2(radius * angle.cos(), radius * angle.sin())
}

// Tiny deterministic displacement used to break up exactly coincident points.
pub(crate) fn jiggle(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin()) * 1e-6
}
