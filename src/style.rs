//! Renderer hints derived from the current force parameters.
//!
//! Pure functions of the parameter set, recomputed by hosts after every
//! parameter change; positions and visibility flow separately.

use crate::dataset::NodeRecord;
use crate::engine::ForceParameters;
use crate::palette::{Color, Palette};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub radius: f32,
    pub outline: Color,
    pub outline_width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStyle {
    pub width: f32,
    pub opacity: f32,
}

/// Node circles take their radius from the collision force and wear the
/// charge force on their outline: blue when attracting, red when repelling,
/// width scaled down from the charge magnitude, zero when charge is off.
pub fn node_style(parameters: &ForceParameters) -> NodeStyle {
    NodeStyle {
        radius: parameters.collide.radius,
        outline: if parameters.charge.strength > 0.0 {
            Color::BLUE
        } else {
            Color::RED
        },
        outline_width: if parameters.charge.enabled {
            parameters.charge.strength.abs() / 15.0
        } else {
            0.0
        },
    }
}

/// Link lines thin out and disappear when the spring force is disabled.
pub fn link_style(parameters: &ForceParameters) -> LinkStyle {
    if parameters.link.enabled {
        LinkStyle {
            width: 1.0,
            opacity: 1.0,
        }
    } else {
        LinkStyle {
            width: 0.5,
            opacity: 0.0,
        }
    }
}

pub fn node_fill(palette: &Palette, node: &NodeRecord) -> Color {
    palette.color_for(&node.state)
}
