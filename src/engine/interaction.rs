//! Pointer-drag lifecycle. A dragged node is pinned to the pointer and
//! the solver is kept warm until release.

use glam::vec2;
use tracing::debug;

use super::Engine;

const DRAG_ALPHA_TARGET: f32 = 0.3;
// below the settle floor, so a released layout still comes to rest
const RELEASE_ALPHA_TARGET: f32 = 1e-4;

impl Engine {
    pub fn on_drag_start(&mut self, id: &str) {
        let Some(index) = self.store.index_of(id) else {
            debug!("ignoring drag start for unknown node {id}");
            return;
        };
        let node = &mut self.store.nodes[index];
        node.pinned = Some(node.position);
        self.simulation.set_alpha_target(DRAG_ALPHA_TARGET);
        self.simulation.restart();
    }

    pub fn on_drag_move(&mut self, id: &str, x: f32, y: f32) {
        let Some(index) = self.store.index_of(id) else {
            debug!("ignoring drag move for unknown node {id}");
            return;
        };
        self.store.nodes[index].pinned = Some(vec2(x, y));
    }

    pub fn on_drag_end(&mut self, id: &str) {
        let Some(index) = self.store.index_of(id) else {
            debug!("ignoring drag end for unknown node {id}");
            return;
        };
        self.store.nodes[index].pinned = None;
        self.simulation.set_alpha_target(RELEASE_ALPHA_TARGET);
    }
}
