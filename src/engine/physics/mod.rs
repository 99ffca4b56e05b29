//! Velocity Verlet style solver: each tick advances the cooling
//! schedule, runs the force passes in a fixed order and integrates
//! velocities into positions. Pinned nodes ride along at their pin.

use glam::Vec2;

use crate::dataset::NodeRecord;
use crate::engine::registry::ResolvedForces;

mod forces;
mod quadtree;

use quadtree::QuadCell;

const ALPHA_MIN: f32 = 0.001;
const VELOCITY_DECAY: f32 = 0.6;
const BARNES_HUT_THETA: f32 = 0.9;

/// Where the solver is in its lifecycle. `Settled` means alpha dropped
/// below the floor and ticks are no-ops until a reheat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Settled,
}

/// Per-tick report handed back to the caller.
#[derive(Clone, Copy, Debug)]
pub struct Tick {
    pub alpha: f32,
    pub phase: Phase,
}

#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    impulses: Vec<Vec2>,
}

pub struct Simulation {
    alpha: f32,
    alpha_decay: f32,
    alpha_target: f32,
    phase: Phase,
    scratch: PhysicsScratch,
}

impl Simulation {
    pub(super) fn new() -> Self {
        Self {
            alpha: 1.0,
            // decay tuned so a full cooldown takes ~300 ticks
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            alpha_target: 0.0,
            phase: Phase::Idle,
            scratch: PhysicsScratch::default(),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(super) fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target;
    }

    /// Resume ticking at the current alpha.
    pub(super) fn restart(&mut self) {
        self.phase = Phase::Running;
    }

    /// Full reheat: back to alpha 1 and running, keeping the target.
    pub(super) fn reheat(&mut self) {
        self.alpha = 1.0;
        self.phase = Phase::Running;
    }

    pub(super) fn reset(&mut self) {
        self.alpha = 1.0;
        self.alpha_target = 0.0;
        self.phase = Phase::Running;
    }

    pub(super) fn stop(&mut self) {
        self.phase = Phase::Idle;
    }

    pub(super) fn step(&mut self, nodes: &mut [NodeRecord], resolved: &ResolvedForces) -> Tick {
        if self.phase != Phase::Running {
            return self.report();
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        if !resolved.springs.is_empty() {
            forces::apply_springs(
                nodes,
                &resolved.springs,
                resolved.link_distance,
                resolved.link_iterations,
                self.alpha,
            );
        }

        if resolved.charge.strength != 0.0 {
            self.scratch.positions.clear();
            self.scratch
                .positions
                .extend(nodes.iter().map(|node| node.position));
            if let Some(tree) = QuadCell::build(&self.scratch.positions) {
                let theta_sq = BARNES_HUT_THETA * BARNES_HUT_THETA;
                for (index, node) in nodes.iter_mut().enumerate() {
                    forces::accumulate_charge(
                        &tree,
                        index,
                        &self.scratch.positions,
                        resolved.charge,
                        theta_sq,
                        self.alpha,
                        &mut node.velocity,
                    );
                }
            }
        }

        if resolved.collide.strength != 0.0 {
            for _ in 0..resolved.collide.iterations {
                // collisions resolve against where nodes are headed, so the
                // tree is rebuilt over projected positions every pass
                self.scratch.positions.clear();
                self.scratch
                    .positions
                    .extend(nodes.iter().map(|node| node.position + node.velocity));
                let Some(tree) = QuadCell::build(&self.scratch.positions) else {
                    break;
                };
                self.scratch.impulses.resize(nodes.len(), Vec2::ZERO);
                self.scratch.impulses.fill(Vec2::ZERO);
                forces::accumulate_collision_pairs(
                    &tree,
                    &tree,
                    true,
                    &self.scratch.positions,
                    resolved.collide,
                    &mut self.scratch.impulses,
                );
                for (node, impulse) in nodes.iter_mut().zip(&self.scratch.impulses) {
                    node.velocity += *impulse;
                }
            }
        }

        forces::apply_center(nodes, resolved.center);

        if resolved.axis_x.strength != 0.0 {
            forces::apply_axis_x(nodes, resolved.axis_x, self.alpha);
        }
        if resolved.axis_y.strength != 0.0 {
            forces::apply_axis_y(nodes, resolved.axis_y, self.alpha);
        }

        for node in nodes.iter_mut() {
            if let Some(pin) = node.pinned {
                node.position = pin;
                node.velocity = Vec2::ZERO;
            } else {
                node.velocity *= VELOCITY_DECAY;
                node.position += node.velocity;
            }
        }

        if self.alpha < ALPHA_MIN {
            self.phase = Phase::Settled;
        }
        self.report()
    }

    fn report(&self) -> Tick {
        Tick {
            alpha: self.alpha,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use crate::dataset::{self, GraphStore, RawDataset};
    use crate::engine::registry::{ForceParameters, Viewport};

    use super::*;

    fn triangle_store() -> GraphStore {
        let raw = RawDataset::from_json_str(
            r#"{
                "nodes": [
                    {"id": "a", "state": "TN", "city": "Chennai", "region": "South", "vendor": "acme", "type": "supplier"},
                    {"id": "b", "state": "TN", "city": "Salem", "region": "West", "vendor": "acme", "type": "buyer"},
                    {"id": "c", "state": "MA", "city": "Mumbai", "region": "Coast", "vendor": "zenith", "type": "supplier"}
                ],
                "links": [
                    {"source": "a", "target": "b"},
                    {"source": "b", "target": "c"}
                ]
            }"#,
        )
        .unwrap();
        dataset::load(raw).unwrap()
    }

    fn running_simulation() -> Simulation {
        let mut simulation = Simulation::new();
        simulation.reheat();
        simulation
    }

    #[test]
    fn idle_simulation_does_not_tick() {
        let mut store = triangle_store();
        let resolved = ForceParameters::default().resolve(Viewport::new(900.0, 600.0), &store);
        let before: Vec<_> = store.nodes.iter().map(|node| node.position).collect();

        let mut simulation = Simulation::new();
        let tick = simulation.step(&mut store.nodes, &resolved);

        assert_eq!(tick.phase, Phase::Idle);
        assert_eq!(tick.alpha, 1.0);
        for (node, position) in store.nodes.iter().zip(before) {
            assert_eq!(node.position, position);
        }
    }

    #[test]
    fn alpha_decays_monotonically_toward_zero() {
        let mut store = triangle_store();
        let resolved = ForceParameters::default().resolve(Viewport::new(900.0, 600.0), &store);
        let mut simulation = running_simulation();

        let mut previous = simulation.alpha();
        for _ in 0..50 {
            let tick = simulation.step(&mut store.nodes, &resolved);
            assert!(tick.alpha < previous);
            previous = tick.alpha;
        }
    }

    #[test]
    fn cooldown_settles_after_roughly_three_hundred_ticks() {
        let mut store = triangle_store();
        let resolved = ForceParameters::default().resolve(Viewport::new(900.0, 600.0), &store);
        let mut simulation = running_simulation();

        let mut ticks = 0_usize;
        while simulation.phase() == Phase::Running {
            simulation.step(&mut store.nodes, &resolved);
            ticks += 1;
            assert!(ticks < 400, "solver failed to settle");
        }

        assert_eq!(simulation.phase(), Phase::Settled);
        assert!((250..=350).contains(&ticks), "settled after {ticks} ticks");
    }

    #[test]
    fn settled_simulation_leaves_positions_untouched() {
        let mut store = triangle_store();
        let resolved = ForceParameters::default().resolve(Viewport::new(900.0, 600.0), &store);
        let mut simulation = running_simulation();

        while simulation.phase() == Phase::Running {
            simulation.step(&mut store.nodes, &resolved);
        }
        let settled: Vec<_> = store.nodes.iter().map(|node| node.position).collect();

        simulation.step(&mut store.nodes, &resolved);

        for (node, position) in store.nodes.iter().zip(settled) {
            assert_eq!(node.position, position);
        }
    }

    #[test]
    fn reheat_restores_alpha_and_resumes_ticking() {
        let mut store = triangle_store();
        let resolved = ForceParameters::default().resolve(Viewport::new(900.0, 600.0), &store);
        let mut simulation = running_simulation();

        while simulation.phase() == Phase::Running {
            simulation.step(&mut store.nodes, &resolved);
        }

        simulation.reheat();
        assert_eq!(simulation.phase(), Phase::Running);
        assert_eq!(simulation.alpha(), 1.0);

        let tick = simulation.step(&mut store.nodes, &resolved);
        assert_eq!(tick.phase, Phase::Running);
        assert!(tick.alpha < 1.0);
    }

    #[test]
    fn restart_resumes_without_touching_alpha() {
        let mut simulation = running_simulation();
        simulation.stop();
        assert_eq!(simulation.phase(), Phase::Idle);

        let alpha = simulation.alpha();
        simulation.restart();
        assert_eq!(simulation.phase(), Phase::Running);
        assert_eq!(simulation.alpha(), alpha);
    }

    #[test]
    fn raised_alpha_target_keeps_the_solver_hot() {
        let mut store = triangle_store();
        let resolved = ForceParameters::default().resolve(Viewport::new(900.0, 600.0), &store);
        let mut simulation = running_simulation();
        simulation.set_alpha_target(0.3);

        for _ in 0..1000 {
            simulation.step(&mut store.nodes, &resolved);
        }

        assert_eq!(simulation.phase(), Phase::Running);
        assert!(simulation.alpha() > 0.29);
    }

    #[test]
    fn pinned_node_holds_its_pin_through_ticks() {
        let mut store = triangle_store();
        let resolved = ForceParameters::default().resolve(Viewport::new(900.0, 600.0), &store);
        let pin = vec2(123.0, 45.0);
        store.nodes[0].pinned = Some(pin);

        let mut simulation = running_simulation();
        for _ in 0..20 {
            simulation.step(&mut store.nodes, &resolved);
        }

        assert_eq!(store.nodes[0].position, pin);
        assert_eq!(store.nodes[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn empty_store_still_cools_down() {
        let store = dataset::load(RawDataset::default()).unwrap();
        let resolved = ForceParameters::default().resolve(Viewport::new(900.0, 600.0), &store);
        let mut nodes = store.nodes;
        assert!(nodes.is_empty());

        let mut simulation = running_simulation();
        let mut ticks = 0_usize;
        while simulation.phase() == Phase::Running {
            simulation.step(&mut nodes, &resolved);
            ticks += 1;
            assert!(ticks < 400, "solver failed to settle");
        }

        assert_eq!(simulation.phase(), Phase::Settled);
    }
}
